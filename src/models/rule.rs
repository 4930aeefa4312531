use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Association rule mined from course skill tags: antecedent => consequent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: BTreeSet<String>,
    pub consequent: BTreeSet<String>,
    /// P(antecedent ∪ consequent)
    pub support: f64,
    /// P(consequent | antecedent)
    pub confidence: f64,
    /// confidence / P(consequent)
    pub lift: f64,
}

impl AssociationRule {
    pub fn new<A, C>(antecedent: A, consequent: C) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            antecedent: antecedent.into_iter().map(Into::into).collect(),
            consequent: consequent.into_iter().map(Into::into).collect(),
            support: 0.0,
            confidence: 0.0,
            lift: 0.0,
        }
    }

    pub fn with_metrics(mut self, support: f64, confidence: f64, lift: f64) -> Self {
        self.support = support;
        self.confidence = confidence;
        self.lift = lift;
        self
    }

    /// A rule needs both sides to fire
    pub fn is_valid(&self) -> bool {
        !self.antecedent.is_empty() && !self.consequent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rule_collects_sets() {
        let rule = AssociationRule::new(["sql", "python", "sql"], ["pandas"])
            .with_metrics(0.05, 0.4, 2.1);
        assert_eq!(rule.antecedent.len(), 2);
        assert!(rule.consequent.contains("pandas"));
        assert_eq!(rule.lift, 2.1);
        assert!(rule.is_valid());
    }

    #[test]
    fn test_empty_sides_are_invalid() {
        let no_antecedent = AssociationRule::new(Vec::<String>::new(), ["python"]);
        let no_consequent = AssociationRule::new(["sql"], Vec::<String>::new());
        assert!(!no_antecedent.is_valid());
        assert!(!no_consequent.is_valid());
    }
}
