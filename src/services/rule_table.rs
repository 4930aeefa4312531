use std::collections::BTreeSet;

use crate::models::AssociationRule;

/// Immutable set of mined association rules
///
/// Support, confidence and lift are kept for callers but play no part in [`RuleTable::expand`].
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<AssociationRule>,
}

impl RuleTable {
    /// Keeps every rule with a non-empty antecedent and consequent
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AssociationRule>,
    {
        let mut discarded = 0usize;
        let rules: Vec<AssociationRule> = records
            .into_iter()
            .filter(|rule| {
                let valid = rule.is_valid();
                if !valid {
                    discarded += 1;
                }
                valid
            })
            .collect();

        if discarded > 0 {
            tracing::debug!(discarded, "Discarded rules with an empty side");
        }
        tracing::info!(rules = rules.len(), "Rule table loaded");

        Self { rules }
    }

    /// Union of the consequents of every rule whose antecedent meets `skills`
    pub fn expand<'a, I>(&self, skills: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let skills: BTreeSet<&str> = skills.into_iter().collect();
        self.rules
            .iter()
            .filter(|rule| rule.antecedent.iter().any(|a| skills.contains(a.as_str())))
            .flat_map(|rule| rule.consequent.iter().cloned())
            .collect()
    }

    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
