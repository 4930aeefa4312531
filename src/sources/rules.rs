use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::{error::AppResult, models::AssociationRule};

use super::set_literal::parse_string_set;

const ANTECEDENTS: &str = "antecedents";
const CONSEQUENTS: &str = "consequents";
const SUPPORT: &str = "support";
const CONFIDENCE: &str = "confidence";
const LIFT: &str = "lift";

/// Reads mined rule records from a CSV file
pub fn read_rules_from_path(path: impl AsRef<Path>) -> AppResult<Vec<AssociationRule>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_rules(file)
}

/// Reads mined rule records, skipping rows that do not parse
///
/// Empty-sided rules are returned as-is; [`crate::services::RuleTable`] discards them.
pub fn read_rules<R: Read>(reader: R) -> AppResult<Vec<AssociationRule>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let antecedents = position(ANTECEDENTS);
    let consequents = position(CONSEQUENTS);
    let metrics = [position(SUPPORT), position(CONFIDENCE), position(LIFT)];

    let mut rules = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|record| parse_rule(&record, antecedents, consequents, metrics));

        match parsed {
            Ok(rule) => rules.push(rule),
            Err(reason) => {
                tracing::debug!(row = line + 1, reason = %reason, "Skipping rule row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, loaded = rules.len(), "Skipped unparseable rule rows");
    }

    Ok(rules)
}

fn parse_rule(
    record: &StringRecord,
    antecedents: Option<usize>,
    consequents: Option<usize>,
    [support, confidence, lift]: [Option<usize>; 3],
) -> Result<AssociationRule, String> {
    let set = |column: Option<usize>, name: &str| -> Result<BTreeSet<String>, String> {
        let cell = column
            .and_then(|i| record.get(i))
            .ok_or_else(|| format!("missing {} column", name))?;
        parse_string_set(cell).map_err(|e| format!("{}: {}", name, e))
    };
    let metric = |column: Option<usize>, name: &str| match column.and_then(|i| record.get(i)) {
        None => Ok(0.0),
        Some(cell) => cell
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("{}: {}", name, e)),
    };

    Ok(AssociationRule {
        antecedent: set(antecedents, ANTECEDENTS)?,
        consequent: set(consequents, CONSEQUENTS)?,
        support: metric(support, SUPPORT)?,
        confidence: metric(confidence, CONFIDENCE)?,
        lift: metric(lift, LIFT)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "antecedents,consequents,antecedent support,consequent support,support,confidence,lift\n";

    #[test]
    fn test_reads_mined_rules() {
        let csv = format!(
            "{}{}",
            HEADER,
            "\"frozenset({'Python'})\",\"frozenset({'Data Analysis', 'SQL'})\",0.2,0.1,0.05,0.25,2.5\n"
        );
        let rules = read_rules(csv.as_bytes()).unwrap();

        assert_eq!(rules.len(), 1);
        assert!(rules[0].antecedent.contains("Python"));
        assert_eq!(rules[0].consequent.len(), 2);
        assert_eq!(rules[0].support, 0.05);
        assert_eq!(rules[0].confidence, 0.25);
        assert_eq!(rules[0].lift, 2.5);
    }

    #[test]
    fn test_skips_bad_rows() {
        let csv = format!(
            "{}{}{}{}",
            HEADER,
            "\"eval('boom')\",\"frozenset({'a'})\",0,0,0.1,0.5,1.0\n",
            "\"frozenset({'a'})\",\"frozenset({'b'})\",0,0,not-a-number,0.5,1.0\n",
            "\"frozenset({'a'})\",\"frozenset({'c'})\",0,0,0.1,0.5,1.0\n"
        );
        let rules = read_rules(csv.as_bytes()).unwrap();

        assert_eq!(rules.len(), 1);
        assert!(rules[0].consequent.contains("c"));
    }

    #[test]
    fn test_missing_metric_columns_default_to_zero() {
        let csv = "antecedents,consequents\n\"{'a'}\",\"{'b'}\"\n";
        let rules = read_rules(csv.as_bytes()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].lift, 0.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_rules_from_path("/definitely/not/rules.csv").is_err());
    }
}
