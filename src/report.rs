//! Violation counts and run reports.

use crate::record::Record;
use serde_json::Value as JsonValue;

/// Per-expectation violation tally, kept in registration order.
///
/// One accumulator is owned by each evaluation; counts never cross runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationCounts {
    entries: Vec<(String, u64)>,
}

impl ViolationCounts {
    /// Zeroed counts for the given expectation names, in registration order.
    pub(crate) fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        ViolationCounts {
            entries: names.into_iter().map(|n| (n.to_string(), 0)).collect(),
        }
    }

    /// Increment by expectation index (registration order).
    pub(crate) fn bump(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.1 += 1;
        }
    }

    /// Violations recorded for one expectation; zero if unknown.
    pub fn get(&self, name: &str) -> u64 {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// `(name, violations)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all violations.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// True when no expectation recorded a violation.
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|(_, c)| *c == 0)
    }

    /// JSON rendering as an array of `{"expectation", "violations"}`
    /// objects, preserving registration order.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(
            self.entries
                .iter()
                .map(|(name, count)| {
                    serde_json::json!({
                        "expectation": name,
                        "violations": count,
                    })
                })
                .collect(),
        )
    }
}

/// Result of an eager run: surviving records plus final counts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub records: Vec<Record>,
    pub counts: ViolationCounts,
}

impl RunReport {
    /// True when every record passed every expectation.
    pub fn is_clean(&self) -> bool {
        self.counts.is_clean()
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "records": self.records,
            "counts": self.counts.to_json(),
        })
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_json())
            .unwrap_or_else(|_| self.to_json().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_json;
    use serde_json::json;

    #[test]
    fn test_counts_in_registration_order() {
        let mut counts = ViolationCounts::with_names(["b_rule", "a_rule"]);
        counts.bump(1);
        counts.bump(1);
        counts.bump(0);

        let order: Vec<&str> = counts.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["b_rule", "a_rule"]);
        assert_eq!(counts.get("a_rule"), 2);
        assert_eq!(counts.get("b_rule"), 1);
        assert_eq!(counts.get("unknown"), 0);
        assert_eq!(counts.total(), 3);
        assert!(!counts.is_clean());
    }

    #[test]
    fn test_counts_to_json_preserves_order() {
        let mut counts = ViolationCounts::with_names(["z", "a"]);
        counts.bump(0);
        assert_eq!(
            counts.to_json(),
            json!([
                {"expectation": "z", "violations": 1},
                {"expectation": "a", "violations": 0},
            ])
        );
    }

    #[test]
    fn test_run_report_json() {
        let report = RunReport {
            records: vec![record_from_json(json!({"qty": 1})).unwrap()],
            counts: ViolationCounts::with_names(["positive_qty"]),
        };
        assert!(report.is_clean());
        let rendered = report.to_json();
        assert_eq!(rendered["records"][0]["qty"], json!(1));
        assert_eq!(rendered["counts"][0]["violations"], json!(0));
        assert!(report.to_json_pretty().contains('\n'));
    }
}
