//! Configuration for expectation suites.
//!
//! Use [`QualityConfig`] to configure a suite from code or environment
//! variables, then build a suite with
//! [`ExpectationSuite::with_config`](crate::suite::ExpectationSuite::with_config)
//! or the suite builder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How to treat a predicate whose own evaluation fails (missing field,
/// incompatible types), as opposed to one that returns false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateErrorPolicy {
    /// Count the violation and keep the record, whatever the expectation's
    /// action. The default.
    #[default]
    Warn,
    /// Count the violation, then apply the expectation's own action as if
    /// the predicate had returned false.
    ApplyAction,
    /// Abort the evaluation with the predicate error.
    Abort,
}

impl fmt::Display for PredicateErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateErrorPolicy::Warn => write!(f, "warn"),
            PredicateErrorPolicy::ApplyAction => write!(f, "apply_action"),
            PredicateErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for PredicateErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(PredicateErrorPolicy::Warn),
            "apply_action" | "apply-action" => Ok(PredicateErrorPolicy::ApplyAction),
            "abort" => Ok(PredicateErrorPolicy::Abort),
            other => Err(format!(
                "unknown predicate error policy '{other}' (expected warn, apply_action, or abort)"
            )),
        }
    }
}

/// Suite-level evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Whether column resolution (and expectation-name uniqueness) is
    /// case-sensitive. Defaults to false, matching `spark.sql.caseSensitive`.
    pub case_sensitive: bool,
    pub on_predicate_error: PredicateErrorPolicy,
    /// Emit `log` records for violations. On by default; counts are kept
    /// either way.
    pub log_violations: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig {
            case_sensitive: false,
            on_predicate_error: PredicateErrorPolicy::default(),
            log_violations: true,
        }
    }
}

impl QualityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_on_predicate_error(mut self, policy: PredicateErrorPolicy) -> Self {
        self.on_predicate_error = policy;
        self
    }

    pub fn with_log_violations(mut self, log_violations: bool) -> Self {
        self.log_violations = log_violations;
        self
    }

    /// Read overrides from `ROWGUARD_CASE_SENSITIVE`,
    /// `ROWGUARD_ON_PREDICATE_ERROR`, and `ROWGUARD_LOG_VIOLATIONS` on top
    /// of the defaults. Unset or unparsable variables keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_flag("ROWGUARD_CASE_SENSITIVE") {
            config.case_sensitive = v;
        }
        if let Ok(raw) = std::env::var("ROWGUARD_ON_PREDICATE_ERROR") {
            if let Ok(policy) = raw.parse() {
                config.on_predicate_error = policy;
            }
        }
        if let Some(v) = env_flag("ROWGUARD_LOG_VIOLATIONS") {
            config.log_violations = v;
        }
        config
    }
}

fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QualityConfig::default();
        assert!(!config.case_sensitive);
        assert_eq!(config.on_predicate_error, PredicateErrorPolicy::Warn);
        assert!(config.log_violations);
    }

    #[test]
    fn test_builder_setters() {
        let config = QualityConfig::new()
            .with_case_sensitive(true)
            .with_on_predicate_error(PredicateErrorPolicy::Abort)
            .with_log_violations(false);
        assert!(config.case_sensitive);
        assert_eq!(config.on_predicate_error, PredicateErrorPolicy::Abort);
        assert!(!config.log_violations);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "apply_action".parse::<PredicateErrorPolicy>().unwrap(),
            PredicateErrorPolicy::ApplyAction
        );
        assert_eq!(
            " ABORT ".parse::<PredicateErrorPolicy>().unwrap(),
            PredicateErrorPolicy::Abort
        );
        assert!("explode".parse::<PredicateErrorPolicy>().is_err());
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("ROWGUARD_CASE_SENSITIVE", "true");
        std::env::set_var("ROWGUARD_ON_PREDICATE_ERROR", "abort");
        std::env::set_var("ROWGUARD_LOG_VIOLATIONS", "junk");
        let config = QualityConfig::from_env();
        std::env::remove_var("ROWGUARD_CASE_SENSITIVE");
        std::env::remove_var("ROWGUARD_ON_PREDICATE_ERROR");
        std::env::remove_var("ROWGUARD_LOG_VIOLATIONS");

        assert!(config.case_sensitive);
        assert_eq!(config.on_predicate_error, PredicateErrorPolicy::Abort);
        // Unparsable values keep the default.
        assert!(config.log_violations);
    }

    #[test]
    fn test_policy_display_roundtrip() {
        for policy in [
            PredicateErrorPolicy::Warn,
            PredicateErrorPolicy::ApplyAction,
            PredicateErrorPolicy::Abort,
        ] {
            assert_eq!(policy.to_string().parse::<PredicateErrorPolicy>(), Ok(policy));
        }
    }
}
