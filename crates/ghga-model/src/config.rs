//! Engine configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid version pattern"));

/// How a bare string in a list-valued relationship field is treated.
///
/// The wire format allows `Union[List[X], str]`, where a string could be a
/// single reference or a serialized list of references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringForListPolicy {
    /// Treat the string as one reference and report a warning.
    #[default]
    AcceptAsSingle,
    /// Report a type mismatch.
    Reject,
}

/// Configuration for batch validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema versions accepted in addition to the catalogue's own version.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_versions: Vec<String>,
    /// Treatment of bare strings in list-valued relationship fields.
    #[serde(default)]
    pub string_for_list: StringForListPolicy,
    /// Stop collecting defects once this many were found (None = all).
    /// A cap of 0 counts as 1: a capped run always reports something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_errors: Option<usize>,
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an additional schema version.
    pub fn with_accepted_version(mut self, version: impl Into<String>) -> Self {
        self.accepted_versions.push(version.into());
        self
    }

    /// Set the string-for-list policy.
    pub fn with_string_for_list(mut self, policy: StringForListPolicy) -> Self {
        self.string_for_list = policy;
        self
    }

    /// Cap the number of collected defects (at least 1).
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max.max(1));
        self
    }

    /// The effective defect cap, never below 1.
    pub(crate) fn error_cap(&self) -> Option<usize> {
        self.max_errors.map(|max| max.max(1))
    }

    /// Check whether a declared version is accepted for a catalogue.
    pub fn accepts_version(&self, catalogue_version: &str, declared: &str) -> bool {
        declared == catalogue_version || self.accepted_versions.iter().any(|v| v == declared)
    }

    /// Explain why a declared version is rejected.
    pub(crate) fn version_rejection(&self, catalogue_version: &str, declared: &str) -> String {
        if !VERSION_PATTERN.is_match(declared) {
            return format!(
                "'{}' is not a schema version (expected MAJOR.MINOR.PATCH)",
                declared
            );
        }
        let mut accepted = vec![catalogue_version];
        accepted.extend(self.accepted_versions.iter().map(String::as_str));
        format!(
            "schema version {} is not supported (accepted: {})",
            declared,
            accepted.join(", ")
        )
    }

    /// Returns true once `count` defects reach the configured cap.
    ///
    /// Never true while `count` is 0.
    pub(crate) fn error_cap_reached(&self, count: usize) -> bool {
        self.error_cap().is_some_and(|max| count >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_catalogue_version_only() {
        let config = EngineConfig::default();
        assert!(config.accepts_version("0.5.0", "0.5.0"));
        assert!(!config.accepts_version("0.5.0", "0.4.0"));
        assert_eq!(config.string_for_list, StringForListPolicy::AcceptAsSingle);
        assert!(!config.error_cap_reached(1000));
    }

    #[test]
    fn test_extra_versions() {
        let config = EngineConfig::new().with_accepted_version("0.4.0");
        assert!(config.accepts_version("0.5.0", "0.4.0"));
        assert_eq!(
            config.version_rejection("0.5.0", "0.3.0"),
            "schema version 0.3.0 is not supported (accepted: 0.5.0, 0.4.0)"
        );
    }

    #[test]
    fn test_malformed_version_message() {
        let message = EngineConfig::default().version_rejection("0.5.0", "latest");
        assert!(message.contains("not a schema version"));
    }

    #[test]
    fn test_error_cap() {
        let config = EngineConfig::new().with_max_errors(2);
        assert!(!config.error_cap_reached(1));
        assert!(config.error_cap_reached(2));
    }

    #[test]
    fn test_zero_cap_counts_as_one() {
        let built = EngineConfig::new().with_max_errors(0);
        assert_eq!(built.max_errors, Some(1));

        let parsed: EngineConfig = serde_json::from_str(r#"{"max_errors": 0}"#).unwrap();
        assert_eq!(parsed.error_cap(), Some(1));
        for config in [built, parsed] {
            assert!(!config.error_cap_reached(0));
            assert!(config.error_cap_reached(1));
        }
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"string_for_list": "reject"}"#).unwrap();
        assert_eq!(config.string_for_list, StringForListPolicy::Reject);
        assert!(config.accepted_versions.is_empty());
    }
}
