//! Scan configuration, loaded from `.leakhound.toml` with CLI overrides
//! applied by the entry point.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::findings::Severity;

/// A custom secret pattern supplied in configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CustomRule {
    /// Name/description of the secret type.
    pub name: String,
    /// Regular expression pattern.
    pub regex: String,
    /// Severity tier (info, low, medium, high, critical).
    #[serde(default = "default_custom_severity")]
    pub severity: String,
    /// Optional provider label (defaults to "Custom").
    pub provider: Option<String>,
    /// False-positive sub-patterns suppressing this rule's matches.
    #[serde(default)]
    pub false_positives: Vec<String>,
}

fn default_custom_severity() -> String {
    "high".to_owned()
}

/// Scanner configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Minimum Shannon entropy (bits/char) for the entropy fallback.
    /// API keys typically score above 4.5.
    #[serde(default = "default_entropy_threshold")]
    pub entropy_threshold: f64,
    /// Whether entropy-based detection is enabled.
    #[serde(default = "default_entropy_enabled")]
    pub entropy_enabled: bool,
    /// Minimum token length considered by the entropy fallback.
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,
    /// Minimum severity to report.
    #[serde(default = "default_min_severity")]
    pub min_severity: Severity,
    /// Findings at or above this severity make the scan "blocking"
    /// (non-zero exit for the CLI).
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
    /// Extra suppression regexes matched against candidate values.
    #[serde(default)]
    pub allowlist: Vec<String>,
    /// Custom secret rules appended to the builtin registry.
    #[serde(default)]
    pub rules: Vec<CustomRule>,
    /// Lines of context captured around each finding.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    /// Timeout for each git invocation, in seconds.
    #[serde(default = "default_git_timeout_secs")]
    pub git_timeout_secs: u64,
    /// Path globs excluded from snapshot scans.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_entropy_threshold() -> f64 {
    4.5
}

fn default_entropy_enabled() -> bool {
    true
}

fn default_min_token_length() -> usize {
    20
}

fn default_min_severity() -> Severity {
    Severity::Info
}

fn default_fail_on() -> Severity {
    Severity::High
}

fn default_context_lines() -> usize {
    2
}

fn default_git_timeout_secs() -> u64 {
    300
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: default_entropy_threshold(),
            entropy_enabled: default_entropy_enabled(),
            min_token_length: default_min_token_length(),
            min_severity: default_min_severity(),
            fail_on: default_fail_on(),
            allowlist: Vec::new(),
            rules: Vec::new(),
            context_lines: default_context_lines(),
            git_timeout_secs: default_git_timeout_secs(),
            exclude: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from `.leakhound.toml` in the current directory.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration from `.leakhound.toml` under `root`.
    ///
    /// Configuration problems are never fatal: a missing file yields the
    /// defaults, a malformed file or an out-of-range threshold yields the
    /// defaults with a warning.
    #[must_use]
    pub fn load_from_path(root: &Path) -> Self {
        let path = root.join(".leakhound.toml");
        let Ok(text) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str::<Self>(&text) {
            Ok(config) => config.validated(),
            Err(e) => {
                eprintln!("Warning: could not parse {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Clamps invalid settings back to defaults, with a warning.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if !(0.0..=8.0).contains(&self.entropy_threshold) || self.entropy_threshold.is_nan() {
            eprintln!(
                "Warning: entropy threshold {} out of range, using {}",
                self.entropy_threshold,
                default_entropy_threshold()
            );
            self.entropy_threshold = default_entropy_threshold();
        }
        self
    }

    /// Compiles the caller allowlist; invalid patterns are dropped with
    /// a warning.
    #[must_use]
    pub fn allowlist_regexes(&self) -> Vec<Regex> {
        self.allowlist
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(r) => Some(r),
                Err(e) => {
                    eprintln!("Warning: invalid allowlist pattern {p:?}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Per-invocation git timeout.
    #[must_use]
    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ScanConfig::default();
        assert!((config.entropy_threshold - 4.5).abs() < f64::EPSILON);
        assert!(config.entropy_enabled);
        assert_eq!(config.min_severity, Severity::Info);
        assert_eq!(config.fail_on, Severity::High);
        assert_eq!(config.git_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScanConfig::load_from_path(dir.path());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".leakhound.toml"),
            r#"
entropy_threshold = 5.0
min_severity = "medium"
allowlist = ["INTERNAL_TEST_[A-Z]+"]

[[rules]]
name = "Corp Token"
regex = "corp_[a-z0-9]{32}"
severity = "critical"
"#,
        )
        .unwrap();
        let config = ScanConfig::load_from_path(dir.path());
        assert!((config.entropy_threshold - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.min_severity, Severity::Medium);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.allowlist_regexes().len(), 1);
    }

    #[test]
    fn out_of_range_threshold_falls_back() {
        let config = ScanConfig {
            entropy_threshold: 42.0,
            ..ScanConfig::default()
        }
        .validated();
        assert!((config.entropy_threshold - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".leakhound.toml"), "entropy_threshold = [").unwrap();
        let config = ScanConfig::load_from_path(dir.path());
        assert!((config.entropy_threshold - 4.5).abs() < f64::EPSILON);
    }
}
