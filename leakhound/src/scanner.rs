//! Snapshot scanning: walk the working tree, match every line, score,
//! deduplicate, and assemble a report.

use chrono::Local;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

use crate::cancel::CancelToken;
use crate::config::ScanConfig;
use crate::dedupe::{dedupe, Dedupable};
use crate::discovery::discover_files;
use crate::findings::{
    hash_value, mask_secret, Finding, FindingLocation, IdSequence, SecretType, Severity,
};
use crate::matcher::{LineMatcher, RawMatch};
use crate::rules::{remediation_steps, RuleSet};
use crate::scoring::{adjusted_confidence, risk_score, severity_for_risk};

/// Aggregate counters for a scan. History-only counters stay zero for
/// snapshot scans.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Findings after deduplication and severity filtering.
    pub total_findings: usize,
    /// Finding counts keyed by severity name.
    pub by_severity: BTreeMap<String, usize>,
    /// Finding counts keyed by provider.
    pub by_provider: BTreeMap<String, usize>,
    /// Finding counts keyed by secret type.
    pub by_type: BTreeMap<String, usize>,
    /// Files scanned.
    pub files_scanned: usize,
    /// Files seen but filtered out or unreadable.
    pub files_skipped: usize,
    /// Total lines examined.
    pub lines_scanned: usize,
    /// Commits whose diffs were scanned (history scans only).
    pub commits_scanned: usize,
    /// Commits skipped after backend failures (history scans only).
    pub commits_skipped: usize,
    /// History findings still present at HEAD.
    pub still_present: usize,
    /// History findings no longer present at HEAD.
    pub removed: usize,
    /// False when the scan was cancelled before finishing.
    pub complete: bool,
}

impl ScanSummary {
    /// Records one finding in the per-severity/provider/type tallies.
    pub fn record(&mut self, severity: Severity, provider: &str, secret_type: SecretType) {
        self.total_findings += 1;
        *self
            .by_severity
            .entry(severity.as_str().to_owned())
            .or_insert(0) += 1;
        *self.by_provider.entry(provider.to_owned()).or_insert(0) += 1;
        *self
            .by_type
            .entry(secret_type.as_str().to_owned())
            .or_insert(0) += 1;
    }
}

/// Result of a snapshot scan.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// When the scan ran, ISO-8601 local time.
    pub scan_timestamp: String,
    /// Root directory that was scanned.
    pub scanned_path: PathBuf,
    /// Aggregate counters.
    pub summary: ScanSummary,
    /// The findings, in file order.
    pub findings: Vec<Finding>,
}

impl ScanReport {
    /// Whether any finding is at or above the blocking severity.
    #[must_use]
    pub fn has_blocking(&self, fail_on: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= fail_on)
    }
}

impl Dedupable for Finding {
    fn value_hash(&self) -> &str {
        &self.value_hash
    }
    fn location(&self) -> FindingLocation {
        FindingLocation {
            file: self.file.clone(),
            line: self.line,
        }
    }
    fn add_location(&mut self, location: FindingLocation) {
        self.locations.push(location);
    }
}

/// Builds a scored `Finding` from a raw match, consuming (and wiping)
/// the raw value. The ID is assigned later, after deduplication.
pub(crate) fn build_finding(
    mut raw: RawMatch,
    rules: &RuleSet,
    path: &Path,
    line: usize,
    context: String,
    in_history: bool,
) -> Finding {
    let path_str = path.to_string_lossy();
    let (secret_type, provider, pattern_name, base_severity) = match raw.rule_index {
        Some(idx) => {
            let rule = &rules.rules()[idx];
            (
                rule.secret_type,
                rule.provider.clone(),
                rule.name.clone(),
                rule.severity,
            )
        }
        None => (
            SecretType::HighEntropy,
            "Unknown".to_owned(),
            "High Entropy String".to_owned(),
            Severity::Medium,
        ),
    };

    let confidence = adjusted_confidence(raw.base_confidence, &path_str);
    let risk = risk_score(base_severity, confidence, &path_str, in_history);
    // The raw value must not leak through the context snippet.
    let context = context.replace(&raw.value, &mask_secret(&raw.value));
    let finding = Finding {
        id: String::new(),
        file: path.to_path_buf(),
        line,
        column: raw.column,
        secret_type,
        provider: provider.clone(),
        pattern_name,
        value_preview: mask_secret(&raw.value),
        value_hash: hash_value(&raw.value),
        confidence,
        risk_score: risk,
        severity: severity_for_risk(risk),
        context,
        remediation: remediation_steps(&provider),
        entropy: raw.entropy,
        locations: Vec::new(),
    };
    raw.value.zeroize();
    finding
}

/// Context block around a match: the configured number of lines either
/// side, the hit line marked with `>>>`.
pub(crate) fn extract_context(lines: &[&str], line: usize, context_lines: usize) -> String {
    let start = line.saturating_sub(context_lines + 1);
    let end = (line + context_lines).min(lines.len());
    (start..end)
        .map(|i| {
            let prefix = if i == line - 1 { ">>>" } else { "   " };
            format!("{prefix} {}: {}", i + 1, lines[i].trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Snapshot scanner over a directory tree.
#[derive(Debug)]
pub struct Scanner {
    matcher: LineMatcher,
    config: ScanConfig,
}

impl Scanner {
    /// Builds a scanner, compiling custom rules from the configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        let rules = RuleSet::with_custom(&config.rules);
        Self {
            matcher: LineMatcher::new(rules, &config),
            config,
        }
    }

    /// Scans one file's content. Returns findings without IDs plus the
    /// number of lines examined.
    fn scan_content(&self, path: &Path, content: &str) -> (Vec<Finding>, usize) {
        let lines: Vec<&str> = content.lines().collect();
        let mut findings = Vec::new();
        for (i, line_text) in lines.iter().enumerate() {
            let line = i + 1;
            for raw in self.matcher.match_line(line_text) {
                let context = extract_context(&lines, line, self.config.context_lines);
                findings.push(build_finding(
                    raw,
                    self.matcher.rules(),
                    path,
                    line,
                    context,
                    false,
                ));
            }
        }
        (findings, lines.len())
    }

    /// Scans all eligible files under `root`.
    ///
    /// Unreadable files are counted as skipped, never fatal. A cancelled
    /// token yields a partial report with `summary.complete == false`.
    #[must_use]
    pub fn scan_path(&self, root: &Path, cancel: &CancelToken) -> ScanReport {
        let discovery = discover_files(root, &self.config.exclude);
        let mut summary = ScanSummary {
            files_skipped: discovery.skipped,
            ..ScanSummary::default()
        };

        // Binary or unreadable content is tolerated: bytes are read
        // lossily so a stray invalid sequence never aborts the scan.
        let per_file: Vec<Option<(Vec<Finding>, usize)>> = discovery
            .files
            .par_iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return None;
                }
                let bytes = std::fs::read(path).ok()?;
                let content = String::from_utf8_lossy(&bytes);
                let display = path.strip_prefix(root).unwrap_or(path);
                Some(self.scan_content(display, &content))
            })
            .collect();

        let mut findings = Vec::new();
        for outcome in per_file {
            match outcome {
                Some((file_findings, lines)) => {
                    summary.files_scanned += 1;
                    summary.lines_scanned += lines;
                    findings.extend(file_findings);
                }
                None => summary.files_skipped += 1,
            }
        }

        let mut findings: Vec<Finding> = dedupe(findings)
            .into_iter()
            .filter(|f| f.severity >= self.config.min_severity)
            .collect();

        let mut ids = IdSequence::new("S");
        for finding in &mut findings {
            finding.id = ids.next_id();
            summary.record(finding.severity, &finding.provider, finding.secret_type);
        }
        summary.complete = !cancel.is_cancelled();

        ScanReport {
            scan_timestamp: Local::now().to_rfc3339(),
            scanned_path: root.to_path_buf(),
            summary,
            findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_marks_the_hit_line() {
        let lines = vec!["a", "b", "secret", "d", "e"];
        let ctx = extract_context(&lines, 3, 2);
        assert_eq!(
            ctx,
            "    1: a\n    2: b\n>>> 3: secret\n    4: d\n    5: e"
        );
    }

    #[test]
    fn context_clamps_at_file_edges() {
        let lines = vec!["only"];
        assert_eq!(extract_context(&lines, 1, 2), ">>> 1: only");
    }

    #[test]
    fn scan_content_scores_and_masks() {
        let scanner = Scanner::new(ScanConfig::default());
        let (findings, lines) =
            scanner.scan_content(Path::new("src/config.py"), "key = 1\nAKIAIOSFODNN7REALKEY\n");
        assert_eq!(lines, 2);
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.line, 2);
        assert_eq!(f.secret_type, SecretType::AwsAccessKey);
        assert_eq!(f.value_preview, "AKIA...LKEY");
        assert!(f.value_hash.starts_with("sha256:"));
        assert!(f.context.contains(">>> 2:"));
        assert!(f.risk_score >= 70);
    }

    #[test]
    fn entropy_finding_uses_unknown_provider() {
        let scanner = Scanner::new(ScanConfig::default());
        let (findings, _) = scanner.scan_content(
            Path::new("src/app.py"),
            r#"creds = "kJ8xP2mQ9vL4nR7wE3yT6uI1oA5sD0fG""#,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].secret_type, SecretType::HighEntropy);
        assert_eq!(findings[0].provider, "Unknown");
        assert!(findings[0].entropy.is_some());
    }

    #[test]
    fn summary_record_tallies() {
        let mut summary = ScanSummary::default();
        summary.record(Severity::High, "AWS", SecretType::AwsAccessKey);
        summary.record(Severity::High, "GitHub", SecretType::GithubToken);
        assert_eq!(summary.total_findings, 2);
        assert_eq!(summary.by_severity["high"], 2);
        assert_eq!(summary.by_provider["AWS"], 1);
        assert_eq!(summary.by_type["github_token"], 1);
    }
}
