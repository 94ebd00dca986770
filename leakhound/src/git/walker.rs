//! The history walk: enumerate commits, scan each commit's added lines,
//! deduplicate by value, then reconstruct presence for the survivors.

use chrono::Local;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

use super::backend::GitBackend;
use super::diff::added_lines;
use super::presence::PresenceResolver;
use crate::cancel::CancelToken;
use crate::config::ScanConfig;
use crate::dedupe::{dedupe, Dedupable};
use crate::findings::{hash_value, Commit, FindingLocation, GitFinding, IdSequence, Severity};
use crate::matcher::{LineMatcher, RawMatch};
use crate::rules::RuleSet;
use crate::scanner::{build_finding, ScanSummary};

/// What to walk and how far.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Bound on the number of commits examined.
    pub depth: Option<usize>,
    /// Restrict the walk to one ref.
    pub branch: Option<String>,
    /// Traverse every ref. Takes precedence over `branch`.
    pub all_branches: bool,
}

/// Result of a history scan.
#[derive(Debug, Serialize)]
pub struct HistoryReport {
    /// When the scan ran, ISO-8601 local time.
    pub scan_timestamp: String,
    /// Branch label the walk was performed on.
    pub branch: String,
    /// Aggregate counters.
    pub summary: ScanSummary,
    /// The findings, newest commit first.
    pub findings: Vec<GitFinding>,
}

impl HistoryReport {
    /// Whether any still-present finding is at or above the blocking
    /// severity. Removed secrets stay advisory.
    #[must_use]
    pub fn has_blocking(&self, fail_on: Severity) -> bool {
        self.findings
            .iter()
            .any(|f| f.still_present && f.finding.severity >= fail_on)
    }
}

/// One detection awaiting presence resolution. Carries the raw value
/// until scoring consumes and wipes it.
struct Pending {
    raw: RawMatch,
    value_hash: String,
    file: String,
    line: usize,
    context: String,
    commit: Commit,
    locations: Vec<FindingLocation>,
}

impl Dedupable for Pending {
    fn value_hash(&self) -> &str {
        &self.value_hash
    }
    fn location(&self) -> FindingLocation {
        FindingLocation {
            file: self.file.clone().into(),
            line: self.line,
        }
    }
    fn add_location(&mut self, location: FindingLocation) {
        self.locations.push(location);
    }
}

enum CommitOutcome {
    Scanned(Vec<Pending>),
    Failed,
    Cancelled,
}

/// Walks commit history and scans every added line.
pub struct HistoryScanner<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
    matcher: LineMatcher,
    config: ScanConfig,
}

impl<'a, B: GitBackend + ?Sized> HistoryScanner<'a, B> {
    /// Builds a scanner over `backend`, compiling custom rules from the
    /// configuration.
    #[must_use]
    pub fn new(backend: &'a B, config: ScanConfig) -> Self {
        let rules = RuleSet::with_custom(&config.rules);
        Self {
            backend,
            matcher: LineMatcher::new(rules, &config),
            config,
        }
    }

    fn scan_commit(&self, commit: &Commit, cancel: &CancelToken) -> CommitOutcome {
        if cancel.is_cancelled() {
            return CommitOutcome::Cancelled;
        }
        let diff = match self.backend.diff(&commit.hash) {
            Ok(diff) => diff,
            Err(e) => {
                eprintln!("Warning: skipping commit {}: {e}", commit.short);
                return CommitOutcome::Failed;
            }
        };

        let mut pending = Vec::new();
        for added in added_lines(&diff) {
            for raw in self.matcher.match_line(&added.text) {
                pending.push(Pending {
                    value_hash: hash_value(&raw.value),
                    raw,
                    file: added.file.clone(),
                    line: added.line,
                    context: format!(">>> {}: {}", added.line, added.text.trim_end()),
                    commit: commit.clone(),
                    locations: Vec::new(),
                });
            }
        }
        CommitOutcome::Scanned(pending)
    }

    /// Performs the walk. Only commit enumeration is fatal; everything
    /// downstream degrades to skipped items or unresolved fields.
    pub fn scan(
        &self,
        options: &HistoryOptions,
        cancel: &CancelToken,
        progress: Option<&ProgressBar>,
    ) -> anyhow::Result<HistoryReport> {
        if options.all_branches && options.branch.is_some() {
            eprintln!("Note: --all-branches overrides the branch selection");
        }
        let branch = match &options.branch {
            Some(b) => b.clone(),
            None => self
                .backend
                .current_branch()
                .unwrap_or_else(|_| "unknown".to_owned()),
        };

        let commits = self.backend.commits(
            options.depth,
            if options.all_branches {
                None
            } else {
                options.branch.as_deref()
            },
            options.all_branches,
        )?;
        if let Some(bar) = progress {
            bar.set_length(commits.len() as u64);
        }

        let outcomes: Vec<CommitOutcome> = commits
            .par_iter()
            .map(|commit| {
                let outcome = self.scan_commit(commit, cancel);
                if let Some(bar) = progress {
                    bar.inc(1);
                }
                outcome
            })
            .collect();

        let mut summary = ScanSummary::default();
        let mut pending = Vec::new();
        for outcome in outcomes {
            match outcome {
                CommitOutcome::Scanned(found) => {
                    summary.commits_scanned += 1;
                    pending.extend(found);
                }
                CommitOutcome::Failed => summary.commits_skipped += 1,
                CommitOutcome::Cancelled => {}
            }
        }

        let survivors = dedupe(pending);

        let resolver = PresenceResolver::new(self.backend);
        let resolved: Vec<(Pending, super::presence::Presence)> = survivors
            .into_par_iter()
            .map(|p| {
                let presence = if cancel.is_cancelled() {
                    super::presence::Presence {
                        still_present: false,
                        removed_in_commit: None,
                    }
                } else {
                    resolver.resolve(&p.file, &p.raw.value, &p.commit.hash)
                };
                (p, presence)
            })
            .collect();

        let mut ids = IdSequence::new("GS");
        let mut findings = Vec::new();
        for (p, presence) in resolved {
            let in_history = !presence.still_present;
            let mut finding = build_finding(
                p.raw,
                self.matcher.rules(),
                Path::new(&p.file),
                p.line,
                p.context,
                in_history,
            );
            if finding.severity < self.config.min_severity {
                continue;
            }
            finding.id = ids.next_id();
            finding.locations = p.locations;
            summary.record(finding.severity, &finding.provider, finding.secret_type);
            if presence.still_present {
                summary.still_present += 1;
            } else {
                summary.removed += 1;
            }
            findings.push(GitFinding {
                finding,
                commit: p.commit,
                branch: branch.clone(),
                still_present: presence.still_present,
                removed_in_commit: presence.removed_in_commit,
            });
        }
        summary.complete = !cancel.is_cancelled();

        Ok(HistoryReport {
            scan_timestamp: Local::now().to_rfc3339(),
            branch,
            summary,
            findings,
        })
    }
}
