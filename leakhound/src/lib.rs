//! leakhound detects committed secrets and reconstructs their history.
//!
//! The core pipeline: provider regex rules plus an entropy fallback find
//! candidate secrets; a weighted risk score ranks them; deduplication
//! collapses repeats of the same value; and for git history scans a
//! presence reconstructor determines whether each secret is still in
//! HEAD and, when it is not, which commit removed it.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod dedupe;
pub mod discovery;
pub mod entropy;
pub mod entry_point;
pub mod findings;
pub mod git;
pub mod matcher;
pub mod output;
pub mod rules;
pub mod scanner;
pub mod scoring;
pub mod test_utils;
mod utils;

pub use cancel::CancelToken;
pub use config::ScanConfig;
pub use findings::{Commit, Finding, GitFinding, Severity};
pub use scanner::{ScanReport, ScanSummary, Scanner};
