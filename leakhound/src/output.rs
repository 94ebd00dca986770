//! Report rendering: machine formats (JSON, Markdown, SARIF) and the
//! terminal surface (tables, summary pills, progress).

mod json;
mod markdown;
mod progress;
mod sarif;
mod tables;

pub use json::{history_report_json, scan_report_json};
pub use markdown::{history_report_markdown, scan_report_markdown};
pub use progress::create_commit_progress_bar;
pub use sarif::scan_report_sarif;
pub use tables::{
    print_findings_table, print_header, print_history_findings, print_history_pills,
    print_scan_stats, print_summary_pills,
};
