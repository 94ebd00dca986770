//! Command line interface definitions using `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::findings::Severity;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.leakhound.toml):
  Create this file in the scanned root to set defaults.

  entropy_threshold = 4.5    # Shannon entropy gate (0-8)
  entropy_enabled = true     # Entropy fallback detection
  min_severity = \"info\"      # Minimum severity to report
  fail_on = \"high\"           # Exit 1 at or above this severity
  allowlist = [\"INTERNAL_[A-Z]+\"]
  exclude = [\"generated/**\"]
  git_timeout_secs = 300     # Per git invocation

  [[rules]]
  name = \"Corp Token\"
  regex = \"corp_[a-z0-9]{32}\"
  severity = \"critical\"
";

/// Command line interface configuration.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "leakhound - Detect committed secrets and reconstruct their git history",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Report rendering format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// Markdown report.
    Markdown,
    /// SARIF 2.1.0 log (snapshot scans only).
    Sarif,
}

/// Where and how to render the report.
#[derive(Args, Debug)]
pub struct OutputOptions {
    /// Output format.
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the current snapshot of a directory tree for secrets
    Scan {
        /// Directory to scan.
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output options (format, file).
        #[command(flatten)]
        output: OutputOptions,

        /// Minimum severity to report.
        #[arg(long, short = 's')]
        severity: Option<Severity>,

        /// Shannon entropy threshold for the fallback detector (0-8).
        #[arg(long)]
        entropy_threshold: Option<f64>,

        /// Disable entropy-based detection.
        #[arg(long)]
        no_entropy: bool,

        /// Extra suppression regex, repeatable.
        #[arg(long = "allow", value_name = "REGEX")]
        allow: Vec<String>,

        /// Path glob to exclude, repeatable.
        #[arg(long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,

        /// Exit 1 when a finding reaches this severity.
        #[arg(long)]
        fail_on: Option<Severity>,
    },
    /// Scan git commit history for secrets, including removed ones
    History {
        /// Path to the git repository.
        #[arg(default_value = ".")]
        repo: PathBuf,

        /// Output options (format, file).
        #[command(flatten)]
        output: OutputOptions,

        /// Limit the walk to the most recent N commits.
        #[arg(long, short = 'd')]
        depth: Option<usize>,

        /// Restrict the walk to one branch.
        #[arg(long, short = 'b')]
        branch: Option<String>,

        /// Walk every ref. Overrides --branch.
        #[arg(long)]
        all_branches: bool,

        /// Timeout per git invocation, in seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Minimum severity to report.
        #[arg(long, short = 's')]
        severity: Option<Severity>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_args_parse() {
        let cli = Cli::try_parse_from([
            "leakhound",
            "scan",
            "src",
            "--format",
            "json",
            "--severity",
            "high",
            "--allow",
            "A",
            "--allow",
            "B",
        ])
        .unwrap();
        let Commands::Scan {
            path,
            output,
            severity,
            allow,
            ..
        } = cli.command
        else {
            panic!("expected scan subcommand");
        };
        assert_eq!(path, PathBuf::from("src"));
        assert_eq!(output.format, OutputFormat::Json);
        assert_eq!(severity, Some(Severity::High));
        assert_eq!(allow, vec!["A".to_owned(), "B".to_owned()]);
    }

    #[test]
    fn history_args_parse() {
        let cli = Cli::try_parse_from([
            "leakhound",
            "history",
            "--depth",
            "500",
            "--all-branches",
        ])
        .unwrap();
        let Commands::History {
            repo,
            depth,
            all_branches,
            ..
        } = cli.command
        else {
            panic!("expected history subcommand");
        };
        assert_eq!(repo, PathBuf::from("."));
        assert_eq!(depth, Some(500));
        assert!(all_branches);
    }
}
