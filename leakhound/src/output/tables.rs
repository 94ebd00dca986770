//! Terminal rendering: header, findings tables, summary pills.

use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

use crate::findings::{Finding, GitFinding, Severity};
use crate::scanner::ScanSummary;

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);

    if cfg!(test) {
        table.set_width(120);
    }
    table
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical | Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
        Severity::Info => Color::White,
    }
}

/// Print the report header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Secret Scan Results                   ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print per-severity summary pills.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary_pills(writer: &mut impl Write, summary: &ScanSummary) -> std::io::Result<()> {
    fn pill(label: &str, count: usize) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().green())
        } else {
            format!("{}: {}", label, count.to_string().red().bold())
        }
    }
    let count = |sev: Severity| {
        summary
            .by_severity
            .get(sev.as_str())
            .copied()
            .unwrap_or(0)
    };

    writeln!(
        writer,
        "{}  {}  {}  {}  {}",
        pill("Critical", count(Severity::Critical)),
        pill("High", count(Severity::High)),
        pill("Medium", count(Severity::Medium)),
        pill("Low", count(Severity::Low)),
        pill("Info", count(Severity::Info)),
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print history-specific pills (still present vs removed).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_history_pills(writer: &mut impl Write, summary: &ScanSummary) -> std::io::Result<()> {
    let present = if summary.still_present == 0 {
        summary.still_present.to_string().green()
    } else {
        summary.still_present.to_string().red().bold()
    };
    writeln!(
        writer,
        "Still present: {}  Removed from HEAD: {}",
        present,
        summary.removed.to_string().yellow()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print scan statistics in dimmed text.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_scan_stats(writer: &mut impl Write, summary: &ScanSummary) -> std::io::Result<()> {
    let stats = if summary.commits_scanned > 0 {
        format!(
            "Scanned {} commits ({} skipped)",
            summary.commits_scanned.to_string().bold(),
            summary.commits_skipped
        )
    } else {
        format!(
            "Scanned {} files ({} lines, {} skipped)",
            summary.files_scanned.to_string().bold(),
            summary.lines_scanned,
            summary.files_skipped
        )
    };
    writeln!(writer, "{}", stats.dimmed())?;
    if !summary.complete {
        writeln!(writer, "{}", "Scan cancelled; results are partial.".yellow())?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Print the snapshot findings table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_findings_table(
    writer: &mut impl Write,
    findings: &[Finding],
) -> std::io::Result<()> {
    if findings.is_empty() {
        writeln!(writer, "{}", "No secrets found.".green())?;
        return Ok(());
    }

    writeln!(writer, "{}", "Detected Secrets".bold().underline())?;
    let mut table = create_table(vec![
        "ID", "Type", "Provider", "Location", "Value", "Risk", "Severity",
    ]);
    for f in findings {
        let location = format!("{}:{}", f.file.display(), f.line);
        table.add_row(vec![
            Cell::new(&f.id).add_attribute(Attribute::Dim),
            Cell::new(f.secret_type.as_str()),
            Cell::new(&f.provider),
            Cell::new(location),
            Cell::new(&f.value_preview).add_attribute(Attribute::Bold),
            Cell::new(f.risk_score),
            Cell::new(f.severity.as_str()).fg(severity_color(f.severity)),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the history findings table, still-present entries flagged.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_history_findings(
    writer: &mut impl Write,
    findings: &[GitFinding],
) -> std::io::Result<()> {
    if findings.is_empty() {
        writeln!(writer, "{}", "No secrets found in history.".green())?;
        return Ok(());
    }

    writeln!(writer, "{}", "Secrets in History".bold().underline())?;
    let mut table = create_table(vec![
        "ID", "Type", "Location", "Commit", "Value", "Status", "Severity",
    ]);
    for f in findings {
        let location = format!("{}:{}", f.finding.file.display(), f.finding.line);
        let status = if f.still_present {
            Cell::new("STILL PRESENT").fg(Color::Red)
        } else {
            match &f.removed_in_commit {
                Some(hash) => Cell::new(format!("removed in {}", &hash[..hash.len().min(8)])),
                None => Cell::new("removed (commit unknown)"),
            }
        };
        table.add_row(vec![
            Cell::new(&f.finding.id).add_attribute(Attribute::Dim),
            Cell::new(f.finding.secret_type.as_str()),
            Cell::new(location),
            Cell::new(&f.commit.short),
            Cell::new(&f.finding.value_preview).add_attribute(Attribute::Bold),
            status,
            Cell::new(f.finding.severity.as_str()).fg(severity_color(f.finding.severity)),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}
