//! Unified diff parsing: extracts added lines with their post-image
//! line numbers.

use regex::Regex;
use std::sync::OnceLock;

/// Matches the post-image start in a hunk header (`@@ -a,b +start,count @@`).
fn hunk_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+(\d+)").unwrap_or_else(|_| unreachable!()))
}

/// One added line in a commit's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLine {
    /// Post-image path the line was added to.
    pub file: String,
    /// 1-based line number in the post-image file.
    pub line: usize,
    /// The line content, without the leading `+`.
    pub text: String,
}

/// Walks a unified diff and yields every non-blank added line.
///
/// A `+++ b/<path>` marker resets the active file and line counter; a
/// hunk header resets the counter to `start - 1`; added lines and
/// context lines advance it, removed lines do not. Lines appearing
/// before any file marker are attributed to "unknown".
#[must_use]
pub fn added_lines(diff: &str) -> Vec<AddedLine> {
    let mut out = Vec::new();
    let mut current_file: Option<String> = None;
    let mut line_number = 0usize;

    for line in diff.lines() {
        if let Some(path) = line.strip_prefix("+++ b/") {
            current_file = Some(path.to_owned());
            line_number = 0;
            continue;
        }
        if line.starts_with("@@") {
            if let Some(caps) = hunk_start_regex().captures(line) {
                if let Some(start) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                    line_number = start.saturating_sub(1);
                }
            }
            continue;
        }
        if line.starts_with('+') && !line.starts_with("+++") {
            line_number += 1;
            let text = &line[1..];
            if text.trim().is_empty() {
                continue;
            }
            out.push(AddedLine {
                file: current_file
                    .clone()
                    .unwrap_or_else(|| "unknown".to_owned()),
                line: line_number,
                text: text.to_owned(),
            });
        } else if !line.starts_with('-') {
            line_number += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "\
diff --git a/src/config.py b/src/config.py
index 000..111 100644
--- a/src/config.py
+++ b/src/config.py
@@ -10,4 +10,6 @@ def load():
 context_one
-removed_line
+added_one
 context_two
+added_two
";

    #[test]
    fn added_lines_numbered_from_hunk_start() {
        let lines = added_lines(DIFF);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].file, "src/config.py");
        assert_eq!(lines[0].line, 11);
        assert_eq!(lines[0].text, "added_one");
        assert_eq!(lines[1].line, 13);
        assert_eq!(lines[1].text, "added_two");
    }

    #[test]
    fn removed_lines_do_not_advance_counter() {
        let diff = "\
+++ b/a.txt
@@ -1,3 +1,3 @@
-gone
+first
+second
";
        let lines = added_lines(diff);
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].line, 2);
    }

    #[test]
    fn second_file_marker_resets_state() {
        let diff = "\
+++ b/a.txt
@@ -0,0 +1,1 @@
+in_a
+++ b/b.txt
@@ -0,0 +5,1 @@
+in_b
";
        let lines = added_lines(diff);
        assert_eq!(lines[0].file, "a.txt");
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].file, "b.txt");
        assert_eq!(lines[1].line, 5);
    }

    #[test]
    fn blank_added_lines_counted_but_not_yielded() {
        let diff = "\
+++ b/a.txt
@@ -0,0 +1,3 @@
+first
+
+third
";
        let lines = added_lines(diff);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn empty_diff_yields_nothing() {
        assert!(added_lines("").is_empty());
    }
}
