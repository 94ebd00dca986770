//! Progress reporting for history walks.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Create a progress bar over a known commit count.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_commit_progress_bar(total_commits: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::with_draw_target(
        Some(total_commits),
        ProgressDrawTarget::stderr_with_hz(20),
    );
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} commits ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("scanning history...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick();
    pb
}
