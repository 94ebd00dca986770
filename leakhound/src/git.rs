//! Git history scanning: backend abstraction, diff parsing, presence
//! reconstruction, and the commit walker.

mod backend;
mod diff;
mod presence;
mod walker;

pub use backend::{GitBackend, GitCli, GitError};
pub use diff::{added_lines, AddedLine};
pub use presence::{Presence, PresenceResolver};
pub use walker::{HistoryOptions, HistoryReport, HistoryScanner};
