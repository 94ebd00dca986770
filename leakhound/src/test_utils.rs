//! In-memory `GitBackend` for exercising the history walker and
//! presence resolver without a real repository.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::findings::Commit;
use crate::git::{GitBackend, GitError};

/// A scripted backend: commits, diffs, HEAD contents, and pickaxe
/// results are all provided up front. Hashes listed in `fail_diffs`
/// simulate per-commit timeouts.
#[derive(Debug, Default)]
pub struct FakeBackend {
    /// Commits returned by `commits`, newest first.
    pub commits: Vec<Commit>,
    /// Diff text per commit hash.
    pub diffs: FxHashMap<String, String>,
    /// File contents at HEAD, per path.
    pub head_files: FxHashMap<String, String>,
    /// Pickaxe toggle hashes (newest first) per (path, value).
    pub pickaxe_results: FxHashMap<(String, String), Vec<String>>,
    /// Commit hashes whose diff lookup times out.
    pub fail_diffs: FxHashSet<String>,
    /// Branch name reported by `current_branch`.
    pub branch: String,
    head_call_count: AtomicUsize,
}

impl FakeBackend {
    /// Convenience constructor for a commit record.
    #[must_use]
    pub fn commit(hash: &str, short: &str, message: &str) -> Commit {
        Commit {
            hash: hash.to_owned(),
            short: short.to_owned(),
            author: "Test Author".to_owned(),
            author_email: "author@example.com".to_owned(),
            date: "2025-06-01T12:00:00+00:00".to_owned(),
            message: message.to_owned(),
        }
    }

    /// How many `file_at_head` calls reached the backend.
    #[must_use]
    pub fn head_calls(&self) -> usize {
        self.head_call_count.load(Ordering::Relaxed)
    }
}

impl GitBackend for FakeBackend {
    fn current_branch(&self) -> Result<String, GitError> {
        if self.branch.is_empty() {
            Ok("main".to_owned())
        } else {
            Ok(self.branch.clone())
        }
    }

    fn commits(
        &self,
        depth: Option<usize>,
        _branch: Option<&str>,
        _all_branches: bool,
    ) -> Result<Vec<Commit>, GitError> {
        let mut commits = self.commits.clone();
        if let Some(n) = depth {
            commits.truncate(n);
        }
        Ok(commits)
    }

    fn diff(&self, hash: &str) -> Result<String, GitError> {
        if self.fail_diffs.contains(hash) {
            return Err(GitError::Timeout);
        }
        Ok(self.diffs.get(hash).cloned().unwrap_or_default())
    }

    fn file_at_head(&self, path: &str) -> Result<Option<String>, GitError> {
        self.head_call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.head_files.get(path).cloned())
    }

    fn pickaxe(&self, path: &str, value: &str) -> Result<Vec<String>, GitError> {
        Ok(self
            .pickaxe_results
            .get(&(path.to_owned(), value.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}
