//! Version-control backend abstraction and the `git` subprocess
//! implementation.

use anyhow::Context;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::findings::Commit;

/// How often the watchdog polls a running child process.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A recoverable backend failure. Timeouts and non-zero exits are
/// per-item failures; the walk skips the item and continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    /// The command exceeded the configured timeout and was killed.
    Timeout,
    /// The command could not be spawned or its output read.
    Io(String),
    /// The command exited non-zero.
    NonZero(String),
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "git command timed out"),
            Self::Io(e) => write!(f, "git command failed: {e}"),
            Self::NonZero(stderr) => write!(f, "git exited non-zero: {}", stderr.trim()),
        }
    }
}

impl std::error::Error for GitError {}

/// Read-only operations the history scanner needs from version control.
///
/// Implementations must be shareable across the worker pool.
pub trait GitBackend: Sync {
    /// Name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Commits in reverse-chronological order. `depth` bounds the count;
    /// `all_branches` traverses every ref and takes precedence over
    /// `branch`.
    fn commits(
        &self,
        depth: Option<usize>,
        branch: Option<&str>,
        all_branches: bool,
    ) -> Result<Vec<Commit>, GitError>;

    /// Unified diff text introduced by one commit.
    fn diff(&self, hash: &str) -> Result<String, GitError>;

    /// File content at HEAD, or `None` when the path no longer exists
    /// there (deleted or renamed).
    fn file_at_head(&self, path: &str) -> Result<Option<String>, GitError>;

    /// Commits whose change to `path` toggled the presence of `value`,
    /// newest first (content pickaxe).
    fn pickaxe(&self, path: &str, value: &str) -> Result<Vec<String>, GitError>;
}

/// `GitBackend` shelling out to the `git` binary, every call bounded by
/// a watchdog timeout.
#[derive(Debug)]
pub struct GitCli {
    repo: PathBuf,
    timeout: Duration,
}

impl GitCli {
    /// Opens a repository, verifying up front that `repo` is under git
    /// control. This is the only fatal backend check.
    pub fn open(repo: &Path, timeout: Duration) -> anyhow::Result<Self> {
        let backend = Self {
            repo: repo.to_path_buf(),
            timeout,
        };
        backend
            .run(&["rev-parse", "--git-dir"])
            .with_context(|| format!("{} is not a git repository", repo.display()))?;
        Ok(backend)
    }

    /// Runs `git` with the given arguments, returning stdout. The child
    /// is killed once the timeout elapses; output is drained on separate
    /// threads so a chatty child never deadlocks on a full pipe.
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let mut child = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GitError::Io(e.to_string()))?;

        let mut stdout_pipe = child.stdout.take().ok_or_else(|| {
            GitError::Io("child stdout unavailable".to_owned())
        })?;
        let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
            GitError::Io("child stderr unavailable".to_owned())
        })?;
        let stdout_reader = std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout_pipe.read_to_end(&mut buf);
            buf
        });
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr_pipe.read_to_end(&mut buf);
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(GitError::Timeout);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GitError::Io(e.to_string()));
                }
            }
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();
        if !status.success() {
            return Err(GitError::NonZero(
                String::from_utf8_lossy(&stderr).into_owned(),
            ));
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Parses one `git log --format=%H|%h|%an|%ae|%aI|%s` line.
fn parse_commit_line(line: &str) -> Option<Commit> {
    let parts: Vec<&str> = line.splitn(6, '|').collect();
    if parts.len() < 6 {
        return None;
    }
    Some(Commit {
        hash: parts[0].to_owned(),
        short: parts[1].to_owned(),
        author: parts[2].to_owned(),
        author_email: parts[3].to_owned(),
        date: parts[4].to_owned(),
        message: parts[5].chars().take(100).collect(),
    })
}

impl GitBackend for GitCli {
    fn current_branch(&self) -> Result<String, GitError> {
        Ok(self
            .run(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_owned())
    }

    fn commits(
        &self,
        depth: Option<usize>,
        branch: Option<&str>,
        all_branches: bool,
    ) -> Result<Vec<Commit>, GitError> {
        let mut args: Vec<String> = vec![
            "log".to_owned(),
            "--format=%H|%h|%an|%ae|%aI|%s".to_owned(),
        ];
        if let Some(n) = depth {
            args.push("-n".to_owned());
            args.push(n.to_string());
        }
        match (all_branches, branch) {
            (false, Some(branch)) => args.push(branch.to_owned()),
            _ => args.push("--all".to_owned()),
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run(&arg_refs)?;
        Ok(output.lines().filter_map(parse_commit_line).collect())
    }

    fn diff(&self, hash: &str) -> Result<String, GitError> {
        self.run(&["show", "--format=", "-p", hash])
    }

    fn file_at_head(&self, path: &str) -> Result<Option<String>, GitError> {
        let spec = format!("HEAD:{path}");
        match self.run(&["show", &spec]) {
            Ok(content) => Ok(Some(content)),
            Err(GitError::NonZero(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn pickaxe(&self, path: &str, value: &str) -> Result<Vec<String>, GitError> {
        let output = self.run(&["log", "--format=%H", "-S", value, "--", path])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToOwned::to_owned)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_line_parses_all_fields() {
        let c = parse_commit_line("abc123|abc|Jo Dev|jo@example.com|2025-01-01T00:00:00+00:00|add config").unwrap();
        assert_eq!(c.hash, "abc123");
        assert_eq!(c.short, "abc");
        assert_eq!(c.author, "Jo Dev");
        assert_eq!(c.author_email, "jo@example.com");
        assert_eq!(c.message, "add config");
    }

    #[test]
    fn commit_message_may_contain_pipes() {
        let c = parse_commit_line("h|s|a|e|d|fix: a | b | c").unwrap();
        assert_eq!(c.message, "fix: a | b | c");
    }

    #[test]
    fn commit_message_truncated_to_100_chars() {
        let long = "x".repeat(200);
        let c = parse_commit_line(&format!("h|s|a|e|d|{long}")).unwrap();
        assert_eq!(c.message.len(), 100);
    }

    #[test]
    fn short_lines_rejected() {
        assert!(parse_commit_line("").is_none());
        assert!(parse_commit_line("a|b|c").is_none());
    }
}
