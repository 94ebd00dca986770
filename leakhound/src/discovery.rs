//! File discovery for snapshot scans.
//!
//! Walks the target tree with gitignore semantics, keeps files whose
//! extension or name suggests they can carry secrets, and applies the
//! caller's exclude globs.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extensions worth scanning: source code, config, infra, shell, docs.
const SCANNABLE_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "tsx", "jsx", "java", "go", "rb", "php", "cs", "swift", "kt", "rs", "c",
    "cpp", "h", "hpp", "scala", "env", "json", "yaml", "yml", "xml", "toml", "ini", "conf", "cfg",
    "properties", "config", "tf", "tfvars", "hcl", "dockerfile", "sh", "bash", "zsh", "ps1",
    "bat", "cmd", "sql", "graphql", "prisma", "txt", "md", "rst",
];

/// Names scanned regardless of extension (compared lowercased).
const ALWAYS_SCAN_FILES: &[&str] = &[
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".env.test",
    "dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    ".npmrc",
    ".pypirc",
    ".netrc",
    ".pgpass",
    ".my.cnf",
    "credentials",
    "secrets",
    "config",
    "settings",
];

/// Directories never descended into.
const SKIP_DIRECTORIES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "__pycache__",
    ".pytest_cache",
    "venv",
    ".venv",
    "env",
    "virtualenv",
    ".tox",
    "dist",
    "build",
    "target",
    "out",
    "bin",
    "obj",
    ".idea",
    ".vscode",
    ".eclipse",
    ".settings",
    "vendor",
    "bower_components",
    "packages",
    ".terraform",
    ".serverless",
    "coverage",
    ".nyc_output",
    "htmlcov",
];

/// Generated files with no secrets worth reporting.
const SKIP_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "Gemfile.lock",
    "Cargo.lock",
    "go.sum",
    ".DS_Store",
    "Thumbs.db",
];

/// Result of walking a scan target.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files to scan, sorted for deterministic output.
    pub files: Vec<PathBuf>,
    /// Files seen but filtered out.
    pub skipped: usize,
}

/// Whether a path should be scanned, by name and extension.
#[must_use]
pub fn should_scan_file(path: &Path) -> bool {
    if path
        .components()
        .any(|c| SKIP_DIRECTORIES.contains(&c.as_os_str().to_string_lossy().as_ref()))
    {
        return false;
    }

    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if SKIP_FILES.contains(&name.as_ref()) {
        return false;
    }
    if ALWAYS_SCAN_FILES.contains(&name.to_lowercase().as_str()) {
        return true;
    }
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SCANNABLE_EXTENSIONS.contains(&ext.as_str()))
}

fn build_exclude_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => eprintln!("Warning: invalid exclude pattern {pattern:?}: {e}"),
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Walks `root` and returns the files to scan.
#[must_use]
pub fn discover_files(root: &Path, exclude: &[String]) -> Discovery {
    let excludes = build_exclude_set(exclude);
    let mut discovery = Discovery::default();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_some_and(|t| t.is_dir())
                && SKIP_DIRECTORIES.contains(&name.as_ref()))
        })
        .build();

    for entry in walker.flatten() {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !should_scan_file(relative) || excludes.is_match(relative) {
            discovery.skipped += 1;
            continue;
        }
        discovery.files.push(path.to_path_buf());
    }

    discovery.files.sort();
    discovery
}
