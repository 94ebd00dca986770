//! Presence reconstruction: is a historically committed secret still in
//! HEAD, and if not, which commit removed it.

use rustc_hash::FxHashMap;
use std::sync::Mutex;

use super::backend::GitBackend;
use crate::findings::hash_value;

/// Outcome of presence resolution for one finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    /// Whether the exact value is present in the path at HEAD.
    pub still_present: bool,
    /// Commit that removed the value, when discoverable.
    pub removed_in_commit: Option<String>,
}

/// Resolves presence against a backend, caching HEAD file contents per
/// path and pickaxe results per (path, value hash) for the duration of
/// one scan. Shared across the worker pool behind internal mutexes.
pub struct PresenceResolver<'a, B: GitBackend + ?Sized> {
    backend: &'a B,
    head_cache: Mutex<FxHashMap<String, Option<String>>>,
    pickaxe_cache: Mutex<FxHashMap<(String, String), Vec<String>>>,
}

impl<'a, B: GitBackend + ?Sized> PresenceResolver<'a, B> {
    /// Creates a resolver with empty caches.
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            head_cache: Mutex::new(FxHashMap::default()),
            pickaxe_cache: Mutex::new(FxHashMap::default()),
        }
    }

    fn file_at_head(&self, path: &str) -> Option<String> {
        if let Ok(cache) = self.head_cache.lock() {
            if let Some(cached) = cache.get(path) {
                return cached.clone();
            }
        }
        // Backend failure degrades to "not present": the walk must not
        // abort on a single lookup.
        let content = self.backend.file_at_head(path).ok().flatten();
        if let Ok(mut cache) = self.head_cache.lock() {
            cache.insert(path.to_owned(), content.clone());
        }
        content
    }

    fn pickaxe(&self, path: &str, value: &str) -> Vec<String> {
        let key = (path.to_owned(), hash_value(value));
        if let Ok(cache) = self.pickaxe_cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return cached.clone();
            }
        }
        let toggles = self.backend.pickaxe(path, value).unwrap_or_default();
        if let Ok(mut cache) = self.pickaxe_cache.lock() {
            cache.insert(key, toggles.clone());
        }
        toggles
    }

    /// Resolves presence of `value` at `path`, given the commit whose
    /// diff introduced it.
    ///
    /// A missing file at HEAD counts as "not present". The removal
    /// commit is the pickaxe toggle immediately newer than the
    /// introducing commit; with no such toggle the removal stays
    /// unresolved, which is expected after history rewrites or renames.
    pub fn resolve(&self, path: &str, value: &str, introduced_in: &str) -> Presence {
        if let Some(content) = self.file_at_head(path) {
            if content.contains(value) {
                return Presence {
                    still_present: true,
                    removed_in_commit: None,
                };
            }
        }

        // Toggles are newest-first; the element just before the
        // introducing commit is the earliest change after it.
        let toggles = self.pickaxe(path, value);
        let removed_in_commit = match toggles.iter().position(|h| h == introduced_in) {
            // Introduction is the newest toggle: nothing removed it yet
            // as far as the pickaxe can see.
            Some(0) => None,
            Some(i) => Some(toggles[i - 1].clone()),
            // Introducing commit absent from the toggle list (rewritten
            // history): every toggle postdates it, take the earliest.
            None => toggles.last().cloned(),
        };

        Presence {
            still_present: false,
            removed_in_commit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeBackend;

    #[test]
    fn value_in_head_is_still_present() {
        let mut backend = FakeBackend::default();
        backend.head_files.insert(
            "src/config.py".to_owned(),
            "token = sk_live_abc\n".to_owned(),
        );
        let resolver = PresenceResolver::new(&backend);
        let p = resolver.resolve("src/config.py", "sk_live_abc", "aaa");
        assert!(p.still_present);
        assert_eq!(p.removed_in_commit, None);
    }

    #[test]
    fn missing_file_is_not_present() {
        let backend = FakeBackend::default();
        let resolver = PresenceResolver::new(&backend);
        let p = resolver.resolve("gone.py", "sk_live_abc", "aaa");
        assert!(!p.still_present);
    }

    #[test]
    fn removal_commit_is_toggle_after_introduction() {
        let mut backend = FakeBackend::default();
        backend.pickaxe_results.insert(
            ("src/config.py".to_owned(), "sk_live_abc".to_owned()),
            vec!["ccc".to_owned(), "aaa".to_owned()],
        );
        let resolver = PresenceResolver::new(&backend);
        let p = resolver.resolve("src/config.py", "sk_live_abc", "aaa");
        assert!(!p.still_present);
        assert_eq!(p.removed_in_commit.as_deref(), Some("ccc"));
    }

    #[test]
    fn introduction_only_leaves_removal_unresolved() {
        let mut backend = FakeBackend::default();
        backend.pickaxe_results.insert(
            ("src/config.py".to_owned(), "sk_live_abc".to_owned()),
            vec!["aaa".to_owned()],
        );
        let resolver = PresenceResolver::new(&backend);
        let p = resolver.resolve("src/config.py", "sk_live_abc", "aaa");
        assert!(!p.still_present);
        assert_eq!(p.removed_in_commit, None);
    }

    #[test]
    fn earliest_toggle_after_introduction_wins_among_many() {
        let mut backend = FakeBackend::default();
        backend.pickaxe_results.insert(
            ("f.py".to_owned(), "v".to_owned()),
            vec!["eee".to_owned(), "ccc".to_owned(), "aaa".to_owned()],
        );
        let resolver = PresenceResolver::new(&backend);
        let p = resolver.resolve("f.py", "v", "aaa");
        assert_eq!(p.removed_in_commit.as_deref(), Some("ccc"));
    }

    #[test]
    fn head_lookups_are_cached() {
        let mut backend = FakeBackend::default();
        backend
            .head_files
            .insert("a.py".to_owned(), "value_one here\n".to_owned());
        let resolver = PresenceResolver::new(&backend);
        resolver.resolve("a.py", "value_one", "aaa");
        resolver.resolve("a.py", "value_two", "bbb");
        assert_eq!(backend.head_calls(), 1);
    }
}
