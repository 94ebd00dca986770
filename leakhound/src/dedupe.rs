//! Deduplication of findings by secret content hash.
//!
//! The same credential pasted into five files is one leak. The first
//! occurrence in encounter order survives; later occurrences collapse
//! into its auxiliary location list.

use rustc_hash::FxHashMap;

use crate::findings::FindingLocation;

/// Implemented by finding types that can be collapsed by content hash.
pub trait Dedupable {
    /// Stable hash of the secret value.
    fn value_hash(&self) -> &str;
    /// Where this occurrence was found.
    fn location(&self) -> FindingLocation;
    /// Records a collapsed duplicate's location on the survivor.
    fn add_location(&mut self, location: FindingLocation);
}

/// Collapses findings sharing a value hash, preserving encounter order.
#[must_use]
pub fn dedupe<T: Dedupable>(findings: Vec<T>) -> Vec<T> {
    let mut order: Vec<T> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for finding in findings {
        if let Some(&i) = index.get(finding.value_hash()) {
            let duplicate = finding.location();
            order[i].add_location(duplicate);
        } else {
            index.insert(finding.value_hash().to_owned(), order.len());
            order.push(finding);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        hash: String,
        file: String,
        line: usize,
        extra: Vec<FindingLocation>,
    }

    impl Item {
        fn new(hash: &str, file: &str, line: usize) -> Self {
            Self {
                hash: hash.to_owned(),
                file: file.to_owned(),
                line,
                extra: Vec::new(),
            }
        }
    }

    impl Dedupable for Item {
        fn value_hash(&self) -> &str {
            &self.hash
        }
        fn location(&self) -> FindingLocation {
            FindingLocation {
                file: self.file.clone().into(),
                line: self.line,
            }
        }
        fn add_location(&mut self, location: FindingLocation) {
            self.extra.push(location);
        }
    }

    #[test]
    fn first_occurrence_survives() {
        let out = dedupe(vec![
            Item::new("sha256:aaaa", "a.py", 1),
            Item::new("sha256:bbbb", "b.py", 2),
            Item::new("sha256:aaaa", "c.py", 3),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].file, "a.py");
        assert_eq!(out[0].extra.len(), 1);
        assert_eq!(out[0].extra[0].file, std::path::Path::new("c.py"));
        assert_eq!(out[0].extra[0].line, 3);
        assert!(out[1].extra.is_empty());
    }

    #[test]
    fn distinct_hashes_untouched() {
        let out = dedupe(vec![
            Item::new("sha256:aaaa", "a.py", 1),
            Item::new("sha256:bbbb", "a.py", 2),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_input() {
        let out: Vec<Item> = dedupe(Vec::new());
        assert!(out.is_empty());
    }
}
