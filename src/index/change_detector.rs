//! blake3 based change detection for incremental index refreshes.
//!
//! Tracks content hashes of previously indexed files so unchanged files
//! are not extracted again.

use std::collections::HashMap;

/// Tracks file content hashes by workspace path.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    /// Map of workspace path -> blake3 hex hash from the last commit.
    known_hashes: HashMap<String, String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the file is new or its content hash differs.
    pub fn is_changed(&self, path: &str, content: &[u8]) -> bool {
        let hash = Self::hash_content(content);
        self.known_hashes.get(path) != Some(&hash)
    }

    /// Record the hash of a file after it was committed to the index.
    pub fn update_hash(&mut self, path: &str, content: &[u8]) {
        let hash = Self::hash_content(content);
        self.known_hashes.insert(path.to_string(), hash);
    }

    /// Whether `path` was committed and not removed since
    pub fn is_tracked(&self, path: &str) -> bool {
        self.known_hashes.contains_key(path)
    }

    pub fn remove_hash(&mut self, path: &str) {
        self.known_hashes.remove(path);
    }

    /// Tracked paths that are not in `present`
    pub fn vanished<'a>(&'a self, present: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        self.known_hashes
            .keys()
            .filter(move |path| !present.contains(path))
            .map(String::as_str)
    }

    pub fn tracked_count(&self) -> usize {
        self.known_hashes.len()
    }

    pub fn hash_content(content: &[u8]) -> String {
        blake3::hash(content).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_is_changed() {
        let detector = ChangeDetector::new();
        assert!(detector.is_changed("/a.ts", b"export const a = 1;"));
    }

    #[test]
    fn same_content_not_changed() {
        let mut detector = ChangeDetector::new();
        let content = b"export const a = 1;";
        detector.update_hash("/a.ts", content);
        assert!(!detector.is_changed("/a.ts", content));
    }

    #[test]
    fn different_content_is_changed() {
        let mut detector = ChangeDetector::new();
        detector.update_hash("/a.ts", b"export const a = 1;");
        assert!(detector.is_changed("/a.ts", b"export const a = 2;"));
    }

    #[test]
    fn remove_hash_makes_changed() {
        let mut detector = ChangeDetector::new();
        detector.update_hash("/a.ts", b"content");
        detector.remove_hash("/a.ts");
        assert!(detector.is_changed("/a.ts", b"content"));
    }

    #[test]
    fn vanished_paths() {
        let mut detector = ChangeDetector::new();
        detector.update_hash("/a.ts", b"a");
        detector.update_hash("/b.ts", b"b");
        assert_eq!(detector.tracked_count(), 2);

        let present = vec!["/a.ts".to_string()];
        let vanished: Vec<&str> = detector.vanished(&present).collect();
        assert_eq!(vanished, vec!["/b.ts"]);
    }

    #[test]
    fn hash_is_hex_encoded() {
        let hash = ChangeDetector::hash_content(b"hello");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
