// Shared declaration index: concurrent readers, serialised writers

use super::{DeclarationIndex, DeclarationInfo};
use crate::resources::Resource;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// Cloneable handle to one index
///
/// Writers hold the write lock for the whole purge-and-commit of a file, so two
/// updates never interleave. Readers that need a stable view across several calls
/// compare [`SharedIndex::generation`] before and after.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<DeclarationIndex>>,
}

impl SharedIndex {
    pub fn new(index: DeclarationIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Read access for resolution and organisation
    pub fn read(&self) -> RwLockReadGuard<'_, DeclarationIndex> {
        self.inner.read()
    }

    /// Cloned candidates for `name`
    pub fn get(&self, name: &str) -> Vec<DeclarationInfo> {
        self.inner.read().get(name).to_vec()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation()
    }

    /// Replace one file's entries; returns the new generation
    pub fn update(&self, file: &str, resource: &Resource) -> u64 {
        let mut index = self.inner.write();
        index.update(file, resource);
        index.generation()
    }

    /// Replace many files' entries under one lock; returns the new generation
    pub fn extend<'a, I>(&self, files: I) -> u64
    where
        I: IntoIterator<Item = (String, &'a Resource)>,
    {
        let mut index = self.inner.write();
        index.extend(files);
        index.generation()
    }

    /// Drop one file; returns the new generation
    pub fn remove(&self, file: &str) -> u64 {
        let mut index = self.inner.write();
        index.remove(file);
        index.generation()
    }

    /// Swap in a freshly built index
    pub fn replace(&self, index: DeclarationIndex) {
        let mut guard = self.inner.write();
        let generation = guard.generation();
        *guard = index;
        // Keep the counter monotonic across rebuilds
        guard.bump_generation_past(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractorManager;
    use std::thread;

    #[test]
    fn test_concurrent_updates_do_not_leave_stale_entries() {
        let shared = SharedIndex::default();
        let manager = ExtractorManager::new();
        let first = manager.extract("a.ts", "export class Before {}").unwrap();
        let second = manager.extract("a.ts", "export class After {}").unwrap();
        shared.update("/src/a.ts", &first);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                let resource = if i % 2 == 0 { first.clone() } else { second.clone() };
                thread::spawn(move || {
                    shared.update("/src/a.ts", &resource);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let index = shared.read();
        let total = index.get("Before").len() + index.get("After").len();
        assert_eq!(total, 1);
        assert_eq!(index.generation(), 9);
    }

    #[test]
    fn test_replace_keeps_generation_monotonic() {
        let shared = SharedIndex::default();
        let resource = ExtractorManager::new()
            .extract("a.ts", "export const x = 1;")
            .unwrap();
        shared.update("/a.ts", &resource);
        shared.update("/a.ts", &resource);
        let before = shared.generation();

        let mut rebuilt = DeclarationIndex::new();
        rebuilt.update("/a.ts", &resource);
        shared.replace(rebuilt);

        assert!(shared.generation() > before);
        assert_eq!(shared.get("x").len(), 1);
    }
}
