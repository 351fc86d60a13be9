//! Workspace index pipeline
//!
//! Reads and extracts the discovered files in parallel, then merges the fully
//! extracted ones into the index sequentially. Files that fail are reported, never
//! fatal.

use super::change_detector::ChangeDetector;
use super::discovery::FileDiscovery;
use super::{DeclarationIndex, SharedIndex};
use crate::error::Result;
use crate::extractors::ExtractorManager;
use crate::resources::Resource;
use crate::utils::paths::workspace_path;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Cooperative cancellation, checked before and after each file
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A file left out of the index and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Result of a full build.
#[derive(Debug)]
pub struct BuildReport {
    pub index: DeclarationIndex,
    /// Number of files extracted and merged.
    pub parsed: usize,
    pub skipped: Vec<SkippedFile>,
    /// Set when the token fired; `index` then holds every file finished before that.
    pub cancelled: bool,
}

/// Result of an incremental refresh.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub skipped: Vec<SkippedFile>,
    pub cancelled: bool,
    /// Index generation after the refresh.
    pub generation: u64,
}

enum Outcome {
    Parsed {
        path: String,
        content: String,
        resource: Resource,
    },
    Unchanged(String),
    Skipped(SkippedFile),
    Cancelled,
}

/// Called with the workspace path of every file whose extraction completed
pub type ExtractedCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Builds and refreshes the declaration index of one workspace.
pub struct IndexBuilder {
    root: PathBuf,
    manager: ExtractorManager,
    change_detector: ChangeDetector,
    on_extracted: Option<ExtractedCallback>,
}

impl IndexBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manager: ExtractorManager::new(),
            change_detector: ChangeDetector::new(),
            on_extracted: None,
        }
    }

    /// Report progress per extracted file; runs on the extraction threads
    pub fn on_file_extracted(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_extracted = Some(Arc::new(callback));
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.root
    }

    pub fn change_detector(&self) -> &ChangeDetector {
        &self.change_detector
    }

    /// Discover and build in one go
    pub fn index_workspace(
        &mut self,
        discovery: &dyn FileDiscovery,
        cancel: &CancellationToken,
    ) -> Result<BuildReport> {
        let files = discovery.discover()?;
        Ok(self.build(&files, cancel))
    }

    /// Build a fresh index from `files` (absolute paths)
    pub fn build(&mut self, files: &[PathBuf], cancel: &CancellationToken) -> BuildReport {
        self.change_detector = ChangeDetector::new();
        let outcomes = self.extract_all(files, cancel, false);

        let mut index = DeclarationIndex::new();
        let (parsed, skipped, cancelled) = self.merge(outcomes, |entries| {
            index.extend(entries.iter().map(|(path, resource)| (path.clone(), resource)));
        });

        info!(
            "Indexed {}: {} scanned, {} parsed, {} skipped, {} names{}",
            self.root.display(),
            files.len(),
            parsed,
            skipped.len(),
            index.len(),
            if cancelled { " (cancelled)" } else { "" },
        );

        BuildReport {
            index,
            parsed,
            skipped,
            cancelled,
        }
    }

    /// Re-extract only the files whose content changed and drop the vanished ones
    pub fn refresh(
        &mut self,
        shared: &SharedIndex,
        files: &[PathBuf],
        cancel: &CancellationToken,
    ) -> RefreshReport {
        let outcomes = self.extract_all(files, cancel, true);
        let unchanged = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Outcome::Unchanged(_)))
            .count();

        let mut present: Vec<String> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                Outcome::Parsed { path, .. } | Outcome::Unchanged(path) => Some(path.clone()),
                Outcome::Skipped(skipped) => Some(skipped.path.clone()),
                Outcome::Cancelled => None,
            })
            .collect();
        present.sort();

        let (updated, skipped, cancelled) = self.merge(outcomes, |entries| {
            shared.extend(entries.iter().map(|(path, resource)| (path.clone(), resource)));
        });

        // An indexed file that stopped parsing loses its previous entries
        let mut removed = 0;
        for file in &skipped {
            if self.change_detector.is_tracked(&file.path) {
                shared.remove(&file.path);
                self.change_detector.remove_hash(&file.path);
                removed += 1;
            }
        }

        if !cancelled {
            let vanished: Vec<String> = self
                .change_detector
                .vanished(&present)
                .map(str::to_string)
                .collect();
            for path in vanished {
                shared.remove(&path);
                self.change_detector.remove_hash(&path);
                removed += 1;
            }
        }

        let generation = shared.generation();
        info!(
            "Refreshed {}: {} updated, {} unchanged, {} removed, {} skipped",
            self.root.display(),
            updated,
            unchanged,
            removed,
            skipped.len(),
        );

        RefreshReport {
            updated,
            unchanged,
            removed,
            skipped,
            cancelled,
            generation,
        }
    }

    fn extract_all(&self, files: &[PathBuf], cancel: &CancellationToken, incremental: bool) -> Vec<Outcome> {
        files
            .par_iter()
            .map(|file| {
                if cancel.is_cancelled() {
                    return Outcome::Cancelled;
                }
                let outcome = self.extract_one(file, incremental);
                // Work still in flight when the token fired is dropped
                if cancel.is_cancelled() {
                    return Outcome::Cancelled;
                }
                if let (Outcome::Parsed { path, .. }, Some(callback)) = (&outcome, &self.on_extracted) {
                    callback(path.as_str());
                }
                outcome
            })
            .collect()
    }

    fn extract_one(&self, file: &Path, incremental: bool) -> Outcome {
        let path = match workspace_path(file, &self.root) {
            Ok(path) => path,
            Err(err) => {
                return Outcome::Skipped(SkippedFile {
                    path: file.display().to_string(),
                    reason: err.to_string(),
                })
            }
        };
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                return Outcome::Skipped(SkippedFile {
                    path,
                    reason: err.to_string(),
                })
            }
        };
        if incremental && !self.change_detector.is_changed(&path, content.as_bytes()) {
            return Outcome::Unchanged(path);
        }
        match self.manager.extract(&path, &content) {
            Ok(resource) => Outcome::Parsed {
                path,
                content,
                resource,
            },
            Err(err) => Outcome::Skipped(SkippedFile {
                path,
                reason: err.to_string(),
            }),
        }
    }

    /// Commit every parsed outcome through `commit`, recording hashes afterwards
    fn merge<F>(&mut self, outcomes: Vec<Outcome>, commit: F) -> (usize, Vec<SkippedFile>, bool)
    where
        F: FnOnce(&[(String, Resource)]),
    {
        let mut parsed = Vec::new();
        let mut skipped = Vec::new();
        let mut cancelled = false;

        for outcome in outcomes {
            match outcome {
                Outcome::Parsed {
                    path,
                    content,
                    resource,
                } => parsed.push((path, content, resource)),
                Outcome::Skipped(file) => {
                    warn!("Skipping {}: {}", file.path, file.reason);
                    skipped.push(file);
                }
                Outcome::Unchanged(_) => {}
                Outcome::Cancelled => cancelled = true,
            }
        }

        let entries: Vec<(String, Resource)> = parsed
            .iter()
            .map(|(path, _, resource)| (path.clone(), resource.clone()))
            .collect();
        commit(&entries);
        for (path, content, _) in &parsed {
            self.change_detector.update_hash(path, content.as_bytes());
        }
        (parsed.len(), skipped, cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::index::discovery::GlobDiscovery;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unparseable_files_are_skipped_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let good = write(root, "src/good.ts", "export class Good {}");
        let bad = write(root, "src/bad.ts", "export class {{{");

        let report = IndexBuilder::new(root).build(&[good, bad], &CancellationToken::new());

        assert_eq!(report.parsed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "/src/bad.ts");
        assert!(report.skipped[0].reason.contains("not parseable"));
        assert_eq!(report.index.get("Good")[0].from, "/src/good");
        assert!(!report.cancelled);
    }

    #[test]
    fn test_build_cancelled_before_start_commits_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let file = write(root, "src/a.ts", "export class A {}");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = IndexBuilder::new(root).build(&[file], &cancel);

        assert!(report.cancelled);
        assert_eq!(report.parsed, 0);
        assert!(report.index.is_empty());
    }

    #[test]
    fn test_cancellation_mid_build_keeps_only_completed_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files: Vec<PathBuf> = (0..6)
            .map(|i| write(root, &format!("src/f{}.ts", i), &format!("export class C{} {{}}", i)))
            .collect();

        let cancel = CancellationToken::new();
        let completed = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut builder = {
            let cancel = cancel.clone();
            let completed = Arc::clone(&completed);
            IndexBuilder::new(root).on_file_extracted(move |path| {
                let mut completed = completed.lock();
                completed.push(path.to_string());
                if completed.len() == 2 {
                    cancel.cancel();
                }
            })
        };

        // One worker makes the cancellation point deterministic
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let report = pool.install(|| builder.build(&files, &cancel));

        assert!(report.cancelled);
        assert_eq!(report.parsed, 2);
        assert!(report.skipped.is_empty());
        let mut committed = completed.lock().clone();
        committed.sort();
        assert_eq!(report.index.all_paths(), committed);
        assert_eq!(report.index.file_count(), report.parsed);
        assert_eq!(builder.change_detector().tracked_count(), 2);
    }

    #[test]
    fn test_index_workspace_with_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/models/user.ts", "export interface User { name: string }");
        write(root, "node_modules/@types/lodash/index.d.ts", "export declare function debounce(): void;");

        let discovery = GlobDiscovery::new(root, IndexConfig::default());
        let report = IndexBuilder::new(root)
            .index_workspace(&discovery, &CancellationToken::new())
            .unwrap();

        assert_eq!(report.parsed, 2);
        assert_eq!(report.index.get("User")[0].from, "/src/models/user");
        assert_eq!(report.index.get("debounce")[0].from, "lodash");
    }

    #[test]
    fn test_refresh_only_touches_changed_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = write(root, "src/a.ts", "export class A {}");
        let b = write(root, "src/b.ts", "export class B {}");

        let cancel = CancellationToken::new();
        let mut builder = IndexBuilder::new(root);
        let report = builder.build(&[a.clone(), b.clone()], &cancel);
        let shared = SharedIndex::new(report.index);

        write(root, "src/a.ts", "export class Renamed {}");
        let refresh = builder.refresh(&shared, &[a.clone(), b.clone()], &cancel);
        assert_eq!(refresh.updated, 1);
        assert_eq!(refresh.unchanged, 1);
        assert!(shared.get("A").is_empty());
        assert_eq!(shared.get("Renamed").len(), 1);

        fs::remove_file(&b).unwrap();
        let refresh = builder.refresh(&shared, &[a], &cancel);
        assert_eq!(refresh.removed, 1);
        assert!(shared.get("B").is_empty());
        assert_eq!(refresh.generation, shared.generation());
    }

    #[test]
    fn test_refresh_drops_entries_of_files_that_stop_parsing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = write(root, "a.ts", "export class A {}");

        let cancel = CancellationToken::new();
        let mut builder = IndexBuilder::new(root);
        let shared = SharedIndex::new(builder.build(&[a.clone()], &cancel).index);
        assert_eq!(shared.get("A").len(), 1);

        write(root, "a.ts", "export class {{{");
        let refresh = builder.refresh(&shared, &[a.clone()], &cancel);

        assert_eq!(refresh.skipped.len(), 1);
        assert_eq!(refresh.skipped[0].path, "/a.ts");
        assert_eq!(refresh.removed, 1);
        assert!(shared.get("A").is_empty());
        assert!(!builder.change_detector().is_tracked("/a.ts"));

        write(root, "a.ts", "export class A {}");
        let refresh = builder.refresh(&shared, &[a], &cancel);
        assert_eq!(refresh.updated, 1);
        assert_eq!(shared.get("A").len(), 1);
    }
}
