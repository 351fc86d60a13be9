//! Candidate file discovery
//!
//! The index never walks the filesystem on its own; it asks a [`FileDiscovery`]
//! for the files to read. [`GlobDiscovery`] is the default collaborator driven by
//! [`IndexConfig`] and `.tsheroignore`.

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::utils::ignore::IgnorePatterns;
use crate::utils::paths::to_relative_unix_style;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Typings picked up when `indexTypings` is enabled
const TYPINGS_PATTERN: &str = "node_modules/@types/**/*.d.ts";

/// Enumerates the files that feed the declaration index
pub trait FileDiscovery {
    fn workspace_root(&self) -> &Path;

    /// Absolute paths of every candidate file, sorted and without duplicates
    fn discover(&self) -> Result<Vec<PathBuf>>;
}

pub struct GlobDiscovery {
    root: PathBuf,
    config: IndexConfig,
    ignore: IgnorePatterns,
}

impl GlobDiscovery {
    pub fn new(root: impl Into<PathBuf>, config: IndexConfig) -> Self {
        Self {
            root: root.into(),
            config,
            ignore: IgnorePatterns::default(),
        }
    }

    /// Discovery for a workspace root, honouring its `.tsheroignore`
    pub fn for_workspace(root: impl Into<PathBuf>, config: IndexConfig) -> Result<Self> {
        let root = root.into();
        let ignore = IgnorePatterns::load(&root)?;
        Ok(Self {
            root,
            config,
            ignore,
        })
    }

    pub fn with_ignore_patterns(mut self, ignore: IgnorePatterns) -> Self {
        self.ignore = ignore;
        self
    }

    fn glob_files(&self, pattern: &str, excluded: &[Pattern], found: &mut Vec<PathBuf>) -> Result<()> {
        let full_pattern = self.root.join(pattern);
        let full_pattern = full_pattern.to_string_lossy();
        let entries = glob::glob(&full_pattern)
            .map_err(|e| Error::Config(format!("Invalid glob pattern '{}': {}", pattern, e)))?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!("Glob error: {}", err);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let Ok(relative) = to_relative_unix_style(&path, &self.root) else {
                continue;
            };
            if excluded.iter().any(|p| p.matches(&relative)) || self.ignore.is_ignored(Path::new(&relative)) {
                continue;
            }
            found.push(path);
        }
        Ok(())
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern)
                .map_err(|e| Error::Config(format!("Invalid glob pattern '{}': {}", pattern, e)))
        })
        .collect()
}

impl FileDiscovery for GlobDiscovery {
    fn workspace_root(&self) -> &Path {
        &self.root
    }

    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let workspace_ignore = compile(&self.config.workspace_ignore_patterns)?;
        for pattern in &self.config.include_patterns {
            self.glob_files(pattern, &workspace_ignore, &mut files)?;
        }
        let workspace_count = files.len();

        if self.config.index_typings {
            let module_ignore = compile(&self.config.module_ignore_patterns)?;
            self.glob_files(TYPINGS_PATTERN, &module_ignore, &mut files)?;
        }

        files.sort();
        files.dedup();
        debug!(
            "Discovered {} workspace files and {} typings under {}",
            workspace_count,
            files.len().saturating_sub(workspace_count),
            self.root.display()
        );
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| to_relative_unix_style(f, root).unwrap())
            .collect()
    }

    #[test]
    fn test_discovers_sources_and_typings() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/app.ts", "export const app = 1;");
        write(root, "src/view.tsx", "export const view = 1;");
        write(root, "src/script.js", "export const script = 1;");
        write(root, "dist/app.ts", "export const app = 1;");
        write(root, "node_modules/lodash/index.ts", "");
        write(root, "node_modules/@types/lodash/index.d.ts", "");

        let discovery = GlobDiscovery::new(root, IndexConfig::default());
        let files = relative_names(root, &discovery.discover().unwrap());

        assert_eq!(
            files,
            vec![
                "node_modules/@types/lodash/index.d.ts",
                "src/app.ts",
                "src/view.tsx"
            ]
        );
    }

    #[test]
    fn test_typings_can_be_disabled_or_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "node_modules/@types/lodash/index.d.ts", "");
        write(root, "node_modules/@types/node/index.d.ts", "");

        let config = IndexConfig {
            module_ignore_patterns: vec!["**/@types/node/**".to_string()],
            ..IndexConfig::default()
        };
        let files = GlobDiscovery::new(root, config).discover().unwrap();
        assert_eq!(
            relative_names(root, &files),
            vec!["node_modules/@types/lodash/index.d.ts"]
        );

        let config = IndexConfig {
            index_typings: false,
            ..IndexConfig::default()
        };
        assert!(GlobDiscovery::new(root, config).discover().unwrap().is_empty());
    }

    #[test]
    fn test_tsheroignore_is_applied() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/app.ts", "");
        write(root, "src/generated/api.ts", "");
        write(root, ".tsheroignore", "generated/\n");

        let discovery = GlobDiscovery::for_workspace(root, IndexConfig::default()).unwrap();
        let files = relative_names(root, &discovery.discover().unwrap());
        assert_eq!(files, vec!["src/app.ts"]);
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = IndexConfig {
            workspace_ignore_patterns: vec!["[".to_string()],
            ..IndexConfig::default()
        };
        let result = GlobDiscovery::new(temp_dir.path(), config).discover();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
