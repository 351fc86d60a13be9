//! `.tsheroignore` handling
//!
//! Line based ignore patterns at the workspace root, applied on top of the glob
//! ignore patterns of the index configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the ignore file looked up in the workspace root
pub const IGNORE_FILE_NAME: &str = ".tsheroignore";

#[derive(Debug, Clone, PartialEq, Eq)]
enum IgnorePattern {
    /// `generated/`: a whole path component and everything below it
    Directory(String),
    /// `*.min.js`: a file name suffix
    Extension(String),
    /// anything else matches anywhere in the path
    Substring(String),
}

impl IgnorePattern {
    fn parse(line: &str) -> Self {
        if let Some(dir) = line.strip_suffix('/') {
            IgnorePattern::Directory(dir.trim_start_matches('/').to_string())
        } else if let Some(ext) = line.strip_prefix('*') {
            IgnorePattern::Extension(ext.to_string())
        } else {
            IgnorePattern::Substring(line.to_string())
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            // Component match: "packages/" must not match "my-packages"
            IgnorePattern::Directory(dir) => path.split('/').any(|component| component == dir),
            IgnorePattern::Extension(ext) => path.ends_with(ext.as_str()),
            IgnorePattern::Substring(text) => path.contains(text.as_str()),
        }
    }
}

/// Patterns loaded from `.tsheroignore`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePatterns {
    patterns: Vec<IgnorePattern>,
}

impl IgnorePatterns {
    /// Parse ignore file content. Empty lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(IgnorePattern::parse)
            .collect();
        Self { patterns }
    }

    /// Load `.tsheroignore` from the workspace root; a missing file means no patterns
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let ignore_file = workspace_root.join(IGNORE_FILE_NAME);
        if !ignore_file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&ignore_file)
            .with_context(|| format!("Failed to read {}", ignore_file.display()))?;
        let patterns = Self::parse(&content);
        if !patterns.is_empty() {
            debug!(
                "Loaded {} custom ignore patterns from {}",
                patterns.len(),
                IGNORE_FILE_NAME
            );
        }
        Ok(patterns)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check a path (native or Unix-style) against every pattern
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.patterns.iter().any(|pattern| pattern.matches(&path_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_ignore_file_means_no_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let patterns = IgnorePatterns::load(temp_dir.path()).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_load_skips_comments_and_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(IGNORE_FILE_NAME),
            "# Comment line\ngenerated/\n*.min.js\n\ntemp_files/\n# Another comment\n",
        )
        .unwrap();

        let patterns = IgnorePatterns::load(temp_dir.path()).unwrap();
        assert_eq!(patterns.len(), 3);
        assert!(patterns.is_ignored(&PathBuf::from("/project/generated/schema.ts")));
        assert!(patterns.is_ignored(&PathBuf::from("/project/src/app.min.js")));
        assert!(patterns.is_ignored(&PathBuf::from("temp_files")));
        assert!(!patterns.is_ignored(&PathBuf::from("/project/src/normal.ts")));
    }

    #[test]
    fn test_substring_pattern() {
        let patterns = IgnorePatterns::parse("spec");
        assert!(patterns.is_ignored(&PathBuf::from("src/app.spec.ts")));
    }

    #[test]
    fn test_directory_pattern_word_boundary() {
        let patterns = IgnorePatterns::parse("packages/");

        assert!(patterns.is_ignored(&PathBuf::from("packages")));
        assert!(patterns.is_ignored(&PathBuf::from("src/packages")));
        assert!(patterns.is_ignored(&PathBuf::from("packages/file.ts")));

        assert!(!patterns.is_ignored(&PathBuf::from("my-packages")));
        assert!(!patterns.is_ignored(&PathBuf::from("src/subpackages/a.ts")));
        assert!(!patterns.is_ignored(&PathBuf::from("packages-old")));
    }

    #[test]
    fn test_windows_separators_are_normalized() {
        let patterns = IgnorePatterns::parse("generated/");
        assert!(patterns.is_ignored(&PathBuf::from(r"src\generated\api.ts")));
    }
}
