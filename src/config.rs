//! Workspace configuration for tshero.
//!
//! Loaded from `tshero.json` at the workspace root. Every key is optional and
//! falls back to the defaults below.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`Config::load_or_default`].
pub const CONFIG_FILE_NAME: &str = "tshero.json";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub index: IndexConfig,
    pub resolver: ResolverConfig,
}

impl Config {
    /// Load configuration from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `<root>/tshero.json`, or return defaults if it doesn't exist or is invalid.
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid configuration: {}", e);
            Self::default()
        })
    }
}

/// Which files feed the declaration index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexConfig {
    /// Glob patterns (relative to the workspace root) of files to index.
    pub include_patterns: Vec<String>,
    /// Glob patterns excluded from the workspace files.
    pub workspace_ignore_patterns: Vec<String>,
    /// Also index `node_modules/@types/**/*.d.ts`.
    pub index_typings: bool,
    /// Glob patterns excluded from the typings.
    pub module_ignore_patterns: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.ts".to_string(), "**/*.tsx".to_string()],
            workspace_ignore_patterns: vec![
                "**/build/**".to_string(),
                "**/out/**".to_string(),
                "**/dist/**".to_string(),
                "**/node_modules/**".to_string(),
            ],
            index_typings: true,
            module_ignore_patterns: Vec::new(),
        }
    }
}

/// Quote character used for generated module specifiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuoteStyle {
    #[serde(rename = "'")]
    Single,
    #[serde(rename = "\"")]
    Double,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Sort order of the imports inside one group.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportGroupOrder {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
    Semantic,
}

/// One entry of `importGroups`: a bare identifier or an identifier with an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ImportGroupSetting {
    Identifier(String),
    Detailed {
        identifier: String,
        #[serde(default)]
        order: ImportGroupOrder,
    },
}

impl ImportGroupSetting {
    pub fn identifier(&self) -> &str {
        match self {
            ImportGroupSetting::Identifier(identifier)
            | ImportGroupSetting::Detailed { identifier, .. } => identifier,
        }
    }

    pub fn order(&self) -> ImportGroupOrder {
        match self {
            ImportGroupSetting::Identifier(_) => ImportGroupOrder::default(),
            ImportGroupSetting::Detailed { order, .. } => *order,
        }
    }
}

impl From<&str> for ImportGroupSetting {
    fn from(identifier: &str) -> Self {
        ImportGroupSetting::Identifier(identifier.to_string())
    }
}

/// Import generation and organisation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub string_quote_style: QuoteStyle,
    pub insert_semicolons: bool,
    pub insert_space_before_and_after_import_braces: bool,
    /// Named imports longer than this are wrapped onto multiple lines.
    pub multi_line_wrap_threshold: usize,
    pub multi_line_trailing_comma: bool,
    pub tab_size: usize,
    pub insert_spaces: bool,
    pub import_groups: Vec<ImportGroupSetting>,
    pub disable_import_removal_on_organize: bool,
    /// Libraries whose imports survive even when nothing uses them.
    pub ignore_imports_for_removal: Vec<String>,
    pub merge_imports_from_same_library: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            string_quote_style: QuoteStyle::Single,
            insert_semicolons: true,
            insert_space_before_and_after_import_braces: true,
            multi_line_wrap_threshold: 125,
            multi_line_trailing_comma: true,
            tab_size: 4,
            insert_spaces: true,
            import_groups: ["Plains", "Modules", "Workspace", "Remaining"]
                .into_iter()
                .map(ImportGroupSetting::from)
                .collect(),
            disable_import_removal_on_organize: false,
            ignore_imports_for_removal: vec!["react".to_string()],
            merge_imports_from_same_library: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_roundtrips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.resolver.multi_line_wrap_threshold, 125);
        assert_eq!(parsed.resolver.import_groups.len(), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "resolver": {
                "stringQuoteStyle": "\"",
                "insertSemicolons": false,
                "importGroups": ["Modules", {"identifier": "/^@app/", "order": "desc"}, "Remaining"]
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.resolver.string_quote_style, QuoteStyle::Double);
        assert!(!config.resolver.insert_semicolons);
        assert_eq!(config.resolver.tab_size, 4);
        assert_eq!(config.resolver.import_groups[1].identifier(), "/^@app/");
        assert_eq!(
            config.resolver.import_groups[1].order(),
            ImportGroupOrder::Desc
        );
        assert_eq!(
            config.resolver.import_groups[0].order(),
            ImportGroupOrder::Asc
        );
        assert!(config.index.index_typings);
    }

    #[test]
    fn test_order_accepts_long_names() {
        let setting: ImportGroupSetting =
            serde_json::from_str(r#"{"identifier": "Modules", "order": "descending"}"#).unwrap();
        assert_eq!(setting.order(), ImportGroupOrder::Desc);
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load_or_default(dir.path()), Config::default());

        let mut config = Config::default();
        config.resolver.tab_size = 2;
        config.save(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(Config::load_or_default(dir.path()).resolver.tab_size, 2);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert_eq!(Config::load_or_default(dir.path()), Config::default());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(&dir.path().join("missing.json")).is_err());
    }
}
