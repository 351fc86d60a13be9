//! ExtractorManager - Public API for resource extraction
//!
//! Handles file parsing and delegates to the TypeScript walker. This module provides
//! the main public interface for clients to turn source files into resources.

use crate::error::{Error, Result};
use crate::extractors::typescript::TypeScriptExtractor;
use crate::language::{detect_language, get_tree_sitter_language};
use crate::resources::Resource;
use std::path::Path;
use tree_sitter::Parser;

/// Manager for the JavaScript family extractors
pub struct ExtractorManager {
    // No state needed - each call builds its own parser and extractor
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self {}
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> Vec<&'static str> {
        vec!["typescript", "tsx", "javascript", "jsx"]
    }

    /// Extract the resource tree of a file, picking the grammar from its extension
    pub fn extract(&self, file_path: &str, content: &str) -> Result<Resource> {
        let language = detect_language(Path::new(file_path))
            .ok_or_else(|| Error::UnsupportedLanguage(file_path.to_string()))?;
        self.extract_with_language(language, file_path, content)
    }

    /// Extract the resource tree of TypeScript source text
    pub fn extract_source(&self, content: &str) -> Result<Resource> {
        self.extract_with_language("typescript", "<source>", content)
    }

    /// Extract using an explicit language name
    pub fn extract_with_language(
        &self,
        language: &str,
        file_path: &str,
        content: &str,
    ) -> Result<Resource> {
        // Create parser for the language
        let mut parser = Parser::new();
        let tree_sitter_language = get_tree_sitter_language(language)?;
        parser.set_language(&tree_sitter_language).map_err(|e| {
            Error::Language(format!(
                "Failed to set parser language for {}: {}",
                language, e
            ))
        })?;

        // Parse the file
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| Error::Language(format!("Failed to parse file: {}", file_path)))?;

        let mut extractor = TypeScriptExtractor::new(
            language.to_string(),
            file_path.to_string(),
            content.to_string(),
        );
        let resource = extractor.extract(&tree)?;

        tracing::debug!(
            "Extracted {} declarations, {} imports, {} usages from {} file: {}",
            resource.declarations.len(),
            resource.imports.len(),
            resource.usages.len(),
            language,
            file_path
        );
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_picks_grammar_from_extension() {
        let manager = ExtractorManager::new();
        let tsx = "export const App = () => <Layout title=\"x\"><div /></Layout>;";
        let resource = manager.extract("src/App.tsx", tsx).unwrap();
        assert_eq!(resource.declarations[0].name, "App");
        assert_eq!(resource.usages, vec!["Layout"]);

        let js = "export function run(a, { b }) { return helper(a, b); }";
        let resource = manager.extract("lib/run.js", js).unwrap();
        assert_eq!(resource.declarations[0].name, "run");
        assert_eq!(resource.usages, vec!["helper"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let manager = ExtractorManager::new();
        assert!(matches!(
            manager.extract("README.md", "# hi"),
            Err(Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_unparseable_source_fails_fast() {
        let manager = ExtractorManager::new();
        let result = manager.extract_source("export class {\n  foo(: void\n");
        assert!(matches!(result, Err(Error::NotParseable { .. })));
    }
}
