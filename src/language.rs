//! Language Support - Shared tree-sitter language configuration
//!
//! This module provides centralized language support for the JavaScript family of languages
//! the extractor understands. ALL language-specific tree-sitter configuration goes here.

use crate::error::{Error, Result};
use std::path::Path;

/// Get tree-sitter language parser for a given language name
///
/// This is the SINGLE SOURCE OF TRUTH for language support.
///
/// # Supported Languages
///
/// **TypeScript**: typescript, tsx
/// **JavaScript**: javascript, jsx
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "typescript" => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "javascript" | "jsx" => Ok(tree_sitter_javascript::LANGUAGE.into()),
        _ => Err(Error::UnsupportedLanguage(format!(
            "'{}'. Supported languages: typescript, tsx, javascript, jsx",
            language
        ))),
    }
}

/// Detect language from file extension
///
/// Returns the language name that can be passed to `get_tree_sitter_language()`.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        "js" | "mjs" | "cjs" => Some("javascript"),
        "jsx" => Some("jsx"),
        _ => None,
    }
}

/// Detect language for a path (`.d.ts` files resolve through their final extension)
pub fn detect_language(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(detect_language_from_extension)
}

/// File name suffixes stripped when turning a file path into a module path.
///
/// Longest suffix first, so `.d.ts` wins over `.ts`.
pub const MODULE_FILE_SUFFIXES: &[&str] = &[
    ".d.ts", ".d.mts", ".d.cts", ".tsx", ".ts", ".mts", ".cts", ".jsx", ".js", ".mjs", ".cjs",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_detected_language_has_a_grammar() {
        for ext in ["ts", "mts", "cts", "tsx", "js", "mjs", "cjs", "jsx"] {
            let language = detect_language_from_extension(ext).unwrap();
            assert!(
                get_tree_sitter_language(language).is_ok(),
                "grammar missing for {}",
                language
            );
        }
    }

    #[test]
    fn test_unknown_extension_is_not_detected() {
        assert_eq!(detect_language_from_extension("rs"), None);
        assert!(matches!(
            get_tree_sitter_language("rust"),
            Err(Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_declaration_files_are_typescript() {
        assert_eq!(
            detect_language(Path::new("node_modules/@types/node/index.d.ts")),
            Some("typescript")
        );
    }
}
