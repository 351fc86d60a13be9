//! Import entities.
//!
//! Every variant keeps the module specifier exactly as written (`library_name`) and the
//! byte range of its statement. An import without offsets has been synthesized and does
//! not exist in the source yet.

use serde::{Deserialize, Serialize};

/// One `name` or `name as alias` entry of a named import or named re-export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SymbolSpecifier {
    pub specifier: String,
    pub alias: Option<String>,
}

impl SymbolSpecifier {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            alias: None,
        }
    }

    pub fn aliased(specifier: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            alias: Some(alias.into()),
        }
    }

    /// The name this specifier binds in the importing scope
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.specifier)
    }
}

/// `import Default, { a, b as c } from 'lib'`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamedImport {
    library_name: String,
    pub specifiers: Vec<SymbolSpecifier>,
    pub default_alias: Option<String>,
    pub is_type_only: bool,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl NamedImport {
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            specifiers: Vec::new(),
            default_alias: None,
            is_type_only: false,
            start: None,
            end: None,
        }
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Add a specifier unless the same (specifier, alias) pair is already present.
    pub fn add_specifier(&mut self, specifier: SymbolSpecifier) -> bool {
        if self.specifiers.contains(&specifier) {
            return false;
        }
        self.specifiers.push(specifier);
        true
    }
}

/// `import * as alias from 'lib'`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceImport {
    library_name: String,
    pub alias: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl NamespaceImport {
    pub fn new(library_name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            alias: alias.into(),
            start: None,
            end: None,
        }
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }
}

/// `import alias = require('lib')`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalModuleImport {
    library_name: String,
    pub alias: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl ExternalModuleImport {
    pub fn new(library_name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            alias: alias.into(),
            start: None,
            end: None,
        }
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }
}

/// `import 'lib'` (side effects only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StringImport {
    library_name: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl StringImport {
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            start: None,
            end: None,
        }
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }
}

/// Import variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Import {
    Named(NamedImport),
    Namespace(NamespaceImport),
    ExternalModule(ExternalModuleImport),
    String(StringImport),
}

impl Import {
    pub fn library_name(&self) -> &str {
        match self {
            Import::Named(i) => i.library_name(),
            Import::Namespace(i) => i.library_name(),
            Import::ExternalModule(i) => i.library_name(),
            Import::String(i) => i.library_name(),
        }
    }

    pub fn start(&self) -> Option<usize> {
        match self {
            Import::Named(i) => i.start,
            Import::Namespace(i) => i.start,
            Import::ExternalModule(i) => i.start,
            Import::String(i) => i.start,
        }
    }

    pub fn end(&self) -> Option<usize> {
        match self {
            Import::Named(i) => i.end,
            Import::Namespace(i) => i.end,
            Import::ExternalModule(i) => i.end,
            Import::String(i) => i.end,
        }
    }

    /// Set the statement range (used by the extractor)
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        match &mut self {
            Import::Named(i) => (i.start, i.end) = (Some(start), Some(end)),
            Import::Namespace(i) => (i.start, i.end) = (Some(start), Some(end)),
            Import::ExternalModule(i) => (i.start, i.end) = (Some(start), Some(end)),
            Import::String(i) => (i.start, i.end) = (Some(start), Some(end)),
        }
        self
    }

    /// True when the import was synthesized and is not yet in the source
    pub fn is_new(&self) -> bool {
        self.start().is_none()
    }

    pub fn is_string_import(&self) -> bool {
        matches!(self, Import::String(_))
    }

    /// Names this import binds in the importing scope
    pub fn bound_names(&self) -> Vec<&str> {
        match self {
            Import::Named(i) => i
                .default_alias
                .as_deref()
                .into_iter()
                .chain(i.specifiers.iter().map(SymbolSpecifier::local_name))
                .collect(),
            Import::Namespace(i) => vec![i.alias.as_str()],
            Import::ExternalModule(i) => vec![i.alias.as_str()],
            Import::String(_) => Vec::new(),
        }
    }

    /// Whether the import brings `name` into scope
    pub fn binds(&self, name: &str) -> bool {
        self.bound_names().contains(&name)
    }
}
