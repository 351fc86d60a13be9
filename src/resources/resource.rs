// Resource tree: one node per lexical scope (file, namespace or module block)

use serde::{Deserialize, Serialize};

use super::declarations::Declaration;
use super::exports::Export;
use super::imports::Import;

/// Which construct opened the scope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResourceScope {
    File,
    Namespace { name: String },
    /// `module X {}` or `declare module 'x' {}`; string names keep their quotes
    Module { name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub scope: ResourceScope,
    pub is_exported: bool,
    pub is_ambient: bool,
    /// Absent for the file root
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub imports: Vec<Import>,
    pub exports: Vec<Export>,
    pub declarations: Vec<Declaration>,
    pub resources: Vec<Resource>,
    /// Free identifiers not bound by any enclosing scope, in first-seen order
    pub usages: Vec<String>,
}

impl Resource {
    pub fn file() -> Self {
        Self::with_scope(ResourceScope::File, None, None)
    }

    pub fn with_scope(scope: ResourceScope, start: Option<usize>, end: Option<usize>) -> Self {
        Self {
            scope,
            is_exported: false,
            is_ambient: false,
            start,
            end,
            imports: Vec::new(),
            exports: Vec::new(),
            declarations: Vec::new(),
            resources: Vec::new(),
            usages: Vec::new(),
        }
    }

    /// Scope name (`None` for files)
    pub fn name(&self) -> Option<&str> {
        match &self.scope {
            ResourceScope::File => None,
            ResourceScope::Namespace { name } | ResourceScope::Module { name } => Some(name),
        }
    }

    /// `declare module 'foo'` style block naming an external module
    pub fn external_module_name(&self) -> Option<&str> {
        match &self.scope {
            ResourceScope::Module { name } => {
                let trimmed = name.trim_matches(|c| c == '\'' || c == '"');
                (trimmed.len() + 2 == name.len()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// `declare global { ... }`
    pub fn is_global_augmentation(&self) -> bool {
        matches!(&self.scope, ResourceScope::Module { name } if name == "global")
    }

    /// Own usages followed by descendants' usages, deduplicated
    pub fn all_usages(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        self.collect_usages(&mut seen, &mut result);
        result
    }

    fn collect_usages<'a>(
        &'a self,
        seen: &mut std::collections::HashSet<&'a str>,
        out: &mut Vec<String>,
    ) {
        for usage in &self.usages {
            if seen.insert(usage.as_str()) {
                out.push(usage.clone());
            }
        }
        for child in &self.resources {
            child.collect_usages(seen, out);
        }
    }

    /// Whether any declaration in this resource or its descendants has `name`
    pub fn declares(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name == name)
            || self.resources.iter().any(|r| r.declares(name))
    }

    /// Byte range covered by the file's top level import statements
    pub fn import_range(&self) -> Option<std::ops::Range<usize>> {
        let start = self.imports.iter().filter_map(Import::start).min()?;
        let end = self.imports.iter().filter_map(Import::end).max()?;
        Some(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::imports::StringImport;

    #[test]
    fn test_all_usages_are_deduplicated_in_order() {
        let mut root = Resource::file();
        root.usages = vec!["A".into(), "B".into()];
        let mut child = Resource::with_scope(
            ResourceScope::Namespace { name: "Ns".into() },
            Some(10),
            Some(20),
        );
        child.usages = vec!["B".into(), "C".into()];
        root.resources.push(child);

        assert_eq!(root.all_usages(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_external_module_names_need_quotes() {
        let quoted = Resource::with_scope(
            ResourceScope::Module { name: "'fs'".into() },
            Some(0),
            Some(5),
        );
        assert_eq!(quoted.external_module_name(), Some("fs"));

        let plain = Resource::with_scope(
            ResourceScope::Module { name: "Internal".into() },
            Some(0),
            Some(5),
        );
        assert_eq!(plain.external_module_name(), None);
    }

    #[test]
    fn test_import_range_spans_all_imports() {
        let mut root = Resource::file();
        assert!(root.import_range().is_none());
        root.imports
            .push(Import::String(StringImport::new("a")).with_range(0, 12));
        root.imports
            .push(Import::String(StringImport::new("b")).with_range(13, 25));
        assert_eq!(root.import_range(), Some(0..25));
    }
}
