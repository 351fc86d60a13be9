//! TypeScript/JavaScript resource extractor with modular architecture
//!
//! Walks a parsed tree once, depth first, and builds the [`Resource`] tree of the file.
//! The walk keeps a stack of open scopes: entering a namespace or module block pushes
//! a child resource, leaving it pops the child back into its parent.
//!
//! - **symbols**: node routing and the scope level checks
//! - **scopes**: the scope stack and the final usage filtering
//! - **classes**: classes with their properties and methods
//! - **functions**: functions, parameters and variable statements
//! - **interfaces**: interfaces, type aliases and enums
//! - **imports_exports**: import statements, re-exports and export marking
//! - **identifiers**: usage candidates and binding collection
//! - **helpers**: small node inspection utilities

mod classes;
mod functions;
mod helpers;
mod identifiers;
mod imports_exports;
mod interfaces;
mod scopes;
mod symbols;

use crate::error::{Error, Result};
use crate::extractors::base::BaseExtractor;
use crate::resources::Resource;
use scopes::PendingScope;
use tree_sitter::Tree;

/// Flags inherited from the statement wrapping a declaration
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DeclarationContext {
    pub is_exported: bool,
    pub is_default: bool,
    pub is_ambient: bool,
}

/// Main TypeScript extractor that orchestrates modular extraction components
pub struct TypeScriptExtractor {
    base: BaseExtractor,
    scopes: Vec<PendingScope>,
}

impl TypeScriptExtractor {
    pub fn new(language: String, file_path: String, content: String) -> Self {
        Self {
            base: BaseExtractor::new(language, file_path, content),
            scopes: Vec::new(),
        }
    }

    /// Build the resource tree of the parsed file.
    ///
    /// Fails with [`Error::NotParseable`] when the tree contains any syntax error.
    pub fn extract(&mut self, tree: &Tree) -> Result<Resource> {
        let root = tree.root_node();
        if let Some(point) = self.base.first_syntax_error(&root) {
            return Err(Error::NotParseable {
                line: point.row + 1,
                column: point.column,
            });
        }

        self.scopes = vec![PendingScope::new(Resource::file())];
        symbols::visit_children(self, root);

        // Only the file scope can remain: every push is paired with a pop
        let mut file = self
            .scopes
            .pop()
            .unwrap_or_else(|| PendingScope::new(Resource::file()));
        while let Some(mut parent) = self.scopes.pop() {
            parent.children.push(file);
            file = parent;
        }
        Ok(file.finish(&[]))
    }

    /// Get immutable reference to base extractor (for sub-modules)
    pub(crate) fn base(&self) -> &BaseExtractor {
        &self.base
    }

    /// The innermost open scope
    pub(crate) fn current(&mut self) -> &mut PendingScope {
        if self.scopes.is_empty() {
            self.scopes.push(PendingScope::new(Resource::file()));
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Whether the innermost open scope is ambient
    pub(crate) fn in_ambient_scope(&self) -> bool {
        self.scopes.last().is_some_and(|s| s.resource.is_ambient)
    }
}
