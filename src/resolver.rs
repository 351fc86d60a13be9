//! Usage resolution against the declaration index
//!
//! Given the usages of a document and its current imports, finds the declarations
//! that could satisfy each usage that no import covers yet. Several candidates for
//! one usage are returned as they are; choosing between them is up to the caller.

use crate::error::Result;
use crate::index::{DeclarationIndex, DeclarationInfo};
use crate::resources::{Import, NamedImport, SymbolSpecifier};
use crate::utils::paths::{module_path, normalize_library_name, relative_library_name, workspace_path};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Candidates per unresolved usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingImports {
    /// Usage name -> every declaration that could satisfy it
    pub candidates: BTreeMap<String, Vec<DeclarationInfo>>,
    /// Usages without any candidate, in first-seen order
    pub unresolved: Vec<String>,
}

impl MissingImports {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Usages with exactly one candidate
    pub fn unambiguous(&self) -> impl Iterator<Item = (&str, &DeclarationInfo)> {
        self.candidates
            .iter()
            .filter(|(_, infos)| infos.len() == 1)
            .map(|(usage, infos)| (usage.as_str(), &infos[0]))
    }

    /// Usages the caller has to choose for
    pub fn ambiguous(&self) -> impl Iterator<Item = (&str, &[DeclarationInfo])> {
        self.candidates
            .iter()
            .filter(|(_, infos)| infos.len() > 1)
            .map(|(usage, infos)| (usage.as_str(), infos.as_slice()))
    }
}

/// The caller's choice of a declaration for a usage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDecision {
    pub declaration: DeclarationInfo,
    pub usage: String,
}

impl UserDecision {
    /// The import this decision requests; default exports are imported under the usage name
    pub fn to_import(&self, current_file: &Path, workspace_root: &Path) -> Result<Import> {
        build_import(&self.declaration, &self.usage, current_file, workspace_root)
    }
}

pub struct UsageResolver<'a> {
    index: &'a DeclarationIndex,
    workspace_root: &'a Path,
}

impl<'a> UsageResolver<'a> {
    pub fn new(index: &'a DeclarationIndex, workspace_root: &'a Path) -> Self {
        Self {
            index,
            workspace_root,
        }
    }

    /// Candidates for every usage of `current_file` not covered by `imports`
    pub fn resolve_missing(
        &self,
        usages: &[String],
        imports: &[Import],
        current_file: &Path,
    ) -> MissingImports {
        let imported = self.imported_pairs(imports, current_file);
        let current_module = module_path(current_file, self.workspace_root).ok();
        let current_path = workspace_path(current_file, self.workspace_root).ok();

        let mut result = MissingImports::default();
        let mut seen = HashSet::new();
        for usage in usages {
            if !seen.insert(usage.as_str()) {
                continue;
            }
            if imports.iter().any(|import| import.binds(usage)) {
                continue;
            }

            let candidates: Vec<DeclarationInfo> = self
                .index
                .get(usage)
                .iter()
                .filter(|info| {
                    current_path.as_deref() != Some(info.file.as_str())
                        && current_module.as_deref() != Some(info.from.as_str())
                })
                .filter(|info| !imported.contains(&(info.from.clone(), info.declaration.name.clone())))
                .cloned()
                .collect();

            if candidates.is_empty() {
                result.unresolved.push(usage.clone());
            } else {
                result.candidates.insert(usage.clone(), candidates);
            }
        }

        debug!(
            "Resolved usages of {}: {} with candidates, {} unresolved",
            current_file.display(),
            result.candidates.len(),
            result.unresolved.len()
        );
        result
    }

    /// (module path, imported name) pairs the document already imports
    fn imported_pairs(&self, imports: &[Import], current_file: &Path) -> HashSet<(String, String)> {
        let mut pairs = HashSet::new();
        for import in imports {
            let Import::Named(named) = import else {
                continue;
            };
            let library =
                normalize_library_name(named.library_name(), current_file, self.workspace_root);
            for specifier in &named.specifiers {
                pairs.insert((library.clone(), specifier.specifier.clone()));
            }
        }
        pairs
    }
}

/// The import that brings `info` into `current_file`
pub fn import_for_declaration(
    info: &DeclarationInfo,
    current_file: &Path,
    workspace_root: &Path,
) -> Result<Import> {
    build_import(info, &info.declaration.name, current_file, workspace_root)
}

fn build_import(
    info: &DeclarationInfo,
    local_name: &str,
    current_file: &Path,
    workspace_root: &Path,
) -> Result<Import> {
    let library = if info.from.starts_with('/') {
        let importing = workspace_path(current_file, workspace_root)?;
        relative_library_name(&importing, &info.from)
    } else {
        info.from.clone()
    };

    let mut import = NamedImport::new(library);
    if info.declaration.is_default {
        import.default_alias = Some(local_name.to_string());
    } else {
        import.add_specifier(SymbolSpecifier::new(info.declaration.name.clone()));
    }
    Ok(Import::Named(import))
}
