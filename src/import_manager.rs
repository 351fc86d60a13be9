//! ImportManager - import maintenance for one document
//!
//! Ties a parsed document to the declaration index: finds missing imports, adds
//! the ones the caller decided on, organizes the import list and produces the one
//! text edit that writes the result back.

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::extractors::ExtractorManager;
use crate::index::DeclarationIndex;
use crate::organize::{sorting, ImportOrganizer};
use crate::resolver::{MissingImports, UserDecision, UsageResolver};
use crate::resources::{Generatable, Import, NamedImport, Resource};
use crate::utils::paths::normalize_library_name;
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single replacement of document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdit {
    /// Byte range to replace; `None` inserts at the start of the document, followed by
    /// a blank line
    pub range: Option<Range<usize>>,
    pub text: String,
}

impl ImportEdit {
    pub fn is_noop(&self) -> bool {
        self.range.is_none() && self.text.is_empty()
    }

    /// The document with the edit applied
    pub fn apply(&self, source: &str) -> String {
        match &self.range {
            _ if self.is_noop() => source.to_string(),
            Some(range) => {
                let start = range.start.min(source.len());
                let end = range.end.clamp(start, source.len());
                format!("{}{}{}", &source[..start], self.text, &source[end..])
            }
            None if source.is_empty() => format!("{}\n", self.text),
            None => format!("{}\n\n{}", self.text, source),
        }
    }
}

pub struct ImportManager<'a> {
    index: &'a DeclarationIndex,
    workspace_root: PathBuf,
    file: PathBuf,
    config: ResolverConfig,
    organizer: ImportOrganizer,
    resource: Resource,
    imports: Vec<Import>,
    organized: bool,
}

impl<'a> ImportManager<'a> {
    /// Parse `source` (the content of `file`) and validate the group policy
    pub fn new(
        index: &'a DeclarationIndex,
        workspace_root: impl Into<PathBuf>,
        file: impl Into<PathBuf>,
        source: &str,
        config: ResolverConfig,
    ) -> Result<Self> {
        let file = file.into();
        let organizer = ImportOrganizer::from_config(&config)?;
        let resource = ExtractorManager::new().extract(&file.to_string_lossy(), source)?;
        Ok(Self {
            index,
            workspace_root: workspace_root.into(),
            file,
            config,
            organizer,
            imports: resource.imports.clone(),
            resource,
            organized: false,
        })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Current import list, including added and not yet committed imports
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Usages of the document no import covers, with their candidates
    pub fn missing_imports(&self) -> MissingImports {
        UsageResolver::new(self.index, &self.workspace_root).resolve_missing(
            &self.resource.all_usages(),
            &self.imports,
            &self.file,
        )
    }

    /// Add the import a decision asks for, merging into an import of the same library
    pub fn add_declaration_import(&mut self, decision: &UserDecision) -> Result<()> {
        let import = decision.to_import(&self.file, &self.workspace_root)?;
        if !self.imports.iter().any(|existing| existing.binds(&decision.usage)) {
            self.add_import(import);
        }
        Ok(())
    }

    /// Add every unambiguous candidate; returns the usages left to decide on
    pub fn add_missing_imports(&mut self) -> Result<MissingImports> {
        let mut missing = self.missing_imports();
        let decisions: Vec<UserDecision> = missing
            .unambiguous()
            .map(|(usage, info)| UserDecision {
                declaration: info.clone(),
                usage: usage.to_string(),
            })
            .collect();

        for decision in &decisions {
            self.add_declaration_import(decision)?;
            missing.candidates.remove(&decision.usage);
        }
        debug!(
            "Added {} imports to {}, {} ambiguous usages left",
            decisions.len(),
            self.file.display(),
            missing.candidates.len()
        );
        Ok(missing)
    }

    fn add_import(&mut self, import: Import) {
        if let Import::Named(new) = &import {
            let library = self.normalize(new.library_name());
            let target = self.imports.iter_mut().find_map(|existing| match existing {
                Import::Named(named)
                    if !named.is_type_only
                        && normalize_library_name(
                            named.library_name(),
                            &self.file,
                            &self.workspace_root,
                        ) == library =>
                {
                    Some(named)
                }
                _ => None,
            });

            if let Some(target) = target {
                if let Some(default) = &new.default_alias {
                    if target.default_alias.is_none() {
                        target.default_alias = Some(default.clone());
                        return;
                    }
                } else {
                    for specifier in &new.specifiers {
                        target.add_specifier(specifier.clone());
                    }
                    return;
                }
            }
        }
        self.imports.push(import);
    }

    fn normalize(&self, library: &str) -> String {
        normalize_library_name(library, &self.file, &self.workspace_root)
    }

    /// Drop unused imports, merge and sort; the block is rewritten on commit
    pub fn organize(&mut self) -> &mut Self {
        let mut imports = std::mem::take(&mut self.imports);
        if !self.config.disable_import_removal_on_organize {
            imports = self.remove_unused(imports);
        }
        if self.config.merge_imports_from_same_library {
            imports = self.merge_same_library(imports);
        }
        for import in imports.iter_mut() {
            if let Import::Named(named) = import {
                sorting::sort_specifiers(named);
            }
        }
        self.imports = imports;
        self.organized = true;
        self
    }

    fn remove_unused(&self, imports: Vec<Import>) -> Vec<Import> {
        let usages: HashSet<String> = self.resource.all_usages().into_iter().collect();
        let ignored = &self.config.ignore_imports_for_removal;

        imports
            .into_iter()
            .filter_map(|import| {
                if import.is_string_import()
                    || import.is_new()
                    || ignored.iter().any(|lib| lib == import.library_name())
                {
                    return Some(import);
                }
                match import {
                    Import::Named(mut named) => {
                        named
                            .specifiers
                            .retain(|specifier| usages.contains(specifier.local_name()));
                        if named
                            .default_alias
                            .as_ref()
                            .is_some_and(|alias| !usages.contains(alias))
                        {
                            named.default_alias = None;
                        }
                        let is_empty = named.specifiers.is_empty() && named.default_alias.is_none();
                        (!is_empty).then_some(Import::Named(named))
                    }
                    other => {
                        let used = other.bound_names().iter().any(|name| usages.contains(*name));
                        used.then_some(other)
                    }
                }
            })
            .collect()
    }

    fn merge_same_library(&self, imports: Vec<Import>) -> Vec<Import> {
        let mut merged: Vec<Import> = Vec::with_capacity(imports.len());
        for import in imports {
            let Import::Named(named) = import else {
                merged.push(import);
                continue;
            };
            let library = self.normalize(named.library_name());
            let target = merged.iter_mut().find_map(|existing| match existing {
                Import::Named(existing)
                    if existing.is_type_only == named.is_type_only
                        && self.normalize(existing.library_name()) == library
                        && (existing.default_alias.is_none()
                            || named.default_alias.is_none()
                            || existing.default_alias == named.default_alias) =>
                {
                    Some(existing)
                }
                _ => None,
            });

            match target {
                Some(existing) => merge_into(existing, named),
                None => merged.push(Import::Named(named)),
            }
        }
        merged
    }

    /// The edit writing the import list back into the document
    ///
    /// After [`ImportManager::organize`] the whole import block is replaced.
    /// Otherwise only the added imports are inserted after the existing ones.
    pub fn commit(&self) -> ImportEdit {
        let block = self.resource.import_range();
        if self.organized || block.is_none() {
            let text = self.organizer.organize(&self.imports);
            return ImportEdit { range: block, text };
        }

        let added: Vec<Import> = self.imports.iter().filter(|i| i.is_new()).cloned().collect();
        // Imports extended in place (new specifiers) are regenerated too
        let touched: Vec<&Import> = self
            .imports
            .iter()
            .filter(|i| !i.is_new() && !self.resource.imports.contains(i))
            .collect();

        match block {
            Some(block) if touched.is_empty() => {
                if added.is_empty() {
                    return ImportEdit {
                        range: Some(block.end..block.end),
                        text: String::new(),
                    };
                }
                let lines: Vec<String> = added
                    .iter()
                    .map(|i| i.generate(self.organizer.options()))
                    .collect();
                ImportEdit {
                    range: Some(block.end..block.end),
                    text: format!("\n{}", lines.join("\n")),
                }
            }
            _ => ImportEdit {
                range: block,
                text: self.organizer.organize(&self.imports),
            },
        }
    }
}

/// Move the default alias and specifiers of `from` into `into`
fn merge_into(into: &mut NamedImport, from: NamedImport) {
    if into.default_alias.is_none() {
        into.default_alias = from.default_alias;
    }
    for specifier in from.specifiers {
        into.add_specifier(specifier);
    }
}
