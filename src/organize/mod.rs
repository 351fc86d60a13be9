//! Import grouping and sorting
//!
//! `organize` is a pure classify, sort and render pass: imports are assigned to the
//! policy's groups, each group is sorted by its own order, and the non-empty groups
//! are rendered separated by one blank line.

pub mod groups;
pub mod sorting;

pub use groups::{GroupKeyword, GroupMatcher, ImportGroup, ImportGroupPolicy};

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::resources::{Generatable, GenerationOptions, Import};

#[derive(Debug, Clone)]
pub struct ImportOrganizer {
    policy: ImportGroupPolicy,
    options: GenerationOptions,
}

impl ImportOrganizer {
    pub fn new(policy: ImportGroupPolicy, options: GenerationOptions) -> Self {
        Self { policy, options }
    }

    /// Organizer for the configured groups and formatting
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        Ok(Self::new(
            ImportGroupPolicy::parse(&config.import_groups)?,
            GenerationOptions::from(config),
        ))
    }

    pub fn policy(&self) -> &ImportGroupPolicy {
        &self.policy
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Imports grouped and sorted, in rendering order; empty groups are kept
    pub fn arrange(&self, imports: &[Import]) -> Vec<Vec<Import>> {
        let mut buckets = self.policy.assign(imports.to_vec());
        for (bucket, group) in buckets.iter_mut().zip(self.policy.groups()) {
            sorting::sort_imports(bucket, group.order);
        }
        buckets
    }

    /// Rendered import block without a trailing newline
    pub fn organize(&self, imports: &[Import]) -> String {
        self.arrange(imports)
            .iter()
            .filter(|bucket| !bucket.is_empty())
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|import| import.generate(&self.options))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImportGroupOrder, ImportGroupSetting, QuoteStyle};
    use crate::extractors::ExtractorManager;
    use crate::resources::{NamedImport, StringImport, SymbolSpecifier};

    fn named(library: &str, specifiers: &[&str]) -> Import {
        let mut import = NamedImport::new(library);
        for specifier in specifiers {
            import.add_specifier(SymbolSpecifier::new(*specifier));
        }
        Import::Named(import)
    }

    fn organizer(groups: &[&str]) -> ImportOrganizer {
        let config = ResolverConfig {
            import_groups: groups.iter().map(|&g| ImportGroupSetting::from(g)).collect(),
            ..ResolverConfig::default()
        };
        ImportOrganizer::from_config(&config).unwrap()
    }

    #[test]
    fn test_workspace_before_modules() {
        let organizer = organizer(&["Workspace", "Modules", "Remaining"]);
        let imports = vec![
            named("lib-b", &["b"]),
            named("./local", &["l"]),
            named("lib-a", &["a"]),
        ];

        assert_eq!(
            organizer.organize(&imports),
            "import { l } from './local';\n\n\
             import { a } from 'lib-a';\n\
             import { b } from 'lib-b';"
        );
    }

    #[test]
    fn test_default_policy_layout() {
        let organizer = ImportOrganizer::from_config(&ResolverConfig::default()).unwrap();
        let imports = vec![
            named("./app.component", &["AppComponent"]),
            Import::String(StringImport::new("zone.js")),
            named("@angular/core", &["Component"]),
            named("node:fs", &["readFile"]),
        ];

        assert_eq!(
            organizer.organize(&imports),
            "import 'zone.js';\n\n\
             import { Component } from '@angular/core';\n\n\
             import { AppComponent } from './app.component';\n\n\
             import { readFile } from 'node:fs';"
        );
    }

    #[test]
    fn test_regex_group_and_descending_order() {
        let config = ResolverConfig {
            import_groups: vec![
                ImportGroupSetting::Detailed {
                    identifier: "/(@angular|react)/core/(.*)/".to_string(),
                    order: ImportGroupOrder::Desc,
                },
                ImportGroupSetting::from("Remaining"),
            ],
            string_quote_style: QuoteStyle::Double,
            insert_semicolons: false,
            ..ResolverConfig::default()
        };
        let organizer = ImportOrganizer::from_config(&config).unwrap();
        let imports = vec![
            named("@angular/core/testing", &["TestBed"]),
            named("rxjs", &["of"]),
            named("@angular/core/rxjs-interop", &["toSignal"]),
        ];

        assert_eq!(
            organizer.organize(&imports),
            "import { TestBed } from \"@angular/core/testing\"\n\
             import { toSignal } from \"@angular/core/rxjs-interop\"\n\n\
             import { of } from \"rxjs\""
        );
    }

    #[test]
    fn test_empty_groups_render_nothing() {
        let organizer = organizer(&["Plains", "Modules", "Workspace", "Remaining"]);
        assert_eq!(organizer.organize(&[]), "");
        assert_eq!(
            organizer.organize(&[named("./a", &["a"])]),
            "import { a } from './a';"
        );
    }

    #[test]
    fn test_organize_is_idempotent() {
        let organizer = ImportOrganizer::from_config(&ResolverConfig::default()).unwrap();
        let imports = vec![
            named("rxjs", &["map", "filter"]),
            named("./util", &["helper"]),
            Import::String(StringImport::new("reflect-metadata")),
        ];

        let first = organizer.organize(&imports);
        let source = format!("{}\n\nhelper(map, filter);\n", first);
        let reparsed = ExtractorManager::new().extract_source(&source).unwrap();
        let second = organizer.organize(&reparsed.imports);

        assert_eq!(first, second);
    }
}
