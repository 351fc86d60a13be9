//! Workspace-wide reverse index from declared name to declaring modules
//!
//! Every indexed file keeps its own flattened entries and its re-exports. The map is
//! a projection of that per-file state, so updating one file only purges and
//! re-commits that file and the modules re-exporting it.

use crate::resources::{
    Declaration, DeclarationKind, Export, ModuleDeclaration, ModuleKind, Resource,
};
use crate::utils::paths::{module_path_from_relative, resolve_library_name};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A declaration and the module it can be imported from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationInfo {
    pub declaration: Declaration,
    /// Module path (`/src/models/user`) or package name (`lodash`)
    pub from: String,
    /// Workspace path of the file the entry was committed for
    pub file: String,
}

/// Serialisable form of one index key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub index: String,
    pub infos: Vec<DeclarationInfo>,
}

#[derive(Debug, Clone, Default)]
struct FileState {
    module_path: String,
    /// Flattened entries declared by the file itself, keyed by (dotted) name
    direct: Vec<(String, DeclarationInfo)>,
    /// `export ... from` statements of the file root
    reexports: Vec<Export>,
    /// Keys currently holding entries of this file
    committed: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeclarationIndex {
    index: HashMap<String, Vec<DeclarationInfo>>,
    files: HashMap<String, FileState>,
    /// Module path -> files resolving to it (`a.ts` and `a.d.ts` share one)
    modules: HashMap<String, Vec<String>>,
    generation: u64,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates declared under `name`; empty when nothing matches
    pub fn get(&self, name: &str) -> &[DeclarationInfo] {
        self.index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Indexed names in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Workspace paths of every indexed file, sorted
    pub fn all_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Incremented on every mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation_past(&mut self, generation: u64) {
        self.generation = self.generation.max(generation) + 1;
    }

    /// Replace the entries of one file (a workspace path such as `/src/a.ts`)
    pub fn update(&mut self, file: &str, resource: &Resource) {
        self.extend(std::iter::once((file.to_string(), resource)));
    }

    /// Replace the entries of many files at once, committing them in the given order
    pub fn extend<'a, I>(&mut self, files: I)
    where
        I: IntoIterator<Item = (String, &'a Resource)>,
    {
        let mut changed_modules = Vec::new();
        let mut order = Vec::new();

        for (file, resource) in files {
            self.purge(&file);
            let module_path = module_path_from_relative(&file);
            let state = FileState {
                direct: flatten(resource, &module_path, &file),
                reexports: resource
                    .exports
                    .iter()
                    .filter(|export| export.library().is_some())
                    .cloned()
                    .collect(),
                module_path: module_path.clone(),
                committed: Vec::new(),
            };
            if self.files.insert(file.clone(), state).is_none() {
                self.modules
                    .entry(module_path.clone())
                    .or_default()
                    .push(file.clone());
            }
            changed_modules.push(module_path);
            order.push(file);
        }

        if order.is_empty() {
            return;
        }
        for file in self.affected_files(&changed_modules, order) {
            self.commit(&file);
        }
        self.generation += 1;
    }

    /// Drop a file and everything committed for it. Returns whether it was indexed.
    pub fn remove(&mut self, file: &str) -> bool {
        self.purge(file);
        let Some(state) = self.files.remove(file) else {
            return false;
        };
        if let Some(files) = self.modules.get_mut(&state.module_path) {
            files.retain(|f| f != file);
            if files.is_empty() {
                self.modules.remove(&state.module_path);
            }
        }
        for dependent in self.affected_files(&[state.module_path], Vec::new()) {
            self.commit(&dependent);
        }
        self.generation += 1;
        true
    }

    /// Serialisable form, sorted by name
    pub fn snapshot(&self) -> Vec<IndexEntry> {
        let mut entries: Vec<IndexEntry> = self
            .index
            .iter()
            .map(|(name, infos)| IndexEntry {
                index: name.clone(),
                infos: infos.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.index.cmp(&b.index));
        entries
    }

    /// Rebuild an index from its serialisable form
    ///
    /// Re-export relations are not part of the snapshot: re-exported entries are
    /// restored as entries of the re-exporting file.
    pub fn from_snapshot(entries: Vec<IndexEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            for info in entry.infos {
                let state = index.files.entry(info.file.clone()).or_insert_with(|| {
                    FileState {
                        module_path: module_path_from_relative(&info.file),
                        ..FileState::default()
                    }
                });
                if !state.committed.contains(&entry.index) {
                    state.committed.push(entry.index.clone());
                }
                state.direct.push((entry.index.clone(), info.clone()));
                index.index.entry(entry.index.clone()).or_default().push(info);
            }
        }
        for (file, state) in &index.files {
            index
                .modules
                .entry(state.module_path.clone())
                .or_default()
                .push(file.clone());
        }
        index
    }

    /// Remove every entry committed for `file`
    fn purge(&mut self, file: &str) {
        let Some(state) = self.files.get_mut(file) else {
            return;
        };
        for key in state.committed.drain(..) {
            if let Some(bucket) = self.index.get_mut(&key) {
                bucket.retain(|info| info.file != file);
                if bucket.is_empty() {
                    self.index.remove(&key);
                }
            }
        }
    }

    /// Write the direct and re-exported entries of `file` into the map
    fn commit(&mut self, file: &str) {
        self.purge(file);
        let Some(state) = self.files.get(file) else {
            return;
        };

        let mut entries = state.direct.clone();
        let mut visited = HashSet::from([file.to_string()]);
        for declaration in self.reexported(file, &mut visited) {
            entries.push((
                declaration.name.clone(),
                DeclarationInfo {
                    declaration,
                    from: state.module_path.clone(),
                    file: file.to_string(),
                },
            ));
        }

        let mut committed = Vec::new();
        for (key, info) in entries {
            let bucket = self.index.entry(key.clone()).or_default();
            // First entry per (name, module path) wins
            if bucket.iter().any(|existing| existing.from == info.from) {
                continue;
            }
            bucket.push(info);
            if !committed.contains(&key) {
                committed.push(key);
            }
        }
        if let Some(state) = self.files.get_mut(file) {
            state.committed = committed;
        }
    }

    /// Top level declarations the module of `file` exports
    fn module_exports(&self, file: &str, visited: &mut HashSet<String>) -> Vec<Declaration> {
        let Some(state) = self.files.get(file) else {
            return Vec::new();
        };
        let mut exports: Vec<Declaration> = state
            .direct
            .iter()
            .filter(|(key, info)| info.from == state.module_path && !key.contains('.'))
            .map(|(_, info)| info.declaration.clone())
            .collect();
        exports.extend(self.reexported(file, visited));
        exports
    }

    /// Declarations brought in by the `export ... from` statements of `file`
    fn reexported(&self, file: &str, visited: &mut HashSet<String>) -> Vec<Declaration> {
        let Some(state) = self.files.get(file) else {
            return Vec::new();
        };
        let mut result = Vec::new();

        for export in &state.reexports {
            let Some(library) = export.library() else {
                continue;
            };
            let target = resolve_library_name(library, file);

            if let Export::AllAs { alias, start, end, .. } = export {
                let mut namespace = Declaration::new(
                    alias.clone(),
                    *start,
                    *end,
                    DeclarationKind::Module(ModuleDeclaration {
                        kind: ModuleKind::Namespace,
                        is_ambient: false,
                    }),
                );
                namespace.is_exported = true;
                result.push(namespace);
                continue;
            }

            let mut target_exports = Vec::new();
            for target_file in self.modules.get(&target).into_iter().flatten() {
                if !visited.insert(target_file.clone()) {
                    continue;
                }
                target_exports.extend(self.module_exports(target_file, visited));
                visited.remove(target_file);
            }

            match export {
                Export::All { .. } => {
                    result.extend(target_exports.into_iter().filter(|d| !d.is_default));
                }
                Export::Named { specifiers, .. } => {
                    for specifier in specifiers {
                        let found = target_exports.iter().find(|d| {
                            if specifier.specifier == "default" {
                                d.is_default
                            } else {
                                d.name == specifier.specifier
                            }
                        });
                        if let Some(declaration) = found {
                            let mut declaration = declaration.clone();
                            declaration.name = specifier.local_name().to_string();
                            declaration.is_default = specifier.alias.as_deref() == Some("default");
                            result.push(declaration);
                        }
                    }
                }
                _ => {}
            }
        }
        result
    }

    /// Files to re-commit after the given modules changed: `seed` first, then every
    /// sibling of a changed module and every transitive re-exporter
    fn affected_files(&self, changed_modules: &[String], seed: Vec<String>) -> Vec<String> {
        let mut result = seed;
        let mut seen: HashSet<String> = result.iter().cloned().collect();
        let mut queue: VecDeque<String> = changed_modules.iter().cloned().collect();
        let mut seen_modules: HashSet<String> = changed_modules.iter().cloned().collect();

        while let Some(module) = queue.pop_front() {
            for sibling in self.modules.get(&module).into_iter().flatten() {
                if seen.insert(sibling.clone()) {
                    result.push(sibling.clone());
                }
            }
            for (file, state) in &self.files {
                let reexports_module = state.reexports.iter().any(|export| {
                    export
                        .library()
                        .is_some_and(|library| resolve_library_name(library, file) == module)
                });
                if !reexports_module {
                    continue;
                }
                if seen.insert(file.clone()) {
                    result.push(file.clone());
                }
                if seen_modules.insert(state.module_path.clone()) {
                    queue.push_back(state.module_path.clone());
                }
            }
        }
        result
    }
}

/// Flatten the indexable declarations of a file
fn flatten(resource: &Resource, module_path: &str, file: &str) -> Vec<(String, DeclarationInfo)> {
    let mut entries = Vec::new();
    walk(resource, "", module_path, file, false, &mut entries);

    // Duplicate names inside one file: first one wins
    let mut seen = HashSet::new();
    entries.retain(|(key, info)| seen.insert((key.clone(), info.from.clone())));
    entries
}

fn walk(
    resource: &Resource,
    prefix: &str,
    from: &str,
    file: &str,
    implicit_export: bool,
    entries: &mut Vec<(String, DeclarationInfo)>,
) {
    for declaration in &resource.declarations {
        if declaration.is_anonymous() || !(declaration.is_exported || implicit_export) {
            continue;
        }
        entries.push((
            format!("{}{}", prefix, declaration.name),
            DeclarationInfo {
                declaration: declaration.clone(),
                from: from.to_string(),
                file: file.to_string(),
            },
        ));
    }

    // `export = Ns`: the members of `Ns` are the module's exports
    for export in &resource.exports {
        let Export::Assigned { name, .. } = export else {
            continue;
        };
        for child in &resource.resources {
            if child.external_module_name().is_none() && child.name() == Some(name.as_str()) {
                walk(child, prefix, from, file, child.is_ambient, entries);
            }
        }
    }

    for child in &resource.resources {
        if child.is_global_augmentation() {
            continue;
        }
        if let Some(external) = child.external_module_name() {
            walk(child, "", external, file, true, entries);
            continue;
        }
        let Some(name) = child.name() else {
            continue;
        };
        if child.is_exported || child.is_ambient || implicit_export {
            walk(
                child,
                &format!("{}{}.", prefix, name),
                from,
                file,
                implicit_export || child.is_ambient,
                entries,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractorManager;

    fn extract(source: &str) -> Resource {
        ExtractorManager::new().extract("file.ts", source).unwrap()
    }

    fn index_of(files: &[(&str, &str)]) -> DeclarationIndex {
        let resources: Vec<(String, Resource)> = files
            .iter()
            .map(|(file, source)| (file.to_string(), extract(source)))
            .collect();
        let mut index = DeclarationIndex::new();
        index.extend(resources.iter().map(|(file, r)| (file.clone(), r)));
        index
    }

    fn froms(index: &DeclarationIndex, name: &str) -> Vec<String> {
        index.get(name).iter().map(|info| info.from.clone()).collect()
    }

    #[test]
    fn test_only_exported_declarations_are_indexed() {
        let index = index_of(&[(
            "/src/models/user.ts",
            "export class User {}\nclass Hidden {}\nexport function createUser() {}\n",
        )]);

        assert_eq!(froms(&index, "User"), vec!["/src/models/user"]);
        assert_eq!(froms(&index, "createUser"), vec!["/src/models/user"]);
        assert!(index.get("Hidden").is_empty());
        assert_eq!(index.get("User")[0].file, "/src/models/user.ts");
    }

    #[test]
    fn test_same_name_from_different_modules_is_ambiguous() {
        let index = index_of(&[
            ("/src/a.ts", "export class Logger {}"),
            ("/src/b.ts", "export class Logger {}"),
        ]);
        let mut modules = froms(&index, "Logger");
        modules.sort();
        assert_eq!(modules, vec!["/src/a", "/src/b"]);
    }

    #[test]
    fn test_duplicates_in_one_module_keep_first() {
        let index = index_of(&[(
            "/src/a.ts",
            "export function f(a: string) {}\nexport namespace f { export const x = 1; }\n",
        )]);
        assert_eq!(index.get("f").len(), 1);
        assert!(matches!(
            index.get("f")[0].declaration.kind,
            DeclarationKind::Function(_)
        ));
    }

    #[test]
    fn test_exported_namespace_members_use_dotted_names() {
        let index = index_of(&[(
            "/src/shapes.ts",
            "export namespace Shapes { export class Circle {} class Secret {} }",
        )]);
        assert_eq!(froms(&index, "Shapes"), vec!["/src/shapes"]);
        assert_eq!(froms(&index, "Shapes.Circle"), vec!["/src/shapes"]);
        assert!(index.get("Shapes.Secret").is_empty());
        assert!(index.get("Circle").is_empty());
    }

    #[test]
    fn test_ambient_modules_are_implicitly_exported() {
        let index = index_of(&[(
            "/typings/fs.d.ts",
            "declare module 'fs' { function readFile(path: string): void; }\n\
             declare global { interface Window { app: string } }\n",
        )]);
        assert_eq!(froms(&index, "readFile"), vec!["fs"]);
        assert!(index.get("Window").is_empty());
    }

    #[test]
    fn test_typings_use_package_names() {
        let index = index_of(&[(
            "/node_modules/@types/lodash/index.d.ts",
            "export declare function debounce(f: Function): Function;",
        )]);
        assert_eq!(froms(&index, "debounce"), vec!["lodash"]);
    }

    #[test]
    fn test_export_assignment_indexes_namespace_members() {
        let index = index_of(&[(
            "/node_modules/@types/express/index.d.ts",
            "declare function e(): void;\ndeclare namespace e { interface Request {} }\nexport = e;\n",
        )]);
        assert_eq!(froms(&index, "Request"), vec!["express"]);
        let e = index.get("e");
        assert_eq!(e.len(), 1);
        assert!(e[0].declaration.is_default);
    }

    #[test]
    fn test_reexports_are_resolved() {
        let index = index_of(&[
            ("/src/index.ts", "export * from './models';\nexport { helper as util } from './helpers';\nexport * as api from './api';\n"),
            ("/src/models/index.ts", "export * from './user';"),
            ("/src/models/user.ts", "export class User {}\nexport default class Admin {}\n"),
            ("/src/helpers.ts", "export function helper() {}"),
            ("/src/api.ts", "export const get = 1;"),
        ]);

        let mut user = froms(&index, "User");
        user.sort();
        assert_eq!(user, vec!["/src", "/src/models", "/src/models/user"]);
        assert_eq!(froms(&index, "Admin"), vec!["/src/models/user"]);
        assert_eq!(froms(&index, "util"), vec!["/src"]);
        assert_eq!(froms(&index, "api"), vec!["/src"]);
    }

    #[test]
    fn test_reexport_cycles_terminate() {
        let index = index_of(&[
            ("/src/a.ts", "export * from './b';\nexport const a = 1;"),
            ("/src/b.ts", "export * from './a';\nexport const b = 1;"),
        ]);
        let mut a = froms(&index, "a");
        a.sort();
        assert_eq!(a, vec!["/src/a", "/src/b"]);
    }

    #[test]
    fn test_update_purges_stale_entries() {
        let mut index = index_of(&[("/src/a.ts", "export class Old {}\nexport class Kept {}")]);
        let generation = index.generation();

        let updated = extract("export class Kept {}\nexport class New {}");
        index.update("/src/a.ts", &updated);

        assert!(index.get("Old").is_empty());
        assert_eq!(froms(&index, "Kept"), vec!["/src/a"]);
        assert_eq!(froms(&index, "New"), vec!["/src/a"]);
        assert!(index.generation() > generation);
        for name in index.names() {
            for info in index.get(name) {
                if info.file == "/src/a.ts" {
                    assert!(updated.declares(&info.declaration.name));
                }
            }
        }
    }

    #[test]
    fn test_update_recommits_reexporting_modules() {
        let mut index = index_of(&[
            ("/src/index.ts", "export * from './a';"),
            ("/src/a.ts", "export class First {}"),
        ]);
        assert_eq!(index.get("First").len(), 2);

        index.update("/src/a.ts", &extract("export class Second {}"));
        assert!(index.get("First").is_empty());
        let mut second = froms(&index, "Second");
        second.sort();
        assert_eq!(second, vec!["/src", "/src/a"]);
    }

    #[test]
    fn test_remove_drops_file_and_reexports() {
        let mut index = index_of(&[
            ("/src/index.ts", "export * from './a';"),
            ("/src/a.ts", "export class First {}"),
        ]);
        assert!(index.remove("/src/a.ts"));
        assert!(index.get("First").is_empty());
        assert!(!index.remove("/src/a.ts"));
        assert_eq!(index.all_paths(), vec!["/src/index.ts"]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let index = index_of(&[
            ("/src/a.ts", "export class A {}"),
            ("/src/b.ts", "export const b = 1;"),
        ]);
        let snapshot = index.snapshot();
        assert_eq!(snapshot[0].index, "A");

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"index\":\"A\""));
        let restored = DeclarationIndex::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.all_paths(), vec!["/src/a.ts", "/src/b.ts"]);

        let mut restored = restored;
        restored.remove("/src/a.ts");
        assert!(restored.get("A").is_empty());
    }
}
