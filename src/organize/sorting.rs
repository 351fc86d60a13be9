// Ordering of imports inside a group and of specifiers inside a named import

use crate::config::ImportGroupOrder;
use crate::resources::{Import, NamedImport, SymbolSpecifier};
use std::cmp::Ordering;

/// Semantic buckets: side effect imports, packages, then relative paths
fn semantic_bucket(import: &Import) -> u8 {
    if import.is_string_import() {
        0
    } else if import.library_name().starts_with('.') {
        2
    } else {
        1
    }
}

pub fn sort_imports(imports: &mut [Import], order: ImportGroupOrder) {
    match order {
        ImportGroupOrder::Asc => imports.sort_by(|a, b| a.library_name().cmp(b.library_name())),
        ImportGroupOrder::Desc => imports.sort_by(|a, b| b.library_name().cmp(a.library_name())),
        ImportGroupOrder::Semantic => imports.sort_by(|a, b| {
            semantic_bucket(a)
                .cmp(&semantic_bucket(b))
                .then_with(|| a.library_name().cmp(b.library_name()))
        }),
    }
}

/// Specifiers sort by imported name ignoring case, exact name breaking ties
fn compare_specifiers(a: &SymbolSpecifier, b: &SymbolSpecifier) -> Ordering {
    a.specifier
        .to_lowercase()
        .cmp(&b.specifier.to_lowercase())
        .then_with(|| a.specifier.cmp(&b.specifier))
        .then_with(|| a.alias.cmp(&b.alias))
}

pub fn sort_specifiers(import: &mut NamedImport) {
    import.specifiers.sort_by(compare_specifiers);
}
