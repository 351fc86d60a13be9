//! Import and export statement extraction
//!
//! This module handles extraction of import statements, re-exports, `export =`,
//! and the export marking of local declarations.

use super::helpers::has_modifier;
use super::{classes, functions, identifiers, symbols, DeclarationContext, TypeScriptExtractor};
use crate::resources::{
    Export, ExternalModuleImport, Import, NamedImport, NamespaceImport, StringImport,
    SymbolSpecifier,
};
use tree_sitter::Node;

/// Extract an import statement
///
/// Imported names are neither bindings nor usages of the scope; the resolver and the
/// import organizer compare them with the usages directly.
pub(super) fn extract_import(extractor: &mut TypeScriptExtractor, node: Node) {
    let base = extractor.base();
    let (start, end) = (node.start_byte(), node.end_byte());
    let mut imports = Vec::new();

    if let Some(clause) = base.find_child_by_type(&node, "import_require_clause") {
        let alias = base.find_child_by_type(&clause, "identifier");
        let source = clause.child_by_field_name("source");
        if let (Some(alias), Some(source)) = (alias, source) {
            imports.push(Import::ExternalModule(ExternalModuleImport::new(
                base.get_string_value(&source),
                base.get_node_text(&alias),
            )));
        }
    } else if let Some(clause) = base.find_child_by_type(&node, "import_clause") {
        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let library = base.get_string_value(&source);
        let mut named = NamedImport::new(library.clone());
        named.is_type_only = has_modifier(node, "type");
        let mut namespace_alias = None;

        let mut cursor = clause.walk();
        for child in clause.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => named.default_alias = Some(base.get_node_text(&child)),
                "namespace_import" => {
                    namespace_alias = base
                        .find_child_by_type(&child, "identifier")
                        .map(|alias| base.get_node_text(&alias));
                }
                "named_imports" => {
                    let mut specifiers = child.walk();
                    for specifier in child.named_children(&mut specifiers) {
                        if specifier.kind() != "import_specifier" {
                            continue;
                        }
                        let Some(name) = specifier.child_by_field_name("name") else {
                            continue;
                        };
                        let name = base.get_string_value(&name);
                        let alias = specifier
                            .child_by_field_name("alias")
                            .map(|alias| base.get_node_text(&alias));
                        named.add_specifier(SymbolSpecifier {
                            specifier: name,
                            alias,
                        });
                    }
                }
                _ => {}
            }
        }

        match namespace_alias {
            Some(alias) => {
                // `import D, * as ns from 'x'` splits into two imports
                if named.default_alias.is_some() {
                    imports.push(Import::Named(named));
                }
                imports.push(Import::Namespace(NamespaceImport::new(library, alias)));
            }
            None => imports.push(Import::Named(named)),
        }
    } else if let Some(source) = node.child_by_field_name("source") {
        imports.push(Import::String(StringImport::new(
            base.get_string_value(&source),
        )));
    }

    let scope = extractor.current();
    scope
        .resource
        .imports
        .extend(imports.into_iter().map(|import| import.with_range(start, end)));
}

/// Extract an export statement
pub(super) fn extract_export(extractor: &mut TypeScriptExtractor, node: Node) {
    let is_default = has_modifier(node, "default");
    let context = DeclarationContext {
        is_exported: true,
        is_default,
        is_ambient: extractor.in_ambient_scope(),
    };

    // Decorators written before `export` belong to the statement
    for decorator in extractor.base().find_children_by_type(&node, "decorator") {
        symbols::visit_node(extractor, decorator);
    }

    // export class/function/const/namespace/declare ...
    if let Some(declaration) = node.child_by_field_name("declaration") {
        symbols::visit_declaration(extractor, declaration, context);
        return;
    }

    // export default <expression>
    if let Some(value) = node.child_by_field_name("value") {
        extract_default_value(extractor, value, context);
        symbols::visit_node(extractor, value);
        return;
    }

    // export import A = B.C / export as namespace X
    if has_modifier(node, "import") || has_modifier(node, "namespace") {
        symbols::visit_children(extractor, node);
        return;
    }

    let (start, end) = (node.start_byte(), node.end_byte());

    // export = name
    if has_modifier(node, "=") {
        let Some(value) = node.named_children(&mut node.walk()).next() else {
            return;
        };
        let name = extractor.base().get_node_text(&value);
        let root = name.split('.').next().unwrap_or(&name).trim().to_string();
        let scope = extractor.current();
        scope.default_exports.push(root);
        scope.resource.exports.push(Export::Assigned { name, start, end });
        symbols::visit_node(extractor, value);
        return;
    }

    let clause = extractor.base().find_child_by_type(&node, "export_clause");
    let Some(source) = node.child_by_field_name("source") else {
        // export { a, b as c }
        if let Some(clause) = clause {
            extract_local_export_clause(extractor, clause);
        }
        return;
    };

    let library = extractor.base().get_string_value(&source);
    let export = if let Some(namespace) =
        extractor.base().find_child_by_type(&node, "namespace_export")
    {
        let alias = namespace
            .named_children(&mut namespace.walk())
            .last()
            .map(|alias| extractor.base().get_string_value(&alias))
            .unwrap_or_default();
        Export::AllAs {
            library,
            alias,
            start,
            end,
        }
    } else if let Some(clause) = clause {
        Export::Named {
            library,
            specifiers: export_specifiers(extractor, clause),
            start,
            end,
        }
    } else {
        Export::All {
            library,
            start,
            end,
        }
    };
    extractor.current().resource.exports.push(export);
}

/// `export default` of an expression: anonymous classes and functions are declarations
fn extract_default_value(
    extractor: &mut TypeScriptExtractor,
    value: Node,
    context: DeclarationContext,
) {
    match value.kind() {
        "identifier" => {
            let name = extractor.base().get_node_text(&value);
            extractor.current().default_exports.push(name);
        }
        "class" => classes::extract_class(extractor, value, context),
        "function" | "function_expression" | "arrow_function" | "generator_function" => {
            functions::extract_function(extractor, value, context)
        }
        _ => {}
    }
}

fn export_specifiers(extractor: &TypeScriptExtractor, clause: Node) -> Vec<SymbolSpecifier> {
    let base = extractor.base();
    let mut specifiers = Vec::new();
    let mut cursor = clause.walk();
    for specifier in clause.named_children(&mut cursor) {
        if specifier.kind() != "export_specifier" {
            continue;
        }
        let Some(name) = specifier.child_by_field_name("name") else {
            continue;
        };
        specifiers.push(SymbolSpecifier {
            specifier: base.get_string_value(&name),
            alias: specifier
                .child_by_field_name("alias")
                .map(|alias| base.get_string_value(&alias)),
        });
    }
    specifiers
}

/// Local names listed in `export { ... }` are exported and count as used
fn extract_local_export_clause(extractor: &mut TypeScriptExtractor, clause: Node) {
    let mut cursor = clause.walk();
    for specifier in clause.named_children(&mut cursor) {
        if specifier.kind() != "export_specifier" {
            continue;
        }
        let Some(name) = specifier.child_by_field_name("name") else {
            continue;
        };
        let alias = specifier
            .child_by_field_name("alias")
            .map(|alias| extractor.base().get_string_value(&alias));
        let local = extractor.base().get_node_text(&name);
        identifiers::add_candidate(extractor, name);
        extractor.current().local_exports.push((local, alias));
    }
}
