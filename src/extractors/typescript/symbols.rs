//! Core traversal logic
//!
//! This module handles the depth-first walk and routes node kinds to the
//! specialized extraction modules.

use super::helpers::{self, DECLARATION_KINDS};
use super::{
    classes, functions, identifiers, imports_exports, interfaces, scopes, DeclarationContext,
    TypeScriptExtractor,
};
use tree_sitter::Node;

/// Visit every child of `node`
pub(super) fn visit_children(extractor: &mut TypeScriptExtractor, node: Node) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_node(extractor, child);
    }
}

/// Recursively visit nodes and route them based on node kind
pub(super) fn visit_node(extractor: &mut TypeScriptExtractor, node: Node) {
    match node.kind() {
        "import_statement" => imports_exports::extract_import(extractor, node),
        "export_statement" => imports_exports::extract_export(extractor, node),
        "ambient_declaration" => {
            let context = DeclarationContext {
                is_ambient: true,
                ..Default::default()
            };
            visit_ambient(extractor, node, context);
        }
        kind if DECLARATION_KINDS.contains(&kind) => {
            let context = DeclarationContext {
                is_ambient: extractor.in_ambient_scope(),
                ..Default::default()
            };
            visit_declaration(extractor, node, context);
        }
        // `Ns.Type`: only the namespace root can refer to something outside
        "nested_type_identifier" => {
            if let Some(module) = node.child_by_field_name("module") {
                visit_node(extractor, module);
            }
        }
        // Same name as the opening element
        "jsx_closing_element" => {}
        _ => {
            identifiers::record_and_descend(extractor, node);
        }
    }
}

/// Visit a declaration statement, extracting it when it belongs to the current scope
pub(super) fn visit_declaration(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    if node.kind() == "ambient_declaration" {
        visit_ambient(extractor, node, context);
        return;
    }
    if matches!(node.kind(), "internal_module" | "module") {
        scopes::extract_module_block(extractor, node, context);
        return;
    }

    if helpers::is_scope_level(node) {
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" => {
                classes::extract_class(extractor, node, context)
            }
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                functions::extract_function(extractor, node, context)
            }
            "lexical_declaration" | "variable_declaration" => {
                functions::extract_variables(extractor, node, context)
            }
            "interface_declaration" => interfaces::extract_interface(extractor, node, context),
            "type_alias_declaration" => interfaces::extract_type_alias(extractor, node, context),
            "enum_declaration" => interfaces::extract_enum(extractor, node, context),
            _ => {}
        }
    }

    identifiers::record_and_descend(extractor, node);
}

/// `declare ...`: the wrapped declaration, or a `declare global { }` block
fn visit_ambient(extractor: &mut TypeScriptExtractor, node: Node, context: DeclarationContext) {
    let context = DeclarationContext {
        is_ambient: true,
        ..context
    };
    if helpers::has_modifier(node, "global") {
        if let Some(body) = extractor.base().find_child_by_type(&node, "statement_block") {
            scopes::extract_global_block(extractor, node, body);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if DECLARATION_KINDS.contains(&child.kind()) {
            visit_declaration(extractor, child, context);
        } else {
            visit_node(extractor, child);
        }
    }
}
