//! Identifier extraction (usage candidates and local bindings)
//!
//! Every referenced identifier becomes a usage candidate of the innermost binding
//! frame. Parameters, locals and type parameters bind in the frame of the function,
//! block or declaration that owns them; declarations bind in the frame around them.
//! Candidates a frame does not bind move outwards when the frame closes, and the
//! remaining ones are filtered against the enclosing scopes when the scope finishes.

use super::helpers::collect_pattern_names;
use super::{symbols, TypeScriptExtractor};
use tree_sitter::Node;

/// Record `node`, then visit its children inside the node's own frame, if it opens one
pub(super) fn record_and_descend(extractor: &mut TypeScriptExtractor, node: Node) {
    record_node(extractor, node);
    let Some(is_function) = opens_frame(node.kind()) else {
        symbols::visit_children(extractor, node);
        return;
    };

    extractor.current().open_frame(is_function);
    bind_frame_owned(extractor, node);
    symbols::visit_children(extractor, node);
    extractor.current().close_frame();
}

/// Whether a node kind opens a binding frame, and if so whether it is a function frame
fn opens_frame(kind: &str) -> Option<bool> {
    match kind {
        "function_declaration"
        | "generator_function_declaration"
        | "function"
        | "function_expression"
        | "generator_function"
        | "arrow_function"
        | "method_definition" => Some(true),
        "statement_block"
        | "catch_clause"
        | "for_statement"
        | "for_in_statement"
        | "class_declaration"
        | "abstract_class_declaration"
        | "class"
        | "interface_declaration"
        | "type_alias_declaration"
        | "function_signature"
        | "method_signature"
        | "abstract_method_signature"
        | "call_signature"
        | "construct_signature"
        | "function_type"
        | "constructor_type" => Some(false),
        _ => None,
    }
}

/// Names owned by the frame `node` just opened
fn bind_frame_owned(extractor: &mut TypeScriptExtractor, node: Node) {
    match node.kind() {
        "arrow_function" => bind_field_pattern(extractor, node, "parameter"),
        "catch_clause" => bind_field_pattern(extractor, node, "parameter"),
        "for_in_statement" => {
            if node.child_by_field_name("kind").is_some() {
                bind_field_pattern(extractor, node, "left");
            }
        }
        // A function or class expression name is only visible inside it
        "function" | "function_expression" | "generator_function" | "class" => {
            bind_field_name(extractor, node, "name")
        }
        _ => {}
    }
}

/// Record the bindings and usage candidates contributed by a single node
fn record_node(extractor: &mut TypeScriptExtractor, node: Node) {
    match node.kind() {
        "identifier" => {
            if !is_intrinsic_jsx_element(extractor, node) {
                add_candidate(extractor, node);
            }
        }
        "type_identifier" | "shorthand_property_identifier" => add_candidate(extractor, node),

        "required_parameter" | "optional_parameter" => {
            bind_field_pattern(extractor, node, "pattern");
        }
        // Plain JavaScript parameters sit directly in the parameter list
        "formal_parameters" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if matches!(
                    child.kind(),
                    "identifier"
                        | "assignment_pattern"
                        | "object_pattern"
                        | "array_pattern"
                        | "rest_pattern"
                ) {
                    bind_pattern(extractor, child);
                }
            }
        }
        "variable_declarator" => {
            let is_var = node
                .parent()
                .is_some_and(|parent| parent.kind() == "variable_declaration");
            if let Some(pattern) = node.child_by_field_name("name") {
                let mut names = Vec::new();
                collect_pattern_names(extractor.base(), pattern, &mut names);
                let scope = extractor.current();
                for name in names {
                    if is_var {
                        scope.bind_hoisted(name);
                    } else {
                        scope.bind(name);
                    }
                }
            }
        }
        "type_parameter" | "mapped_type_clause" => bind_field_name(extractor, node, "name"),
        "infer_type" => {
            if let Some(name) = extractor.base().find_child_by_type(&node, "type_identifier") {
                bind(extractor, &name);
            }
        }
        "class_declaration"
        | "abstract_class_declaration"
        | "function_declaration"
        | "generator_function_declaration"
        | "function_signature"
        | "interface_declaration"
        | "type_alias_declaration"
        | "enum_declaration" => bind_field_name(extractor, node, "name"),
        "import_alias" => {
            if let Some(name) = extractor.base().find_child_by_type(&node, "identifier") {
                bind(extractor, &name);
            }
        }
        _ => {}
    }
}

/// Add the text of `node` as a usage candidate of the current scope
pub(super) fn add_candidate(extractor: &mut TypeScriptExtractor, node: Node) {
    let name = extractor.base().get_node_text(&node);
    if !name.is_empty() {
        extractor.current().add_candidate(name);
    }
}

fn bind(extractor: &mut TypeScriptExtractor, node: &Node) {
    let name = extractor.base().get_node_text(node);
    extractor.current().bind(name);
}

fn bind_field_name(extractor: &mut TypeScriptExtractor, node: Node, field: &str) {
    if let Some(name) = node.child_by_field_name(field) {
        bind(extractor, &name);
    }
}

fn bind_field_pattern(extractor: &mut TypeScriptExtractor, node: Node, field: &str) {
    if let Some(pattern) = node.child_by_field_name(field) {
        bind_pattern(extractor, pattern);
    }
}

fn bind_pattern(extractor: &mut TypeScriptExtractor, pattern: Node) {
    let mut names = Vec::new();
    collect_pattern_names(extractor.base(), pattern, &mut names);
    let scope = extractor.current();
    for name in names {
        scope.bind(name);
    }
}

/// `<div>` and friends name DOM elements, not identifiers in scope
fn is_intrinsic_jsx_element(extractor: &TypeScriptExtractor, node: Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if !matches!(
        parent.kind(),
        "jsx_opening_element" | "jsx_self_closing_element"
    ) {
        return false;
    }
    let is_name = parent
        .child_by_field_name("name")
        .is_some_and(|name| name.id() == node.id());
    is_name
        && extractor
            .base()
            .get_node_text(&node)
            .starts_with(|c: char| c.is_ascii_lowercase())
}
