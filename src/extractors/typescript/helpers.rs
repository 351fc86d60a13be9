//! Helper functions for TypeScript extractor
//!
//! This module provides utility functions for tree traversal, node inspection,
//! and common extraction patterns used across other modules.

use crate::extractors::base::BaseExtractor;
use crate::resources::Visibility;
use tree_sitter::Node;

/// Node kinds that can produce a declaration of the enclosing resource
pub(super) const DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "function_declaration",
    "generator_function_declaration",
    "function_signature",
    "lexical_declaration",
    "variable_declaration",
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
    "internal_module",
    "module",
];

/// Check if a node has a modifier child of the given kind
///
/// Useful for checking for 'async', 'static', 'abstract', etc.
pub(super) fn has_modifier(node: Node, modifier_kind: &str) -> bool {
    node.children(&mut node.walk())
        .any(|child| child.kind() == modifier_kind)
}

/// Visibility from an `accessibility_modifier` child
pub(super) fn visibility(base: &BaseExtractor, node: Node) -> Option<Visibility> {
    base.find_child_by_type(&node, "accessibility_modifier")
        .and_then(|modifier| Visibility::from_keyword(base.get_node_text(&modifier).trim()))
}

/// Whether the statement sits directly in a file, namespace or module body.
///
/// Declarations nested in function bodies or blocks only bind names; they never
/// become declarations of the resource.
pub(super) fn is_scope_level(node: Node) -> bool {
    let mut parent = node.parent();
    while let Some(p) = parent {
        match p.kind() {
            "export_statement" | "ambient_declaration" | "expression_statement" => {
                parent = p.parent()
            }
            _ => break,
        }
    }

    match parent {
        Some(p) if p.kind() == "program" => true,
        Some(p) if p.kind() == "statement_block" => p.parent().is_some_and(|owner| {
            matches!(
                owner.kind(),
                "internal_module" | "module" | "ambient_declaration"
            )
        }),
        _ => false,
    }
}

/// Names bound by a binding pattern (identifier, destructuring, rest, default)
pub(super) fn collect_pattern_names(base: &BaseExtractor, node: Node, names: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            names.push(base.get_node_text(&node))
        }
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_pattern_names(base, value, names);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_pattern_names(base, left, names);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_pattern_names(base, child, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_pattern_names() {
        let source = "const { a, b: [c, ...d], e = 1 } = value;";
        let tree = parse(source);
        let base = BaseExtractor::new("typescript".into(), "a.ts".into(), source.into());
        let declaration = tree.root_node().named_child(0).unwrap();
        let declarator = base
            .find_child_by_type(&declaration, "variable_declarator")
            .unwrap();
        let mut names = Vec::new();
        collect_pattern_names(
            &base,
            declarator.child_by_field_name("name").unwrap(),
            &mut names,
        );
        assert_eq!(names, vec!["a", "c", "d", "e"]);
    }

    #[test]
    fn test_scope_level() {
        let tree = parse("export function a() { function b() {} }");
        let export = tree.root_node().named_child(0).unwrap();
        let a = export.child_by_field_name("declaration").unwrap();
        assert!(is_scope_level(a));
        let body = a.child_by_field_name("body").unwrap();
        let b = body.named_child(0).unwrap();
        assert!(!is_scope_level(b));
    }
}
