//! Function, parameter and variable extraction
//!
//! This module handles function declarations and signatures, default exported
//! function expressions and `const`/`let`/`var` statements.

use super::helpers::{collect_pattern_names, has_modifier};
use super::{DeclarationContext, TypeScriptExtractor};
use crate::resources::{
    Declaration, DeclarationKind, FunctionDeclaration, ParameterDeclaration, VariableDeclaration,
};
use tree_sitter::Node;

/// Extract a function declaration, signature or function expression
pub(super) fn extract_function(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    let name = node
        .child_by_field_name("name")
        .map(|n| extractor.base().get_node_text(&n))
        .unwrap_or_else(|| "default".to_string());

    // Overloads: keep the first signature only
    let already_declared = extractor
        .current()
        .resource
        .declarations
        .iter()
        .any(|d| d.name == name && matches!(d.kind, DeclarationKind::Function(_)));
    if already_declared && name != "default" {
        return;
    }

    let parameters = if let Some(params) = node.child_by_field_name("parameters") {
        extract_parameters(extractor, params)
    } else if let Some(param) = node.child_by_field_name("parameter") {
        vec![ParameterDeclaration {
            name: extractor.base().get_node_text(&param),
            type_annotation: None,
            is_optional: false,
            is_rest: false,
        }]
    } else {
        Vec::new()
    };

    let function = FunctionDeclaration {
        is_async: has_modifier(node, "async"),
        parameters,
        return_type: extractor.base().get_type_annotation(&node, "return_type"),
    };
    let mut declaration = Declaration::new(
        name,
        node.start_byte(),
        node.end_byte(),
        DeclarationKind::Function(function),
    );
    declaration.is_exported = context.is_exported;
    declaration.is_default = context.is_default;
    extractor.current().resource.declarations.push(declaration);
}

/// Extract the parameters of a `formal_parameters` node
pub(super) fn extract_parameters(
    extractor: &TypeScriptExtractor,
    params: Node,
) -> Vec<ParameterDeclaration> {
    let base = extractor.base();
    let mut parameters = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let (pattern, type_annotation, is_optional) = match param.kind() {
            "required_parameter" | "optional_parameter" => {
                let Some(pattern) = param.child_by_field_name("pattern") else {
                    continue;
                };
                (
                    pattern,
                    base.get_type_annotation(&param, "type"),
                    param.kind() == "optional_parameter",
                )
            }
            "identifier" | "object_pattern" | "array_pattern" | "rest_pattern" => {
                (param, None, false)
            }
            "assignment_pattern" => match param.child_by_field_name("left") {
                Some(left) => (left, None, false),
                None => continue,
            },
            _ => continue,
        };

        // `this: Window` only types the receiver
        if pattern.kind() == "this" {
            continue;
        }
        let is_rest = pattern.kind() == "rest_pattern";
        let name = if is_rest {
            pattern
                .named_child(0)
                .map(|inner| base.get_node_text(&inner))
                .unwrap_or_default()
        } else {
            base.get_node_text(&pattern)
        };
        parameters.push(ParameterDeclaration {
            name,
            type_annotation,
            is_optional,
            is_rest,
        });
    }
    parameters
}

/// Extract `const`/`let`/`var` statements, one declaration per declared name
pub(super) fn extract_variables(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    let is_const = extractor
        .base()
        .get_field_text(&node, "kind")
        .is_some_and(|kind| kind == "const");

    let mut declarations = Vec::new();
    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };

        let (names, type_annotation) = if name_node.kind() == "identifier" {
            (
                vec![extractor.base().get_node_text(&name_node)],
                extractor.base().get_type_annotation(&declarator, "type"),
            )
        } else {
            let mut names = Vec::new();
            collect_pattern_names(extractor.base(), name_node, &mut names);
            (names, None)
        };

        for name in names {
            let mut declaration = Declaration::new(
                name,
                declarator.start_byte(),
                declarator.end_byte(),
                DeclarationKind::Variable(VariableDeclaration {
                    is_const,
                    type_annotation: type_annotation.clone(),
                }),
            );
            declaration.is_exported = context.is_exported;
            declarations.push(declaration);
        }
    }
    extractor
        .current()
        .resource
        .declarations
        .extend(declarations);
}
