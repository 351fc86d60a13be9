//! Class extraction
//!
//! This module handles extraction of class declarations including abstract classes,
//! their properties, methods and constructor parameter properties.

use super::functions::extract_parameters;
use super::helpers::{self, has_modifier};
use super::{DeclarationContext, TypeScriptExtractor};
use crate::resources::{
    ClassDeclaration, Declaration, DeclarationKind, MemberKind, MethodDeclaration,
    PropertyDeclaration,
};
use tree_sitter::Node;

/// Extract a class declaration (or a default exported class expression)
pub(super) fn extract_class(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    let name = node
        .child_by_field_name("name")
        .map(|n| extractor.base().get_node_text(&n))
        .unwrap_or_else(|| "default".to_string());

    let mut class = ClassDeclaration {
        is_abstract: node.kind() == "abstract_class_declaration" || has_modifier(node, "abstract"),
        ..Default::default()
    };
    if let Some(body) = node.child_by_field_name("body") {
        extract_members(extractor, body, &mut class);
    }

    let mut declaration = Declaration::new(
        name,
        node.start_byte(),
        node.end_byte(),
        DeclarationKind::Class(class),
    );
    declaration.is_exported = context.is_exported;
    declaration.is_default = context.is_default;
    extractor.current().resource.declarations.push(declaration);
}

fn extract_members(extractor: &TypeScriptExtractor, body: Node, class: &mut ClassDeclaration) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "public_field_definition" => {
                if let Some(property) = extract_property(extractor, member) {
                    class.properties.push(property);
                }
            }
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                let Some(method) = extract_method(extractor, member) else {
                    continue;
                };
                if method.kind == MemberKind::Constructor {
                    class
                        .properties
                        .extend(parameter_properties(extractor, member));
                }
                // Overload signatures are replaced by the implementation that follows them
                match class
                    .methods
                    .iter_mut()
                    .find(|m| m.name == method.name && m.kind == method.kind)
                {
                    Some(existing) => *existing = method,
                    None => class.methods.push(method),
                }
            }
            _ => {}
        }
    }
}

/// Extract a class property or an interface property signature
pub(super) fn extract_property(
    extractor: &TypeScriptExtractor,
    node: Node,
) -> Option<PropertyDeclaration> {
    let name = extractor.base().get_field_text(&node, "name")?;
    Some(PropertyDeclaration {
        name,
        visibility: helpers::visibility(extractor.base(), node),
        type_annotation: extractor.base().get_type_annotation(&node, "type"),
        is_static: has_modifier(node, "static"),
        is_readonly: has_modifier(node, "readonly"),
        is_optional: has_modifier(node, "?"),
        start: node.start_byte(),
        end: node.end_byte(),
    })
}

/// Extract a method definition or signature (classes and interfaces)
pub(super) fn extract_method(
    extractor: &TypeScriptExtractor,
    node: Node,
) -> Option<MethodDeclaration> {
    let name = extractor.base().get_field_text(&node, "name")?;
    let kind = if name == "constructor" {
        MemberKind::Constructor
    } else if has_modifier(node, "get") {
        MemberKind::Getter
    } else if has_modifier(node, "set") {
        MemberKind::Setter
    } else {
        MemberKind::Method
    };
    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(extractor, params))
        .unwrap_or_default();

    Some(MethodDeclaration {
        name,
        kind,
        visibility: helpers::visibility(extractor.base(), node),
        parameters,
        return_type: extractor.base().get_type_annotation(&node, "return_type"),
        is_abstract: node.kind() == "abstract_method_signature" || has_modifier(node, "abstract"),
        is_static: has_modifier(node, "static"),
        is_async: has_modifier(node, "async"),
        is_optional: has_modifier(node, "?"),
        start: node.start_byte(),
        end: node.end_byte(),
    })
}

/// `constructor(private readonly a: A)` declares the property `a`
fn parameter_properties(extractor: &TypeScriptExtractor, constructor: Node) -> Vec<PropertyDeclaration> {
    let Some(params) = constructor.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut properties = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
            continue;
        }
        let visibility = helpers::visibility(extractor.base(), param);
        let is_readonly = has_modifier(param, "readonly");
        if visibility.is_none() && !is_readonly {
            continue;
        }
        let Some(pattern) = param.child_by_field_name("pattern") else {
            continue;
        };
        properties.push(PropertyDeclaration {
            name: extractor.base().get_node_text(&pattern),
            visibility,
            type_annotation: extractor.base().get_type_annotation(&param, "type"),
            is_static: false,
            is_readonly,
            is_optional: param.kind() == "optional_parameter",
            start: param.start_byte(),
            end: param.end_byte(),
        });
    }
    properties
}
