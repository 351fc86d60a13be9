//! Interface, type alias and enum extraction

use super::classes::{extract_method, extract_property};
use super::helpers::has_modifier;
use super::{DeclarationContext, TypeScriptExtractor};
use crate::resources::{
    Declaration, DeclarationKind, EnumDeclaration, InterfaceDeclaration,
};
use tree_sitter::Node;

fn push_declaration(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
    kind: DeclarationKind,
) {
    let Some(name) = extractor.base().get_field_text(&node, "name") else {
        return;
    };
    let mut declaration = Declaration::new(name, node.start_byte(), node.end_byte(), kind);
    declaration.is_exported = context.is_exported;
    declaration.is_default = context.is_default;
    extractor.current().resource.declarations.push(declaration);
}

/// Extract an interface declaration
pub(super) fn extract_interface(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    let mut interface = InterfaceDeclaration::default();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "property_signature" => {
                    if let Some(property) = extract_property(extractor, member) {
                        interface.properties.push(property);
                    }
                }
                "method_signature" => {
                    if let Some(method) = extract_method(extractor, member) {
                        interface.methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }
    push_declaration(
        extractor,
        node,
        context,
        DeclarationKind::Interface(interface),
    );
}

/// Extract a type alias declaration
pub(super) fn extract_type_alias(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    push_declaration(extractor, node, context, DeclarationKind::TypeAlias);
}

/// Extract an enum declaration (`const enum` included)
pub(super) fn extract_enum(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    let mut members = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            let name_node = match member.kind() {
                "enum_assignment" => member.child_by_field_name("name"),
                "property_identifier" | "string" => Some(member),
                _ => None,
            };
            if let Some(name_node) = name_node {
                members.push(extractor.base().get_string_value(&name_node));
            }
        }
    }

    let enumeration = EnumDeclaration {
        is_const: has_modifier(node, "const"),
        members,
    };
    push_declaration(extractor, node, context, DeclarationKind::Enum(enumeration));
}
