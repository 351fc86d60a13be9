//! Scope stack handling
//!
//! A scope stays "pending" until the whole file is walked. Usage filtering needs the
//! bindings of every enclosing scope, and declarations are hoisted, so a name declared
//! after its first use must still hide that use.
//!
//! Inside a scope, functions, blocks, catch clauses and generic declarations open
//! binding frames. A frame filters its own candidates against its own bindings when
//! it closes and hands the rest to the enclosing frame, so a local only hides the
//! uses it can actually reach.

use super::{symbols, DeclarationContext, TypeScriptExtractor};
use crate::resources::{
    Declaration, DeclarationKind, ModuleDeclaration, ModuleKind, Resource, ResourceScope,
};
use std::collections::HashSet;
use tree_sitter::Node;

/// Names bound by a function, block or generic declaration
#[derive(Debug, Default)]
struct BindingFrame {
    bindings: HashSet<String>,
    candidates: Vec<String>,
    /// `var` declarations hoist to the nearest function frame
    is_function: bool,
}

pub(crate) struct PendingScope {
    pub resource: Resource,
    pub children: Vec<PendingScope>,
    /// Names bound directly in this scope (declarations and scope level variables)
    pub bindings: HashSet<String>,
    /// Identifiers referenced inside this scope, in first-seen order
    pub candidates: Vec<String>,
    /// `export { a, b as c }` entries, applied once all declarations are known
    pub local_exports: Vec<(String, Option<String>)>,
    /// `export default name` / `export = name`
    pub default_exports: Vec<String>,
    /// Open binding frames, innermost last
    frames: Vec<BindingFrame>,
}

impl PendingScope {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            children: Vec::new(),
            bindings: HashSet::new(),
            candidates: Vec::new(),
            local_exports: Vec::new(),
            default_exports: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Bind `name` in the innermost open frame, or in the scope itself
    pub fn bind(&mut self, name: String) {
        match self.frames.last_mut() {
            Some(frame) => frame.bindings.insert(name),
            None => self.bindings.insert(name),
        };
    }

    /// Bind a `var` name in the nearest function frame, or in the scope itself
    pub fn bind_hoisted(&mut self, name: String) {
        match self.frames.iter_mut().rev().find(|frame| frame.is_function) {
            Some(frame) => frame.bindings.insert(name),
            None => self.bindings.insert(name),
        };
    }

    pub fn add_candidate(&mut self, name: String) {
        match self.frames.last_mut() {
            Some(frame) => frame.candidates.push(name),
            None => self.candidates.push(name),
        }
    }

    pub fn open_frame(&mut self, is_function: bool) {
        self.frames.push(BindingFrame {
            is_function,
            ..Default::default()
        });
    }

    /// Close the innermost frame; candidates it does not bind move to the enclosing one
    pub fn close_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let escaped = frame
            .candidates
            .into_iter()
            .filter(|name| !frame.bindings.contains(name));
        match self.frames.last_mut() {
            Some(parent) => parent.candidates.extend(escaped),
            None => self.candidates.extend(escaped),
        }
    }

    /// Turn the pending tree into resources, dropping usages bound by this scope or
    /// any of `outer`.
    pub fn finish(mut self, outer: &[&HashSet<String>]) -> Resource {
        while !self.frames.is_empty() {
            self.close_frame();
        }
        let PendingScope {
            mut resource,
            mut children,
            bindings,
            candidates,
            local_exports,
            default_exports,
            ..
        } = self;

        for (name, alias) in &local_exports {
            let is_default = alias.as_deref() == Some("default");
            mark_exported(&mut resource, name, is_default);
            for child in children.iter_mut() {
                if child.resource.name() == Some(name.as_str()) {
                    child.resource.is_exported = true;
                }
            }
        }
        for name in &default_exports {
            mark_exported(&mut resource, name, true);
        }

        let mut chain: Vec<&HashSet<String>> = outer.to_vec();
        chain.push(&bindings);

        let mut seen = HashSet::new();
        resource.usages = candidates
            .into_iter()
            .filter(|name| !chain.iter().any(|scope| scope.contains(name)))
            .filter(|name| seen.insert(name.clone()))
            .collect();

        resource.resources = children
            .into_iter()
            .map(|child| child.finish(&chain))
            .collect();
        resource
    }
}

fn mark_exported(resource: &mut Resource, name: &str, is_default: bool) {
    for declaration in resource.declarations.iter_mut().filter(|d| d.name == name) {
        declaration.is_exported = true;
        declaration.is_default |= is_default;
    }
}

/// `namespace A {}`, `module A {}` and `declare module 'a' {}`
pub(super) fn extract_module_block(
    extractor: &mut TypeScriptExtractor,
    node: Node,
    context: DeclarationContext,
) {
    let kind = if node.kind() == "internal_module" {
        ModuleKind::Namespace
    } else {
        ModuleKind::Module
    };
    let name = node
        .child_by_field_name("name")
        .map(|n| extractor.base().get_node_text(&n))
        .unwrap_or_default();
    let is_ambient = context.is_ambient || extractor.in_ambient_scope();
    let is_string_named = name.starts_with('\'') || name.starts_with('"');

    if !is_string_named && !name.is_empty() {
        let root_name = name.split('.').next().unwrap_or(&name).to_string();
        let mut declaration = Declaration::new(
            name.clone(),
            node.start_byte(),
            node.end_byte(),
            DeclarationKind::Module(ModuleDeclaration { kind, is_ambient }),
        );
        declaration.is_exported = context.is_exported;
        declaration.is_default = context.is_default;
        let scope = extractor.current();
        scope.bind(root_name);
        scope.resource.declarations.push(declaration);
    }

    let scope = match kind {
        ModuleKind::Namespace => ResourceScope::Namespace { name },
        ModuleKind::Module => ResourceScope::Module { name },
    };
    let mut resource = Resource::with_scope(scope, Some(node.start_byte()), Some(node.end_byte()));
    resource.is_exported = context.is_exported;
    resource.is_ambient = is_ambient;

    let body = node
        .child_by_field_name("body")
        .or_else(|| extractor.base().find_child_by_type(&node, "statement_block"));
    visit_scope(extractor, resource, body);
}

/// `declare global { ... }`, given the `ambient_declaration` node
pub(super) fn extract_global_block(extractor: &mut TypeScriptExtractor, node: Node, body: Node) {
    let mut resource = Resource::with_scope(
        ResourceScope::Module {
            name: "global".to_string(),
        },
        Some(node.start_byte()),
        Some(node.end_byte()),
    );
    resource.is_ambient = true;
    visit_scope(extractor, resource, Some(body));
}

fn visit_scope(extractor: &mut TypeScriptExtractor, resource: Resource, body: Option<Node>) {
    extractor.scopes.push(PendingScope::new(resource));
    if let Some(body) = body {
        symbols::visit_children(extractor, body);
    }
    if let Some(finished) = extractor.scopes.pop() {
        extractor.current().children.push(finished);
    }
}
