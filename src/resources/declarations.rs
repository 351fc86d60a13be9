// Declaration types for extracted resources
//
// One struct carries the attributes shared by every declaration; the variant data
// lives in `DeclarationKind` and is dispatched on by discriminant.

use serde::{Deserialize, Serialize};

/// A named program entity declared in a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    /// Declared name (`default` for anonymous default exports)
    pub name: String,
    /// Whether the declaration is exported from its owning resource
    pub is_exported: bool,
    /// Whether the declaration is the default export
    pub is_default: bool,
    /// Start byte offset in file
    pub start: usize,
    /// End byte offset in file
    pub end: usize,
    /// Variant specific data
    pub kind: DeclarationKind,
}

/// Declaration variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DeclarationKind {
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    Function(FunctionDeclaration),
    Enum(EnumDeclaration),
    Variable(VariableDeclaration),
    TypeAlias,
    Module(ModuleDeclaration),
}

impl Declaration {
    pub fn new(name: impl Into<String>, start: usize, end: usize, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            is_exported: false,
            is_default: false,
            start,
            end,
            kind,
        }
    }

    /// Short lowercase label of the variant ("class", "function", ...)
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            DeclarationKind::Class(_) => "class",
            DeclarationKind::Interface(_) => "interface",
            DeclarationKind::Function(_) => "function",
            DeclarationKind::Enum(_) => "enum",
            DeclarationKind::Variable(_) => "variable",
            DeclarationKind::TypeAlias => "type",
            DeclarationKind::Module(m) => match m.kind {
                ModuleKind::Namespace => "namespace",
                ModuleKind::Module => "module",
            },
        }
    }

    /// Anonymous default exports have no usable name and are never indexed.
    pub fn is_anonymous(&self) -> bool {
        self.name == "default"
    }
}

/// Visibility levels for class members
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            _ => None,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Protected => write!(f, "protected"),
        }
    }
}

/// A function, method or constructor parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDeclaration {
    /// Parameter name, or the pattern text for destructured parameters
    pub name: String,
    pub type_annotation: Option<String>,
    pub is_optional: bool,
    pub is_rest: bool,
}

/// A class or interface property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub name: String,
    pub visibility: Option<Visibility>,
    pub type_annotation: Option<String>,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_optional: bool,
    pub start: usize,
    pub end: usize,
}

/// What sort of callable member a method is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

/// A class or interface method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodDeclaration {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Option<Visibility>,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: Option<String>,
    pub is_abstract: bool,
    pub is_static: bool,
    pub is_async: bool,
    pub is_optional: bool,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    pub is_abstract: bool,
    pub properties: Vec<PropertyDeclaration>,
    pub methods: Vec<MethodDeclaration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration {
    pub properties: Vec<PropertyDeclaration>,
    pub methods: Vec<MethodDeclaration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub is_async: bool,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnumDeclaration {
    /// `const enum` and `enum` share this variant
    pub is_const: bool,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub is_const: bool,
    pub type_annotation: Option<String>,
}

/// Keyword a module block was declared with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ModuleKind {
    Namespace,
    Module,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDeclaration {
    pub kind: ModuleKind,
    /// Declared with `declare` (or nested inside an ambient block)
    pub is_ambient: bool,
}
