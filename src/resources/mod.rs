//! Resource model: the tree of scopes extracted from one file and the
//! declarations, imports and exports it owns.

pub mod declarations;
pub mod exports;
pub mod generation;
pub mod imports;
pub mod resource;

pub use declarations::{
    ClassDeclaration, Declaration, DeclarationKind, EnumDeclaration, FunctionDeclaration,
    InterfaceDeclaration, MemberKind, MethodDeclaration, ModuleDeclaration, ModuleKind,
    ParameterDeclaration, PropertyDeclaration, VariableDeclaration, Visibility,
};
pub use exports::Export;
pub use generation::{Generatable, GenerationOptions};
pub use imports::{
    ExternalModuleImport, Import, NamedImport, NamespaceImport, StringImport, SymbolSpecifier,
};
pub use resource::{Resource, ResourceScope};
