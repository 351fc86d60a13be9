// TS Hero Core - tree-sitter powered TypeScript import tooling
//
// Source text is parsed into a resource tree, resource trees are aggregated into a
// workspace declaration index, usages are resolved against the index and the import
// block is regenerated from a grouping policy.

pub mod config;
pub mod error;
pub mod extractors;
pub mod import_manager;
pub mod index;
pub mod language;
pub mod organize;
pub mod resolver;
pub mod resources;
pub mod utils;

pub use config::{Config, ImportGroupOrder, ImportGroupSetting, IndexConfig, QuoteStyle, ResolverConfig};
pub use error::{Error, Result};
pub use extractors::ExtractorManager;
pub use import_manager::{ImportEdit, ImportManager};
pub use index::{
    BuildReport, CancellationToken, DeclarationIndex, DeclarationInfo, FileDiscovery,
    GlobDiscovery, IndexBuilder, IndexEntry, SharedIndex, SkippedFile,
};
pub use organize::{ImportGroupPolicy, ImportOrganizer};
pub use resolver::{import_for_declaration, MissingImports, UsageResolver, UserDecision};
pub use resources::{Declaration, DeclarationKind, Export, Generatable, GenerationOptions, Import, Resource};
