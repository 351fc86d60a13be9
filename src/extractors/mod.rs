// Resource extractors
//
// The manager parses source text with tree-sitter and hands the tree to the
// TypeScript walker, which also covers JavaScript, TSX and JSX.

pub mod base;
pub mod manager;
pub mod typescript;

pub use manager::ExtractorManager;
pub use typescript::TypeScriptExtractor;
