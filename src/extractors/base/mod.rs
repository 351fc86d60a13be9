// Base extractor shared by the language walkers
//
// - extractor.rs: BaseExtractor (source text access)
// - tree_methods.rs: tree navigation and syntax error detection

pub mod extractor;
pub mod tree_methods;

pub use extractor::BaseExtractor;
