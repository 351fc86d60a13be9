//! Declaration index: reverse mapping from declared name to declaring modules,
//! plus the pipeline that builds it from a workspace.

pub mod builder;
pub mod change_detector;
pub mod declaration_index;
pub mod discovery;
pub mod shared;

pub use builder::{
    BuildReport, CancellationToken, ExtractedCallback, IndexBuilder, RefreshReport, SkippedFile,
};
pub use change_detector::ChangeDetector;
pub use declaration_index::{DeclarationIndex, DeclarationInfo, IndexEntry};
pub use discovery::{FileDiscovery, GlobDiscovery};
pub use shared::SharedIndex;
