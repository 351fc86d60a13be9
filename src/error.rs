/// Unified error type for tshero_core.
///
/// Ambiguous or unresolved usages are not errors; they are returned as data by
/// the resolver. Everything here aborts the operation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Source is not parseable (first syntax error at line {line}, column {column})")]
    NotParseable { line: usize, column: usize },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to load grammar: {0}")]
    Language(String),

    #[error("Import group identifier is neither a keyword nor a /regex/: {0}")]
    InvalidImportGroup(String),

    #[error("Invalid import group regex {pattern}: {source}")]
    InvalidGroupRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Import group policy is missing the mandatory \"Remaining\" group")]
    MissingRemainingGroup,

    #[error("Import group policy declares the \"Remaining\" group more than once")]
    DuplicateRemainingGroup,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workspace error: {0}")]
    Workspace(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error only concerns one file and must not abort a workspace build.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Error::NotParseable { .. } | Error::UnsupportedLanguage(_) | Error::Io(_)
        )
    }
}
