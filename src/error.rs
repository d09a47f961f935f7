/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the generation pipeline.
///
/// Every variant is fatal: the pipeline never emits partial output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The raw document could not be read from its source
    #[error("failed to fetch schema from {source_name}: {message}")]
    Fetch { source_name: String, message: String },

    /// No pinned digest has been configured for the source
    #[error("no pinned SHA-256 digest is configured; the current digest is:\n{actual}")]
    DigestUnpinned { actual: String },

    /// The fetched document differs from the audited one
    #[error("the schema has changed upstream (expected {expected}, got {actual}); re-audit the override table before re-pinning")]
    DigestMismatch { expected: String, actual: String },

    /// An override entry no longer resolves against the document
    #[error("override {path} does not apply: {reason}")]
    Patch { path: String, reason: String },

    /// The patched document does not have the expected shape
    #[error("invalid schema at {path}: {message}")]
    Validation { path: String, message: String },

    /// A parameter has no entry in the type table
    #[error("cannot resolve a type for parameter `{parameter}` of `{operation_id}`: {reason}")]
    TypeResolution {
        operation_id: String,
        parameter: String,
        reason: String,
    },

    /// An operation cannot be turned into a method
    #[error("cannot generate a method for GET {endpoint}: {message}")]
    Generation { endpoint: String, message: String },

    /// Invalid configuration (override table files, CLI values)
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(format!("malformed override table: {}", err))
    }
}
