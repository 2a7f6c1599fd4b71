//! Error types for point cloud loading.

use thiserror::Error;

/// Structural problems found while reading a PLY header or body.
///
/// Every variant is fatal to the decode call that produced it; no partial
/// point set is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing end_header within the first {window} bytes")]
    MissingHeaderEnd { window: usize },

    #[error("missing format")]
    MissingFormat,

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("missing or empty vertex element")]
    MissingVertexElement,

    #[error("missing required position properties")]
    MissingPositionProperties,

    #[error("list-typed vertex property '{0}' is not supported")]
    ListProperty(String),

    #[error("malformed property declaration: {0}")]
    MalformedProperty(String),

    #[error("unknown scalar type '{ty}' for property '{name}'")]
    UnknownScalarType { ty: String, name: String },

    #[error("invalid value '{token}' on line {line}")]
    InvalidValue { line: usize, token: String },

    #[error("truncated vertex data: expected {expected}, found {actual}")]
    TruncatedVertexData { expected: usize, actual: usize },
}

/// Errors returned by the loader facade.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("PLY format error: {0}")]
    Format(#[from] FormatError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// The underlying format error, if this is one.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            LoadError::Format(e) => Some(e),
            LoadError::Io(_) => None,
        }
    }
}
