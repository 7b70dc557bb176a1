//! Error types for the document crate.

/// Errors from parsing, decoding, or writing documents.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The XML text is not well formed.
    #[error("parse error at byte {position}: {reason}")]
    Parse { position: usize, reason: String },

    /// The text contains no root element.
    #[error("document has no root element")]
    NoRoot,

    /// The text contains more than one top-level element.
    #[error("document has more than one root element")]
    MultipleRoots,

    /// The bytes could not be decoded with the detected character set.
    #[error("cannot decode text as {encoding}")]
    Decode { encoding: &'static str },

    /// Serializing the tree back to XML failed.
    #[error("write error: {0}")]
    Write(String),

    /// I/O error while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for document operations.
pub type DocResult<T> = Result<T, DocError>;
