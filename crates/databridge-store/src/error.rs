use databridge_doc::DocError;
use databridge_form::FormError;

use crate::id::DocId;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document is stored under this identifier.
    #[error("document not found: {0}")]
    NotFound(DocId),

    /// A document is already stored under this identifier.
    #[error("document already exists: {0}")]
    AlreadyExists(DocId),

    /// The text is not a valid document identifier.
    #[error("invalid document id: {0:?}")]
    InvalidId(String),

    /// The stored document could not be parsed or written.
    #[error("document error: {0}")]
    Document(#[from] DocError),

    /// The stored document names a form that cannot be applied.
    #[error("form error: {0}")]
    Form(#[from] FormError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
