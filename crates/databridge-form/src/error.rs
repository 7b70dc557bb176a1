//! Error types for the form crate.

use databridge_doc::DocError;

/// Errors from loading, resolving, or binding forms.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// No registered form matches the reference.
    #[error("unknown form: {0}")]
    UnknownForm(String),

    /// The form definition is structurally invalid.
    #[error("invalid form {reference}: {reason}")]
    InvalidDefinition { reference: String, reason: String },

    /// The document's root element is not the form's top element.
    #[error("document root <{found}> does not match form top element <{expected}>")]
    RootMismatch { expected: String, found: String },

    /// The form file could not be read or parsed.
    #[error("document error: {0}")]
    Document(#[from] DocError),

    /// I/O error while scanning a forms directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for form operations.
pub type FormResult<T> = Result<T, FormError>;
