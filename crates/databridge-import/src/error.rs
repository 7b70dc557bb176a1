use std::path::PathBuf;

use databridge_form::FormError;
use databridge_store::StoreError;

/// Errors from the import pipeline.
///
/// Object-level errors (`MalformedObject`, `MissingIdentifier`, `Store`)
/// abort a single object; `DirectoryEnumeration` abandons one directory.
/// None of them stops an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The object text could not be read, split, parsed, or bound.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// The object has no top-level `id`, or it is not an integer.
    #[error("missing or invalid object identifier: {}", .0.as_deref().unwrap_or("<none>"))]
    MissingIdentifier(Option<String>),

    /// A directory could not be listed.
    #[error("cannot enumerate {}: {reason}", .path.display())]
    DirectoryEnumeration { path: PathBuf, reason: String },

    /// The target store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The forms directory could not be loaded.
    #[error("form error: {0}")]
    Form(#[from] FormError),

    /// The configuration file is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::MalformedObject(err.to_string())
    }
}

/// Result alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
