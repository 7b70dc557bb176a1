//! Non-fatal merge diagnostics.

/// A patch field that could not be matched against the source or target
/// tree. The field is skipped and the merge continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructuralMismatch {
    /// The patch names a field that the full source tree does not contain.
    #[error("field \"{field}\" not found in source object")]
    MissingInSource { field: String },

    /// The target document has no such field (schema drift).
    #[error("field \"{field}\" not found in target object")]
    MissingInTarget { field: String },

    /// Positional resolution of an array item landed on a different field.
    #[error("field \"{field}\" item {occurrence} found as \"{found}\" in source object")]
    ItemNameMismatch {
        field: String,
        occurrence: usize,
        found: String,
    },

    /// The source holds fewer items of the array than the patch.
    #[error("field \"{field}\" item {occurrence} is past the end of the source object")]
    ItemOutOfRange { field: String, occurrence: usize },
}

impl StructuralMismatch {
    /// Name of the skipped field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingInSource { field }
            | Self::MissingInTarget { field }
            | Self::ItemNameMismatch { field, .. }
            | Self::ItemOutOfRange { field, .. } => field,
        }
    }
}
