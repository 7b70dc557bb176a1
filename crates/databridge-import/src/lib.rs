//! Import pipeline for DataBridge.
//!
//! Object files live under a data root, one directory per object kind.
//! Each file declares its form with an `SPXML-FORM="..."` marker on the
//! root element and carries a top-level integer `id`.
//!
//! # Pipeline
//!
//! 1. [`split_form`] strips the marker so the remaining text parses into the
//!    *concise* tree: only the fields the author wrote.
//! 2. [`ObjectLoader`] parses the full text into the *proper* tree and binds
//!    it to its form, so every form field is present.
//! 3. [`ObjectApplier`] creates the document from the proper tree, or merges
//!    the concise tree into the existing document and saves it only when a
//!    value changed.
//! 4. [`Importer`] walks the data root and records an [`ImportReport`].
//!
//! # Design Rules
//!
//! 1. Objects are processed one at a time, in file-name order.
//! 2. A failing object or directory is logged and recorded, never fatal to the run.
//! 3. Importing the same tree twice writes nothing the second time.

pub mod applier;
pub mod config;
pub mod error;
pub mod loader;
pub mod report;
pub mod split;
pub mod walker;

pub use applier::{ApplyOutcome, ObjectApplier, ID_FIELD};
pub use config::ImportConfig;
pub use error::{ImportError, ImportResult};
pub use loader::{ObjectLoader, ObjectRepresentation};
pub use report::{FailureScope, ImportFailure, ImportReport};
pub use split::{split_form, FormSplit};
pub use walker::Importer;
