//! Target document storage for DataBridge.
//!
//! Imported objects end up as persisted documents keyed by an integer
//! [`DocId`]. The importer only needs to look a document up, create a new
//! one, and save an existing one after mutating it in place.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`FsDocumentStore`] -- one XML file per document under a root directory
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Opening a document binds it to the form named by its `SPXML-FORM`
//!    reference, so callers always see the full field tree.
//! 2. `create` never overwrites and `save` never creates.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod id;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsDocumentStore;
pub use id::DocId;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
