use databridge_doc::Document;

use crate::error::StoreResult;
use crate::id::DocId;

/// Persistent store of documents keyed by [`DocId`].
///
/// Implementations must satisfy these invariants:
/// - `open` returns documents bound to their form when the form is known.
/// - `create` fails with `AlreadyExists` rather than overwriting.
/// - `save` fails with `NotFound` rather than creating.
/// - A successful `create` or `save` is durable before it returns.
pub trait DocumentStore: Send + Sync {
    /// Open the document stored under `id`.
    ///
    /// Returns `Ok(None)` if no such document exists.
    fn open(&self, id: DocId) -> StoreResult<Option<Document>>;

    /// Persist a brand-new document under `id`.
    fn create(&self, id: DocId, doc: &Document) -> StoreResult<()>;

    /// Persist the new content of an existing document.
    fn save(&self, id: DocId, doc: &Document) -> StoreResult<()>;

    /// Check whether a document exists under `id`.
    fn exists(&self, id: DocId) -> StoreResult<bool>;
}
