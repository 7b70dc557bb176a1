use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use databridge_doc::Document;

use crate::error::{StoreError, StoreResult};
use crate::id::DocId;
use crate::traits::DocumentStore;

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Documents are cloned on open and on
/// write. Every successful `create` or `save` is counted, which lets tests
/// assert exactly how many persistence calls an import made.
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<DocId, Document>>,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Seed a document without counting it as a write.
    pub fn insert(&self, id: DocId, doc: Document) {
        self.docs.write().expect("lock poisoned").insert(id, doc);
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.docs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.read().expect("lock poisoned").is_empty()
    }

    /// Number of successful `create` and `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Return a sorted list of all document ids in the store.
    pub fn all_ids(&self) -> Vec<DocId> {
        let map = self.docs.read().expect("lock poisoned");
        let mut ids: Vec<DocId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn open(&self, id: DocId) -> StoreResult<Option<Document>> {
        let map = self.docs.read().expect("lock poisoned");
        Ok(map.get(&id).cloned())
    }

    fn create(&self, id: DocId, doc: &Document) -> StoreResult<()> {
        let mut map = self.docs.write().expect("lock poisoned");
        if map.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        map.insert(id, doc.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn save(&self, id: DocId, doc: &Document) -> StoreResult<()> {
        let mut map = self.docs.write().expect("lock poisoned");
        let slot = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = doc.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, id: DocId) -> StoreResult<bool> {
        let map = self.docs.read().expect("lock poisoned");
        Ok(map.contains_key(&id))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("doc_count", &self.len())
            .field("writes", &self.writes())
            .finish()
    }
}
