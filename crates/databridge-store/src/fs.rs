//! Filesystem-backed document store.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use databridge_doc::{read_text, Document};
use databridge_form::{bind, FormRegistry};
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::id::DocId;
use crate::traits::DocumentStore;

/// Stores each document as `<root>/<id>.xml`.
///
/// Writes go to a temporary file in the root directory which is then renamed
/// over the target, so a reader never sees a half-written document.
#[derive(Debug)]
pub struct FsDocumentStore {
    root: PathBuf,
    forms: Arc<FormRegistry>,
}

impl FsDocumentStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open_dir(root: impl Into<PathBuf>, forms: Arc<FormRegistry>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, forms })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locator of the document stored under `id`.
    pub fn locate(&self, id: DocId) -> PathBuf {
        self.root.join(format!("{id}.xml"))
    }

    fn write(&self, path: &Path, doc: &Document) -> StoreResult<()> {
        let xml = doc.to_xml()?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(xml.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

impl DocumentStore for FsDocumentStore {
    fn open(&self, id: DocId) -> StoreResult<Option<Document>> {
        let path = self.locate(id);
        if !path.is_file() {
            return Ok(None);
        }
        let text = read_text(&path)?;
        let mut doc = Document::parse(&text)?;
        if let Some(reference) = doc.form_ref().map(str::to_owned) {
            let form = self.forms.resolve(&reference)?;
            bind(&mut doc, &form)?;
        } else {
            tracing::warn!(%id, "stored document declares no form; opened unbound");
        }
        Ok(Some(doc))
    }

    fn create(&self, id: DocId, doc: &Document) -> StoreResult<()> {
        let path = self.locate(id);
        if path.exists() {
            return Err(StoreError::AlreadyExists(id));
        }
        self.write(&path, doc)?;
        tracing::debug!(%id, path = %path.display(), "document created");
        Ok(())
    }

    fn save(&self, id: DocId, doc: &Document) -> StoreResult<()> {
        let path = self.locate(id);
        if !path.is_file() {
            return Err(StoreError::NotFound(id));
        }
        self.write(&path, doc)?;
        tracing::debug!(%id, path = %path.display(), "document saved");
        Ok(())
    }

    fn exists(&self, id: DocId) -> StoreResult<bool> {
        Ok(self.locate(id).is_file())
    }
}
