//! Reading an object file into its proper and concise trees.

use std::path::Path;
use std::sync::Arc;

use databridge_doc::{read_text, Document};
use databridge_form::{bind, FormRegistry};

use crate::error::{ImportError, ImportResult};
use crate::split::split_form;

/// Both tree views of one object file.
#[derive(Clone, Debug)]
pub struct ObjectRepresentation {
    /// Display name: the file name without its extension.
    pub name: String,
    /// Every field of the form, bound to it.
    pub proper: Document,
    /// Only the fields the author wrote, unbound.
    pub concise: Document,
}

/// Loads object files against a set of known forms.
#[derive(Debug, Clone)]
pub struct ObjectLoader {
    forms: Arc<FormRegistry>,
}

impl ObjectLoader {
    pub fn new(forms: Arc<FormRegistry>) -> Self {
        Self { forms }
    }

    /// Read and parse the object at `path`, detecting its charset.
    pub fn load(&self, path: &Path) -> ImportResult<ObjectRepresentation> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = read_text(path).map_err(ImportError::malformed)?;
        self.load_text(name, &text)
    }

    /// Parse object text already in memory.
    ///
    /// Every failure, including an unknown form, is
    /// [`ImportError::MalformedObject`].
    pub fn load_text(&self, name: impl Into<String>, text: &str) -> ImportResult<ObjectRepresentation> {
        let split = split_form(text)?;
        let mut proper = Document::parse(text).map_err(ImportError::malformed)?;
        let concise = Document::parse(&split.concise).map_err(ImportError::malformed)?;

        let form = self
            .forms
            .resolve(&split.form_ref)
            .map_err(ImportError::malformed)?;
        bind(&mut proper, &form).map_err(ImportError::malformed)?;
        proper.set_form_ref(Some(split.form_ref));

        Ok(ObjectRepresentation {
            name: name.into(),
            proper,
            concise,
        })
    }
}
