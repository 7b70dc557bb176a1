//! Registry of loaded forms.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use databridge_doc::read_text;

use crate::definition::Form;
use crate::error::{FormError, FormResult};

/// Forms indexed by the reference they were registered under.
#[derive(Debug, Default)]
pub struct FormRegistry {
    forms: HashMap<String, Arc<Form>>,
}

impl FormRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.xmd` file in `dir`, registering each under its file name.
    ///
    /// Nested directories are not scanned.
    pub fn load_dir(dir: &Path) -> FormResult<Self> {
        let mut registry = Self::new();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_form = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xmd"));
            if is_form && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            let text = read_text(&path)?;
            let form = Form::parse(file_name, &text)?;
            tracing::debug!(form = form.reference(), top = form.name(), "form loaded");
            registry.register(form);
        }
        Ok(registry)
    }

    /// Register a form under its reference, replacing any previous one.
    pub fn register(&mut self, form: Form) -> Arc<Form> {
        let form = Arc::new(form);
        self.forms
            .insert(form.reference().to_owned(), Arc::clone(&form));
        form
    }

    /// Find the form for a reference.
    ///
    /// Exact matches win; otherwise the last path segment of the reference
    /// is tried, so `x-local://wtv/wtv_collaborator.xmd` finds a form
    /// registered as `wtv_collaborator.xmd`.
    pub fn resolve(&self, reference: &str) -> FormResult<Arc<Form>> {
        self.forms
            .get(reference)
            .or_else(|| self.forms.get(file_segment(reference)))
            .cloned()
            .ok_or_else(|| FormError::UnknownForm(reference.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

fn file_segment(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}
