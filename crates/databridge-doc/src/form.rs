//! Field metadata declared by a form.

use std::sync::Arc;

use crate::document::{Document, NodeId};

/// Declaration of one field of a form.
///
/// A field is singular unless `multiple` is set, in which case it may occur
/// any number of times under its parent. A repeatable field may name one of
/// its sub-fields as `primary_key`; the value of that sub-field identifies
/// an item when reconciling arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormElem {
    pub name: String,
    pub multiple: bool,
    pub primary_key: Option<String>,
    pub children: Vec<Arc<FormElem>>,
}

impl FormElem {
    /// A singular field with no sub-fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiple: false,
            primary_key: None,
            children: Vec::new(),
        }
    }

    /// Mark the field as repeatable.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    pub fn with_child(mut self, child: FormElem) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Declared sub-field by name.
    pub fn child(&self, name: &str) -> Option<&Arc<FormElem>> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Document {
    /// Append a new item conforming to `form` under `parent`.
    ///
    /// Every singular sub-field is created empty, recursively; repeatable
    /// sub-fields start with no items.
    pub fn append_conforming(&mut self, parent: NodeId, form: &Arc<FormElem>) -> NodeId {
        let node = self.append_child(parent, form.name.clone());
        self.set_form(node, Some(Arc::clone(form)));
        for field in &form.children {
            if !field.multiple {
                self.append_conforming(node, field);
            }
        }
        node
    }
}
