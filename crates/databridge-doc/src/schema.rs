//! Schema capability used by the merge engine.

use crate::document::{Document, NodeId};

/// Answers schema questions about nodes of a document.
///
/// The merge engine never inspects form metadata directly; it asks an
/// introspector whether a field repeats, what identifies an item, and how to
/// create a new item that conforms to the schema.
pub trait SchemaIntrospector {
    /// Whether `node` is an occurrence of a repeatable field.
    fn is_multiple(&self, doc: &Document, node: NodeId) -> bool;

    /// Identity of a repeatable item.
    ///
    /// `None` when the item's field declares no key sub-field. A declared key
    /// whose value is null yields an empty string.
    fn primary_key(&self, doc: &Document, node: NodeId) -> Option<String>;

    /// The item of `field` under `parent` whose primary key equals `key`.
    fn child_by_key(&self, doc: &Document, parent: NodeId, field: &str, key: &str)
        -> Option<NodeId>;

    /// Append a new, schema-conformant item of `field` to `parent`.
    fn append_item(&self, doc: &mut Document, parent: NodeId, field: &str) -> NodeId;
}

/// [`SchemaIntrospector`] backed by the [`FormElem`](crate::FormElem)
/// attached to each bound node.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormSchema;

impl SchemaIntrospector for FormSchema {
    fn is_multiple(&self, doc: &Document, node: NodeId) -> bool {
        doc.form(node).is_some_and(|form| form.multiple)
    }

    fn primary_key(&self, doc: &Document, node: NodeId) -> Option<String> {
        let key_field = doc.form(node)?.primary_key.as_deref()?;
        let value = doc
            .child(node, key_field)
            .and_then(|key| doc.value(key))
            .unwrap_or_default();
        Some(value.to_owned())
    }

    fn child_by_key(
        &self,
        doc: &Document,
        parent: NodeId,
        field: &str,
        key: &str,
    ) -> Option<NodeId> {
        doc.children_named(parent, field)
            .find(|&item| self.primary_key(doc, item).as_deref() == Some(key))
    }

    fn append_item(&self, doc: &mut Document, parent: NodeId, field: &str) -> NodeId {
        let form = doc.form(parent).and_then(|form| form.child(field)).cloned();
        match form {
            Some(form) => doc.append_conforming(parent, &form),
            None => {
                tracing::debug!(field, "parent carries no form; appending a bare element");
                doc.append_child(parent, field)
            }
        }
    }
}
