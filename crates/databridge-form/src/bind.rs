//! Binding a parsed document to its form.
//!
//! Binding produces the "proper" view of an object: every field the form
//! declares is present, children follow form order, and all occurrences of
//! a repeatable field sit next to each other.

use std::sync::Arc;

use databridge_doc::{Document, FormElem, NodeId};

use crate::definition::Form;
use crate::error::{FormError, FormResult};

/// Attach `form` to `doc`.
///
/// - Each authored element declared by the form gets its [`FormElem`].
/// - A singular field that was not authored is created empty.
/// - Children are reordered into form order. A singular field keeps its
///   first occurrence; a repeatable one keeps all, in authored order.
/// - Elements the form does not declare (and surplus occurrences of
///   singular fields) are kept after the declared ones, unbound.
pub fn bind(doc: &mut Document, form: &Form) -> FormResult<()> {
    let root = doc.root();
    if doc.name(root) != form.name() {
        return Err(FormError::RootMismatch {
            expected: form.name().to_owned(),
            found: doc.name(root).to_owned(),
        });
    }
    bind_node(doc, root, form.top());
    Ok(())
}

fn bind_node(doc: &mut Document, node: NodeId, form: &Arc<FormElem>) {
    doc.set_form(node, Some(Arc::clone(form)));
    if form.is_leaf() {
        return;
    }

    let authored = doc.children(node).to_vec();
    let mut placed = vec![false; authored.len()];
    let mut ordered = Vec::with_capacity(authored.len() + form.children.len());

    for field in &form.children {
        let mut found = false;
        for (slot, &child) in authored.iter().enumerate() {
            if placed[slot] || doc.name(child) != field.name || (found && !field.multiple) {
                continue;
            }
            placed[slot] = true;
            found = true;
            ordered.push(child);
            bind_node(doc, child, field);
        }
        if !found && !field.multiple {
            ordered.push(doc.append_conforming(node, field));
        }
    }

    for (slot, &child) in authored.iter().enumerate() {
        if !placed[slot] {
            tracing::debug!(
                parent = %form.name,
                field = doc.name(child),
                "element not declared by form; kept unbound"
            );
            ordered.push(child);
        }
    }

    doc.replace_children(node, ordered);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Form {
        Form::parse(
            "person.xmd",
            r#"<SPXML-FORM>
                <person>
                    <id/>
                    <name/>
                    <tag MULTIPLE="1"/>
                    <address><city/><zip/></address>
                    <phones>
                        <phone MULTIPLE="1" PRIMARY-KEY="kind"><kind/><number/></phone>
                    </phones>
                </person>
            </SPXML-FORM>"#,
        )
        .unwrap()
    }

    fn child_names(doc: &Document, node: NodeId) -> Vec<String> {
        doc.children(node)
            .iter()
            .map(|&c| doc.name(c).to_owned())
            .collect()
    }

    #[test]
    fn materializes_missing_singular_fields_in_form_order() {
        let mut doc = Document::parse(
            "<person><tag>x</tag><id>7</id><tag>y</tag><phones><phone><kind>home</kind></phone></phones></person>",
        )
        .unwrap();
        bind(&mut doc, &form()).unwrap();

        let root = doc.root();
        assert_eq!(
            child_names(&doc, root),
            ["id", "name", "tag", "tag", "address", "phones"]
        );
        assert_eq!(doc.value_at("id"), Some("7"));
        assert_eq!(doc.value_at("name"), None);

        let tags: Vec<_> = doc
            .children_named(root, "tag")
            .map(|t| doc.value(t).unwrap().to_owned())
            .collect();
        assert_eq!(tags, ["x", "y"]);

        let address = doc.find("address").unwrap();
        assert_eq!(child_names(&doc, address), ["city", "zip"]);

        let phone = doc.find("phones/phone").unwrap();
        assert!(doc.form(phone).unwrap().multiple);
        assert_eq!(child_names(&doc, phone), ["kind", "number"]);
    }

    #[test]
    fn unknown_and_duplicate_elements_are_kept_unbound() {
        let mut doc =
            Document::parse("<person><extra>1</extra><name>a</name><name>b</name></person>")
                .unwrap();
        bind(&mut doc, &form()).unwrap();

        let root = doc.root();
        assert_eq!(
            child_names(&doc, root),
            ["id", "name", "address", "phones", "extra", "name"]
        );
        let extra = doc.find("extra").unwrap();
        assert!(doc.form(extra).is_none());
        assert_eq!(doc.value_at("name"), Some("a"));
    }

    #[test]
    fn root_must_match_form() {
        let mut doc = Document::parse("<org/>").unwrap();
        let err = bind(&mut doc, &form()).unwrap_err();
        assert!(matches!(err, FormError::RootMismatch { .. }));
    }
}
