//! Parsing `.xmd` form definitions.
//!
//! ```xml
//! <SPXML-FORM>
//!   <collaborator>
//!     <id TYPE="integer"/>
//!     <fullname TYPE="string"/>
//!     <roles>
//!       <role MULTIPLE="1" PRIMARY-KEY="id">
//!         <id TYPE="string"/>
//!       </role>
//!     </roles>
//!   </collaborator>
//! </SPXML-FORM>
//! ```
//!
//! Only `MULTIPLE` and `PRIMARY-KEY` carry meaning here; other attributes
//! are accepted and ignored.

use std::collections::HashSet;
use std::sync::Arc;

use databridge_doc::{Document, FormElem, NodeId};

use crate::error::{FormError, FormResult};

/// Root element of every form definition file.
pub const FORM_ROOT: &str = "SPXML-FORM";

/// A parsed form: its reference and the top element's field tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    reference: String,
    top: Arc<FormElem>,
}

impl Form {
    pub fn new(reference: impl Into<String>, top: FormElem) -> Self {
        Self {
            reference: reference.into(),
            top: Arc::new(top),
        }
    }

    /// Parse a form definition from XML text.
    pub fn parse(reference: impl Into<String>, text: &str) -> FormResult<Self> {
        let reference = reference.into();
        let doc = Document::parse(text)?;
        let root = doc.root();
        if doc.name(root) != FORM_ROOT {
            return Err(invalid(
                &reference,
                format!("root element must be <{FORM_ROOT}>, found <{}>", doc.name(root)),
            ));
        }
        let &[top] = doc.children(root) else {
            return Err(invalid(&reference, "expected exactly one top element"));
        };
        let top = field(&doc, top, &reference)?;
        Ok(Self {
            reference,
            top: Arc::new(top),
        })
    }

    /// The reference this form was registered under.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn top(&self) -> &Arc<FormElem> {
        &self.top
    }

    /// Name of the top element; bound documents must have this root.
    pub fn name(&self) -> &str {
        &self.top.name
    }
}

fn field(doc: &Document, node: NodeId, reference: &str) -> FormResult<FormElem> {
    let mut elem = FormElem::new(doc.name(node));
    elem.multiple = matches!(doc.attr(node, "MULTIPLE"), Some("1" | "true"));
    elem.primary_key = doc.attr(node, "PRIMARY-KEY").map(str::to_owned);

    let mut seen = HashSet::new();
    for &child in doc.children(node) {
        let child = field(doc, child, reference)?;
        if !seen.insert(child.name.clone()) {
            return Err(invalid(
                reference,
                format!("field <{}> declares <{}> twice", elem.name, child.name),
            ));
        }
        elem.children.push(Arc::new(child));
    }

    if let Some(key) = &elem.primary_key {
        if !elem.multiple {
            return Err(invalid(
                reference,
                format!("primary key on non-repeatable field <{}>", elem.name),
            ));
        }
        if elem.child(key).is_none() {
            return Err(invalid(
                reference,
                format!("primary key <{key}> is not a field of <{}>", elem.name),
            ));
        }
    }
    Ok(elem)
}

fn invalid(reference: &str, reason: impl Into<String>) -> FormError {
    FormError::InvalidDefinition {
        reference: reference.to_owned(),
        reason: reason.into(),
    }
}
