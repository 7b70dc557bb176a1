//! Document tree for DataBridge.
//!
//! Object files and persisted documents are XML. This crate parses them into
//! an arena-backed [`Document`] whose nodes carry an optional value, ordered
//! attributes and children, and (once bound to a form) the [`FormElem`] that
//! declares the field.
//!
//! # Key Types
//!
//! - [`Document`] / [`NodeId`] / [`Node`] -- arena tree with stable node ids
//! - [`FormElem`] -- field metadata: multiplicity and primary-key sub-field
//! - [`SchemaIntrospector`] -- schema capability consumed by the merge engine
//! - [`FormSchema`] -- introspector backed by the form metadata on each node
//!
//! # Conventions
//!
//! 1. Empty text is null: a node's value is `None` rather than `Some("")`.
//! 2. The root's `SPXML-FORM` attribute is held as [`Document::form_ref`],
//!    never in the attribute list.
//! 3. Removed nodes are detached from their parent; their ids are never reused.

pub mod document;
pub mod error;
pub mod form;
pub mod parse;
pub mod schema;
pub mod text;
pub mod write;

pub use document::{Document, Node, NodeId};
pub use error::{DocError, DocResult};
pub use form::FormElem;
pub use parse::FORM_ATTR;
pub use schema::{FormSchema, SchemaIntrospector};
pub use text::{decode_text, read_text};
