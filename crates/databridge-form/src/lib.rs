//! Form definitions for DataBridge.
//!
//! A form (`.xmd` file) declares every field an object of one kind may
//! carry. Object files name their form through the `SPXML-FORM` root
//! attribute; binding a parsed tree to that form attaches field metadata to
//! each node and materializes the fields the author left out.
//!
//! # Key Types
//!
//! - [`Form`] -- a parsed form definition
//! - [`FormRegistry`] -- forms indexed by reference
//! - [`bind`] -- attach a form to a document, producing the full tree

pub mod bind;
pub mod definition;
pub mod error;
pub mod registry;

pub use bind::bind;
pub use definition::{Form, FORM_ROOT};
pub use error::{FormError, FormResult};
pub use registry::FormRegistry;
