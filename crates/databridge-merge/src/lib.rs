//! Merge engine for DataBridge.
//!
//! Applies the fields an author explicitly wrote (the *patch*, or concise
//! tree) onto a live target document, using the same object rendered with
//! every form field present (the *source*, or proper tree) to resolve which
//! array item each patch field refers to.
//!
//! # Rules
//!
//! 1. Only patch children are visited; untouched target fields stay as they are.
//! 2. Scalars are overwritten only when the value differs, so an unchanged
//!    object reports `changed == false` and is never rewritten.
//! 3. A field flagged `default="true"` only fills a null target value.
//! 4. Items of a keyed array are upserted by primary key; unmatched target
//!    items are left in place.
//! 5. Items of an array without a key are rebuilt: the first such item of a
//!    field in a call clears every target item of that field.
//! 6. Structural mismatches skip the affected field and are reported, never fatal.

pub mod engine;
pub mod error;
pub mod locate;

pub use engine::{merge_documents, merge_into, MergeOutcome};
pub use error::StructuralMismatch;
pub use locate::{locate_item, ItemLocation};
