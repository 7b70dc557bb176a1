//! Positional resolution of array items in the source tree.
//!
//! Looking an array field up by name always yields its first item. The
//! `n`-th occurrence of a field in the patch is instead the source child at
//! `first + n`, where `first` is the position of the field's first
//! occurrence among the source parent's children.

use databridge_doc::{Document, NodeId};

/// Where the `occurrence`-th item of a field sits in the source tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemLocation {
    /// The item was found.
    Found(NodeId),
    /// The parent has no child with the field's name.
    Missing,
    /// The computed position holds a differently named child.
    NameMismatch { found: String },
    /// The computed position is past the last child.
    OutOfRange,
}

/// Resolve the `occurrence`-th (zero-based) item of `field` under `parent`.
pub fn locate_item(
    source: &Document,
    parent: NodeId,
    field: &str,
    occurrence: usize,
) -> ItemLocation {
    let children = source.children(parent);
    let Some(first) = children.iter().position(|&c| source.name(c) == field) else {
        return ItemLocation::Missing;
    };
    match children.get(first + occurrence) {
        None => ItemLocation::OutOfRange,
        Some(&item) if source.name(item) == field => ItemLocation::Found(item),
        Some(&item) => ItemLocation::NameMismatch {
            found: source.name(item).to_owned(),
        },
    }
}
