//! Selective deep merge of a patch tree into a target document.

use std::collections::{HashMap, HashSet};

use databridge_doc::{Document, NodeId, SchemaIntrospector};
use tracing::{debug, warn};

use crate::error::StructuralMismatch;
use crate::locate::{locate_item, ItemLocation};

/// Patch attribute marking a value that only fills a null target.
pub const DEFAULT_ATTR: &str = "default";

/// Result of merging one patch node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The patch node had children, so it was merged field by field rather
    /// than applied as a scalar.
    pub composite: bool,
    /// Some value in the target differs from what it was before the merge.
    pub changed: bool,
    /// Fields skipped because the trees did not line up.
    pub mismatches: Vec<StructuralMismatch>,
}

impl MergeOutcome {
    fn skip(&mut self, mismatch: StructuralMismatch) {
        warn!(field = mismatch.field(), "{mismatch}; skipping");
        self.mismatches.push(mismatch);
    }
}

/// Bookkeeping for repeatable fields within one call (one parent level).
#[derive(Default)]
struct Occurrences {
    /// Field name -> items of that field seen so far in the patch.
    seen: HashMap<String, usize>,
    /// Fields currently in no-key mode; their target items were cleared.
    cleared: HashSet<String>,
    /// Field name -> target items detached by the first clear.
    replaced: HashMap<String, Vec<NodeId>>,
}

impl Occurrences {
    fn next(&mut self, field: &str) -> usize {
        let seen = self.seen.entry(field.to_owned()).or_insert(0);
        let occurrence = *seen;
        *seen += 1;
        occurrence
    }
}

/// A patch field resolved to its target and source counterparts.
struct Resolved {
    target: NodeId,
    source: NodeId,
    /// The target item was created by an unkeyed rebuild.
    rebuilt: bool,
}

/// Merge whole documents: the patch root into the target root.
pub fn merge_documents<S>(
    schema: &S,
    target: &mut Document,
    source: &Document,
    patch: &Document,
) -> MergeOutcome
where
    S: SchemaIntrospector + ?Sized,
{
    let target_root = target.root();
    merge_into(
        schema,
        target,
        target_root,
        source,
        source.root(),
        patch,
        patch.root(),
    )
}

/// Apply the children of `patch_node` onto `target_node`.
///
/// `source_node` is the same object node in the full tree and is only read,
/// to resolve multiplicity, array positions and primary keys. A patch node
/// without children is a scalar; it is left to the caller and the returned
/// outcome is not composite.
pub fn merge_into<S>(
    schema: &S,
    target: &mut Document,
    target_node: NodeId,
    source: &Document,
    source_node: NodeId,
    patch: &Document,
    patch_node: NodeId,
) -> MergeOutcome
where
    S: SchemaIntrospector + ?Sized,
{
    let mut outcome = MergeOutcome::default();
    let fields = patch.children(patch_node);
    if fields.is_empty() {
        return outcome;
    }
    outcome.composite = true;

    let mut occurrences = Occurrences::default();

    for &field in fields {
        let name = patch.name(field);
        let default_only = patch.attr(field, DEFAULT_ATTR) == Some("true");

        let resolved = match resolve_field(
            schema,
            target,
            target_node,
            source,
            source_node,
            name,
            &mut occurrences,
        ) {
            Ok(resolved) => resolved,
            Err(mismatch) => {
                outcome.skip(mismatch);
                continue;
            }
        };

        let nested = merge_into(
            schema,
            target,
            resolved.target,
            source,
            resolved.source,
            patch,
            field,
        );
        let field_changed = if nested.composite {
            nested.changed
        } else {
            apply_scalar(target, resolved.target, patch, field, default_only)
        };
        outcome.mismatches.extend(nested.mismatches);

        // Rebuilt items are judged as a whole array below.
        if !resolved.rebuilt {
            outcome.changed |= field_changed;
        }
    }

    // A rebuilt array counts as changed only if it differs from the items
    // it replaced.
    for (field, before) in &occurrences.replaced {
        let after: Vec<NodeId> = target.children_named(target_node, field).collect();
        if !same_items(target, before, &after) {
            debug!(field = %field, "array rebuilt with new content");
            outcome.changed = true;
        }
    }

    outcome
}

fn resolve_field<S>(
    schema: &S,
    target: &mut Document,
    target_node: NodeId,
    source: &Document,
    source_node: NodeId,
    name: &str,
    occurrences: &mut Occurrences,
) -> Result<Resolved, StructuralMismatch>
where
    S: SchemaIntrospector + ?Sized,
{
    let Some(first) = source.child(source_node, name) else {
        return Err(StructuralMismatch::MissingInSource {
            field: name.to_owned(),
        });
    };

    if !schema.is_multiple(source, first) {
        debug!(field = name, "ordinary field");
        return match target.child(target_node, name) {
            Some(target_field) => Ok(Resolved {
                target: target_field,
                source: first,
                rebuilt: false,
            }),
            None => Err(StructuralMismatch::MissingInTarget {
                field: name.to_owned(),
            }),
        };
    }

    let occurrence = occurrences.next(name);
    debug!(field = name, occurrence, "array item");

    let item = match locate_item(source, source_node, name, occurrence) {
        ItemLocation::Found(item) => item,
        ItemLocation::Missing => {
            return Err(StructuralMismatch::MissingInSource {
                field: name.to_owned(),
            })
        }
        ItemLocation::NameMismatch { found } => {
            return Err(StructuralMismatch::ItemNameMismatch {
                field: name.to_owned(),
                occurrence,
                found,
            })
        }
        ItemLocation::OutOfRange => {
            return Err(StructuralMismatch::ItemOutOfRange {
                field: name.to_owned(),
                occurrence,
            })
        }
    };

    match schema.primary_key(source, item) {
        None => {
            if occurrences.cleared.insert(name.to_owned()) {
                let removed = target.remove_children_named(target_node, name);
                debug!(field = name, removed = removed.len(), "no primary key; target array cleared");
                occurrences
                    .replaced
                    .entry(name.to_owned())
                    .or_insert(removed);
            }
            debug!(field = name, "creating new item");
            Ok(Resolved {
                target: schema.append_item(target, target_node, name),
                source: item,
                rebuilt: true,
            })
        }
        Some(key) => {
            if occurrences.cleared.remove(name) {
                debug!(field = name, "keyed item; leaving no-key mode");
            }
            let target_item = match schema.child_by_key(target, target_node, name, &key) {
                Some(existing) => existing,
                None => {
                    debug!(field = name, key = %key, "no item with this key; creating new item");
                    schema.append_item(target, target_node, name)
                }
            };
            Ok(Resolved {
                target: target_item,
                source: item,
                rebuilt: false,
            })
        }
    }
}

/// Copy a scalar patch value onto the target. Returns whether it changed.
fn apply_scalar(
    target: &mut Document,
    target_field: NodeId,
    patch: &Document,
    field: NodeId,
    default_only: bool,
) -> bool {
    let name = patch.name(field);
    if default_only && target.value(target_field).is_some() {
        debug!(field = name, "default value not applied; target already set");
        return false;
    }
    let value = patch.value(field);
    if target.value(target_field) == value {
        return false;
    }
    debug!(field = name, old = ?target.value(target_field), new = ?value, "value updated");
    target.set_value(target_field, value.map(str::to_owned));
    true
}

fn same_items(doc: &Document, before: &[NodeId], after: &[NodeId]) -> bool {
    before.len() == after.len()
        && before
            .iter()
            .zip(after)
            .all(|(&a, &b)| same_subtree(doc, a, b))
}

fn same_subtree(doc: &Document, a: NodeId, b: NodeId) -> bool {
    doc.name(a) == doc.name(b)
        && doc.value(a) == doc.value(b)
        && same_items(doc, doc.children(a), doc.children(b))
}
