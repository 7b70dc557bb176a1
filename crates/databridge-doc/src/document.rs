//! Arena-backed document tree.
//!
//! All nodes of a [`Document`] live in one `Vec`, addressed by [`NodeId`].
//! Structural edits only rewrite parent/children links, so an id handed out
//! once stays valid for the lifetime of the document.

use std::fmt;
use std::sync::Arc;

use crate::form::FormElem;

/// Index of a node inside its [`Document`].
///
/// Ids are only meaningful for the document that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A single element of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) form: Option<Arc<FormElem>>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            value: None,
            attrs: Vec::new(),
            children: Vec::new(),
            parent,
            form: None,
        }
    }
}

/// A hierarchical XML document.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    form_ref: Option<String>,
}

impl Document {
    /// Create a document holding a single empty root element.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_name.into(), None)],
            root: NodeId(0),
            form_ref: None,
        }
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Form reference declared by the root's `SPXML-FORM` attribute.
    pub fn form_ref(&self) -> Option<&str> {
        self.form_ref.as_deref()
    }

    pub fn set_form_ref(&mut self, form_ref: Option<String>) {
        self.form_ref = form_ref;
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Scalar value of a node, `None` when null.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.node(id).value.as_deref()
    }

    /// Overwrite a node's value. Empty strings are stored as null.
    pub fn set_value(&mut self, id: NodeId, value: Option<String>) {
        self.node_mut(id).value = value.filter(|v| !v.is_empty());
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        &self.node(id).attrs
    }

    /// Set an attribute, replacing any existing value under the same name.
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let attrs = &mut self.node_mut(id).attrs;
        match attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => attrs.push((name, value)),
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.node(id).children.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// First child named `name`.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.name(child) == name)
    }

    /// Child at position `pos` among all children of `id`.
    pub fn child_at(&self, id: NodeId, pos: usize) -> Option<NodeId> {
        self.children(id).get(pos).copied()
    }

    /// Index of `id` among its parent's children. `None` for the root and
    /// for detached nodes.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// All children of `id` named `name`, in document order.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.name(child) == name)
    }

    /// Form metadata attached to a node, if the node is bound.
    pub fn form(&self, id: NodeId) -> Option<&Arc<FormElem>> {
        self.node(id).form.as_ref()
    }

    pub fn set_form(&mut self, id: NodeId, form: Option<Arc<FormElem>>) {
        self.node_mut(id).form = form;
    }

    /// Append a new empty element under `parent` and return its id.
    pub fn append_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    /// Detach `child` from `parent`. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.node_mut(parent).children;
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return false;
        };
        children.remove(pos);
        self.node_mut(child).parent = None;
        true
    }

    /// Detach every child of `parent` named `name` and return them in their
    /// former order. Detached subtrees stay readable.
    pub fn remove_children_named(&mut self, parent: NodeId, name: &str) -> Vec<NodeId> {
        let doomed: Vec<NodeId> = self.children_named(parent, name).collect();
        for &child in &doomed {
            self.remove_child(parent, child);
        }
        doomed
    }

    /// Replace the child order of `parent`.
    ///
    /// Every id in `children` must already be a child of `parent`; children
    /// left out of the new order are detached.
    pub fn replace_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        debug_assert!(children.iter().all(|&c| self.parent(c) == Some(parent)));
        let previous = std::mem::replace(&mut self.node_mut(parent).children, children);
        for child in previous {
            if !self.children(parent).contains(&child) {
                self.node_mut(child).parent = None;
            }
        }
    }

    /// `id` and all of its attached descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Resolve a slash-separated path of child names from the root,
    /// following the first occurrence at each step. An empty path is the root.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root, |node, segment| self.child(node, segment))
    }

    /// Value of the node at `path`, see [`Document::find`].
    pub fn value_at(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(|node| self.value(node))
    }
}
