//! Namespace tree nodes.
//!
//! Nodes live in the registry's arena and refer to each other by [`NodeId`].
//! The parent link is a plain index, so a child never owns its parent.

use crate::core::error::NamespaceError;
use crate::core::registry::NamespaceRegistry;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Index of a node inside a [`NamespaceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node of every registry.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// A class declared on a namespace node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub location: String,
}

/// Custom resolver computing the module path for a class name.
///
/// The returned path is handed to the host loader unchanged.
pub type PathLoader =
    Arc<dyn Fn(&NodeRef<'_>, &str) -> Result<PathBuf, NamespaceError> + Send + Sync>;

/// Wrap a closure as a [`PathLoader`].
pub fn path_loader<F>(f: F) -> PathLoader
where
    F: Fn(&NodeRef<'_>, &str) -> Result<PathBuf, NamespaceError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One segment of the namespace tree.
pub struct NamespaceNode {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    child_index: FxHashMap<String, NodeId>,
    pub(crate) classes: Vec<ClassEntry>,
    pub(crate) loader: Option<PathLoader>,
}

impl NamespaceNode {
    pub(crate) fn root() -> Self {
        Self::new(String::new(), None)
    }

    pub(crate) fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            child_index: FxHashMap::default(),
            classes: Vec::new(),
            loader: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.child_index.get(name).copied()
    }

    /// Declared classes in insertion order.
    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    pub(crate) fn link_child(&mut self, name: String, id: NodeId) {
        self.child_index.insert(name, id);
        self.children.push(id);
    }

    /// Returns false when a class with that name already exists.
    pub(crate) fn insert_class(&mut self, name: &str, location: &str) -> bool {
        if self.class(name).is_some() {
            return false;
        }
        self.classes.push(ClassEntry {
            name: name.to_string(),
            location: location.to_string(),
        });
        true
    }
}

impl fmt::Debug for NamespaceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("classes", &self.classes)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

/// Read-only view of a node together with its registry.
///
/// This is what custom loaders receive: enough to inspect the node's
/// position in the tree without being able to mutate it.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    registry: &'a NamespaceRegistry,
    id: NodeId,
    node: &'a NamespaceNode,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(registry: &'a NamespaceRegistry, id: NodeId, node: &'a NamespaceNode) -> Self {
        Self { registry, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node
            .parent
            .and_then(|parent| self.registry.view(parent).ok())
    }

    pub fn node(&self) -> &'a NamespaceNode {
        self.node
    }

    pub fn registry(&self) -> &'a NamespaceRegistry {
        self.registry
    }

    /// Non-empty segment names from the root down to this node.
    pub fn segments(&self) -> Vec<&'a str> {
        self.registry.segments(self.id)
    }

    /// Segments joined with the registry separator, e.g. `Foo\Bar`.
    pub fn qualified_name(&self) -> String {
        self.registry.qualified_name(self.id)
    }

    pub fn get_class(&self, name: &str) -> Option<&'a ClassEntry> {
        self.node.class(name)
    }

    /// The path the default convention would produce for `class_name`.
    pub fn default_path(&self, class_name: &str) -> Result<PathBuf, NamespaceError> {
        self.registry.default_path(self.id, class_name)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.node.name)
            .finish()
    }
}
