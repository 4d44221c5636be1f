//! The namespace registry: an arena of [`NamespaceNode`]s under one root.
//!
//! `define` creates namespace chains on demand, `use_namespace` only walks
//! existing ones, and `require` turns a class name on a node into a module
//! path that is handed to a [`HostLoader`].

use crate::core::config::RegistryConfig;
use crate::core::error::NamespaceError;
use crate::core::loader::HostLoader;
use crate::core::node::{ClassEntry, NamespaceNode, NodeId, NodeRef, PathLoader};
use crate::core::path::{NamespacePath, normalize_lexically};
use serde_json::Value as JsonValue;
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, trace};

pub struct NamespaceRegistry {
    nodes: Vec<NamespaceNode>,
    config: RegistryConfig,
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self {
            nodes: vec![NamespaceNode::root()],
            config: RegistryConfig::default(),
        }
    }
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, NamespaceError> {
        config.validate()?;
        Ok(Self {
            nodes: vec![NamespaceNode::root()],
            config,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Drop every namespace and loader, leaving a fresh root.
    ///
    /// Ids handed out before the reset no longer resolve.
    pub fn reset(&mut self) {
        debug!(nodes = self.nodes.len(), "resetting namespace registry");
        self.nodes.clear();
        self.nodes.push(NamespaceNode::root());
    }

    pub fn node(&self, id: NodeId) -> Result<&NamespaceNode, NamespaceError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| NamespaceError::NotFound(format!("node #{}", id.0)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NamespaceNode, NamespaceError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| NamespaceError::NotFound(format!("node #{}", id.0)))
    }

    pub fn view(&self, id: NodeId) -> Result<NodeRef<'_>, NamespaceError> {
        let node = self.node(id)?;
        Ok(NodeRef::new(self, id, node))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map(|n| n.children()).unwrap_or_default()
    }

    pub fn get_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let found = self.nodes.get(id.0).and_then(|n| n.child(name));
        trace!(parent = id.0, child = name, found = found.is_some(), "child lookup");
        found
    }

    /// Return the child called `name`, creating it if needed.
    pub fn add_child(&mut self, id: NodeId, name: &str) -> Result<NodeId, NamespaceError> {
        if name.is_empty() {
            return Err(NamespaceError::InvalidArgument(
                "Only the root namespace may have an empty name".to_string(),
            ));
        }
        if name.contains(self.config.separator) {
            return Err(NamespaceError::InvalidArgument(format!(
                "Namespace segment {:?} contains the separator {:?}",
                name, self.config.separator
            )));
        }
        if let Some(existing) = self.node(id)?.child(name) {
            return Ok(existing);
        }
        Ok(self.create_child(id, name))
    }

    /// `parent` must already be a valid index.
    fn create_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let child = NodeId(self.nodes.len());
        self.nodes
            .push(NamespaceNode::new(name.to_string(), Some(parent)));
        self.nodes[parent.0].link_child(name.to_string(), child);
        debug!(parent = parent.0, child = child.0, name, "created namespace node");
        child
    }

    /// Declare `name` at `location` on a node. Keeps the first location when
    /// the class is already declared. Returns `id` for chaining.
    pub fn add_class(
        &mut self,
        id: NodeId,
        name: &str,
        location: &str,
    ) -> Result<NodeId, NamespaceError> {
        if self.node_mut(id)?.insert_class(name, location) {
            debug!(node = id.0, class = name, location, "declared class");
        }
        Ok(id)
    }

    pub fn get_class(&self, id: NodeId, name: &str) -> Option<&ClassEntry> {
        self.nodes.get(id.0).and_then(|n| n.class(name))
    }

    pub fn classes(&self, id: NodeId) -> &[ClassEntry] {
        self.nodes.get(id.0).map(|n| n.classes()).unwrap_or_default()
    }

    /// Install a custom loader on one node.
    pub fn set_node_loader(&mut self, id: NodeId, loader: PathLoader) -> Result<(), NamespaceError> {
        self.node_mut(id)?.loader = Some(loader);
        debug!(node = id.0, "installed custom loader");
        Ok(())
    }

    pub fn clear_node_loader(&mut self, id: NodeId) -> Result<(), NamespaceError> {
        self.node_mut(id)?.loader = None;
        Ok(())
    }

    /// Install a loader on the root node.
    pub fn set_loader(&mut self, loader: PathLoader) {
        self.nodes[NodeId::ROOT.0].loader = Some(loader);
        debug!("installed custom loader on root namespace");
    }

    /// Create or fetch the node chain for `path`.
    pub fn define(&mut self, path: &str) -> Result<NodeId, NamespaceError> {
        let path = NamespacePath::parse(path, self.config.separator)?;
        Ok(self.define_path(&path))
    }

    pub fn define_path(&mut self, path: &NamespacePath) -> NodeId {
        let mut current = NodeId::ROOT;
        for segment in path.segments() {
            current = match self.nodes[current.0].child(segment) {
                Some(child) => child,
                None => self.create_child(current, segment),
            };
        }
        current
    }

    /// Fetch the existing node chain for `path` without creating anything.
    pub fn use_namespace(&self, path: &str) -> Result<NodeId, NamespaceError> {
        let parsed = NamespacePath::parse(path, self.config.separator)?;
        self.use_path(&parsed)
    }

    pub fn use_path(&self, path: &NamespacePath) -> Result<NodeId, NamespaceError> {
        let mut current = NodeId::ROOT;
        for segment in path.segments() {
            current = self.nodes[current.0]
                .child(segment)
                .ok_or_else(|| NamespaceError::NotFound(path.join(self.config.separator)))?;
        }
        Ok(current)
    }

    /// Non-empty segment names from the root down to `id`.
    pub fn segments(&self, id: NodeId) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut current = self.nodes.get(id.0);
        while let Some(node) = current {
            if !node.name.is_empty() {
                segments.push(node.name.as_str());
            }
            current = node.parent.and_then(|p| self.nodes.get(p.0));
        }
        segments.reverse();
        segments
    }

    pub fn qualified_name(&self, id: NodeId) -> String {
        self.segments(id)
            .join(self.config.separator.to_string().as_str())
    }

    /// Base directory for default paths, consulted on every call.
    pub fn base_dir(&self) -> Result<PathBuf, NamespaceError> {
        match &self.config.base_dir {
            Some(dir) if dir.is_absolute() => Ok(dir.clone()),
            Some(dir) => Ok(env::current_dir()?.join(dir)),
            None => Ok(env::current_dir()?),
        }
    }

    /// `<base>/<segments...>/<class_name>.<extension>`, normalized.
    pub fn default_path(&self, id: NodeId, class_name: &str) -> Result<PathBuf, NamespaceError> {
        let mut path = self.base_dir()?;
        for segment in self.segments(id) {
            path.push(segment);
        }
        path.push(format!("{}.{}", class_name, self.config.extension));
        Ok(normalize_lexically(&path))
    }

    /// The loader that applies to `id`: its own, or with inheritance enabled
    /// the nearest ancestor's.
    fn applicable_loader(&self, id: NodeId) -> Option<&PathLoader> {
        let mut current = self.nodes.get(id.0);
        while let Some(node) = current {
            if let Some(loader) = &node.loader {
                return Some(loader);
            }
            if !self.config.inherit_loaders {
                return None;
            }
            current = node.parent.and_then(|p| self.nodes.get(p.0));
        }
        None
    }

    /// The module path `require` would hand to the host loader.
    pub fn resolve(&self, id: NodeId, class_name: &str) -> Result<PathBuf, NamespaceError> {
        if class_name.is_empty() {
            return Err(NamespaceError::InvalidArgument(
                "Class name must be a non-empty string".to_string(),
            ));
        }
        let view = self.view(id)?;
        match self.applicable_loader(id) {
            Some(loader) => {
                let path = (**loader)(&view, class_name)?;
                debug!(node = id.0, class = class_name, path = %path.display(), "resolved via custom loader");
                Ok(path)
            }
            None => {
                let path = self.default_path(id, class_name)?;
                debug!(node = id.0, class = class_name, path = %path.display(), "resolved via default convention");
                Ok(path)
            }
        }
    }

    /// Resolve `class_name` on `id` and load it through `host`.
    ///
    /// Nothing is cached here: each call resolves again and calls the host.
    pub fn require<H>(&self, id: NodeId, class_name: &str, host: &H) -> Result<H::Module, NamespaceError>
    where
        H: HostLoader + ?Sized,
    {
        let path = self.resolve(id, class_name)?;
        host.load(&path).map_err(NamespaceError::Loader)
    }

    /// Diagnostic dump of the tree below the root.
    pub fn snapshot(&self) -> JsonValue {
        self.snapshot_node(NodeId::ROOT)
    }

    fn snapshot_node(&self, id: NodeId) -> JsonValue {
        let node = &self.nodes[id.0];
        let children: Vec<JsonValue> = node
            .children
            .iter()
            .map(|child| self.snapshot_node(*child))
            .collect();
        serde_json::json!({
            "name": node.name,
            "qualified_name": self.qualified_name(id),
            "classes": node.classes,
            "has_loader": node.loader.is_some(),
            "children": children,
        })
    }
}

impl fmt::Debug for NamespaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceRegistry")
            .field("nodes", &self.nodes.len())
            .field("config", &self.config)
            .finish()
    }
}
