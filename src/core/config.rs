//! Registry settings and the namespace manifest.
//!
//! A manifest is a TOML file that configures a registry and pre-declares
//! namespaces with their classes:
//!
//! ```toml
//! [registry]
//! extension = "js"
//! base_dir = "app"
//!
//! [[namespace]]
//! path = "Vendor\\Http"
//! classes = { Client = "lib/http/client.js" }
//! ```

use crate::core::error::NamespaceError;
use crate::core::node::NodeId;
use crate::core::path::{DEFAULT_SEPARATOR, NamespacePath};
use crate::core::registry::NamespaceRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default module file extension appended by the default path convention.
pub const DEFAULT_EXTENSION: &str = "js";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Separator between namespace segments.
    pub separator: char,
    /// Module file extension, without the leading dot.
    pub extension: String,
    /// Root of default module paths. `None` means the working directory at
    /// resolution time; a relative value is joined onto it.
    pub base_dir: Option<PathBuf>,
    /// Whether nodes without a loader use the nearest ancestor's loader.
    pub inherit_loaders: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            extension: DEFAULT_EXTENSION.to_string(),
            base_dir: None,
            inherit_loaders: true,
        }
    }
}

impl RegistryConfig {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_inherit_loaders(mut self, inherit: bool) -> Self {
        self.inherit_loaders = inherit;
        self
    }

    pub fn validate(&self) -> Result<(), NamespaceError> {
        if self.extension.starts_with('.') {
            return Err(NamespaceError::Config(format!(
                "extension {:?} must not start with a dot",
                self.extension
            )));
        }
        if self.separator == '/' || self.separator.is_whitespace() {
            return Err(NamespaceError::Config(format!(
                "separator {:?} is not allowed",
                self.separator
            )));
        }
        Ok(())
    }
}

/// A namespace declared in a manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamespaceDecl {
    /// Kept untyped so a non-string path is reported as an invalid argument
    /// rather than a parse error.
    pub path: JsonValue,
    #[serde(default)]
    pub classes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default, rename = "namespace")]
    pub namespaces: Vec<NamespaceDecl>,
}

impl Manifest {
    pub fn from_toml_str(content: &str) -> Result<Self, NamespaceError> {
        let manifest: Manifest =
            toml::from_str(content).map_err(|e| NamespaceError::Config(e.to_string()))?;
        manifest.registry.validate()?;
        Ok(manifest)
    }

    /// Define every declared namespace and its classes on `registry`.
    ///
    /// Returns the node of each declaration, in manifest order.
    pub fn apply(&self, registry: &mut NamespaceRegistry) -> Result<Vec<NodeId>, NamespaceError> {
        let separator = registry.config().separator;
        let mut defined = Vec::with_capacity(self.namespaces.len());
        for decl in &self.namespaces {
            let path = NamespacePath::from_value(&decl.path, separator)?;
            let id = registry.define_path(&path);
            for (class, location) in &decl.classes {
                registry.add_class(id, class, location)?;
            }
            defined.push(id);
        }
        Ok(defined)
    }

    /// Build a registry configured by this manifest with its namespaces applied.
    pub fn into_registry(self) -> Result<NamespaceRegistry, NamespaceError> {
        let mut registry = NamespaceRegistry::with_config(self.registry.clone())?;
        self.apply(&mut registry)?;
        Ok(registry)
    }
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest, NamespaceError> {
    let content = fs::read_to_string(path).map_err(NamespaceError::IoError)?;
    Manifest::from_toml_str(&content)
}
