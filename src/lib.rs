//! nsregistry: hierarchical namespaces over a flat module system.
//!
//! Namespaces are backslash-separated paths (`Vendor\Http`) arranged in a
//! tree. Each node can declare classes and carry a custom loader. Asking a
//! node to `require` a class turns the class name into a module path and
//! hands that path to the host's module loader.
//!
//! # Example
//!
//! ```no_run
//! use nsregistry::{NamespaceRegistry, SourceLoader};
//!
//! let mut registry = NamespaceRegistry::new();
//! let http = registry.define("Vendor\\Http")?;
//! registry.add_class(http, "Client", "lib/http/client.js")?;
//!
//! // Later, anywhere holding the registry:
//! let http = registry.use_namespace("Vendor\\Http")?;
//! // Loads `<cwd>/Vendor/Http/Client.js`.
//! let source = registry.require(http, "Client", &SourceLoader::new())?;
//! # Ok::<(), nsregistry::NamespaceError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: the tree, the registry, configuration, errors and the
//!   process-wide instance
//! - [`loaders`]: ready-made host and path loaders

pub mod core;
pub mod loaders;

pub use crate::core::config::{Manifest, RegistryConfig, load_manifest};
pub use crate::core::error::NamespaceError;
pub use crate::core::loader::HostLoader;
pub use crate::core::node::{ClassEntry, NamespaceNode, NodeId, NodeRef, PathLoader, path_loader};
pub use crate::core::path::NamespacePath;
pub use crate::core::registry::NamespaceRegistry;
pub use crate::loaders::{CachingLoader, SourceLoader, declared_location};
