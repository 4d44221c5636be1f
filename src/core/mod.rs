//! Core namespace tree: nodes, the registry that owns them, path handling,
//! configuration and the host loader seam.

pub mod config;
pub mod error;
pub mod global;
pub mod loader;
pub mod node;
pub mod path;
pub mod registry;
