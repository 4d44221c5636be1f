//! Process-wide registry instance.
//!
//! Code that holds its own [`NamespaceRegistry`] should pass it around
//! instead. This shared instance serves callers that expect one global
//! namespace tree. Every operation holds the lock for its whole duration,
//! so concurrent `define` calls on the same path cannot create duplicates.

use crate::core::error::NamespaceError;
use crate::core::loader::HostLoader;
use crate::core::node::{NodeId, PathLoader};
use crate::core::registry::NamespaceRegistry;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// The shared registry, created empty on first access.
pub fn instance() -> &'static Mutex<NamespaceRegistry> {
    static REGISTRY: OnceLock<Mutex<NamespaceRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(NamespaceRegistry::new()))
}

/// Lock the shared registry for a sequence of operations.
pub fn lock() -> Result<MutexGuard<'static, NamespaceRegistry>, NamespaceError> {
    instance().lock().map_err(|_| NamespaceError::LockPoisoned)
}

pub fn define(path: &str) -> Result<NodeId, NamespaceError> {
    lock()?.define(path)
}

pub fn use_namespace(path: &str) -> Result<NodeId, NamespaceError> {
    lock()?.use_namespace(path)
}

/// Install `loader` on the shared root.
pub fn set_loader(loader: PathLoader) -> Result<(), NamespaceError> {
    lock()?.set_loader(loader);
    Ok(())
}

/// Resolve under the lock, then load with the lock released so a host
/// loader may call back into this module. Custom path loaders still run
/// while the lock is held and must not touch the shared instance.
pub fn require<H>(id: NodeId, class_name: &str, host: &H) -> Result<H::Module, NamespaceError>
where
    H: HostLoader + ?Sized,
{
    let path = lock()?.resolve(id, class_name)?;
    host.load(&path).map_err(NamespaceError::Loader)
}

/// Empty the shared registry. Meant for test isolation.
pub fn reset() -> Result<(), NamespaceError> {
    lock()?.reset();
    Ok(())
}
