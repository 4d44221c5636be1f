//! Memoizing wrapper around a host loader.
//!
//! The registry never caches; a host that wants "load once" semantics wraps
//! its loader in [`CachingLoader`].

use crate::core::loader::HostLoader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

pub struct CachingLoader<H: HostLoader> {
    inner: H,
    cache: Mutex<HashMap<PathBuf, H::Module>>,
}

impl<H: HostLoader> CachingLoader<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// The cache map stays consistent across a panic mid-insert, so a
    /// poisoned lock is recovered rather than reported.
    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, H::Module>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget `path` so the next load reaches the inner loader again.
    pub fn evict(&self, path: &Path) -> bool {
        self.entries().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl<H> HostLoader for CachingLoader<H>
where
    H: HostLoader,
    H::Module: Clone,
{
    type Module = H::Module;

    fn load(&self, path: &Path) -> anyhow::Result<H::Module> {
        if let Some(module) = self.entries().get(path) {
            trace!(path = %path.display(), "module cache hit");
            return Ok(module.clone());
        }
        // Failures are not cached, a later load may succeed.
        let module = self.inner.load(path)?;
        self.entries().insert(path.to_path_buf(), module.clone());
        Ok(module)
    }
}
