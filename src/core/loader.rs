//! The host module-loading seam.
//!
//! The registry only computes paths. Turning a path into a loaded module is
//! the host's job, and whatever the host reports as a failure reaches the
//! caller of `require` unchanged.

use std::path::Path;

pub trait HostLoader {
    type Module;

    fn load(&self, path: &Path) -> anyhow::Result<Self::Module>;
}

impl<F, M> HostLoader for F
where
    F: Fn(&Path) -> anyhow::Result<M>,
{
    type Module = M;

    fn load(&self, path: &Path) -> anyhow::Result<M> {
        self(path)
    }
}
