use crate::core::loader::HostLoader;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Host loader that reads the module file as UTF-8 source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceLoader;

impl SourceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl HostLoader for SourceLoader {
    type Module = String;

    fn load(&self, path: &Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("Cannot find module '{}'", path.display()))
    }
}
