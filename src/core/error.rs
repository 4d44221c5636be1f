use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamespaceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Namespace {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Loader(anyhow::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Global namespace registry lock poisoned")]
    LockPoisoned,
}

impl NamespaceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
