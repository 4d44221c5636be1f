//! Namespace path parsing and filesystem path assembly.
//!
//! Namespace paths use a backslash between segments (`Vendor\Http\Client`),
//! independent of the host filesystem separator.

use crate::core::error::NamespaceError;
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Separator used between namespace segments unless configured otherwise.
pub const DEFAULT_SEPARATOR: char = '\\';

/// A validated, non-empty sequence of namespace segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// Parse with the default backslash separator.
    pub fn new(raw: &str) -> Result<Self, NamespaceError> {
        Self::parse(raw, DEFAULT_SEPARATOR)
    }

    /// Split `raw` on `separator`.
    ///
    /// Empty input and empty segments are rejected: only the root may carry
    /// an empty name.
    pub fn parse(raw: &str, separator: char) -> Result<Self, NamespaceError> {
        if raw.is_empty() {
            return Err(NamespaceError::InvalidArgument(
                "Namespace name must be a non-empty string".to_string(),
            ));
        }
        let segments: Vec<String> = raw.split(separator).map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(NamespaceError::InvalidArgument(format!(
                "Namespace {:?} contains an empty segment",
                raw
            )));
        }
        Ok(Self { segments })
    }

    /// Parse an untyped value, as found in manifests or JSON payloads.
    pub fn from_value(value: &JsonValue, separator: char) -> Result<Self, NamespaceError> {
        match value {
            JsonValue::String(s) => Self::parse(s, separator),
            other => Err(NamespaceError::InvalidArgument(format!(
                "Namespace name must be a non-empty string, got {}",
                other
            ))),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Render back to a string using `separator`.
    pub fn join(&self, separator: char) -> String {
        self.segments.join(separator.to_string().as_str())
    }
}

impl TryFrom<&JsonValue> for NamespacePath {
    type Error = NamespaceError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        Self::from_value(value, DEFAULT_SEPARATOR)
    }
}

impl TryFrom<&str> for NamespacePath {
    type Error = NamespaceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join(DEFAULT_SEPARATOR))
    }
}

/// Resolve `path` lexically: drop `.` components and fold `..` into the
/// preceding component without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
