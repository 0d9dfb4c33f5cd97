use std::fmt;

use serde::{Deserialize, Serialize};

/// Slash-separated document path, e.g. `orgs/{orgId}/users/{uid}`.
///
/// Paths with an even number of segments address documents; dropping the
/// last segment yields the enclosing collection. [`crate::layout`] builds
/// the fixed paths of the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocPath(String);

impl DocPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append one path segment.
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, segment))
    }

    /// True when `self` lives strictly below `other` in the document tree.
    pub fn is_descendant_of(&self, other: &DocPath) -> bool {
        self.0.len() > other.0.len() + 1
            && self.0.starts_with(other.as_str())
            && self.0.as_bytes()[other.0.len()] == b'/'
    }

    /// True when `self` is a direct child of the collection path `parent`.
    pub fn is_child_of(&self, parent: &DocPath) -> bool {
        self.is_descendant_of(parent) && !self.0[parent.0.len() + 1..].contains('/')
    }

    /// Last path segment.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
