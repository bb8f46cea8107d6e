//! Query key normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized query string used as the cache key.
///
/// The empty key stands for "no active query", i.e. the trending feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey(String);

impl QueryKey {
    /// Normalizes raw user input by trimming surrounding whitespace.
    pub fn new(query: impl AsRef<str>) -> Self {
        Self(query.as_ref().trim().to_string())
    }

    /// The trending sentinel.
    pub fn trending() -> Self {
        Self::default()
    }

    /// Returns true if this key targets the trending feed.
    pub fn is_trending(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the normalized query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_trending() {
            f.write_str("<trending>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for QueryKey {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}
