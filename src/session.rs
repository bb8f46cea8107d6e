//! Client-visible session state.

use serde::{Deserialize, Serialize};

use crate::{Gif, QueryKey};

/// How serious a surfaced message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; results are still shown.
    Info,
    /// The operation failed.
    Error,
}

/// Human-readable message surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
    pub severity: Severity,
    pub message: String,
}

impl SessionError {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Operation failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Returns true for failures (as opposed to notices).
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Snapshot of everything the presentation layer needs to render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Visible list; unique by `id`, in order of first appearance.
    pub gifs: Vec<Gif>,
    pub loading: bool,
    pub error: Option<SessionError>,
    pub has_more: bool,
    pub total_count: usize,
    pub next_offset: usize,
    pub active_query: QueryKey,
}

impl SessionState {
    /// Number of visible items.
    pub fn len(&self) -> usize {
        self.gifs.len()
    }

    /// Returns true if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.gifs.is_empty()
    }

    /// Identifiers of the visible items, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.gifs.iter().map(|gif| gif.id.as_str()).collect()
    }
}
