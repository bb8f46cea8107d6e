//! Error types for the GIF search library.

use std::fmt;

use thiserror::Error;

/// Result type alias for provider and aggregator operations.
pub type Result<T> = std::result::Result<T, GifError>;

/// Provider operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Trending,
    Random,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Search => "search",
            Operation::Trending => "trending",
            Operation::Random => "random",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while talking to the GIF provider.
#[derive(Error, Debug)]
pub enum GifError {
    /// Provider cannot be used at all (e.g. missing access credential).
    #[error("{0}")]
    Configuration(String),

    /// Provider answered with HTTP 429.
    #[error("{0}")]
    RateLimited(String),

    /// Any other transport, status or parse failure.
    #[error("Failed {operation}: {message}")]
    Provider {
        operation: Operation,
        message: String,
    },
}

impl GifError {
    /// Builds a provider failure for the given operation.
    pub fn provider(operation: Operation, message: impl Into<String>) -> Self {
        Self::Provider {
            operation,
            message: message.into(),
        }
    }

    /// Returns true if the provider rate-limited the caller.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Returns true for fatal configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
