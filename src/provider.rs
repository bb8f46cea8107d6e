//! GIF provider trait.

use async_trait::async_trait;

use crate::{Gif, Page, Result};

/// Remote source of GIFs.
///
/// Implementations never swallow failures: every error is classified as
/// [`GifError::Configuration`](crate::GifError::Configuration),
/// [`GifError::RateLimited`](crate::GifError::RateLimited) or
/// [`GifError::Provider`](crate::GifError::Provider).
#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Keyword search starting at `offset`.
    async fn search(&self, query: &str, offset: usize, limit: usize) -> Result<Page>;

    /// Current trending feed. Always starts at offset 0.
    async fn trending(&self, limit: usize) -> Result<Page>;

    /// `count` independent random GIFs. Fails as a whole if any single fetch fails.
    async fn random(&self, count: usize) -> Result<Vec<Gif>>;
}
