//! # gif-search
//!
//! Paginated GIF search aggregation on top of the GIPHY API.
//!
//! This library turns a sequence of provider page fetches into a stable,
//! client-visible result list, with support for:
//!
//! - Append-only pagination with deduplication by GIF id
//! - Skipping pages the provider serves as full duplicates
//! - Rate-limit fallback to per-query cached first pages
//! - A random initial sample with a trending fallback
//!
//! ## Example
//!
//! ```rust,no_run
//! use gif_search::{Aggregator, GiphyClient, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GiphyClient::new(ProviderConfig::from_env())?;
//!     let aggregator = Aggregator::new(client);
//!
//!     let state = aggregator.search("cats", true).await;
//!     if state.has_more {
//!         aggregator.load_more().await;
//!     }
//!
//!     for gif in aggregator.state().gifs {
//!         println!("{}: {}", gif.title, gif.url);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod cache;
mod config;
mod error;
mod gif;
mod giphy;
mod provider;
mod query;
mod session;

pub use aggregator::{Aggregator, RATE_LIMIT_ERROR, RATE_LIMIT_FALLBACK_NOTICE};
pub use cache::{CacheEntry, ResultCache};
pub use config::{AggregatorConfig, ProviderConfig, API_KEY_ENV};
pub use error::{GifError, Operation, Result};
pub use gif::{Gif, GifImage, Page};
pub use giphy::GiphyClient;
pub use provider::GifProvider;
pub use query::QueryKey;
pub use session::{SessionError, SessionState, Severity};
