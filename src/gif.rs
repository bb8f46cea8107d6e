//! GIF result types and provider response envelopes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One media rendition of a GIF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifImage {
    /// Animated GIF URL.
    #[serde(default)]
    pub url: String,
    /// Width in pixels, as reported by the provider.
    #[serde(default)]
    pub width: String,
    /// Height in pixels, as reported by the provider.
    #[serde(default)]
    pub height: String,
    /// Optional MP4 transcode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp4: Option<String>,
}

/// A single GIF result. Identity is `id`; everything else is display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gif {
    /// Stable provider identifier.
    pub id: String,
    /// Canonical share URL.
    #[serde(default)]
    pub url: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Media renditions keyed by rendition name (`fixed_height`, `original`, ...).
    #[serde(default)]
    pub images: BTreeMap<String, GifImage>,
}

impl Gif {
    /// Creates a GIF with no media renditions.
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            images: BTreeMap::new(),
        }
    }

    /// Adds a media rendition.
    pub fn with_image(mut self, name: impl Into<String>, image: GifImage) -> Self {
        self.images.insert(name.into(), image);
        self
    }

    /// Fixed-height preview used for grids.
    pub fn fixed_height(&self) -> Option<&GifImage> {
        self.images.get("fixed_height")
    }

    /// Full-size original rendition.
    pub fn original(&self) -> Option<&GifImage> {
        self.images.get("original")
    }
}

/// One provider page: items plus the provider's pagination report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Items in provider order.
    pub items: Vec<Gif>,
    /// Provider-reported total for the query. Advisory only.
    pub total_count: usize,
    /// Offset this page started at.
    pub offset: usize,
}

impl Page {
    /// Creates a page.
    pub fn new(items: Vec<Gif>, total_count: usize, offset: usize) -> Self {
        Self {
            items,
            total_count,
            offset,
        }
    }

    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset a continuation should start from.
    pub fn next_offset(&self) -> usize {
        self.offset + self.items.len()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub offset: usize,
}

/// `{ data: [...], pagination: {...} }` as returned by search and trending.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    pub data: Vec<Gif>,
    pub pagination: Pagination,
}

impl From<ListEnvelope> for Page {
    fn from(envelope: ListEnvelope) -> Self {
        Page::new(
            envelope.data,
            envelope.pagination.total_count,
            envelope.pagination.offset,
        )
    }
}

/// `{ data: {...} }` as returned by random.
#[derive(Debug, Deserialize)]
pub(crate) struct SingleEnvelope {
    pub data: Gif,
}
