//! GIPHY provider client using reqwest.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::gif::{ListEnvelope, SingleEnvelope};
use crate::{Gif, GifError, GifProvider, Operation, Page, ProviderConfig, Result};

const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded";
const MISSING_KEY_MESSAGE: &str = "Missing GIPHY API key";

/// GIPHY gifs API client.
pub struct GiphyClient {
    config: ProviderConfig,
    client: Client,
}

impl GiphyClient {
    /// Creates a client from the given configuration.
    ///
    /// A missing credential does not fail here; every operation refuses to run
    /// instead, without touching the network.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gif-search/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| GifError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Creates a client with a custom reqwest client.
    pub fn with_client(config: ProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key()
            .ok_or_else(|| GifError::Configuration(MISSING_KEY_MESSAGE.to_string()))
    }

    fn endpoint(&self, operation: Operation, params: &[(&str, String)]) -> Result<Url> {
        let api_key = self.api_key()?;
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, operation))
            .map_err(|e| GifError::Configuration(format!("Invalid base URL '{}': {}", base, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", api_key);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: Operation, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("GIPHY {} request failed: {}", operation, e);
            GifError::provider(operation, e.to_string())
        })?;

        classify_status(operation, response.status())?;
        let text = response
            .text()
            .await
            .map_err(|e| GifError::provider(operation, e.to_string()))?;
        parse_body(operation, &text)
    }
}

/// Maps a response status onto the error taxonomy. 429 wins over everything else.
pub(crate) fn classify_status(operation: Operation, status: StatusCode) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("GIPHY {} rate limited", operation);
        return Err(GifError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
    }
    if !status.is_success() {
        warn!("GIPHY {} returned {}", operation, status);
        return Err(GifError::provider(
            operation,
            format!(
                "error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
        ));
    }
    Ok(())
}

pub(crate) fn parse_body<T: DeserializeOwned>(operation: Operation, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| GifError::provider(operation, format!("invalid response body: {}", e)))
}

#[async_trait]
impl GifProvider for GiphyClient {
    async fn search(&self, query: &str, offset: usize, limit: usize) -> Result<Page> {
        let url = self.endpoint(
            Operation::Search,
            &[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("lang", self.config.lang.clone()),
            ],
        )?;
        debug!("GIPHY search '{}' offset={} limit={}", query, offset, limit);

        let envelope: ListEnvelope = self.get_json(Operation::Search, url).await?;
        Ok(envelope.into())
    }

    async fn trending(&self, limit: usize) -> Result<Page> {
        let url = self.endpoint(Operation::Trending, &[("limit", limit.to_string())])?;
        debug!("GIPHY trending limit={}", limit);

        let envelope: ListEnvelope = self.get_json(Operation::Trending, url).await?;
        Ok(envelope.into())
    }

    async fn random(&self, count: usize) -> Result<Vec<Gif>> {
        let url = self.endpoint(Operation::Random, &[])?;
        debug!("GIPHY random count={}", count);

        let fetches = (0..count).map(|_| {
            let url = url.clone();
            async move {
                let envelope: SingleEnvelope = self.get_json(Operation::Random, url).await?;
                Ok::<_, GifError>(envelope.data)
            }
        });
        try_join_all(fetches).await
    }
}
