//! Fetch capability used to download linked pages.
//!
//! The parser never talks to the network itself. Callers hand it a
//! [`PageFetcher`], which decides on transport, timeouts, TLS and redirects.
//! [`HttpFetcher`] is the reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::{redirect, Client};

use crate::config::Settings;
use crate::error::FetchError;

/// Response body delivered chunk by chunk. Dropping it releases the
/// underlying connection.
pub type BodyStream = BoxStream<'static, Result<Bytes, FetchError>>;

/// Retrieves page content for a URL with a GET-style request
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<BodyStream, FetchError>;
}

/// [`PageFetcher`] over a shared reqwest client
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wrap an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from fetch settings
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let fetch = &settings.fetch;
        let client = Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))
            .redirect(redirect::Policy::limited(fetch.max_redirects))
            .user_agent(fetch.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<BodyStream, FetchError> {
        let response = self.client.get(url).send().await?;
        // Error statuses still carry a page worth looking at
        tracing::debug!("GET {} -> {}", url, response.status());
        Ok(response.bytes_stream().map_err(FetchError::from).boxed())
    }
}
