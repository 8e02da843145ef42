//! HTTP client for the channel API
//!
//! One request resolves a tenant into its [`ChannelConfig`] and
//! [`PlaybackSource`]:
//!
//! ```text
//! GET {api_base_url}/channel/{tenant}/streams
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pmotvchannel::ChannelClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChannelClient::new().await?;
//!     let (channel, source) = client
//!         .resolve("northafricatv", "https://api.awraas.tv/api")
//!         .await?;
//!     println!("{} -> {}", channel.name, source.stream_url);
//!     Ok(())
//! }
//! ```

use crate::error::{FetchError, LoadError, Result};
use crate::models::{ChannelConfig, PlaybackSource, StreamsData, StreamsResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default channel API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.awraas.tv/api";

/// Default base URL for relative asset paths (backgrounds, posters)
pub const DEFAULT_ASSET_BASE_URL: &str = "https://api.awraas.tv";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PMOTv/0.1.0 (pmotvchannel)";

/// Channel data loader
///
/// The client is stateless: every call performs exactly one request and
/// transforms the response. It never retries and never caches.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    client: Client,
    asset_base_url: String,
    timeout: Duration,
}

impl ChannelClient {
    /// Create a new client with default settings
    pub async fn new() -> std::result::Result<Self, FetchError> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with a custom reqwest::Client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Base URL used to absolutize relative asset paths
    pub fn asset_base_url(&self) -> &str {
        &self.asset_base_url
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the streams endpoint URL for a tenant
    ///
    /// The tenant is appended as a single, percent-encoded path segment.
    /// A trailing slash on `api_base_url` is tolerated.
    pub fn streams_url(api_base_url: &str, tenant_name: &str) -> std::result::Result<Url, FetchError> {
        let mut url = Url::parse(api_base_url)?;
        url.path_segments_mut()
            .map_err(|_| FetchError::CannotBeABase(api_base_url.to_string()))?
            .pop_if_empty()
            .extend(["channel", tenant_name, "streams"]);
        Ok(url)
    }

    /// Fetch the raw streams envelope
    pub async fn fetch_streams(
        &self,
        tenant_name: &str,
        api_base_url: &str,
    ) -> std::result::Result<StreamsResponse, FetchError> {
        let url = Self::streams_url(api_base_url, tenant_name)?;

        info!(tenant = %tenant_name, url = %url, "Loading channel data");

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let envelope: StreamsResponse = serde_json::from_slice(&body)?;
        Ok(envelope)
    }

    /// Resolve a tenant into channel metadata and a playback source
    ///
    /// # Errors
    ///
    /// - [`LoadError::Unavailable`] on transport, status or parse failure, or
    ///   when the envelope has no `data` field.
    /// - [`LoadError::NoStreamUrl`] when the channel is known but publishes no
    ///   stream; the error carries the channel for display.
    pub async fn resolve(
        &self,
        tenant_name: &str,
        api_base_url: &str,
    ) -> Result<(ChannelConfig, PlaybackSource)> {
        let envelope = self.fetch_streams(tenant_name, api_base_url).await?;
        let data = envelope.data.ok_or(FetchError::MissingData)?;
        self.resolve_data(data)
    }

    /// Transform a streams payload into resolved models
    pub fn resolve_data(&self, data: StreamsData) -> Result<(ChannelConfig, PlaybackSource)> {
        let background = data
            .background
            .filter(|b| !b.trim().is_empty())
            .map(|b| self.absolutize_asset(&b));

        let channel = ChannelConfig {
            name: data.channel.name,
            social_links: data.channel.social_links,
            background_image_url: background.clone(),
        };

        let stream_url = match data.url.filter(|u| !u.trim().is_empty()) {
            Some(url) => url,
            None => return Err(LoadError::NoStreamUrl(Box::new(channel))),
        };

        debug!(
            channel = %channel.name,
            stream = %stream_url,
            links = channel.social_links.len(),
            "Resolved channel"
        );

        let source = PlaybackSource {
            stream_url,
            poster_image_url: background,
        };

        Ok((channel, source))
    }

    /// Resolve a possibly relative asset path against the asset base URL
    ///
    /// Absolute URLs and unparseable bases are returned unchanged.
    pub fn absolutize_asset(&self, asset: &str) -> String {
        if Url::parse(asset).is_ok() {
            return asset.to_string();
        }
        match Url::parse(&self.asset_base_url).and_then(|base| base.join(asset)) {
            Ok(url) => url.to_string(),
            Err(_) => asset.to_string(),
        }
    }
}

/// Builder for configuring a ChannelClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    asset_base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base URL for relative asset paths
    pub fn asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub async fn build(self) -> std::result::Result<ChannelClient, FetchError> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(ChannelClient {
            client,
            asset_base_url: self.asset_base_url,
            timeout: self.timeout,
        })
    }
}
