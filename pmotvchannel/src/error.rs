//! Error types for the channel loader

use crate::models::ChannelConfig;

/// Result type alias for channel loading
pub type Result<T> = std::result::Result<T, LoadError>;

/// Why the channel API could not be used
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection, TLS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid API base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API base URL cannot carry a path
    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    /// API returned an error status
    #[error("API returned status: {0}")]
    Status(u16),

    /// Response envelope has no `data` field
    #[error("response has no data field")]
    MissingData,
}

/// Errors returned by [`ChannelClient::resolve`](crate::ChannelClient::resolve)
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Network, parse or shape failure. Callers fall back to the default
    /// channel name and must not attempt playback.
    #[error("channel data unavailable: {0}")]
    Unavailable(#[from] FetchError),

    /// The channel exists but publishes no stream location
    #[error("channel {} has no stream url", .0.name)]
    NoStreamUrl(Box<ChannelConfig>),
}

impl LoadError {
    /// Channel identity still usable for display, if any
    pub fn channel(&self) -> Option<&ChannelConfig> {
        match self {
            LoadError::NoStreamUrl(channel) => Some(channel),
            LoadError::Unavailable(_) => None,
        }
    }
}
