//! Channel data loader for PMOTv
//!
//! Resolves a tenant into the metadata of its live channel (display name,
//! social links, background imagery) and the location of its live stream,
//! with a single request to the channel API.
//!
//! # Example
//!
//! ```no_run
//! use pmotvchannel::{ChannelClient, LoadError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ChannelClient::new().await.expect("http client");
//!
//!     match client.resolve("northafricatv", "https://api.awraas.tv/api").await {
//!         Ok((channel, source)) => println!("{} on {}", channel.name, source.stream_url),
//!         Err(LoadError::NoStreamUrl(channel)) => println!("{} is off air", channel.name),
//!         Err(LoadError::Unavailable(err)) => println!("Channel (offline: {err})"),
//!     }
//! }
//! ```
//!
//! # Failure policy
//!
//! [`LoadError::Unavailable`] means nothing usable came back: callers display
//! the configured default channel name and never start playback.

pub mod client;
pub mod error;
pub mod models;

#[cfg(feature = "pmotvconfig")]
pub mod config_ext;

// Re-exports
pub use client::{ChannelClient, ClientBuilder};
pub use error::{FetchError, LoadError, Result};
pub use models::{ChannelConfig, ChannelInfo, PlaybackSource, StreamsData, StreamsResponse};

#[cfg(feature = "pmotvconfig")]
pub use config_ext::ChannelConfigExt;
