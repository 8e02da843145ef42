//! Example: resolve the configured channel
//!
//! Run with: cargo run -p pmotvchannel --example resolve_channel
//! Or for another tenant: PMOTV_CONFIG__CHANNEL__TENANT_NAME=acme cargo run -p pmotvchannel --example resolve_channel

use pmotvchannel::{ChannelConfigExt, LoadError};
use pmotvconfig::get_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.get_log_min_level().to_lowercase())),
        )
        .init();

    let client = config.channel_client_builder().build().await?;
    let tenant = config.get_channel_tenant_name();

    println!("Resolving {} from {}...\n", tenant, config.get_channel_api_base_url());

    match client
        .resolve(&tenant, &config.get_channel_api_base_url())
        .await
    {
        Ok((channel, source)) => {
            println!("Channel: {}", channel.name);
            for (network, link) in &channel.social_links {
                println!("  {}: {}", network, link);
            }
            println!("Stream:  {}", source.stream_url);
            if let Some(poster) = &source.poster_image_url {
                println!("Poster:  {}", poster);
            }
        }
        Err(LoadError::NoStreamUrl(channel)) => {
            println!("Channel: {} (no live stream published)", channel.name);
        }
        Err(err) => {
            println!("Channel: {} ({})", config.get_channel_default_name(), err);
        }
    }

    Ok(())
}
