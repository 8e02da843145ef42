//! Extension pour intégrer le chargeur de chaîne dans pmotvconfig
//!
//! Adds the channel settings to [`pmotvconfig::Config`]:
//!
//! | key                            | default                      |
//! |--------------------------------|------------------------------|
//! | `channel.api_base_url`         | `https://api.awraas.tv/api`  |
//! | `channel.asset_base_url`       | `https://api.awraas.tv`      |
//! | `channel.tenant_name`          | `northafricatv`              |
//! | `channel.default_name`         | `Channel`                    |
//! | `channel.request_timeout_secs` | `30`                         |
//!
//! # Example
//!
//! ```no_run
//! use pmotvconfig::get_config;
//! use pmotvchannel::ChannelConfigExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = get_config();
//! let client = config.channel_client_builder().build().await?;
//! let resolved = client
//!     .resolve(&config.get_channel_tenant_name(), &config.get_channel_api_base_url())
//!     .await;
//! # Ok(())
//! # }
//! ```

use crate::client::{
    ClientBuilder, DEFAULT_API_BASE_URL, DEFAULT_ASSET_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use pmotvconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

/// Default tenant
pub const DEFAULT_TENANT_NAME: &str = "northafricatv";

/// Name displayed when channel data cannot be loaded
pub const DEFAULT_CHANNEL_NAME: &str = "Channel";

/// Trait d'extension pour la configuration du chargeur de chaîne
pub trait ChannelConfigExt {
    /// API base URL (`channel.api_base_url`)
    fn get_channel_api_base_url(&self) -> String;

    /// Base URL for relative asset paths (`channel.asset_base_url`)
    fn get_channel_asset_base_url(&self) -> String;

    /// Tenant whose channel is loaded (`channel.tenant_name`)
    fn get_channel_tenant_name(&self) -> String;

    /// Fallback display name (`channel.default_name`)
    fn get_channel_default_name(&self) -> String;

    /// Request timeout (`channel.request_timeout_secs`)
    fn get_channel_request_timeout(&self) -> Duration;

    /// Change the tenant
    fn set_channel_tenant_name(&self, tenant: &str) -> anyhow::Result<()>;

    /// A client builder preconfigured with the asset base URL and timeout
    fn channel_client_builder(&self) -> ClientBuilder {
        ClientBuilder::new()
            .asset_base_url(self.get_channel_asset_base_url())
            .timeout(self.get_channel_request_timeout())
    }
}

impl ChannelConfigExt for Config {
    fn get_channel_api_base_url(&self) -> String {
        self.get_string_or(&["channel", "api_base_url"], DEFAULT_API_BASE_URL)
    }

    fn get_channel_asset_base_url(&self) -> String {
        self.get_string_or(&["channel", "asset_base_url"], DEFAULT_ASSET_BASE_URL)
    }

    fn get_channel_tenant_name(&self) -> String {
        self.get_string_or(&["channel", "tenant_name"], DEFAULT_TENANT_NAME)
    }

    fn get_channel_default_name(&self) -> String {
        self.get_string_or(&["channel", "default_name"], DEFAULT_CHANNEL_NAME)
    }

    fn get_channel_request_timeout(&self) -> Duration {
        let secs = self.get_u64_or(&["channel", "request_timeout_secs"], DEFAULT_REQUEST_TIMEOUT_SECS);
        // never below one second
        Duration::from_secs(secs.max(1))
    }

    fn set_channel_tenant_name(&self, tenant: &str) -> anyhow::Result<()> {
        self.set_value(&["channel", "tenant_name"], Value::String(tenant.to_string()))
    }
}
