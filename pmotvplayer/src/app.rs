//! Single-channel host application.
//!
//! Glues the channel loader to the playback controller in the order the
//! controller expects: nothing is played before the channel data resolved,
//! and orientation is unlocked before loading and locked to landscape once
//! the UI is wired.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use pmotvchannel::{ChannelClient, ChannelConfig, LoadError, PlaybackSource};
use tracing::{error, info, warn};

use crate::capabilities::OrientationService;
use crate::controller::PlaybackController;
use crate::errors::PlaybackError;
use crate::model::Orientation;
use crate::strategy::PlaybackStrategy;

/// Name shown until the channel data is resolved.
pub const LOADING_CHANNEL_NAME: &str = "Loading...";

/// Where and what to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelSettings {
    pub api_base_url: String,
    pub tenant_name: String,
    pub default_channel_name: String,
    pub app_title: String,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            api_base_url: pmotvchannel::client::DEFAULT_API_BASE_URL.to_string(),
            tenant_name: "northafricatv".to_string(),
            default_channel_name: "Channel".to_string(),
            app_title: "TV Channel".to_string(),
        }
    }
}

/// Snapshot of everything the UI renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelView {
    pub app_title: String,
    /// Channel data is being fetched.
    pub loading: bool,
    pub channel_name: String,
    pub social_links: BTreeMap<String, String>,
    pub background_style: Option<String>,
    pub is_playing: bool,
    pub video_loading: bool,
}

pub struct ChannelApp {
    settings: ChannelSettings,
    client: ChannelClient,
    controller: PlaybackController,
    orientation: Arc<dyn OrientationService>,
    loading: bool,
    channel_name: String,
    channel: Option<ChannelConfig>,
    source: Option<PlaybackSource>,
}

impl ChannelApp {
    pub fn new(
        settings: ChannelSettings,
        client: ChannelClient,
        controller: PlaybackController,
        orientation: Arc<dyn OrientationService>,
    ) -> Self {
        Self {
            settings,
            client,
            controller,
            orientation,
            loading: true,
            channel_name: LOADING_CHANNEL_NAME.to_string(),
            channel: None,
            source: None,
        }
    }

    /// Unlock orientation, load the channel, lock to landscape.
    ///
    /// Orientation failures are logged and otherwise ignored.
    pub async fn boot(&mut self) {
        if let Err(err) = self.orientation.unlock().await {
            warn!(error = %err, "Could not unlock screen orientation");
        }

        self.load_channel_data().await;

        if let Err(err) = self.orientation.lock(Orientation::Landscape).await {
            warn!(error = %err, "Could not lock screen orientation");
        }
    }

    /// Resolve the configured tenant and update the view.
    ///
    /// Returns true when a playable source is now known. `loading` is
    /// cleared whatever the outcome.
    pub async fn load_channel_data(&mut self) -> bool {
        self.loading = true;
        let result = self
            .client
            .resolve(&self.settings.tenant_name, &self.settings.api_base_url)
            .await;
        self.loading = false;

        match result {
            Ok((channel, source)) => {
                info!(channel = %channel.name, "Channel data loaded");
                self.channel_name = channel.name.clone();
                self.channel = Some(channel);
                self.source = Some(source);
                true
            }
            Err(LoadError::NoStreamUrl(channel)) => {
                warn!(channel = %channel.name, "Channel publishes no stream");
                self.channel_name = channel.name.clone();
                self.channel = Some(*channel);
                self.source = None;
                false
            }
            Err(err) => {
                error!(error = %err, "Error loading channel data");
                self.channel_name = self.settings.default_channel_name.clone();
                self.channel = None;
                self.source = None;
                false
            }
        }
    }

    /// Start playing the loaded stream.
    pub fn play_video(&mut self) -> Result<PlaybackStrategy, PlaybackError> {
        match &self.source {
            Some(source) => self.controller.start(source),
            None => {
                error!("No stream URL available");
                Err(PlaybackError::NoStreamUrl)
            }
        }
    }

    pub fn stop_video(&mut self) {
        self.controller.stop();
    }

    /// Run one turn of the event loop: dispatch platform events, then enforce
    /// the startup deadline. Returns the number of events dispatched.
    pub fn pump(&mut self) -> usize {
        let handled = self.controller.dispatch_pending();
        self.controller.expire_startup(Instant::now());
        handled
    }

    pub fn view(&self) -> ChannelView {
        ChannelView {
            app_title: self.settings.app_title.clone(),
            loading: self.loading,
            channel_name: self.channel_name.clone(),
            social_links: self
                .channel
                .as_ref()
                .map(|c| c.social_links.clone())
                .unwrap_or_default(),
            background_style: self.channel.as_ref().and_then(|c| c.background_style()),
            is_playing: self.controller.is_playing(),
            video_loading: self.controller.video_loading(),
        }
    }

    pub fn settings(&self) -> &ChannelSettings {
        &self.settings
    }

    pub fn channel(&self) -> Option<&ChannelConfig> {
        self.channel.as_ref()
    }

    pub fn source(&self) -> Option<&PlaybackSource> {
        self.source.as_ref()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }
}

#[cfg(feature = "pmotvconfig")]
mod from_config {
    use super::*;
    use crate::capabilities::PlaybackPlatform;
    use crate::config_ext::PlaybackConfigExt;
    use pmotvchannel::{ChannelConfigExt, FetchError};
    use pmotvconfig::Config;

    impl ChannelSettings {
        pub fn from_config(config: &Config) -> Self {
            Self {
                api_base_url: config.get_channel_api_base_url(),
                tenant_name: config.get_channel_tenant_name(),
                default_channel_name: config.get_channel_default_name(),
                app_title: config.get_app_title(),
            }
        }
    }

    impl ChannelApp {
        /// Build the client, controller and settings from configuration.
        pub async fn from_config(
            config: &Config,
            platform: Arc<dyn PlaybackPlatform>,
            orientation: Arc<dyn OrientationService>,
        ) -> Result<Self, FetchError> {
            let client = config.channel_client_builder().build().await?;
            let controller = PlaybackController::new(platform, config.playback_options());
            Ok(Self::new(
                ChannelSettings::from_config(config),
                client,
                controller,
                orientation,
            ))
        }
    }
}
