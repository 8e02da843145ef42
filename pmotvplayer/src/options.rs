//! Construction options handed to the player surface and the transport.
//!
//! The player options are presentation configuration: the controller only
//! guarantees that they are passed at construction. They serialize to the
//! camelCase shape web player libraries accept, so platform bindings can
//! forward them as JSON.

use std::time::Duration;

use serde::Serialize;

/// MIME type probed on the media element for native HLS support.
pub const HLS_MIME_TYPE: &str = "application/vnd.apple.mpegurl";

pub const DEFAULT_BACK_BUFFER: Duration = Duration::from_secs(90);
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerControl {
    PlayLarge,
    Play,
    Progress,
    CurrentTime,
    Duration,
    Mute,
    Volume,
    Settings,
    Fullscreen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsMenu {
    Quality,
    Speed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualityOptions {
    pub default: u32,
    pub options: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeedOptions {
    pub selected: f32,
    pub options: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullscreenOptions {
    pub enabled: bool,
    pub fallback: bool,
    pub ios_native: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
    pub controls: Vec<PlayerControl>,
    pub settings: Vec<SettingsMenu>,
    pub quality: QualityOptions,
    pub speed: SpeedOptions,
    pub ratio: String,
    pub fullscreen: FullscreenOptions,
    /// Filled from the playback source at `start`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            controls: vec![
                PlayerControl::PlayLarge,
                PlayerControl::Play,
                PlayerControl::Progress,
                PlayerControl::CurrentTime,
                PlayerControl::Duration,
                PlayerControl::Mute,
                PlayerControl::Volume,
                PlayerControl::Settings,
                PlayerControl::Fullscreen,
            ],
            settings: vec![SettingsMenu::Quality, SettingsMenu::Speed],
            quality: QualityOptions {
                default: 720,
                options: vec![1080, 720, 480, 360],
            },
            speed: SpeedOptions {
                selected: 1.0,
                options: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            },
            ratio: "16:9".to_string(),
            fullscreen: FullscreenOptions {
                enabled: true,
                fallback: true,
                ios_native: false,
            },
            poster: None,
        }
    }
}

/// Operational parameters of the adaptive-streaming transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptions {
    /// Fetch and demux segments off the main execution queue.
    pub enable_worker: bool,
    pub low_latency_mode: bool,
    /// How much already-played media stays buffered. Serialized in seconds.
    #[serde(serialize_with = "serialize_secs")]
    pub back_buffer_length: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            enable_worker: true,
            low_latency_mode: true,
            back_buffer_length: DEFAULT_BACK_BUFFER,
        }
    }
}

/// Everything the controller needs besides the platform.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackOptions {
    pub player: PlayerOptions,
    pub transport: TransportOptions,
    /// Bound on the wait for manifest-parsed / metadata-loaded. `None` waits forever.
    pub startup_timeout: Option<Duration>,
    pub native_mime_type: String,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            player: PlayerOptions::default(),
            transport: TransportOptions::default(),
            startup_timeout: Some(DEFAULT_STARTUP_TIMEOUT),
            native_mime_type: HLS_MIME_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_options_json_shape() {
        let mut options = PlayerOptions::default();
        options.poster = Some("https://cdn/bg.jpg".into());

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["controls"][0], json!("play-large"));
        assert_eq!(value["controls"][3], json!("current-time"));
        assert_eq!(value["settings"], json!(["quality", "speed"]));
        assert_eq!(value["quality"]["default"], json!(720));
        assert_eq!(value["ratio"], json!("16:9"));
        assert_eq!(value["fullscreen"]["iosNative"], json!(false));
        assert_eq!(value["poster"], json!("https://cdn/bg.jpg"));
    }

    #[test]
    fn test_transport_options_json_shape() {
        let value = serde_json::to_value(TransportOptions::default()).unwrap();
        assert_eq!(
            value,
            json!({"enableWorker": true, "lowLatencyMode": true, "backBufferLength": 90})
        );
    }
}
