//! Playback settings stored in pmotvconfig
//!
//! | key                                   | default |
//! |---------------------------------------|---------|
//! | `playback.startup_timeout_secs`       | `20` (`0` waits forever) |
//! | `playback.transport.enable_worker`    | `true`  |
//! | `playback.transport.low_latency_mode` | `true`  |
//! | `playback.transport.back_buffer_secs` | `90`    |
//! | `playback.player.ratio`               | `16:9`  |
//! | `playback.player.default_quality`     | `720`   |

use std::time::Duration;

use pmotvconfig::Config;

use crate::options::{
    DEFAULT_BACK_BUFFER, DEFAULT_STARTUP_TIMEOUT, PlaybackOptions, PlayerOptions, TransportOptions,
};

pub trait PlaybackConfigExt {
    fn get_playback_transport_options(&self) -> TransportOptions;

    fn get_playback_player_options(&self) -> PlayerOptions;

    fn get_playback_startup_timeout(&self) -> Option<Duration>;

    fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            player: self.get_playback_player_options(),
            transport: self.get_playback_transport_options(),
            startup_timeout: self.get_playback_startup_timeout(),
            ..PlaybackOptions::default()
        }
    }
}

impl PlaybackConfigExt for Config {
    fn get_playback_transport_options(&self) -> TransportOptions {
        let defaults = TransportOptions::default();
        TransportOptions {
            enable_worker: self.get_bool_or(
                &["playback", "transport", "enable_worker"],
                defaults.enable_worker,
            ),
            low_latency_mode: self.get_bool_or(
                &["playback", "transport", "low_latency_mode"],
                defaults.low_latency_mode,
            ),
            back_buffer_length: Duration::from_secs(self.get_u64_or(
                &["playback", "transport", "back_buffer_secs"],
                DEFAULT_BACK_BUFFER.as_secs(),
            )),
        }
    }

    fn get_playback_player_options(&self) -> PlayerOptions {
        let mut options = PlayerOptions::default();
        options.ratio = self.get_string_or(&["playback", "player", "ratio"], &options.ratio);

        let quality = self.get_u64_or(
            &["playback", "player", "default_quality"],
            u64::from(options.quality.default),
        );
        match u32::try_from(quality) {
            Ok(q) if options.quality.options.contains(&q) => options.quality.default = q,
            _ => tracing::warn!(
                quality,
                "Default quality is not one of the offered options, keeping {}",
                options.quality.default
            ),
        }
        options
    }

    fn get_playback_startup_timeout(&self) -> Option<Duration> {
        match self.get_u64_or(
            &["playback", "startup_timeout_secs"],
            DEFAULT_STARTUP_TIMEOUT.as_secs(),
        ) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
