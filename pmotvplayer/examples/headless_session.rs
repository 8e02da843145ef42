//! Example: drive a full channel session against a headless platform
//!
//! The platform only logs what a real binding would do and reports the
//! manifest as parsed as soon as the transport is attached.
//!
//! Run with: cargo run -p pmotvplayer --example headless_session
//! Without a transport library: HEADLESS_NATIVE=1 cargo run -p pmotvplayer --example headless_session

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pmotvconfig::get_config;
use pmotvplayer::{
    ChannelApp, EventSink, HLS_MIME_TYPE, MediaElement, MediaEvent, NoOrientation,
    PlatformError, PlaybackPlatform, PlayerEventKind, PlayerHandle, PlayerOptions,
    TransportEventKind, TransportHandle, TransportOptions,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct HeadlessElement {
    native: bool,
}

impl MediaElement for HeadlessElement {
    fn can_play_type(&self, mime: &str) -> bool {
        self.native && mime == HLS_MIME_TYPE
    }

    fn set_source(&self, url: &str) {
        info!(url, "video.src set");
    }

    fn on_metadata_loaded(&self, sink: EventSink) {
        sink.emit(MediaEvent::MetadataLoaded);
    }
}

struct HeadlessPlayer {
    sinks: Vec<EventSink>,
}

impl PlayerHandle for HeadlessPlayer {
    fn on(&mut self, event: PlayerEventKind, sink: EventSink) {
        if event == PlayerEventKind::Play {
            self.sinks.push(sink);
        }
    }

    fn play(&self) -> Result<(), PlatformError> {
        info!("player.play()");
        for sink in &self.sinks {
            sink.emit(MediaEvent::Player(PlayerEventKind::Play));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        info!("player.destroy()");
    }
}

#[derive(Default)]
struct HeadlessTransport {
    manifest: Mutex<Option<EventSink>>,
}

impl TransportHandle for HeadlessTransport {
    fn load_source(&mut self, url: &str) -> Result<(), PlatformError> {
        info!(url, "transport.loadSource()");
        Ok(())
    }

    fn attach_media(&mut self, _element: Arc<dyn MediaElement>) -> Result<(), PlatformError> {
        info!("transport.attachMedia()");
        if let Ok(guard) = self.manifest.lock() {
            if let Some(sink) = guard.as_ref() {
                sink.emit(MediaEvent::ManifestParsed);
            }
        }
        Ok(())
    }

    fn on(&mut self, event: TransportEventKind, sink: EventSink) {
        if event == TransportEventKind::ManifestParsed {
            if let Ok(mut guard) = self.manifest.lock() {
                *guard = Some(sink);
            }
        }
    }

    fn destroy(&mut self) {
        info!("transport.destroy()");
    }
}

struct HeadlessPlatform {
    native: bool,
}

impl PlaybackPlatform for HeadlessPlatform {
    fn media_element(&self) -> Arc<dyn MediaElement> {
        Arc::new(HeadlessElement {
            native: self.native,
        })
    }

    fn transport_supported(&self) -> bool {
        !self.native
    }

    fn create_player(
        &self,
        _element: Arc<dyn MediaElement>,
        options: &PlayerOptions,
    ) -> Result<Box<dyn PlayerHandle>, PlatformError> {
        let json = serde_json::to_string(options).map_err(|e| PlatformError::Other(e.to_string()))?;
        info!(options = %json, "new Plyr()");
        Ok(Box::new(HeadlessPlayer { sinks: Vec::new() }))
    }

    fn create_transport(
        &self,
        options: &TransportOptions,
    ) -> Result<Box<dyn TransportHandle>, PlatformError> {
        let json = serde_json::to_string(options).map_err(|e| PlatformError::Other(e.to_string()))?;
        info!(options = %json, "new Hls()");
        Ok(Box::new(HeadlessTransport::default()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.get_log_min_level().to_lowercase())),
        )
        .init();

    let platform = Arc::new(HeadlessPlatform {
        native: std::env::var("HEADLESS_NATIVE").is_ok(),
    });
    let mut app = ChannelApp::from_config(&config, platform, Arc::new(NoOrientation)).await?;

    app.boot().await;
    let view = app.view();
    println!("{} - {}", view.app_title, view.channel_name);

    match app.play_video() {
        Ok(strategy) => println!("Playing with the {} strategy", strategy),
        Err(err) => {
            println!("Cannot play: {}", err);
            return Ok(());
        }
    }

    for _ in 0..3 {
        app.pump();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    println!("State: {}", app.controller().state());

    app.stop_video();
    println!("State: {}", app.controller().state());
    Ok(())
}
