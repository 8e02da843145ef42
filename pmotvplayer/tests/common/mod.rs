//! Scriptable platform double shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pmotvplayer::{
    EventSink, MediaElement, MediaEvent, Orientation, OrientationService, PlatformError,
    PlaybackPlatform, PlayerHandle, PlayerOptions, TransportHandle, TransportOptions,
    HLS_MIME_TYPE,
};

/// Knobs and observations of a [`MockPlatform`].
#[derive(Default)]
pub struct Probe {
    pub transport_supported: bool,
    pub native_hls: bool,
    pub fail_player: bool,
    pub fail_transport: bool,
    pub fail_load: bool,
    pub reject_play: bool,
    /// `play` is accepted but the element refuses it afterwards.
    pub reject_play_later: bool,
    /// `play` is accepted and never settles.
    pub hang_play: bool,

    pub journal: Mutex<Vec<String>>,
    pub sinks: Mutex<HashMap<&'static str, EventSink>>,
    pub players_created: AtomicUsize,
    pub players_destroyed: AtomicUsize,
    pub transports_created: AtomicUsize,
    pub transports_destroyed: AtomicUsize,
    pub play_calls: AtomicUsize,
    pub last_player_options: Mutex<Option<PlayerOptions>>,
    pub last_transport_options: Mutex<Option<TransportOptions>>,
}

impl Probe {
    fn log(&self, entry: impl Into<String>) {
        self.journal.lock().unwrap().push(entry.into());
    }

    fn keep_sink(&self, label: &'static str, sink: EventSink) {
        self.sinks.lock().unwrap().insert(label, sink);
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    /// Emit `event` through the sink captured under `label`
    /// (`manifest`, `error`, `metadata`, `play`, `pause`, `ended`).
    pub fn fire(&self, label: &str, event: MediaEvent) -> bool {
        let sink = self.sinks.lock().unwrap().get(label).cloned();
        sink.expect("no sink captured under that label").emit(event)
    }

    pub fn live_players(&self) -> usize {
        self.players_created.load(Ordering::SeqCst) - self.players_destroyed.load(Ordering::SeqCst)
    }

    pub fn live_transports(&self) -> usize {
        self.transports_created.load(Ordering::SeqCst)
            - self.transports_destroyed.load(Ordering::SeqCst)
    }
}

pub struct MockPlatform {
    pub probe: Arc<Probe>,
}

impl MockPlatform {
    pub fn library() -> Self {
        Self::with(|p| p.transport_supported = true)
    }

    pub fn native() -> Self {
        Self::with(|p| p.native_hls = true)
    }

    pub fn unsupported() -> Self {
        Self::with(|_| {})
    }

    pub fn with(configure: impl FnOnce(&mut Probe)) -> Self {
        let mut probe = Probe::default();
        configure(&mut probe);
        Self {
            probe: Arc::new(probe),
        }
    }

    pub fn into_parts(self) -> (Arc<dyn PlaybackPlatform>, Arc<Probe>) {
        let probe = self.probe.clone();
        (Arc::new(self), probe)
    }
}

struct MockElement(Arc<Probe>);

impl MediaElement for MockElement {
    fn can_play_type(&self, mime: &str) -> bool {
        self.0.native_hls && mime == HLS_MIME_TYPE
    }

    fn set_source(&self, url: &str) {
        self.0.log(format!("element.src={url}"));
    }

    fn on_metadata_loaded(&self, sink: EventSink) {
        self.0.log("element.on(metadata)");
        self.0.keep_sink("metadata", sink);
    }
}

struct MockPlayer(Arc<Probe>);

impl PlayerHandle for MockPlayer {
    fn on(&mut self, event: pmotvplayer::PlayerEventKind, sink: EventSink) {
        let label = match event {
            pmotvplayer::PlayerEventKind::Play => "play",
            pmotvplayer::PlayerEventKind::Pause => "pause",
            pmotvplayer::PlayerEventKind::Ended => "ended",
        };
        self.0.keep_sink(label, sink);
    }

    fn play(&self) -> Result<(), PlatformError> {
        self.0.play_calls.fetch_add(1, Ordering::SeqCst);
        self.0.log("player.play");
        if self.0.reject_play {
            return Err(PlatformError::play_rejected("autoplay blocked"));
        }
        if self.0.reject_play_later && !self.0.hang_play {
            self.0.fire(
                "play",
                MediaEvent::PlayRejected("NotAllowedError: autoplay blocked".to_string()),
            );
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.0.players_destroyed.fetch_add(1, Ordering::SeqCst);
        self.0.log("player.destroy");
    }
}

struct MockTransport(Arc<Probe>);

impl TransportHandle for MockTransport {
    fn load_source(&mut self, url: &str) -> Result<(), PlatformError> {
        self.0.log(format!("transport.load={url}"));
        if self.0.fail_load {
            Err(PlatformError::construction("manifest request refused"))
        } else {
            Ok(())
        }
    }

    fn attach_media(&mut self, _element: Arc<dyn MediaElement>) -> Result<(), PlatformError> {
        self.0.log("transport.attach");
        Ok(())
    }

    fn on(&mut self, event: pmotvplayer::TransportEventKind, sink: EventSink) {
        match event {
            pmotvplayer::TransportEventKind::ManifestParsed => {
                self.0.log("transport.on(manifest)");
                self.0.keep_sink("manifest", sink);
            }
            pmotvplayer::TransportEventKind::Error => {
                self.0.log("transport.on(error)");
                self.0.keep_sink("error", sink);
            }
        }
    }

    fn destroy(&mut self) {
        self.0.transports_destroyed.fetch_add(1, Ordering::SeqCst);
        self.0.log("transport.destroy");
    }
}

impl PlaybackPlatform for MockPlatform {
    fn media_element(&self) -> Arc<dyn MediaElement> {
        Arc::new(MockElement(self.probe.clone()))
    }

    fn transport_supported(&self) -> bool {
        self.probe.transport_supported
    }

    fn create_player(
        &self,
        _element: Arc<dyn MediaElement>,
        options: &PlayerOptions,
    ) -> Result<Box<dyn PlayerHandle>, PlatformError> {
        if self.probe.fail_player {
            return Err(PlatformError::construction("player library missing"));
        }
        self.probe.players_created.fetch_add(1, Ordering::SeqCst);
        *self.probe.last_player_options.lock().unwrap() = Some(options.clone());
        self.probe.log("player.create");
        Ok(Box::new(MockPlayer(self.probe.clone())))
    }

    fn create_transport(
        &self,
        options: &TransportOptions,
    ) -> Result<Box<dyn TransportHandle>, PlatformError> {
        if self.probe.fail_transport {
            return Err(PlatformError::construction("transport library missing"));
        }
        self.probe.transports_created.fetch_add(1, Ordering::SeqCst);
        *self.probe.last_transport_options.lock().unwrap() = Some(options.clone());
        self.probe.log("transport.create");
        Ok(Box::new(MockTransport(self.probe.clone())))
    }
}

/// Orientation service recording every call.
#[derive(Default)]
pub struct RecordingOrientation {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl OrientationService for RecordingOrientation {
    async fn unlock(&self) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push("unlock".to_string());
        if self.fail {
            return Err(PlatformError::orientation("not supported"));
        }
        Ok(())
    }

    async fn lock(&self, orientation: Orientation) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("lock:{}", orientation.as_str()));
        if self.fail {
            return Err(PlatformError::orientation("not supported"));
        }
        Ok(())
    }
}
