//! Contracts the controller consumes from the host platform.
//!
//! A platform binding (web view bridge, native shell, test double) wraps the
//! media element, the media-control surface ("player"), the adaptive-streaming
//! transport and the orientation service behind these traits. Callbacks are
//! replaced by [`EventSink`]s: a binding keeps the sink it was given in `on`
//! and calls [`EventSink::emit`] whenever the underlying library fires.

use std::sync::Arc;

use async_trait::async_trait;
use crossbeam_channel::Sender;

use crate::errors::PlatformError;
use crate::model::{
    MediaEvent, Orientation, PlayerEventKind, SessionEvent, SessionId, TransportEventKind,
};
use crate::options::{PlayerOptions, TransportOptions};

/// Delivery endpoint for platform events, bound to one session.
#[derive(Clone, Debug)]
pub struct EventSink {
    session: SessionId,
    tx: Sender<SessionEvent>,
}

impl EventSink {
    pub(crate) fn new(session: SessionId, tx: Sender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Queue an event for the controller. Returns false once the controller is gone.
    pub fn emit(&self, event: MediaEvent) -> bool {
        self.tx
            .send(SessionEvent {
                session: self.session,
                event,
            })
            .is_ok()
    }
}

/// The platform's video element.
pub trait MediaElement: Send + Sync {
    /// Native support probe, e.g. for `application/vnd.apple.mpegurl`.
    fn can_play_type(&self, mime: &str) -> bool;

    /// Native playback: point the element straight at the stream.
    fn set_source(&self, url: &str);

    /// Emit [`MediaEvent::MetadataLoaded`] on the element's metadata-loaded event.
    fn on_metadata_loaded(&self, sink: EventSink);
}

/// Media-control surface built on top of the element.
pub trait PlayerHandle: Send + Sync {
    /// Forward the given notification as [`MediaEvent::Player`].
    fn on(&mut self, event: PlayerEventKind, sink: EventSink);

    /// Issue a play command and return without waiting for playback to begin.
    ///
    /// `Err` is an immediate refusal. A refusal that arrives later (autoplay
    /// policy, detached element) is emitted as [`MediaEvent::PlayRejected`]
    /// through the sink bound to [`PlayerEventKind::Play`].
    fn play(&self) -> Result<(), PlatformError>;

    /// Release the surface and everything the library attached to the element.
    fn destroy(&mut self);
}

/// Adaptive-streaming transport (segment fetching, buffering, ABR).
pub trait TransportHandle: Send + Sync {
    fn load_source(&mut self, url: &str) -> Result<(), PlatformError>;

    fn attach_media(&mut self, element: Arc<dyn MediaElement>) -> Result<(), PlatformError>;

    /// `ManifestParsed` must emit [`MediaEvent::ManifestParsed`]; `Error` must
    /// emit [`MediaEvent::TransportError`] carrying the transport's fatal flag.
    fn on(&mut self, event: TransportEventKind, sink: EventSink);

    fn destroy(&mut self);
}

/// Factory and capability probes of the host platform.
pub trait PlaybackPlatform: Send + Sync {
    fn media_element(&self) -> Arc<dyn MediaElement>;

    /// Capability probe of the transport library (not a type check).
    fn transport_supported(&self) -> bool;

    fn create_player(
        &self,
        element: Arc<dyn MediaElement>,
        options: &PlayerOptions,
    ) -> Result<Box<dyn PlayerHandle>, PlatformError>;

    fn create_transport(
        &self,
        options: &TransportOptions,
    ) -> Result<Box<dyn TransportHandle>, PlatformError>;
}

/// Device screen-orientation lock.
#[async_trait]
pub trait OrientationService: Send + Sync {
    /// Return to the device's global orientation setting.
    async fn unlock(&self) -> Result<(), PlatformError>;

    async fn lock(&self, orientation: Orientation) -> Result<(), PlatformError>;
}

/// Orientation service for platforms without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOrientation;

#[async_trait]
impl OrientationService for NoOrientation {
    async fn unlock(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn lock(&self, _orientation: Orientation) -> Result<(), PlatformError> {
        Ok(())
    }
}
