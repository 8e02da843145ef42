use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::capabilities::{PlayerHandle, TransportHandle};
use crate::errors::PlaybackError;
use crate::model::{PlaybackState, SessionId};
use crate::strategy::PlaybackStrategy;

/// Live handles of a session. A transport cannot exist without a player.
struct Handles {
    strategy: PlaybackStrategy,
    player: Box<dyn PlayerHandle>,
    transport: Option<Box<dyn TransportHandle>>,
}

/// The mutable playback state owned by a controller.
///
/// Setters return whether the value changed so the controller only notifies
/// observers on real transitions.
#[derive(Default)]
pub struct PlaybackSession {
    id: SessionId,
    state: PlaybackState,
    handles: Option<Handles>,
    last_error: Option<PlaybackError>,
    is_playing: bool,
    video_loading: bool,
    started_at: Option<Instant>,
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("strategy", &self.strategy())
            .field("has_player", &self.has_player())
            .field("has_transport", &self.has_transport())
            .field("last_error", &self.last_error)
            .field("is_playing", &self.is_playing)
            .field("video_loading", &self.video_loading)
            .finish()
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn strategy(&self) -> Option<PlaybackStrategy> {
        self.handles.as_ref().map(|h| h.strategy)
    }

    pub fn has_player(&self) -> bool {
        self.handles.is_some()
    }

    pub fn has_transport(&self) -> bool {
        self.handles
            .as_ref()
            .is_some_and(|h| h.transport.is_some())
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// The video area is shown (from `start` until teardown).
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Waiting for the stream to become playable.
    pub fn video_loading(&self) -> bool {
        self.video_loading
    }

    /// When the session started waiting for readiness.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub(crate) fn player(&self) -> Option<&dyn PlayerHandle> {
        self.handles.as_ref().map(|h| h.player.as_ref())
    }

    /// Open a new session: forget the previous error, enter `Initializing`.
    pub(crate) fn begin(&mut self, id: SessionId) {
        debug_assert!(self.handles.is_none());
        self.id = id;
        self.last_error = None;
        self.started_at = None;
    }

    pub(crate) fn attach(
        &mut self,
        strategy: PlaybackStrategy,
        player: Box<dyn PlayerHandle>,
        transport: Option<Box<dyn TransportHandle>>,
        now: Instant,
    ) {
        debug_assert!(self.handles.is_none());
        self.handles = Some(Handles {
            strategy,
            player,
            transport,
        });
        self.started_at = Some(now);
    }

    /// Destroy the player, then the transport. Safe to call with nothing attached.
    pub(crate) fn release(&mut self) -> bool {
        self.started_at = None;
        match self.handles.take() {
            Some(mut handles) => {
                debug!(session = %self.id, strategy = %handles.strategy, "Releasing playback handles");
                handles.player.destroy();
                handles.strategy.teardown(handles.transport.take());
                true
            }
            None => false,
        }
    }

    pub(crate) fn mark_ready_reached(&mut self) {
        self.started_at = None;
    }

    pub(crate) fn set_state(&mut self, state: PlaybackState) -> bool {
        let changed = self.state != state;
        self.state = state;
        changed
    }

    pub(crate) fn set_loading(&mut self, loading: bool) -> bool {
        let changed = self.video_loading != loading;
        self.video_loading = loading;
        changed
    }

    pub(crate) fn set_playing(&mut self, playing: bool) -> bool {
        let changed = self.is_playing != playing;
        self.is_playing = playing;
        changed
    }

    pub(crate) fn record_error(&mut self, error: PlaybackError) {
        self.last_error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::EventSink;
    use crate::errors::PlatformError;
    use crate::model::{PlayerEventKind, TransportEventKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter {
        destroyed: AtomicUsize,
        order: std::sync::Mutex<Vec<&'static str>>,
    }

    struct Player(Arc<Counter>);
    struct Transport(Arc<Counter>);

    impl PlayerHandle for Player {
        fn on(&mut self, _event: PlayerEventKind, _sink: EventSink) {}
        fn play(&self) -> Result<(), PlatformError> {
            Ok(())
        }
        fn destroy(&mut self) {
            self.0.destroyed.fetch_add(1, Ordering::SeqCst);
            self.0.order.lock().unwrap().push("player");
        }
    }

    impl TransportHandle for Transport {
        fn load_source(&mut self, _url: &str) -> Result<(), PlatformError> {
            Ok(())
        }
        fn attach_media(
            &mut self,
            _element: Arc<dyn crate::capabilities::MediaElement>,
        ) -> Result<(), PlatformError> {
            Ok(())
        }
        fn on(&mut self, _event: TransportEventKind, _sink: EventSink) {}
        fn destroy(&mut self) {
            self.0.destroyed.fetch_add(1, Ordering::SeqCst);
            self.0.order.lock().unwrap().push("transport");
        }
    }

    #[test]
    fn test_release_destroys_player_then_transport() {
        let counter = Arc::new(Counter::default());
        let mut session = PlaybackSession::new();
        session.begin(SessionId(1));
        session.attach(
            PlaybackStrategy::LibraryMediated,
            Box::new(Player(counter.clone())),
            Some(Box::new(Transport(counter.clone()))),
            Instant::now(),
        );
        assert!(session.has_player());
        assert!(session.has_transport());

        assert!(session.release());
        assert!(!session.has_player());
        assert!(!session.has_transport());
        assert_eq!(*counter.order.lock().unwrap(), vec!["player", "transport"]);

        assert!(!session.release());
        assert_eq!(counter.destroyed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut session = PlaybackSession::new();
        session.record_error(PlaybackError::Unsupported);
        session.begin(SessionId(2));
        assert_eq!(session.last_error(), None);
        assert_eq!(session.id(), SessionId(2));
    }

    #[test]
    fn test_setters_report_changes() {
        let mut session = PlaybackSession::new();
        assert!(!session.set_state(PlaybackState::Idle));
        assert!(session.set_state(PlaybackState::Initializing));
        assert!(session.set_loading(true));
        assert!(!session.set_loading(true));
        assert!(session.set_playing(true));
    }
}
