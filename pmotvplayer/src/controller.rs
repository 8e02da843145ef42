//! Channel playback controller.
//!
//! `PlaybackController` owns exactly one [`PlaybackSession`] and drives it
//! through
//!
//! ```text
//! Idle --start--> Initializing --strategy--> Ready --manifest/metadata--> Playing
//!                              \--none-----> Failed(Unsupported)
//! Ready|Playing --fatal transport error--> Idle
//! any --stop--> Idle
//! ```
//!
//! Platform callbacks never touch the session directly: they queue
//! [`SessionEvent`]s through the [`EventSink`] handed out at `start`, and the
//! host drains them with [`PlaybackController::dispatch_pending`] on its
//! single execution queue.

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use pmotvchannel::PlaybackSource;
use tracing::{debug, error, info, warn};

use crate::capabilities::{EventSink, PlaybackPlatform};
use crate::errors::PlaybackError;
use crate::events::ControllerEventBus;
use crate::model::{
    ControllerEvent, MediaEvent, PlaybackState, PlayerEventKind, SessionEvent, SessionId,
};
use crate::options::PlaybackOptions;
use crate::session::PlaybackSession;
use crate::strategy::PlaybackStrategy;

pub struct PlaybackController {
    platform: Arc<dyn PlaybackPlatform>,
    options: PlaybackOptions,
    session: PlaybackSession,
    next_session: u64,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
    bus: ControllerEventBus,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("options", &self.options)
            .field("session", &self.session)
            .field("pending_events", &self.events_rx.len())
            .finish()
    }
}

impl PlaybackController {
    pub fn new(platform: Arc<dyn PlaybackPlatform>, options: PlaybackOptions) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            platform,
            options,
            session: PlaybackSession::new(),
            next_session: 0,
            events_tx,
            events_rx,
            bus: ControllerEventBus::new(),
        }
    }

    /// Observe state, loading and playing transitions.
    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        self.bus.subscribe()
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    pub fn video_loading(&self) -> bool {
        self.session.video_loading()
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.session.last_error()
    }

    /// Platform events queued and not yet dispatched.
    pub fn pending_events(&self) -> usize {
        self.events_rx.len()
    }

    /// Start a playback session for `source`.
    ///
    /// Rejected with [`PlaybackError::SessionActive`] while a session is
    /// initializing, ready or playing; the live session is left untouched.
    /// Every other error has already been applied to the session when it is
    /// returned (state, flags, `last_error`).
    pub fn start(&mut self, source: &PlaybackSource) -> Result<PlaybackStrategy, PlaybackError> {
        if self.session.state().is_active() {
            warn!(session = %self.session.id(), state = %self.session.state(), "Playback already active, ignoring start");
            return Err(PlaybackError::SessionActive);
        }

        if source.stream_url.trim().is_empty() {
            error!("No stream URL available");
            return Err(PlaybackError::NoStreamUrl);
        }

        self.next_session += 1;
        let id = SessionId(self.next_session);
        self.session.begin(id);
        self.set_state(PlaybackState::Initializing);

        let element = self.platform.media_element();
        let strategy = match PlaybackStrategy::select(
            self.platform.as_ref(),
            element.as_ref(),
            &self.options.native_mime_type,
        ) {
            Ok(strategy) => strategy,
            Err(err) => {
                error!(session = %id, "HLS is not supported on this platform");
                self.terminate(err.clone(), PlaybackState::Failed);
                return Err(err);
            }
        };

        info!(session = %id, strategy = %strategy, url = %source.stream_url, "Starting playback");
        self.set_loading(true);
        self.set_playing(true);

        let mut player_options = self.options.player.clone();
        player_options.poster = source.poster_image_url.clone();

        let sink = EventSink::new(id, self.events_tx.clone());

        let mut player = match self.platform.create_player(element.clone(), &player_options) {
            Ok(player) => player,
            Err(err) => {
                error!(session = %id, error = %err, "Error initializing video player");
                let err = PlaybackError::from(err);
                self.terminate(err.clone(), PlaybackState::Idle);
                return Err(err);
            }
        };
        for kind in [PlayerEventKind::Play, PlayerEventKind::Pause, PlayerEventKind::Ended] {
            player.on(kind, sink.clone());
        }

        let transport = match strategy.load(
            self.platform.as_ref(),
            &element,
            &source.stream_url,
            &self.options.transport,
            &sink,
        ) {
            Ok(transport) => transport,
            Err(err) => {
                error!(session = %id, strategy = %strategy, error = %err, "Error initializing stream");
                player.destroy();
                let err = PlaybackError::from(err);
                self.terminate(err.clone(), PlaybackState::Idle);
                return Err(err);
            }
        };

        self.session.attach(strategy, player, transport, Instant::now());
        self.set_state(PlaybackState::Ready);
        Ok(strategy)
    }

    /// Release the session. Idempotent, valid from any state.
    pub fn stop(&mut self) {
        if !self.session.has_player() && self.session.state() == PlaybackState::Idle {
            self.set_loading(false);
            self.set_playing(false);
            return;
        }

        self.set_state(PlaybackState::Stopping);
        self.session.release();
        self.set_playing(false);
        self.set_loading(false);
        self.set_state(PlaybackState::Idle);
        info!(session = %self.session.id(), "Playback stopped");
    }

    /// Apply every queued platform event, in order. Returns how many were taken.
    ///
    /// Never blocks on the platform: play commands are only issued here.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Apply one platform event.
    pub fn handle_event(&mut self, event: SessionEvent) {
        if event.session != self.session.id() || !self.session.has_player() {
            debug!(event_session = %event.session, session = %self.session.id(), event = ?event.event, "Ignoring event of a released session");
            return;
        }
        let id = event.session;

        match event.event {
            MediaEvent::ManifestParsed | MediaEvent::MetadataLoaded => {
                let ready = self
                    .session
                    .strategy()
                    .is_some_and(|s| s.is_ready_event(&event.event));
                if !ready || self.session.state() != PlaybackState::Ready {
                    debug!(session = %id, event = ?event.event, state = %self.session.state(), "Ignoring readiness event");
                    return;
                }

                info!(session = %id, "Stream ready, starting playback");
                self.session.mark_ready_reached();
                self.set_loading(false);
                self.set_state(PlaybackState::Playing);

                if let Some(player) = self.session.player() {
                    if let Err(err) = player.play() {
                        error!(session = %id, error = %err, "Playback failed");
                    }
                }
            }
            MediaEvent::TransportError(data) => {
                error!(session = %id, fatal = data.fatal, kind = %data.kind, details = %data.details, "Transport error");
                self.set_loading(false);
                if data.fatal {
                    self.terminate(
                        PlaybackError::Transport {
                            kind: data.kind,
                            details: data.details,
                        },
                        PlaybackState::Idle,
                    );
                }
            }
            MediaEvent::PlayRejected(reason) => {
                error!(session = %id, reason = %reason, "Playback failed");
            }
            MediaEvent::Player(kind) => match kind {
                PlayerEventKind::Play => debug!(session = %id, "Video started playing"),
                PlayerEventKind::Pause => debug!(session = %id, "Video paused"),
                PlayerEventKind::Ended => debug!(session = %id, "Video ended"),
            },
        }
    }

    /// Tear down a session stuck waiting for readiness past the startup timeout.
    ///
    /// Returns true when the session was torn down.
    pub fn expire_startup(&mut self, now: Instant) -> bool {
        let (Some(timeout), Some(started_at)) =
            (self.options.startup_timeout, self.session.started_at())
        else {
            return false;
        };
        if self.session.state() != PlaybackState::Ready
            || now.saturating_duration_since(started_at) < timeout
        {
            return false;
        }

        warn!(session = %self.session.id(), timeout = ?timeout, "Stream did not become ready in time");
        self.terminate(PlaybackError::StartupTimeout(timeout), PlaybackState::Idle);
        true
    }

    /// Release everything, clear the flags, record `error` and settle in `state`.
    fn terminate(&mut self, error: PlaybackError, state: PlaybackState) {
        let id = self.session.id();
        self.session.release();
        self.set_loading(false);
        self.set_playing(false);
        self.session.record_error(error.clone());
        self.set_state(state);
        self.bus
            .broadcast(ControllerEvent::SessionFailed { session: id, error });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.session.set_state(state) {
            debug!(session = %self.session.id(), state = %state, "Playback state changed");
            self.bus.broadcast(ControllerEvent::StateChanged {
                session: self.session.id(),
                state,
            });
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if self.session.set_loading(loading) {
            self.bus
                .broadcast(ControllerEvent::LoadingChanged { loading });
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.session.set_playing(playing) {
            self.bus
                .broadcast(ControllerEvent::PlayingChanged { playing });
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.session.release();
    }
}
