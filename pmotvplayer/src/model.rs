use std::fmt;

use crate::errors::PlaybackError;

/// Identifies one `start` → teardown cycle of the controller.
///
/// Events tagged with an older id belong to a released session and are
/// dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Initializing,
    /// Player and transport are wired, waiting for the stream to become playable.
    Ready,
    Playing,
    Stopping,
    Failed,
}

impl PlaybackState {
    /// A session in one of these states owns live handles (or is creating them).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlaybackState::Initializing | PlaybackState::Ready | PlaybackState::Playing
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Initializing => "initializing",
            PlaybackState::Ready => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Stopping => "stopping",
            PlaybackState::Failed => "failed",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notifications the player surface forwards; informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEventKind {
    Play,
    Pause,
    Ended,
}

/// Transport events the controller subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportEventKind {
    ManifestParsed,
    Error,
}

/// Error payload reported by the transport. The transport decides fatality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportErrorData {
    pub fatal: bool,
    /// Error family as named by the transport (network, media, mux, ...).
    pub kind: String,
    pub details: String,
}

impl TransportErrorData {
    pub fn fatal(kind: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            fatal: true,
            kind: kind.into(),
            details: details.into(),
        }
    }

    pub fn recoverable(kind: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            fatal: false,
            kind: kind.into(),
            details: details.into(),
        }
    }
}

/// Everything a platform collaborator can report to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    /// Transport fetched and parsed the stream manifest.
    ManifestParsed,
    /// Media element loaded metadata of a natively played stream.
    MetadataLoaded,
    TransportError(TransportErrorData),
    Player(PlayerEventKind),
    /// The element refused a play command after it was issued.
    PlayRejected(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: MediaEvent,
}

/// State-change notifications broadcast to observers (UI bindings, logs).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged {
        session: SessionId,
        state: PlaybackState,
    },
    LoadingChanged {
        loading: bool,
    },
    PlayingChanged {
        playing: bool,
    },
    SessionFailed {
        session: SessionId,
        error: PlaybackError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}
