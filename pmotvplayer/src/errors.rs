use std::time::Duration;

use thiserror::Error;

/// Failure of a playback session.
///
/// None of these escape as a fault: the controller converts each one into a
/// state change and keeps it as the session's `last_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Neither an adaptive-streaming transport nor native HLS playback is available")]
    Unsupported,
    #[error("Player initialisation failed: {0}")]
    InitFailure(String),
    #[error("Fatal transport error ({kind}): {details}")]
    Transport { kind: String, details: String },
    #[error("Stream did not become ready within {0:?}")]
    StartupTimeout(Duration),
    #[error("No stream URL available")]
    NoStreamUrl,
    #[error("A playback session is already active")]
    SessionActive,
}

/// Failure reported by a platform collaborator (player, transport, media
/// element, orientation service).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Construction failed: {0}")]
    Construction(String),
    #[error("Play command rejected: {0}")]
    PlayRejected(String),
    #[error("Orientation request failed: {0}")]
    Orientation(String),
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    pub fn construction(message: impl Into<String>) -> Self {
        PlatformError::Construction(message.into())
    }

    pub fn play_rejected(message: impl Into<String>) -> Self {
        PlatformError::PlayRejected(message.into())
    }

    pub fn orientation(message: impl Into<String>) -> Self {
        PlatformError::Orientation(message.into())
    }
}

impl From<PlatformError> for PlaybackError {
    fn from(err: PlatformError) -> Self {
        PlaybackError::InitFailure(err.to_string())
    }
}
