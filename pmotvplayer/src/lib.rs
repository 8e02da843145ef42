//! Live channel playback for PMOTv.
//!
//! [`PlaybackController`] owns one playback session at a time. On `start` it
//! picks how the stream reaches the video element (a transport library, or the
//! element's native HLS support), builds the player, wires the events and
//! guarantees that `stop`, a fatal transport error or a failed start release
//! everything it created. [`ChannelApp`] is the host that loads the channel
//! with `pmotvchannel` first and only then hands the stream to the controller.
//!
//! The platform (video element, player library, transport library,
//! orientation lock) is reached only through the traits in [`capabilities`].

pub mod app;
pub mod capabilities;
pub mod controller;
pub mod errors;
pub mod events;
pub mod model;
pub mod options;
pub mod session;
pub mod strategy;

#[cfg(feature = "pmotvconfig")]
pub mod config_ext;

pub use app::{ChannelApp, ChannelSettings, ChannelView};
pub use capabilities::{
    EventSink, MediaElement, NoOrientation, OrientationService, PlaybackPlatform, PlayerHandle,
    TransportHandle,
};
pub use controller::PlaybackController;
pub use errors::{PlatformError, PlaybackError};
pub use events::ControllerEventBus;
pub use model::{
    ControllerEvent, MediaEvent, Orientation, PlaybackState, PlayerEventKind, SessionEvent,
    SessionId, TransportErrorData, TransportEventKind,
};
pub use options::{PlaybackOptions, PlayerOptions, TransportOptions, HLS_MIME_TYPE};
pub use session::PlaybackSession;
pub use strategy::PlaybackStrategy;

#[cfg(feature = "pmotvconfig")]
pub use config_ext::PlaybackConfigExt;
