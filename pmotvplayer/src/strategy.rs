//! The two mutually exclusive ways of getting the stream onto the element.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::capabilities::{EventSink, MediaElement, PlaybackPlatform, TransportHandle};
use crate::errors::{PlatformError, PlaybackError};
use crate::model::{MediaEvent, TransportEventKind};
use crate::options::TransportOptions;

/// Selected once per `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStrategy {
    /// A transport library fetches segments and feeds the element.
    LibraryMediated,
    /// The element understands the manifest itself.
    Native,
}

impl PlaybackStrategy {
    /// Probe the platform: transport first, native support second.
    pub fn select(
        platform: &dyn PlaybackPlatform,
        element: &dyn MediaElement,
        native_mime_type: &str,
    ) -> Result<Self, PlaybackError> {
        if platform.transport_supported() {
            Ok(PlaybackStrategy::LibraryMediated)
        } else if element.can_play_type(native_mime_type) {
            Ok(PlaybackStrategy::Native)
        } else {
            Err(PlaybackError::Unsupported)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackStrategy::LibraryMediated => "library-mediated",
            PlaybackStrategy::Native => "native",
        }
    }

    pub fn uses_transport(&self) -> bool {
        matches!(self, PlaybackStrategy::LibraryMediated)
    }

    /// The event after which the stream is playable under this strategy.
    pub fn is_ready_event(&self, event: &MediaEvent) -> bool {
        matches!(
            (self, event),
            (PlaybackStrategy::LibraryMediated, MediaEvent::ManifestParsed)
                | (PlaybackStrategy::Native, MediaEvent::MetadataLoaded)
        )
    }

    /// Put the stream on the element and bind the readiness/error events.
    ///
    /// Library-mediated: the transport is subscribed, loaded, then attached
    /// (load before attach). Native: the element gets the URL directly and no
    /// transport exists. On error nothing created here is left alive.
    pub(crate) fn load(
        &self,
        platform: &dyn PlaybackPlatform,
        element: &Arc<dyn MediaElement>,
        stream_url: &str,
        options: &TransportOptions,
        sink: &EventSink,
    ) -> Result<Option<Box<dyn TransportHandle>>, PlatformError> {
        match self {
            PlaybackStrategy::LibraryMediated => {
                let mut transport = platform.create_transport(options)?;
                transport.on(TransportEventKind::ManifestParsed, sink.clone());
                transport.on(TransportEventKind::Error, sink.clone());

                let wired = transport
                    .load_source(stream_url)
                    .and_then(|_| transport.attach_media(Arc::clone(element)));

                match wired {
                    Ok(()) => Ok(Some(transport)),
                    Err(err) => {
                        transport.destroy();
                        Err(err)
                    }
                }
            }
            PlaybackStrategy::Native => {
                element.set_source(stream_url);
                element.on_metadata_loaded(sink.clone());
                Ok(None)
            }
        }
    }

    /// Release what `load` created.
    pub(crate) fn teardown(&self, transport: Option<Box<dyn TransportHandle>>) {
        if let Some(mut transport) = transport {
            debug!(strategy = %self, "Destroying transport");
            transport.destroy();
        }
    }
}

impl fmt::Display for PlaybackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
