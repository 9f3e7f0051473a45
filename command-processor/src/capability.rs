/// Platform capability interfaces
///
/// Speech capture and speech playback are external collaborators. The
/// pipeline only sees these traits, probes them for availability once, and
/// turns their failures into diagnostics.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Playback error: {0}")]
    Playback(String),
}

/// Event delivered by a speech capture collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Interim transcript, shown but never classified
    Partial(String),

    /// Finalized utterance
    Final(String),

    /// Runtime failure with the raw error detail
    Error(String),

    /// Capture stopped
    Ended,
}

/// Speech-to-text source
#[cfg_attr(test, mockall::automock)]
pub trait SpeechCapture: Send {
    fn is_available(&self) -> bool;

    /// Begin capturing in `locale`; events arrive on the returned channel
    fn start(&mut self, locale: &str) -> Result<mpsc::UnboundedReceiver<CaptureEvent>, CapabilityError>;

    fn stop(&mut self);
}

/// Text-to-speech sink. Fire-and-forget: `speak` returns once playback is requested.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechPlayback: Send {
    fn is_available(&self) -> bool;

    /// Request playback; a new request supersedes any in-flight one
    fn speak(&self, text: &str, language: &str) -> Result<(), CapabilityError>;

    /// Stop any in-flight playback
    fn cancel(&self);
}

/// Result of probing the collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub capture: bool,
    pub playback: bool,
}

impl Capabilities {
    pub fn probe(capture: &dyn SpeechCapture, playback: &dyn SpeechPlayback) -> Self {
        Self {
            capture: capture.is_available(),
            playback: playback.is_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe() {
        let mut capture = MockSpeechCapture::new();
        capture.expect_is_available().return_const(false);

        let mut playback = MockSpeechPlayback::new();
        playback.expect_is_available().return_const(true);

        let caps = Capabilities::probe(&capture, &playback);
        assert_eq!(
            caps,
            Capabilities {
                capture: false,
                playback: true
            }
        );
    }

    #[test]
    fn test_error_display() {
        let err = CapabilityError::Playback("engine busy".to_string());
        assert_eq!(err.to_string(), "Playback error: engine busy");
    }
}
