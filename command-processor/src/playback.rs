/// Speech playback collaborators
///
/// `ConsolePlayback` simulates a synthesis engine on the terminal: each
/// request runs as its own task for the estimated speaking time, and a new
/// request aborts the one in flight so audio never overlaps.

use crate::capability::{CapabilityError, SpeechPlayback};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Default speaking pace
pub const DEFAULT_WORD_DURATION: Duration = Duration::from_millis(350);

pub struct ConsolePlayback {
    word_duration: Duration,
    current: Mutex<Option<JoinHandle<()>>>,
    superseded: AtomicU64,
}

impl ConsolePlayback {
    pub fn new() -> Self {
        Self::with_word_duration(DEFAULT_WORD_DURATION)
    }

    pub fn with_word_duration(word_duration: Duration) -> Self {
        Self {
            word_duration,
            current: Mutex::new(None),
            superseded: AtomicU64::new(0),
        }
    }

    /// Whether an utterance is still being spoken
    pub fn is_speaking(&self) -> bool {
        self.current
            .lock()
            .map(|current| current.as_ref().is_some_and(|task| !task.is_finished()))
            .unwrap_or(false)
    }

    /// Number of requests cut short by a newer one
    pub fn superseded_count(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }
}

impl Default for ConsolePlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechPlayback for ConsolePlayback {
    fn is_available(&self) -> bool {
        tokio::runtime::Handle::try_current().is_ok()
    }

    fn speak(&self, text: &str, language: &str) -> Result<(), CapabilityError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CapabilityError::Playback(format!("no async runtime: {}", e)))?;

        let mut current = self
            .current
            .lock()
            .map_err(|_| CapabilityError::Playback("playback state poisoned".to_string()))?;

        if let Some(previous) = current.take() {
            if !previous.is_finished() {
                info!("Superseding in-flight speech");
                self.superseded.fetch_add(1, Ordering::Relaxed);
            }
            previous.abort();
        }

        let words = text.split_whitespace().count() as u32;
        let duration = self.word_duration * words;
        let text = text.to_string();
        let language = language.to_string();

        *current = Some(runtime.spawn(async move {
            info!("Speaking [{}]: {}", language, text);
            tokio::time::sleep(duration).await;
            debug!("Finished speaking after {:?}", duration);
        }));

        Ok(())
    }

    fn cancel(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(task) = current.take() {
                task.abort();
                debug!("Playback cancelled");
            }
        }
    }
}

/// Playback backend for hosts without speech synthesis
#[derive(Debug, Default)]
pub struct SilentPlayback;

impl SpeechPlayback for SilentPlayback {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str, _language: &str) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable(
            "speech synthesis is not supported on this host".to_string(),
        ))
    }

    fn cancel(&self) {}
}
