/// Speech capture collaborators
///
/// No platform recognizer ships with this crate. `UnavailableCapture`
/// stands in when the host has none; `ScriptedCapture` replays prepared
/// transcripts as interim and final results, the way a streaming recognizer
/// would deliver them.

use crate::capability::{CapabilityError, CaptureEvent, SpeechCapture};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Capture backend for hosts without speech recognition
#[derive(Debug, Default)]
pub struct UnavailableCapture;

impl SpeechCapture for UnavailableCapture {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _locale: &str) -> Result<mpsc::UnboundedReceiver<CaptureEvent>, CapabilityError> {
        Err(CapabilityError::Unavailable(
            "speech recognition is not supported on this host".to_string(),
        ))
    }

    fn stop(&mut self) {}
}

/// Replays transcripts word by word, then as a finalized result
pub struct ScriptedCapture {
    transcripts: Vec<String>,
    word_delay: Duration,
    task: Option<JoinHandle<()>>,
}

impl ScriptedCapture {
    pub fn new(transcripts: Vec<String>, word_delay: Duration) -> Self {
        Self {
            transcripts,
            word_delay,
            task: None,
        }
    }

    /// Whether the replay task is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl SpeechCapture for ScriptedCapture {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, locale: &str) -> Result<mpsc::UnboundedReceiver<CaptureEvent>, CapabilityError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CapabilityError::Unavailable(format!("no async runtime: {}", e)))?;

        self.stop();

        info!(
            "Replaying {} transcripts (locale {})",
            self.transcripts.len(),
            locale
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let transcripts = self.transcripts.clone();
        let delay = self.word_delay;

        self.task = Some(runtime.spawn(async move {
            for transcript in transcripts {
                let words: Vec<&str> = transcript.split_whitespace().collect();

                for count in 1..words.len() {
                    if tx.send(CaptureEvent::Partial(words[..count].join(" "))).is_err() {
                        return;
                    }
                    tokio::time::sleep(delay).await;
                }

                if tx.send(CaptureEvent::Final(transcript.clone())).is_err() {
                    return;
                }
                tokio::time::sleep(delay).await;
            }

            debug!("Transcript replay finished");
            // Receiver may already be gone
            let _ = tx.send(CaptureEvent::Ended);
        }));

        Ok(rx)
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Capture stopped");
        }
    }
}

impl Drop for ScriptedCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
