/// Voice session
///
/// Connects the collaborators to the processor. Manual input and finalized
/// capture results go through the same `submit` path; collaborator failures
/// are converted into diagnostics and never reach the caller as errors.

use crate::capability::{Capabilities, CaptureEvent, SpeechCapture, SpeechPlayback};
use crate::config::{AssistantConfig, ConfigError};
use crate::exchange::{Diagnostic, Entry};
use crate::processor::{CommandProcessor, Effect, Turn};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub const CAPTURE_UNAVAILABLE: &str = "speech recognition unavailable, manual input only";
pub const PLAYBACK_UNAVAILABLE: &str = "speech synthesis unavailable, responses will not be spoken";

/// Outcome of a request to start listening
#[derive(Debug)]
pub enum ListenOutcome {
    /// Capture started; events arrive on the channel
    Listening(mpsc::UnboundedReceiver<CaptureEvent>),

    /// Capture could not start; an `unsupported` turn was recorded
    Fallback(Turn),
}

/// Display snapshot of the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub capabilities: Capabilities,
    pub language: String,
    pub voice_output: bool,
    pub listening: bool,
    pub interim: Option<String>,
    pub exchanges: Vec<Entry>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct VoiceSession {
    processor: CommandProcessor,
    capture: Box<dyn SpeechCapture>,
    playback: Box<dyn SpeechPlayback>,
    capabilities: Capabilities,
    interim: Option<String>,
    listening: bool,
}

impl VoiceSession {
    /// Create a session, probing both collaborators once
    pub fn new(
        config: AssistantConfig,
        capture: Box<dyn SpeechCapture>,
        playback: Box<dyn SpeechPlayback>,
    ) -> Self {
        let capabilities = Capabilities::probe(capture.as_ref(), playback.as_ref());
        let mut processor = CommandProcessor::new(config);

        info!(
            "Capabilities: capture={}, playback={}",
            capabilities.capture, capabilities.playback
        );

        if !capabilities.capture {
            warn!("{}", CAPTURE_UNAVAILABLE);
            processor.record_diagnostic(CAPTURE_UNAVAILABLE);
        }

        if !capabilities.playback {
            warn!("{}", PLAYBACK_UNAVAILABLE);
            processor.record_diagnostic(PLAYBACK_UNAVAILABLE);
        }

        Self {
            processor,
            capture,
            playback,
            capabilities,
            interim: None,
            listening: false,
        }
    }

    /// Process manually entered text
    pub fn submit(&mut self, text: &str) -> Turn {
        let turn = self.processor.process(text);
        self.dispatch(&turn);
        turn
    }

    /// Start speech capture in the configured language
    pub fn start_listening(&mut self) -> ListenOutcome {
        if self.listening {
            self.capture.stop();
        }

        if !self.capabilities.capture {
            return ListenOutcome::Fallback(self.fall_back());
        }

        let locale = self.processor.config().language.clone();

        match self.capture.start(&locale) {
            Ok(rx) => {
                self.listening = true;
                info!("Listening ({})", locale);
                ListenOutcome::Listening(rx)
            }
            Err(e) => {
                warn!("Failed to start capture: {}", e);
                self.processor
                    .record_diagnostic(format!("speech recognition error: {}", e));
                ListenOutcome::Fallback(self.fall_back())
            }
        }
    }

    pub fn stop_listening(&mut self) {
        if self.listening {
            self.capture.stop();
            info!("Stopped listening");
        }

        self.listening = false;
        self.interim = None;
    }

    /// Handle one event from the capture collaborator
    ///
    /// Returns a turn when the event carried a finalized utterance.
    pub fn handle_capture_event(&mut self, event: CaptureEvent) -> Option<Turn> {
        match event {
            CaptureEvent::Partial(text) => {
                self.interim = Some(text);
                None
            }
            CaptureEvent::Final(text) => {
                self.interim = None;
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(self.submit(text))
            }
            CaptureEvent::Error(detail) => {
                warn!("Capture error: {}", detail);
                self.processor
                    .record_diagnostic(format!("speech recognition error: {}", detail));
                None
            }
            CaptureEvent::Ended => {
                info!("Capture ended");
                self.listening = false;
                self.interim = None;
                None
            }
        }
    }

    /// Select the recognition locale and requested voice
    pub fn set_language(&mut self, tag: &str) -> Result<(), ConfigError> {
        let mut config = self.processor.config().clone();
        config.language = tag.to_string();
        config.validate()?;

        *self.processor.config_mut() = config;
        info!("Language set to {}", tag);
        Ok(())
    }

    pub fn set_voice_output(&mut self, enabled: bool) {
        self.processor.config_mut().voice_output = enabled;
        if !enabled {
            self.playback.cancel();
        }
        info!("Voice output {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Latest interim transcript, if capture is mid-utterance
    pub fn interim(&self) -> Option<&str> {
        self.interim.as_deref()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    pub fn system_prompt(&self) -> &str {
        &self.processor.config().system_prompt
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let config = self.processor.config();

        SessionSnapshot {
            capabilities: self.capabilities,
            language: config.language.clone(),
            voice_output: config.voice_output,
            listening: self.listening,
            interim: self.interim.clone(),
            exchanges: self.processor.exchanges().to_vec(),
            diagnostics: self.processor.diagnostics().to_vec(),
        }
    }

    fn fall_back(&mut self) -> Turn {
        self.listening = false;
        let turn = self.processor.fallback_to_manual();
        self.dispatch(&turn);
        turn
    }

    fn dispatch(&mut self, turn: &Turn) {
        for effect in &turn.effects {
            match effect {
                Effect::Speak { text, language } => self.speak(text, language),
                Effect::Diagnostic(message) => info!("Diagnostic: {}", message),
            }
        }
    }

    fn speak(&mut self, text: &str, language: &str) {
        if !self.processor.config().voice_output || !self.capabilities.playback {
            return;
        }

        if let Err(e) = self.playback.speak(text, language) {
            warn!("Playback failed: {}", e);
            self.processor
                .record_diagnostic(format!("speech playback error: {}", e));
        }
    }
}
