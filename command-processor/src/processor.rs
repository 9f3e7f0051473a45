/// Command processor
///
/// Runs one utterance through classify -> build -> log and returns the
/// resulting exchange together with the side effects the caller must carry
/// out. The processor never fails: every input, including the empty string,
/// yields a well-formed exchange.

use crate::classifier::{classify, Classification};
use crate::config::AssistantConfig;
use crate::exchange::{Diagnostic, Entry, Exchange};
use crate::history::BoundedLog;
use crate::intent::Intent;
use crate::response::build;
use tracing::{debug, info};

pub const COMBO_DIAGNOSTIC: &str = "combo detected, tasks must be split manually";
pub const FALLBACK_DIAGNOSTIC: &str = "falling back from voice mode";

/// User text recorded when voice mode is requested but unavailable
pub const VOICE_MODE_REQUEST: &str = "(voice mode)";

/// Side effect requested from an external collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Speak `text` with a voice for `language`
    Speak { text: String, language: String },

    /// Diagnostic event (already recorded in the diagnostics log)
    Diagnostic(String),
}

/// Result of processing one utterance
#[derive(Debug, Clone)]
pub struct Turn {
    pub exchange: Exchange,
    pub effects: Vec<Effect>,
}

impl Turn {
    pub fn response(&self) -> &str {
        self.exchange.response()
    }

    pub fn intent(&self) -> Intent {
        self.exchange.intent()
    }

    /// Text of the speak request, if any
    pub fn speech(&self) -> Option<(&str, &str)> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Speak { text, language } => Some((text.as_str(), language.as_str())),
            Effect::Diagnostic(_) => None,
        })
    }
}

/// Processor statistics
#[derive(Debug, Clone, Default)]
pub struct ProcessorStats {
    pub utterances_processed: u64,
    pub combos_detected: u64,
    pub fallbacks: u64,
}

pub struct CommandProcessor {
    config: AssistantConfig,
    exchanges: BoundedLog<Entry>,
    diagnostics: BoundedLog<Diagnostic>,
    stats: ProcessorStats,
}

impl CommandProcessor {
    pub fn new(config: AssistantConfig) -> Self {
        info!("Initializing command processor");
        info!("Language: {}", config.language);

        Self {
            config,
            exchanges: BoundedLog::new(),
            diagnostics: BoundedLog::new(),
            stats: ProcessorStats::default(),
        }
    }

    /// Process one raw utterance
    pub fn process(&mut self, utterance: &str) -> Turn {
        let Classification { intent, payload } = classify(utterance);
        self.stats.utterances_processed += 1;

        self.respond(utterance, intent, &payload)
    }

    /// Record an `unsupported` turn after voice mode was requested without capture support
    pub fn fallback_to_manual(&mut self) -> Turn {
        self.respond(VOICE_MODE_REQUEST, Intent::Unsupported, "")
    }

    fn respond(&mut self, utterance: &str, intent: Intent, payload: &str) -> Turn {
        let response = build(intent, payload);
        let exchange = Exchange::new(utterance, response.clone(), intent);

        for entry in exchange.entries() {
            self.exchanges.push(entry.clone());
        }

        let mut effects = vec![Effect::Speak {
            text: response,
            language: self.config.language.clone(),
        }];

        let diagnostic = match intent {
            Intent::Combo => {
                self.stats.combos_detected += 1;
                Some(COMBO_DIAGNOSTIC)
            }
            Intent::Unsupported => {
                self.stats.fallbacks += 1;
                Some(FALLBACK_DIAGNOSTIC)
            }
            _ => None,
        };

        if let Some(message) = diagnostic {
            self.record_diagnostic(message);
            effects.push(Effect::Diagnostic(message.to_string()));
        }

        info!(intent = %intent, "turn complete");
        debug!("Response: {}", exchange.response());

        Turn { exchange, effects }
    }

    /// Append an event to the diagnostics log
    pub fn record_diagnostic(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(message);
        debug!("Diagnostic: {}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// Exchange log, newest-first
    pub fn exchanges(&self) -> &BoundedLog<Entry> {
        &self.exchanges
    }

    /// Diagnostics log, newest-first
    pub fn diagnostics(&self) -> &BoundedLog<Diagnostic> {
        &self.diagnostics
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AssistantConfig {
        &mut self.config
    }

    pub fn stats(&self) -> &ProcessorStats {
        &self.stats
    }

    /// Clear both logs and statistics
    pub fn reset(&mut self) {
        self.exchanges.clear();
        self.diagnostics.clear();
        self.stats = ProcessorStats::default();
        info!("Processor reset");
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new(AssistantConfig::default())
    }
}
