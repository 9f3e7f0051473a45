/// Command processor library
///
/// Turns spoken or typed utterances into one of a small set of intents and
/// answers each with a bounded, templated response. Speech capture and
/// playback are injected collaborators.

pub mod capability;
pub mod capture;
pub mod classifier;
pub mod config;
pub mod exchange;
pub mod history;
pub mod intent;
pub mod playback;
pub mod processor;
pub mod response;
pub mod session;

// Re-export main types
pub use capability::{Capabilities, CapabilityError, CaptureEvent, SpeechCapture, SpeechPlayback};
pub use capture::{ScriptedCapture, UnavailableCapture};
pub use classifier::{classify, Classification, COMBO_MARKERS, WAKE_WORD};
pub use config::{AssistantConfig, ConfigError, SUPPORTED_LANGUAGES};
pub use exchange::{Diagnostic, Entry, Exchange, Role};
pub use history::{BoundedLog, LOG_CAPACITY};
pub use intent::{Intent, Verb};
pub use playback::{ConsolePlayback, SilentPlayback};
pub use processor::{CommandProcessor, Effect, ProcessorStats, Turn};
pub use response::{build, truncate_words, CONTINUATION, MAX_RESPONSE_WORDS, STOP_RESPONSE};
pub use session::{ListenOutcome, SessionSnapshot, VoiceSession};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "command_processor=info,jarvis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
