/// Intent definitions
///
/// The closed set of command categories an utterance can resolve to, plus the
/// ordered list of command verbs the classifier tries after combo detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified command category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Explain,
    Analyze,
    Plan,
    Help,
    Stop,
    /// Several actions joined by a conjunction marker
    Combo,
    Unknown,
    /// Utterance did not start with the wake word
    MissingWake,
    /// Voice features requested but not available
    Unsupported,
}

impl Intent {
    /// Stable tag used in logs and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Explain => "explain",
            Intent::Analyze => "analyze",
            Intent::Plan => "plan",
            Intent::Help => "help",
            Intent::Stop => "stop",
            Intent::Combo => "combo",
            Intent::Unknown => "unknown",
            Intent::MissingWake => "missing-wake",
            Intent::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command verb recognised after the wake word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Explain,
    Analyze,
    Plan,
    Help,
    Stop,
}

impl Verb {
    /// Verbs in match priority order; the first matching prefix wins.
    pub const PRIORITY: [Verb; 5] = [Verb::Explain, Verb::Analyze, Verb::Plan, Verb::Help, Verb::Stop];

    /// Keyword as spoken (lower-case)
    pub fn keyword(&self) -> &'static str {
        match self {
            Verb::Explain => "explain",
            Verb::Analyze => "analyze",
            Verb::Plan => "plan",
            Verb::Help => "help",
            Verb::Stop => "stop",
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            Verb::Explain => Intent::Explain,
            Verb::Analyze => Intent::Analyze,
            Verb::Plan => Intent::Plan,
            Verb::Help => Intent::Help,
            Verb::Stop => Intent::Stop,
        }
    }
}
