/// Intent classifier
///
/// Maps a raw utterance to an intent and the payload left over after the wake
/// word and command verb are stripped. Keyword matching is case-insensitive;
/// the payload keeps the caller's original casing.

use crate::intent::{Intent, Verb};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Leading token that gates command handling
pub const WAKE_WORD: &str = "jarvis";

/// Substrings that mark a request as several tasks at once.
///
/// Plain substring checks: `&` needs no surrounding spaces.
pub const COMBO_MARKERS: [&str; 4] = [" and ", "&", " also ", " then "];

static WAKE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^jarvis\b").expect("wake word pattern must compile"));

/// Classifier output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub payload: String,
}

impl Classification {
    pub fn new(intent: Intent, payload: impl Into<String>) -> Self {
        Self {
            intent,
            payload: payload.into(),
        }
    }
}

/// Classify an utterance. First matching rule wins:
///
/// 1. no leading wake word -> `MissingWake` with the trimmed utterance
/// 2. nothing after the wake word -> `Unknown` with an empty payload
/// 3. any combo marker in the payload -> `Combo`
/// 4. a verb from [`Verb::PRIORITY`] -> that verb's intent
/// 5. otherwise `Unknown` with the full post-wake text
pub fn classify(utterance: &str) -> Classification {
    let trimmed = utterance.trim();

    let Some(wake) = WAKE_PATTERN.find(trimmed) else {
        debug!(utterance = trimmed, "wake word missing");
        return Classification::new(Intent::MissingWake, trimmed);
    };

    let payload = strip_separators(&trimmed[wake.end()..]);
    if payload.is_empty() {
        return Classification::new(Intent::Unknown, "");
    }

    let lowered = payload.to_lowercase();
    if COMBO_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        let rest = match_verb(payload).map_or(payload, |(_, rest)| rest);
        debug!(payload, "combo request detected");
        return Classification::new(Intent::Combo, rest);
    }

    let classification = match match_verb(payload) {
        Some((Verb::Stop, _)) => Classification::new(Intent::Stop, ""),
        Some((verb, rest)) => Classification::new(verb.intent(), rest),
        None => Classification::new(Intent::Unknown, payload),
    };

    debug!(
        intent = %classification.intent,
        payload = %classification.payload,
        "utterance classified"
    );

    classification
}

/// Find the highest-priority verb at the start of `payload` and return the remainder.
fn match_verb(payload: &str) -> Option<(Verb, &str)> {
    Verb::PRIORITY.iter().find_map(|&verb| {
        let rest = strip_keyword(payload, verb.keyword())?;
        let rest = match verb {
            // "help me with X" carries the same payload as "help with X"
            Verb::Help => strip_keyword(rest, "me").unwrap_or(rest),
            _ => rest,
        };
        Some((verb, rest))
    })
}

/// Strip `keyword` from the front of `text` if it appears there as a whole word.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let rest = &text[keyword.len()..];
    // Same word characters as the wake word's `\b`
    if rest.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    Some(strip_separators(rest))
}

fn strip_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == ',' || c.is_whitespace())
}
