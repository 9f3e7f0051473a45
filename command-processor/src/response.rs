/// Response builder
///
/// Fills a fixed template per intent and caps the result at
/// [`MAX_RESPONSE_WORDS`] words. Only the literal stop response skips the cap.

use crate::intent::Intent;
use tracing::trace;

/// Word cap for every templated response
pub const MAX_RESPONSE_WORDS: usize = 45;

/// Appended after a truncated response
pub const CONTINUATION: &str = "… Shall I continue?";

/// Substituted when the payload is empty
pub const DEFAULT_SUBJECT: &str = "the requested subject";

pub const STOP_RESPONSE: &str = "Understood. Standing by.";

/// Build the response text for a classified utterance
pub fn build(intent: Intent, payload: &str) -> String {
    let subject = match payload.trim() {
        "" => DEFAULT_SUBJECT,
        trimmed => trimmed,
    };

    let text = match intent {
        Intent::Stop => return STOP_RESPONSE.to_string(),
        Intent::Explain => format!(
            "Analyzing… {}: at its core this comes down to a few key ideas, \
             how they fit together, and why they matter in practice. Shall I continue?",
            capitalize_first(subject)
        ),
        Intent::Analyze => format!(
            "Analyzing… Here is a breakdown of {subject}: the core components, \
             the main strengths, the likely weak points, and what to examine next. \
             Shall I continue?"
        ),
        Intent::Plan => format!(
            "Understood. Plan for {subject}: step one, define the goal; \
             step two, gather what you need; step three, execute in stages; \
             step four, review the results. Shall I continue?"
        ),
        Intent::Help => format!(
            "Understood. What specific part of {subject} would you like help with?"
        ),
        Intent::Combo => "Understood. That request combines several tasks. \
             Please split it and give me one task at a time."
            .to_string(),
        Intent::MissingWake => "Please begin your command with the wake word \"Jarvis\" \
             so I know you are talking to me."
            .to_string(),
        Intent::Unsupported => "Voice features are unavailable in this environment. \
             Manual input fallback is active, so please type your command."
            .to_string(),
        Intent::Unknown => "I need one precise action. Say \"Jarvis\" followed by \
             explain, analyze, plan, help, or stop."
            .to_string(),
    };

    truncate_words(&text, MAX_RESPONSE_WORDS)
}

/// Keep at most `max_words` whitespace-separated words.
///
/// Text within the limit is returned unchanged. Longer text keeps exactly
/// `max_words` words joined by single spaces, loses any trailing punctuation,
/// and gets [`CONTINUATION`] appended.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= max_words {
        return text.to_string();
    }

    trace!(words = words.len(), max_words, "truncating response");

    let mut kept = words[..max_words].to_vec();
    if let Some(last) = kept.last_mut() {
        // A punctuation-only word stays as is; the count must not drop
        let trimmed = last.trim_end_matches(|c: char| c.is_ascii_punctuation() || c == '…');
        if !trimmed.is_empty() {
            *last = trimmed;
        }
    }

    format!("{} {CONTINUATION}", kept.join(" "))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
