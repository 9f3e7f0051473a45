/// Integration tests for the command pipeline
///
/// Drives classification, response building and the session end-to-end
/// through the public API.

use command_processor::{
    build, classify, AssistantConfig, CaptureEvent, CommandProcessor, ConsolePlayback, Intent,
    ListenOutcome, Role, ScriptedCapture, UnavailableCapture, VoiceSession, CONTINUATION,
    LOG_CAPACITY, MAX_RESPONSE_WORDS, STOP_RESPONSE,
};
use std::time::Duration;
use test_case::test_case;

#[test_case("Jarvis, explain AI", Intent::Explain, "AI" ; "explain")]
#[test_case("jarvis analyze the logs", Intent::Analyze, "the logs" ; "analyze")]
#[test_case("JARVIS plan my week", Intent::Plan, "my week" ; "plan")]
#[test_case("Jarvis, help me with email", Intent::Help, "with email" ; "help me")]
#[test_case("jarvis help", Intent::Help, "" ; "bare help")]
#[test_case("jarvis stop now", Intent::Stop, "" ; "stop discards payload")]
#[test_case("Jarvis, analyze this and plan that", Intent::Combo, "this and plan that" ; "combo before verbs")]
#[test_case("jarvis tea & biscuits", Intent::Combo, "tea & biscuits" ; "ampersand combo")]
#[test_case("jarvis", Intent::Unknown, "" ; "bare wake word")]
#[test_case("jarvis sing a song", Intent::Unknown, "sing a song" ; "no verb")]
#[test_case("", Intent::MissingWake, "" ; "empty")]
#[test_case("explain AI", Intent::MissingWake, "explain AI" ; "no wake word")]
#[test_case("jarvisbot explain AI", Intent::MissingWake, "jarvisbot explain AI" ; "wake word substring")]
fn test_classification_table(utterance: &str, intent: Intent, payload: &str) {
    let result = classify(utterance);
    assert_eq!(result.intent, intent);
    assert_eq!(result.payload, payload);
}

#[test_case("hello there" ; "plain text")]
#[test_case("  the jarvis said" ; "wake word later")]
#[test_case("Jarvi, stop" ; "truncated wake word")]
#[test_case("xjarvis stop" ; "prefixed wake word")]
fn test_missing_wake_word(utterance: &str) {
    assert_eq!(classify(utterance).intent, Intent::MissingWake);
}

#[test]
fn test_stop_response_is_exact() {
    assert_eq!(build(Intent::Stop, ""), "Understood. Standing by.");
    assert_eq!(build(Intent::Stop, "and then some more words"), STOP_RESPONSE);
}

#[test]
fn test_response_word_bound_for_long_payloads() {
    let payload = vec!["lorem"; 120].join(" ");

    for intent in [
        Intent::Explain,
        Intent::Analyze,
        Intent::Plan,
        Intent::Help,
        Intent::Combo,
        Intent::Unknown,
        Intent::MissingWake,
        Intent::Unsupported,
    ] {
        let response = build(intent, &payload);
        let body = response
            .strip_suffix(CONTINUATION)
            .map(str::trim_end)
            .unwrap_or(&response);

        assert!(
            body.split_whitespace().count() <= MAX_RESPONSE_WORDS,
            "{} response too long: {}",
            intent,
            response
        );
    }

    let truncated = build(Intent::Help, &payload);
    assert!(truncated.ends_with("… Shall I continue?"));
    let body = truncated.strip_suffix(CONTINUATION).unwrap().trim_end();
    assert_eq!(body.split_whitespace().count(), MAX_RESPONSE_WORDS);
}

#[test]
fn test_log_evicts_oldest_after_thirteen_utterances() {
    let mut processor = CommandProcessor::default();

    for i in 1..=13 {
        processor.process(&format!("jarvis plan step {}", i));
    }

    let entries = processor.exchanges().to_vec();
    assert_eq!(entries.len(), LOG_CAPACITY);

    assert_eq!(entries[0].role, Role::Assistant);
    assert_eq!(entries[1].text, "jarvis plan step 13");
    assert!(entries.iter().all(|e| !e.text.ends_with("step 1")));

    // Every user entry is directly preceded (newer side) by its assistant entry
    for pair in entries.chunks(2) {
        assert_eq!(pair[0].role, Role::Assistant);
        assert_eq!(pair[1].role, Role::User);
        assert_eq!(pair[0].intent, pair[1].intent);
    }
}

#[test]
fn test_diagnostics_log_capped() {
    let mut processor = CommandProcessor::default();

    for _ in 0..20 {
        processor.process("jarvis this & that");
    }

    assert_eq!(processor.diagnostics().len(), LOG_CAPACITY);
    assert_eq!(processor.stats().combos_detected, 20);
}

#[test]
fn test_manual_session_without_platform_support() {
    let mut session = VoiceSession::new(
        AssistantConfig::default(),
        Box::new(UnavailableCapture),
        Box::new(ConsolePlayback::new()),
    );

    // No runtime, so playback is unavailable too
    assert!(!session.capabilities().capture);
    assert!(!session.capabilities().playback);

    let turn = session.submit("Jarvis, explain photosynthesis");
    assert_eq!(turn.intent(), Intent::Explain);
    assert!(turn.response().contains("Photosynthesis"));

    match session.start_listening() {
        ListenOutcome::Fallback(turn) => assert_eq!(turn.intent(), Intent::Unsupported),
        ListenOutcome::Listening(_) => panic!("Capture should be unavailable"),
    }
}

#[tokio::test]
async fn test_scripted_capture_session() {
    let transcripts = vec![
        "Jarvis, analyze sales and plan hiring".to_string(),
        "jarvis stop".to_string(),
    ];

    let mut session = VoiceSession::new(
        AssistantConfig::default(),
        Box::new(ScriptedCapture::new(transcripts, Duration::ZERO)),
        Box::new(ConsolePlayback::with_word_duration(Duration::ZERO)),
    );

    assert!(session.capabilities().capture);
    assert!(session.capabilities().playback);

    let mut rx = match session.start_listening() {
        ListenOutcome::Listening(rx) => rx,
        ListenOutcome::Fallback(_) => panic!("Capture should start"),
    };

    let mut intents = Vec::new();
    while let Some(event) = rx.recv().await {
        let ended = event == CaptureEvent::Ended;
        if let Some(turn) = session.handle_capture_event(event) {
            intents.push(turn.intent());
        }
        if ended {
            break;
        }
    }

    assert_eq!(intents, vec![Intent::Combo, Intent::Stop]);
    assert!(!session.is_listening());
    assert_eq!(
        session.processor().exchanges().latest().unwrap().text,
        STOP_RESPONSE
    );
    assert_eq!(
        session.processor().diagnostics().latest().unwrap().message,
        "combo detected, tasks must be split manually"
    );
}
