//! End-to-end dialog flows through the engine.

use intake_dialog::{DialogConfig, DialogEngine, MemoryStore, SessionStore};
use intake_types::{CallSession, DialogState, InboundEvent, Step, VoiceDirective};

fn engine() -> DialogEngine<MemoryStore> {
    DialogEngine::new(MemoryStore::new(), DialogConfig::default())
}

fn speech(call_id: &str, state: DialogState, transcript: &str) -> InboundEvent {
    InboundEvent::SpeechOrDigits {
        call_id: call_id.to_string(),
        state,
        transcript: Some(transcript.to_string()),
        digits: None,
        retry_count: None,
    }
}

fn digits(call_id: &str, state: DialogState, digits: &str) -> InboundEvent {
    InboundEvent::SpeechOrDigits {
        call_id: call_id.to_string(),
        state,
        transcript: None,
        digits: Some(digits.to_string()),
        retry_count: None,
    }
}

fn silence(call_id: &str, state: DialogState) -> InboundEvent {
    InboundEvent::SpeechOrDigits {
        call_id: call_id.to_string(),
        state,
        transcript: None,
        digits: None,
        retry_count: None,
    }
}

fn spoken(directive: &VoiceDirective) -> String {
    directive.spoken_text().join(" ")
}

#[test]
fn happy_path_collects_all_fields_and_hands_off() {
    let engine = engine();
    let call_id = uuid::Uuid::new_v4().to_string();

    // Greeting gathers a consent answer.
    let directive = engine.handle(InboundEvent::IncomingCall {
        call_id: call_id.clone(),
    });
    let gather = directive.gather_step().expect("consent gather");
    assert_eq!(gather.next_state, DialogState::AwaitingConsent);
    assert!(gather.accepts_speech && gather.accepts_digits);
    assert!(spoken(&directive).contains("say 'yes' or press 1"));

    // Consent granted: a fresh session starts at first-name collection.
    let directive = engine.handle(speech(&call_id, DialogState::AwaitingConsent, "yes"));
    let gather = directive.gather_step().expect("first name gather");
    assert_eq!(gather.next_state, DialogState::CollectingFirstName);
    assert!(gather.accepts_speech && !gather.accepts_digits);
    let session = engine.store().get(&call_id).expect("session created");
    assert_eq!(session.state, DialogState::CollectingFirstName);

    // First name captured and read back.
    let directive = engine.handle(speech(&call_id, DialogState::CollectingFirstName, "John"));
    assert!(spoken(&directive).contains("I heard the first name as John"));
    let session = engine.store().get(&call_id).unwrap();
    assert_eq!(session.first_name.as_deref(), Some("John"));
    assert_eq!(session.state, DialogState::ConfirmingFirstName);

    // Digit 1 confirms; last-name collection begins.
    let directive = engine.handle(digits(&call_id, DialogState::ConfirmingFirstName, "1"));
    assert!(spoken(&directive).contains("last name"));

    // Carrier phrase is stripped from the last name.
    let directive = engine.handle(speech(
        &call_id,
        DialogState::CollectingLastName,
        "it is smith",
    ));
    assert!(spoken(&directive).contains("I heard the last name as Smith"));
    let session = engine.store().get(&call_id).unwrap();
    assert_eq!(session.last_name.as_deref(), Some("Smith"));

    // Confirmation is advisory: silence falls through to date collection.
    let directive = engine.handle(silence(&call_id, DialogState::ConfirmingLastName));
    assert!(spoken(&directive).contains("date of birth"));
    let gather = directive.gather_step().expect("date gather");
    assert_eq!(gather.next_state, DialogState::CollectingDate);
    assert_eq!(gather.timeout_seconds, 15);
    assert_eq!(gather.speech_timeout_seconds, 4);

    // Date accepted verbatim, title-cased, no calendar normalization.
    let directive = engine.handle(speech(
        &call_id,
        DialogState::CollectingDate,
        "March 3rd 1985",
    ));
    let text = spoken(&directive);
    assert!(text.contains("First name: John"));
    assert!(text.contains("Last name: Smith"));
    assert!(text.contains("March 3Rd 1985"));
    let session = engine.store().get(&call_id).unwrap();
    assert_eq!(session.date_of_birth.as_deref(), Some("March 3Rd 1985"));
    assert_eq!(session.state, DialogState::ConfirmingAll);

    // Final yes hands off to the lookup.
    let directive = engine.handle(speech(&call_id, DialogState::ConfirmingAll, "yes"));
    assert!(spoken(&directive).contains("searching"));
    assert!(directive.steps.iter().any(|step| matches!(
        step,
        Step::Redirect {
            next_state: DialogState::LookupHandoff,
            ..
        }
    )));
    let session = engine.store().get(&call_id).unwrap();
    assert_eq!(session.state, DialogState::LookupHandoff);
    let request = session.lookup_request().expect("handoff payload complete");
    assert_eq!(request.first_name, "John");
    assert_eq!(request.last_name, "Smith");
    assert_eq!(request.date_of_birth, "March 3Rd 1985");

    // The handoff callback wraps up and ends the call.
    let directive = engine.handle(silence(&call_id, DialogState::LookupHandoff));
    assert!(directive.ends_call());
}

#[test]
fn consent_decline_ends_the_call_without_a_session() {
    let engine = engine();

    let directive = engine.handle(digits("CA1", DialogState::AwaitingConsent, "2"));
    assert!(directive.ends_call());
    assert!(spoken(&directive).contains("Goodbye"));
    assert!(engine.store().get("CA1").is_none());

    let directive = engine.handle(speech("CA2", DialogState::AwaitingConsent, "no thanks"));
    assert!(directive.ends_call());
    assert!(engine.store().get("CA2").is_none());
}

#[test]
fn consent_is_fail_open_for_silence_and_unrecognized_speech() {
    let engine = engine();

    let directive = engine.handle(silence("CA1", DialogState::AwaitingConsent));
    assert_eq!(
        directive.gather_step().map(|g| g.next_state),
        Some(DialogState::CollectingFirstName)
    );
    assert!(engine.store().get("CA1").is_some());

    let directive = engine.handle(speech("CA2", DialogState::AwaitingConsent, "banana"));
    assert_eq!(
        directive.gather_step().map(|g| g.next_state),
        Some(DialogState::CollectingFirstName)
    );
}

#[test]
fn rejected_name_confirmation_recollects_the_same_field() {
    let engine = engine();
    engine.handle(silence("CA1", DialogState::AwaitingConsent));
    engine.handle(speech("CA1", DialogState::CollectingFirstName, "John"));

    let directive = engine.handle(speech("CA1", DialogState::ConfirmingFirstName, "no"));
    let gather = directive.gather_step().expect("recollect gather");
    assert_eq!(gather.next_state, DialogState::CollectingFirstName);

    let session = engine.store().get("CA1").unwrap();
    assert_eq!(session.state, DialogState::CollectingFirstName);
    assert_eq!(session.retry_count, 0);
    // The previous capture survives until recollected.
    assert_eq!(session.first_name.as_deref(), Some("John"));

    // The recapture overwrites the rejected value.
    engine.handle(speech("CA1", DialogState::CollectingFirstName, "Jane"));
    let session = engine.store().get("CA1").unwrap();
    assert_eq!(session.first_name.as_deref(), Some("Jane"));
}

#[test]
fn rejected_final_confirmation_clears_fields_and_restarts() {
    let engine = engine();
    let mut session = CallSession::new("CA1");
    session.first_name = Some("John".to_string());
    session.last_name = Some("Smith".to_string());
    session.date_of_birth = Some("March 3Rd 1985".to_string());
    session.state = DialogState::ConfirmingAll;
    engine.store().put(session);

    let directive = engine.handle(digits("CA1", DialogState::ConfirmingAll, "2"));
    assert!(spoken(&directive).contains("start over"));
    assert_eq!(
        directive.gather_step().map(|g| g.next_state),
        Some(DialogState::CollectingFirstName)
    );

    let session = engine.store().get("CA1").unwrap();
    assert_eq!(session.state, DialogState::CollectingFirstName);
    assert_eq!(session.retry_count, 0);
    assert!(session.first_name.is_none());
    assert!(session.last_name.is_none());
    assert!(session.date_of_birth.is_none());
}

#[test]
fn ambiguous_final_confirmation_proceeds_to_handoff() {
    let engine = engine();
    let mut session = CallSession::new("CA1");
    session.first_name = Some("John".to_string());
    session.last_name = Some("Smith".to_string());
    session.date_of_birth = Some("March 3Rd 1985".to_string());
    session.state = DialogState::ConfirmingAll;
    engine.store().put(session);

    let directive = engine.handle(speech("CA1", DialogState::ConfirmingAll, "hmm"));
    assert!(directive.steps.iter().any(|step| matches!(
        step,
        Step::Redirect {
            next_state: DialogState::LookupHandoff,
            ..
        }
    )));
    assert_eq!(
        engine.store().get("CA1").unwrap().state,
        DialogState::LookupHandoff
    );
}

#[test]
fn handoff_with_incomplete_fields_apologizes_and_hangs_up() {
    let engine = engine();
    let mut session = CallSession::new("CA1");
    session.state = DialogState::LookupHandoff;
    engine.store().put(session);

    let directive = engine.handle(silence("CA1", DialogState::LookupHandoff));
    assert!(directive.ends_call());
    assert!(spoken(&directive).contains("error processing your request"));
}
