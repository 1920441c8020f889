//! The dialog state machine.

use chrono::Utc;
use intake_speech::{classify_intent, parse_spoken_date, validate_name, Intent};
use intake_types::{CallSession, DialogState, GatherSpec, InboundEvent, Prompt, VoiceDirective};
use tracing::{debug, info, warn};

use crate::config::DialogConfig;
use crate::error::DialogError;
use crate::prompts;
use crate::store::SessionStore;

/// Which of the two confirmed name fields a handler operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameField {
    First,
    Last,
}

/// Deterministic per-call dialog engine.
///
/// Owns the policy configuration and the injected session store. Each
/// [`handle`](Self::handle) call processes exactly one inbound event,
/// completes synchronously, and returns the directive the transport
/// renders back to the telephony platform.
pub struct DialogEngine<S> {
    store: S,
    config: DialogConfig,
}

impl<S: SessionStore> DialogEngine<S> {
    pub fn new(store: S, config: DialogConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// The session store, exposed so transports can inspect sessions.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles one inbound event and returns the next voice directive.
    ///
    /// This is a total function: malformed input, exhausted retries, and
    /// missing sessions all produce a speakable directive, never an error.
    /// A telephony caller cannot receive anything but a spoken response.
    pub fn handle(&self, event: InboundEvent) -> VoiceDirective {
        match event {
            InboundEvent::IncomingCall { call_id } => self.handle_incoming_call(&call_id),
            InboundEvent::SpeechOrDigits {
                call_id,
                state,
                transcript,
                digits,
                retry_count,
            } => {
                debug!(
                    call_id,
                    state = %state,
                    has_transcript = transcript.is_some(),
                    has_digits = digits.is_some(),
                    ?retry_count,
                    "gather result"
                );
                self.handle_input(&call_id, state, transcript.as_deref(), digits.as_deref())
            }
            InboundEvent::CallEnded { call_id } => self.handle_call_ended(&call_id),
        }
    }

    fn handle_input(
        &self,
        call_id: &str,
        state: DialogState,
        transcript: Option<&str>,
        digits: Option<&str>,
    ) -> VoiceDirective {
        // A session parked in a give-up state accepts no further input;
        // a stale platform callback gets a goodbye, not a state mutation.
        if let Some(session) = self.store.get(call_id) {
            if matches!(
                session.state,
                DialogState::Declined | DialogState::TransferredToOperator
            ) {
                return self.handle_terminal(call_id, session.state);
            }
        }

        match state {
            DialogState::AwaitingConsent => self.handle_consent(call_id, transcript, digits),
            DialogState::CollectingFirstName => {
                self.handle_collect_name(call_id, NameField::First, transcript)
            }
            DialogState::CollectingLastName => {
                self.handle_collect_name(call_id, NameField::Last, transcript)
            }
            DialogState::CollectingDate => self.handle_collect_date(call_id, transcript),
            DialogState::ConfirmingFirstName => {
                self.handle_confirm_name(call_id, NameField::First, transcript, digits)
            }
            DialogState::ConfirmingLastName => {
                self.handle_confirm_name(call_id, NameField::Last, transcript, digits)
            }
            DialogState::ConfirmingAll => self.handle_confirm_all(call_id, transcript, digits),
            DialogState::LookupHandoff => self.handle_lookup(call_id),
            DialogState::Declined | DialogState::TransferredToOperator => {
                self.handle_terminal(call_id, state)
            }
        }
    }

    // ── Call lifecycle ───────────────────────────────────────────────

    fn handle_incoming_call(&self, call_id: &str) -> VoiceDirective {
        info!(call_id, "incoming call");
        self.greeting_directive(None)
    }

    fn handle_call_ended(&self, call_id: &str) -> VoiceDirective {
        match self.store.remove(call_id) {
            Some(session) => {
                let duration = Utc::now().signed_duration_since(session.started_at);
                info!(
                    call_id,
                    state = %session.state,
                    seconds = duration.num_seconds(),
                    error_count = session.errors.len(),
                    "call ended, session removed"
                );
            }
            None => debug!(call_id, "call ended with no active session"),
        }
        // Nothing left to render on a finished call.
        VoiceDirective::new()
    }

    // ── Consent gate ─────────────────────────────────────────────────

    fn handle_consent(
        &self,
        call_id: &str,
        transcript: Option<&str>,
        digits: Option<&str>,
    ) -> VoiceDirective {
        if classify_intent(transcript, digits) == Intent::Negative {
            info!(call_id, "consent declined");
            self.store.remove(call_id);
            return VoiceDirective::new()
                .say(self.prompt(prompts::declined()))
                .hangup();
        }

        // Fail-open: explicit yes, unrecognized speech, digit 1, and
        // silence all proceed to collection.
        let mut session = CallSession::new(call_id);
        session.state = DialogState::CollectingFirstName;
        self.store.put(session);
        info!(call_id, "consent granted, collecting first name");
        self.collect_directive(
            Some(prompts::consent_ack(&self.config.service_name)),
            DialogState::CollectingFirstName,
            0,
        )
    }

    // ── Field collection ─────────────────────────────────────────────

    fn handle_collect_name(
        &self,
        call_id: &str,
        field: NameField,
        transcript: Option<&str>,
    ) -> VoiceDirective {
        let state = match field {
            NameField::First => DialogState::CollectingFirstName,
            NameField::Last => DialogState::CollectingLastName,
        };
        let mut session = match self.load_session(call_id) {
            Ok(session) => session,
            Err(error) => return self.recover(&error),
        };

        let Some(text) = non_empty(transcript) else {
            return self.retry_or_escalate(session, state, &DialogError::EmptyInput);
        };

        match validate_name(text, &self.config.name_rules) {
            Ok(value) => {
                session.retry_count = 0;
                let (confirm_state, confirm_text) = match field {
                    NameField::First => {
                        session.first_name = Some(value.clone());
                        (
                            DialogState::ConfirmingFirstName,
                            prompts::confirm_first_name(&value),
                        )
                    }
                    NameField::Last => {
                        session.last_name = Some(value.clone());
                        (
                            DialogState::ConfirmingLastName,
                            prompts::confirm_last_name(&value),
                        )
                    }
                };
                info!(call_id, state = %state, "name captured");
                session.state = confirm_state;
                self.store.put(session);
                VoiceDirective::new()
                    .gather(self.yes_no_gather(confirm_state, confirm_text))
                    .redirect(confirm_state, None)
            }
            Err(reason) => {
                let error = DialogError::Validation(reason.to_string());
                session.record_error(format!("{state}: {error}"));
                self.retry_or_escalate(session, state, &error)
            }
        }
    }

    fn handle_collect_date(&self, call_id: &str, transcript: Option<&str>) -> VoiceDirective {
        let state = DialogState::CollectingDate;
        let mut session = match self.load_session(call_id) {
            Ok(session) => session,
            Err(error) => return self.recover(&error),
        };

        let Some(text) = non_empty(transcript) else {
            return self.retry_or_escalate(session, state, &DialogError::EmptyInput);
        };

        match parse_spoken_date(text) {
            Ok(date) => {
                if !date.has_month_name {
                    // Soft signal only; a fully numeric date is still accepted.
                    debug!(call_id, "no month name heard in date transcript");
                }
                session.date_of_birth = Some(date.text);
                session.retry_count = 0;
                session.state = DialogState::ConfirmingAll;
                info!(call_id, "date of birth captured");

                let confirm_text = prompts::confirm_all(
                    session.first_name.as_deref().unwrap_or("unknown"),
                    session.last_name.as_deref().unwrap_or("unknown"),
                    session.date_of_birth.as_deref().unwrap_or("unknown"),
                );
                self.store.put(session);
                VoiceDirective::new()
                    .gather(self.yes_no_gather(DialogState::ConfirmingAll, confirm_text))
                    .redirect(DialogState::ConfirmingAll, None)
            }
            Err(reason) => {
                let error = DialogError::Validation(reason.to_string());
                session.record_error(format!("{state}: {error}"));
                self.retry_or_escalate(session, state, &error)
            }
        }
    }

    /// Shared failure policy for every collection state: bump the retry
    /// counter and either re-prompt with an escalated instruction or give
    /// up and route the caller to an operator.
    fn retry_or_escalate(
        &self,
        mut session: CallSession,
        state: DialogState,
        cause: &DialogError,
    ) -> VoiceDirective {
        session.retry_count += 1;
        let retry = session.retry_count;

        if retry >= self.config.max_retries {
            warn!(
                call_id = %session.call_id,
                state = %state,
                %cause,
                outcome = %DialogError::RetryLimitExceeded,
                "transferring to operator"
            );
            session.state = DialogState::TransferredToOperator;
            self.store.put(session);
            return VoiceDirective::new()
                .say(self.prompt(prompts::operator_transfer()))
                .say(self.prompt(prompts::business_hours()))
                .hangup();
        }

        debug!(call_id = %session.call_id, state = %state, retry, %cause, "re-prompting");
        session.state = state;
        self.store.put(session);

        let lead = match cause {
            DialogError::Validation(reason) => prompts::correction(reason),
            _ => prompts::no_input(),
        };
        self.collect_directive(Some(lead), state, retry)
    }

    // ── Confirmation ─────────────────────────────────────────────────

    fn handle_confirm_name(
        &self,
        call_id: &str,
        field: NameField,
        transcript: Option<&str>,
        digits: Option<&str>,
    ) -> VoiceDirective {
        let mut session = match self.load_session(call_id) {
            Ok(session) => session,
            Err(error) => return self.recover(&error),
        };

        let collect_state = match field {
            NameField::First => DialogState::CollectingFirstName,
            NameField::Last => DialogState::CollectingLastName,
        };

        match classify_intent(transcript, digits) {
            Intent::Negative => {
                info!(call_id, state = %collect_state, "confirmation rejected, recollecting");
                session.retry_count = 0;
                session.state = collect_state;
                self.store.put(session);
                self.collect_directive(Some(prompts::try_again()), collect_state, 0)
            }
            // Confirmation is advisory: an affirmative, an unrecognized
            // answer, and silence all advance.
            Intent::Affirmative | Intent::Unrecognized => {
                let next_state = match field {
                    NameField::First => DialogState::CollectingLastName,
                    NameField::Last => DialogState::CollectingDate,
                };
                session.retry_count = 0;
                session.state = next_state;
                self.store.put(session);
                self.collect_directive(None, next_state, 0)
            }
        }
    }

    fn handle_confirm_all(
        &self,
        call_id: &str,
        transcript: Option<&str>,
        digits: Option<&str>,
    ) -> VoiceDirective {
        let mut session = match self.load_session(call_id) {
            Ok(session) => session,
            Err(error) => return self.recover(&error),
        };

        match classify_intent(transcript, digits) {
            Intent::Negative => {
                info!(call_id, "final confirmation rejected, restarting collection");
                session.clear_fields();
                session.state = DialogState::CollectingFirstName;
                self.store.put(session);
                self.collect_directive(
                    Some(prompts::restart()),
                    DialogState::CollectingFirstName,
                    0,
                )
            }
            Intent::Affirmative | Intent::Unrecognized => {
                session.retry_count = 0;
                session.state = DialogState::LookupHandoff;
                let ready = session.lookup_request().is_some();
                info!(call_id, ready, "information confirmed, handing off to lookup");
                self.store.put(session);
                VoiceDirective::new()
                    .say(self.prompt(prompts::lookup_processing(&self.config.service_name)))
                    .redirect(DialogState::LookupHandoff, None)
            }
        }
    }

    // ── Handoff and terminal states ──────────────────────────────────

    fn handle_lookup(&self, call_id: &str) -> VoiceDirective {
        let session = match self.load_session(call_id) {
            Ok(session) => session,
            Err(error) => return self.recover(&error),
        };

        match session.lookup_request() {
            Some(request) => {
                info!(call_id, "lookup request ready");
                debug!(call_id, ?request, "lookup payload");
                VoiceDirective::new()
                    .say(self.prompt(prompts::lookup_wrapup()))
                    .hangup()
            }
            None => {
                warn!(call_id, "lookup handoff reached with incomplete fields");
                VoiceDirective::new()
                    .say(self.prompt(prompts::lookup_error()))
                    .hangup()
            }
        }
    }

    fn handle_terminal(&self, call_id: &str, state: DialogState) -> VoiceDirective {
        warn!(call_id, state = %state, "event for terminal state");
        VoiceDirective::new()
            .say(self.prompt(prompts::goodbye()))
            .hangup()
    }

    // ── Recovery ─────────────────────────────────────────────────────

    fn load_session(&self, call_id: &str) -> Result<CallSession, DialogError> {
        self.store
            .get(call_id)
            .ok_or_else(|| DialogError::SessionNotFound(call_id.to_string()))
    }

    /// An event arrived for a call with no session (restart, missed consent
    /// step). Re-run the consent gate with an apology rather than fail: the
    /// caller can only hear a spoken response.
    fn recover(&self, error: &DialogError) -> VoiceDirective {
        warn!(%error, "recovering to consent gate");
        self.greeting_directive(Some(prompts::session_lost()))
    }

    // ── Directive builders ───────────────────────────────────────────

    fn greeting_directive(&self, lead: Option<String>) -> VoiceDirective {
        let mut directive = VoiceDirective::new();
        if let Some(lead) = lead {
            directive = directive.say(self.prompt(lead));
        }
        directive
            .gather(self.yes_no_gather(
                DialogState::AwaitingConsent,
                prompts::greeting(&self.config.service_name),
            ))
            // Silence falls through the gather; the redirect turns it into
            // an empty event for the same state (fail-open consent).
            .redirect(DialogState::AwaitingConsent, None)
    }

    fn collect_directive(
        &self,
        lead: Option<String>,
        state: DialogState,
        retry: u32,
    ) -> VoiceDirective {
        let instruction = match state {
            DialogState::CollectingFirstName => prompts::collect_first_name(retry),
            DialogState::CollectingLastName => prompts::collect_last_name(retry),
            _ => prompts::collect_date(retry),
        };
        let mut directive = VoiceDirective::new();
        if let Some(lead) = lead {
            directive = directive.say(self.prompt(lead));
        }
        directive
            .gather(self.speech_gather(state, instruction))
            .redirect(state, Some(retry))
    }

    /// Speech-only gather for free-form field collection.
    fn speech_gather(&self, state: DialogState, text: String) -> GatherSpec {
        let window = self.config.window_for(state);
        GatherSpec {
            accepts_speech: true,
            accepts_digits: false,
            timeout_seconds: window.timeout_seconds,
            speech_timeout_seconds: window.speech_timeout_seconds,
            num_digits: None,
            next_state: state,
            prompts: vec![self.prompt(text)],
        }
    }

    /// Speech-or-single-digit gather for yes/no questions.
    fn yes_no_gather(&self, state: DialogState, text: String) -> GatherSpec {
        let window = self.config.window_for(state);
        GatherSpec {
            accepts_speech: true,
            accepts_digits: true,
            timeout_seconds: window.timeout_seconds,
            speech_timeout_seconds: window.speech_timeout_seconds,
            num_digits: Some(1),
            next_state: state,
            prompts: vec![self.prompt(text)],
        }
    }

    fn prompt(&self, text: String) -> Prompt {
        Prompt::new(text, &self.config.voice, &self.config.language)
    }
}

fn non_empty(transcript: Option<&str>) -> Option<&str> {
    transcript.map(str::trim).filter(|text| !text.is_empty())
}
