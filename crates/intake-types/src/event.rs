//! Inbound events delivered by the telephony platform.

use serde::{Deserialize, Serialize};

use crate::DialogState;

/// One webhook event from the telephony platform, decoded by the transport
/// layer before it reaches the dialog engine.
///
/// A gather timeout is not a distinct event: the platform delivers a
/// `SpeechOrDigits` event with neither `transcript` nor `digits` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundEvent {
    /// A new call reached the service.
    IncomingCall {
        /// Opaque call identifier issued by the platform.
        call_id: String,
    },

    /// A gather step completed: recognized speech, pressed digits, or
    /// neither (timeout / no input).
    SpeechOrDigits {
        /// Opaque call identifier issued by the platform.
        call_id: String,
        /// The state whose gather produced this input.
        state: DialogState,
        /// Recognized speech, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transcript: Option<String>,
        /// Pressed DTMF digits, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        digits: Option<String>,
        /// Retry counter echoed by the transport, if it tracks one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_count: Option<u32>,
    },

    /// The call ended; the session can be discarded.
    CallEnded {
        /// Opaque call identifier issued by the platform.
        call_id: String,
    },
}

impl InboundEvent {
    /// Returns the call identifier this event belongs to.
    pub fn call_id(&self) -> &str {
        match self {
            Self::IncomingCall { call_id }
            | Self::SpeechOrDigits { call_id, .. }
            | Self::CallEnded { call_id } => call_id,
        }
    }

    /// Returns the canonical event type string.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::IncomingCall { .. } => "INCOMING_CALL",
            Self::SpeechOrDigits { .. } => "SPEECH_OR_DIGITS",
            Self::CallEnded { .. } => "CALL_ENDED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_round_trips_through_json() {
        let event = InboundEvent::SpeechOrDigits {
            call_id: "CA9f2".to_string(),
            state: DialogState::CollectingFirstName,
            transcript: Some("John".to_string()),
            digits: None,
            retry_count: Some(1),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"SPEECH_OR_DIGITS\""));
        assert!(json.contains("\"collecting_first_name\""));
        // Absent optional fields are omitted from the wire form.
        assert!(!json.contains("digits"));

        let back: InboundEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.call_id(), "CA9f2");
        assert_eq!(back.event_type(), "SPEECH_OR_DIGITS");
    }

    #[test]
    fn timeout_event_decodes_without_input_fields() {
        let json = r#"{"event":"SPEECH_OR_DIGITS","call_id":"CA1","state":"confirming_all"}"#;
        let event: InboundEvent = serde_json::from_str(json).unwrap();
        match event {
            InboundEvent::SpeechOrDigits {
                transcript, digits, ..
            } => {
                assert!(transcript.is_none());
                assert!(digits.is_none());
            }
            other => panic!("unexpected event variant: {other:?}"),
        }
    }
}
