//! Per-call session record and the lookup handoff payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DialogState;

/// State carried for one active call, keyed by the platform-issued call id.
///
/// A session exists from the consent-granted transition until the platform
/// reports the call ended (or the process restarts; sessions are in-memory
/// only). Field values hold *normalized* strings and are `None` until
/// captured and validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    /// Opaque call identifier issued by the telephony platform.
    pub call_id: String,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    /// Normalized first name, once captured.
    pub first_name: Option<String>,
    /// Normalized last name, once captured.
    pub last_name: Option<String>,
    /// Normalized spoken date of birth, once captured.
    pub date_of_birth: Option<String>,
    /// Current dialog state. Mutated only by the dialog engine.
    pub state: DialogState,
    /// Consecutive failed capture attempts for the field currently being
    /// collected. Reset to 0 on any successful capture or field change.
    pub retry_count: u32,
    /// Append-only diagnostics. Never read back into dialog logic.
    pub errors: Vec<String>,
}

impl CallSession {
    /// Creates a fresh session at the consent gate.
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            started_at: Utc::now(),
            first_name: None,
            last_name: None,
            date_of_birth: None,
            state: DialogState::AwaitingConsent,
            retry_count: 0,
            errors: Vec::new(),
        }
    }

    /// Appends a diagnostic message to the session's error trail.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Clears all captured fields and the retry counter. Used when the caller
    /// rejects the final combined confirmation and restarts collection.
    pub fn clear_fields(&mut self) {
        self.first_name = None;
        self.last_name = None;
        self.date_of_birth = None;
        self.retry_count = 0;
    }

    /// Returns the lookup handoff payload, available only once all three
    /// fields have been captured.
    pub fn lookup_request(&self) -> Option<LookupRequest> {
        Some(LookupRequest {
            first_name: self.first_name.clone()?,
            last_name: self.last_name.clone()?,
            date_of_birth: self.date_of_birth.clone()?,
        })
    }
}

/// The payload handed to the records-lookup subsystem at `LookupHandoff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}
