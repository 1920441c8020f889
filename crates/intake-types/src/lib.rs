//! Shared types for the caller-intake dialog platform.
//!
//! This crate provides the foundational types used across all intake crates:
//! the dialog state machine vocabulary, the per-call session record, inbound
//! telephony events, and the outbound voice directive document.
//!
//! No crate in the workspace depends on anything *except* `intake-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

use serde::{Deserialize, Serialize};

/// States of the per-call dialog machine.
///
/// The caller moves through consent, three field-collection steps (with
/// advisory confirmations for the two names), a combined final confirmation,
/// and one of three terminal outcomes. The telephony platform echoes the
/// state back with each gather result, so states have stable string labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Greeting played; waiting for the caller to accept or decline service.
    AwaitingConsent,
    /// Gathering the first name of the person being looked up.
    CollectingFirstName,
    /// Reading the captured first name back for a yes/no check.
    ConfirmingFirstName,
    /// Gathering the last name.
    CollectingLastName,
    /// Reading the captured last name back for a yes/no check.
    ConfirmingLastName,
    /// Gathering the date of birth. No per-field confirmation; the value is
    /// checked only in the combined final confirmation.
    CollectingDate,
    /// Reading all three captured values back before handoff.
    ConfirmingAll,
    /// All fields confirmed; the records lookup takes over.
    LookupHandoff,
    /// The caller declined service at the consent gate.
    Declined,
    /// Retry budget exhausted; the caller was sent to a human operator.
    TransferredToOperator,
}

impl DialogState {
    /// Returns the canonical string label for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingConsent => "awaiting_consent",
            Self::CollectingFirstName => "collecting_first_name",
            Self::ConfirmingFirstName => "confirming_first_name",
            Self::CollectingLastName => "collecting_last_name",
            Self::ConfirmingLastName => "confirming_last_name",
            Self::CollectingDate => "collecting_date",
            Self::ConfirmingAll => "confirming_all",
            Self::LookupHandoff => "lookup_handoff",
            Self::Declined => "declined",
            Self::TransferredToOperator => "transferred_to_operator",
        }
    }

    /// Returns `true` for states the dialog never leaves.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::LookupHandoff | Self::Declined | Self::TransferredToOperator
        )
    }
}

impl std::fmt::Display for DialogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DialogState {
    type Err = ParseDialogStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awaiting_consent" => Ok(Self::AwaitingConsent),
            "collecting_first_name" => Ok(Self::CollectingFirstName),
            "confirming_first_name" => Ok(Self::ConfirmingFirstName),
            "collecting_last_name" => Ok(Self::CollectingLastName),
            "confirming_last_name" => Ok(Self::ConfirmingLastName),
            "collecting_date" => Ok(Self::CollectingDate),
            "confirming_all" => Ok(Self::ConfirmingAll),
            "lookup_handoff" => Ok(Self::LookupHandoff),
            "declined" => Ok(Self::Declined),
            "transferred_to_operator" => Ok(Self::TransferredToOperator),
            _ => Err(ParseDialogStateError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown dialog state label.
#[derive(Debug, Clone)]
pub struct ParseDialogStateError(pub String);

impl std::fmt::Display for ParseDialogStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown dialog state: {}", self.0)
    }
}

impl std::error::Error for ParseDialogStateError {}

mod directive;
mod event;
mod session;

pub use directive::{GatherSpec, Prompt, Step, VoiceDirective};
pub use event::InboundEvent;
pub use session::{CallSession, LookupRequest};
