//! Spoken prompt catalog.
//!
//! Every piece of text the service says lives here so wording can be
//! asserted in tests and adjusted without touching transition logic. The
//! collection instructions escalate with the retry count: a plain prompt
//! first, then a request to repeat slowly, then a request to spell the
//! value out.

/// Consent-gate greeting and service disclosure.
pub fn greeting(service_name: &str) -> String {
    format!(
        "Hello, you've reached the automated status lookup service for {service_name}. \
         Please note that this call may be recorded for quality purposes. \
         To continue, please say 'yes' or press 1. To end this call, say 'no' or press 2."
    )
}

/// Spoken when the caller declines at the consent gate.
pub fn declined() -> String {
    "Thank you for calling. Goodbye.".to_string()
}

/// Lead-in after consent, before the first collection prompt.
pub fn consent_ack(service_name: &str) -> String {
    format!("Great! I'll need to collect some information to search {service_name}.")
}

pub fn collect_first_name(retry: u32) -> String {
    match retry {
        0 => "Please clearly state the first name of the person you're looking up.".to_string(),
        1 => "Please repeat the first name, speaking slowly and clearly.".to_string(),
        _ => "Please spell the first name for me, one letter at a time.".to_string(),
    }
}

pub fn collect_last_name(retry: u32) -> String {
    match retry {
        0 => "Now, please state the last name.".to_string(),
        1 => "Please repeat the last name, speaking slowly and clearly.".to_string(),
        _ => "Please spell the last name for me, one letter at a time.".to_string(),
    }
}

pub fn collect_date(retry: u32) -> String {
    match retry {
        0 => "Please provide the date of birth in month, day, year format. \
              For example, say 'January 15th, 1990' or 'March 3rd, 1985'."
            .to_string(),
        1 => "Please repeat the date of birth slowly, in month, day, year format.".to_string(),
        _ => "Please say the date of birth one part at a time: \
              the month, then the day, then the year."
            .to_string(),
    }
}

/// Spoken before re-prompting when a gather produced no input.
pub fn no_input() -> String {
    "I didn't catch that.".to_string()
}

/// Spoken before re-prompting when validation rejected the input. The
/// reason is the validator's display string.
pub fn correction(reason: &str) -> String {
    format!("Sorry, {reason}. Let's try that again.")
}

pub fn confirm_first_name(value: &str) -> String {
    format!(
        "I heard the first name as {value}. \
         If that's correct, press 1 or say yes. To try again, press 2 or say no."
    )
}

pub fn confirm_last_name(value: &str) -> String {
    format!(
        "I heard the last name as {value}. \
         If that's correct, press 1 or say yes. To try again, press 2 or say no."
    )
}

/// Final combined read-back before the lookup handoff.
pub fn confirm_all(first_name: &str, last_name: &str, date_of_birth: &str) -> String {
    format!(
        "Let me confirm the information. \
         First name: {first_name}. Last name: {last_name}. Date of birth: {date_of_birth}. \
         Is this information correct? Please say 'yes' or press 1 to proceed, \
         or say 'no' or press 2 to start over."
    )
}

/// Spoken when a per-field confirmation is rejected.
pub fn try_again() -> String {
    "Okay, let's try that again.".to_string()
}

/// Spoken when the final confirmation is rejected and collection restarts.
pub fn restart() -> String {
    "Let's start over with the information collection.".to_string()
}

/// Spoken once all fields are confirmed and the lookup begins.
pub fn lookup_processing(service_name: &str) -> String {
    format!(
        "Thank you. I'm now searching {service_name}. \
         This may take a moment. Please stay on the line."
    )
}

/// Placeholder wrap-up while the lookup subsystem is out of scope.
pub fn lookup_wrapup() -> String {
    "Your request has been submitted for processing. Goodbye.".to_string()
}

/// Spoken when the handoff is reached without a complete set of fields.
pub fn lookup_error() -> String {
    "Sorry, there was an error processing your request. Please call back.".to_string()
}

/// Escalation message after the retry budget is exhausted.
pub fn operator_transfer() -> String {
    "I'm sorry, I'm having trouble understanding you. \
     Let me transfer you to an operator who can help."
        .to_string()
}

/// No live operator routing exists; follow the transfer apology with this.
pub fn business_hours() -> String {
    "No operators are available on this line right now. \
     Please call back during business hours, Monday through Friday. Goodbye."
        .to_string()
}

/// Spoken when an event arrives for a call with no active session.
pub fn session_lost() -> String {
    "I'm sorry, something went wrong with our call. Let's start from the beginning.".to_string()
}

/// Defensive goodbye for events that arrive after a terminal state.
pub fn goodbye() -> String {
    "This call is complete. Thank you for calling. Goodbye.".to_string()
}
