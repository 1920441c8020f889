//! The outbound voice directive document.
//!
//! A directive is the declarative output of the dialog engine: an ordered
//! list of steps the telephony platform should perform next. The engine
//! never talks to the platform itself; the transport renders the directive
//! into actual call control.

use serde::{Deserialize, Serialize};

use crate::DialogState;

/// One spoken prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Text to render to speech.
    pub text: String,
    /// Platform voice name (e.g. "alice").
    pub voice: String,
    /// BCP 47 language tag (e.g. "en-US").
    pub language: String,
}

impl Prompt {
    pub fn new(
        text: impl Into<String>,
        voice: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            language: language.into(),
        }
    }
}

/// Parameters for one gather (bounded wait for speech and/or digits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherSpec {
    /// Whether spoken input is accepted.
    pub accepts_speech: bool,
    /// Whether DTMF digits are accepted.
    pub accepts_digits: bool,
    /// Overall wait budget in seconds.
    pub timeout_seconds: u32,
    /// Silence window that ends a speech capture, in seconds.
    pub speech_timeout_seconds: u32,
    /// Digit count that ends a DTMF capture, when digits are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_digits: Option<u8>,
    /// The state that receives this gather's result event.
    pub next_state: DialogState,
    /// Prompts rendered inside the gather (the caller may answer over them).
    pub prompts: Vec<Prompt>,
}

/// A single directive step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Speak a prompt.
    Say(Prompt),
    /// Wait for speech and/or digits, speaking prompts while waiting.
    Gather(GatherSpec),
    /// Hand control to another state without waiting for input.
    Redirect {
        next_state: DialogState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_count: Option<u32>,
    },
    /// End the call.
    Hangup,
}

/// The ordered step list returned by every dialog engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDirective {
    pub steps: Vec<Step>,
}

impl VoiceDirective {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a spoken prompt.
    pub fn say(mut self, prompt: Prompt) -> Self {
        self.steps.push(Step::Say(prompt));
        self
    }

    /// Appends a gather step.
    pub fn gather(mut self, spec: GatherSpec) -> Self {
        self.steps.push(Step::Gather(spec));
        self
    }

    /// Appends a redirect to another state.
    pub fn redirect(mut self, next_state: DialogState, retry_count: Option<u32>) -> Self {
        self.steps.push(Step::Redirect {
            next_state,
            retry_count,
        });
        self
    }

    /// Appends a hangup.
    pub fn hangup(mut self) -> Self {
        self.steps.push(Step::Hangup);
        self
    }

    /// Returns the gather step, if the directive contains one.
    pub fn gather_step(&self) -> Option<&GatherSpec> {
        self.steps.iter().find_map(|step| match step {
            Step::Gather(spec) => Some(spec),
            _ => None,
        })
    }

    /// Returns every piece of spoken text in step order, including prompts
    /// nested inside gathers.
    pub fn spoken_text(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for step in &self.steps {
            match step {
                Step::Say(prompt) => out.push(prompt.text.as_str()),
                Step::Gather(spec) => {
                    out.extend(spec.prompts.iter().map(|p| p.text.as_str()));
                }
                _ => {}
            }
        }
        out
    }

    /// Returns `true` if the directive ends the call.
    pub fn ends_call(&self) -> bool {
        matches!(self.steps.last(), Some(Step::Hangup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(text: &str) -> Prompt {
        Prompt::new(text, "alice", "en-US")
    }

    #[test]
    fn builder_orders_steps() {
        let directive = VoiceDirective::new()
            .say(prompt("Sorry about that."))
            .gather(GatherSpec {
                accepts_speech: true,
                accepts_digits: false,
                timeout_seconds: 10,
                speech_timeout_seconds: 3,
                num_digits: None,
                next_state: DialogState::CollectingFirstName,
                prompts: vec![prompt("Please state the first name.")],
            })
            .hangup();

        assert_eq!(directive.steps.len(), 3);
        assert!(directive.ends_call());
        assert_eq!(
            directive.spoken_text(),
            vec!["Sorry about that.", "Please state the first name."]
        );
        let gather = directive.gather_step().expect("gather present");
        assert_eq!(gather.next_state, DialogState::CollectingFirstName);
    }

    #[test]
    fn directive_serde_tags_steps() {
        let directive = VoiceDirective::new()
            .redirect(DialogState::LookupHandoff, None)
            .hangup();
        let json = serde_json::to_string(&directive).unwrap();
        assert!(json.contains("\"step\":\"redirect\""));
        assert!(json.contains("\"lookup_handoff\""));
        assert!(json.contains("\"step\":\"hangup\""));

        let back: VoiceDirective = serde_json::from_str(&json).unwrap();
        assert_eq!(back, directive);
    }
}
