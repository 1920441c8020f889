//! Renders a voice directive into a TwiML `<Response>` document.
//!
//! The dialog engine emits a transport-neutral [`VoiceDirective`]; this
//! crate serializes it into the XML document the telephony platform
//! consumes. Gather and redirect steps become webhook callbacks under a
//! configurable base path, with the target dialog state in the URL so the
//! transport can route the result back into the engine.
//!
//! Only document assembly happens here. HTTP routing, audio rendering, and
//! speech recognition stay with the platform.

use intake_types::{GatherSpec, Prompt, Step, VoiceDirective};

/// Rendering options for one deployment.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Base path for gather/redirect callbacks. State labels are appended
    /// as one path segment, e.g. `/dialog/collecting_first_name`.
    pub action_base: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            action_base: "/dialog".to_string(),
        }
    }
}

/// Serializes a directive into a complete TwiML document.
pub fn render(directive: &VoiceDirective, options: &RenderOptions) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
    for step in &directive.steps {
        match step {
            Step::Say(prompt) => render_say(&mut out, prompt),
            Step::Gather(spec) => render_gather(&mut out, spec, options),
            Step::Redirect {
                next_state,
                retry_count,
            } => {
                out.push_str("<Redirect method=\"POST\">");
                out.push_str(&escape(&action_url(
                    options,
                    next_state.as_str(),
                    *retry_count,
                )));
                out.push_str("</Redirect>");
            }
            Step::Hangup => out.push_str("<Hangup/>"),
        }
    }
    out.push_str("</Response>");
    out
}

fn render_say(out: &mut String, prompt: &Prompt) {
    out.push_str("<Say voice=\"");
    out.push_str(&escape(&prompt.voice));
    out.push_str("\" language=\"");
    out.push_str(&escape(&prompt.language));
    out.push_str("\">");
    out.push_str(&escape(&prompt.text));
    out.push_str("</Say>");
}

fn render_gather(out: &mut String, spec: &GatherSpec, options: &RenderOptions) {
    out.push_str("<Gather input=\"");
    out.push_str(input_modes(spec));
    out.push_str("\" timeout=\"");
    out.push_str(&spec.timeout_seconds.to_string());
    out.push_str("\" speechTimeout=\"");
    out.push_str(&spec.speech_timeout_seconds.to_string());
    out.push('"');
    if let Some(num_digits) = spec.num_digits {
        out.push_str(" numDigits=\"");
        out.push_str(&num_digits.to_string());
        out.push('"');
    }
    out.push_str(" action=\"");
    out.push_str(&escape(&action_url(options, spec.next_state.as_str(), None)));
    out.push_str("\" method=\"POST\">");
    for prompt in &spec.prompts {
        render_say(out, prompt);
    }
    out.push_str("</Gather>");
}

fn input_modes(spec: &GatherSpec) -> &'static str {
    match (spec.accepts_speech, spec.accepts_digits) {
        (true, true) => "speech dtmf",
        (true, false) => "speech",
        (false, true) => "dtmf",
        // A gather that accepts nothing is a directive bug; render the
        // most permissive form rather than an invalid attribute.
        (false, false) => "speech dtmf",
    }
}

fn action_url(options: &RenderOptions, state_label: &str, retry_count: Option<u32>) -> String {
    let base = options.action_base.trim_end_matches('/');
    match retry_count {
        Some(retry) => format!("{base}/{state_label}?retry={retry}"),
        None => format!("{base}/{state_label}"),
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
