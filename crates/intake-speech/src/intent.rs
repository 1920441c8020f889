//! Yes/no intent classification over a gather result.

/// Keywords that count as an affirmative answer when they appear anywhere
/// in the transcript.
pub const AFFIRMATIVE_KEYWORDS: [&str; 7] =
    ["yes", "yeah", "okay", "ok", "sure", "correct", "right"];

/// Keywords that count as a negative answer.
pub const NEGATIVE_KEYWORDS: [&str; 8] = [
    "no",
    "nope",
    "stop",
    "quit",
    "end",
    "incorrect",
    "wrong",
    "start over",
];

/// The caller's answer to a yes/no question.
///
/// `Unrecognized` is a real outcome, not an error: the dialog's fail-open
/// policy sends it down the affirmative/continue branch, and keeping the
/// tri-state explicit keeps that policy visible and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Affirmative,
    Negative,
    Unrecognized,
}

/// Classifies a gather result into a yes/no intent.
///
/// DTMF digits win over speech: `1` always means affirmative and `2` always
/// means negative, regardless of dialog state. Speech is matched
/// case-insensitively as substrings of the full transcript.
pub fn classify_intent(transcript: Option<&str>, digits: Option<&str>) -> Intent {
    if let Some(digits) = digits {
        match digits.trim() {
            "1" => return Intent::Affirmative,
            "2" => return Intent::Negative,
            _ => {}
        }
    }

    let Some(transcript) = transcript else {
        return Intent::Unrecognized;
    };
    let lower = transcript.to_lowercase();
    if lower.trim().is_empty() {
        return Intent::Unrecognized;
    }

    // Negatives first: "incorrect" contains "correct".
    if NEGATIVE_KEYWORDS.iter().any(|word| lower.contains(word)) {
        return Intent::Negative;
    }
    if AFFIRMATIVE_KEYWORDS.iter().any(|word| lower.contains(word)) {
        return Intent::Affirmative;
    }

    Intent::Unrecognized
}
