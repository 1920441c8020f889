//! Validation and normalization of a spoken name.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Carrier phrases callers wrap around the actual name. When one occurs,
/// everything up to and including the phrase is discarded.
const CARRIER_PHRASES: [&str; 5] = ["i said", "my name is", "the name is", "it is", "that is"];

/// Filler tokens removed wherever they appear as whole words.
const FILLER_TOKENS: [&str; 5] = ["um", "uh", "well", "so", "like"];

/// How many consecutive repeats of one character mark a garbled transcript.
const REPEAT_RUN_LIMIT: usize = 4;

fn default_min_len() -> usize {
    2
}

fn default_max_len() -> usize {
    50
}

/// Length bounds applied to a spoken name, before carrier-phrase stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRules {
    /// Minimum length of the trimmed transcript.
    #[serde(default = "default_min_len")]
    pub min_len: usize,
    /// Maximum length of the trimmed transcript.
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            min_len: default_min_len(),
            max_len: default_max_len(),
        }
    }
}

/// Why a transcript was rejected as a name.
///
/// The `Display` form of each variant is the reason spoken back to the
/// caller, so the wording stays conversational.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("no value provided")]
    Empty,
    #[error("the name needs at least {min} characters")]
    TooShort { min: usize },
    #[error("the name can be at most {max} characters")]
    TooLong { max: usize },
    #[error("invalid characters")]
    InvalidCharacters,
    #[error("likely misheard")]
    LikelyMisheard,
}

/// Validates and normalizes a spoken name.
///
/// Applies, in order: empty check, trim and length bounds, carrier-phrase
/// stripping, filler-word removal, character-class check (letters,
/// whitespace, hyphen, apostrophe), and a repeated-character heuristic for
/// garbled recognition. On success the cleaned text is returned in title
/// case (first letter of each whitespace-delimited token capitalized).
///
/// # Errors
///
/// Returns a [`NameError`] whose display string is suitable to speak back
/// to the caller as the correction reason.
pub fn validate_name(raw: &str, rules: &NameRules) -> Result<String, NameError> {
    if raw.trim().is_empty() {
        return Err(NameError::Empty);
    }

    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < rules.min_len {
        return Err(NameError::TooShort { min: rules.min_len });
    }
    if len > rules.max_len {
        return Err(NameError::TooLong { max: rules.max_len });
    }

    let stripped = strip_carrier_phrase(trimmed);
    let cleaned = remove_fillers(stripped);

    // A transcript that was nothing but carrier phrase and filler leaves no
    // name to store; treat it the same as silence.
    if cleaned.is_empty() {
        return Err(NameError::Empty);
    }

    if !cleaned
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
    {
        return Err(NameError::InvalidCharacters);
    }

    if has_repeat_run(&cleaned, REPEAT_RUN_LIMIT) {
        return Err(NameError::LikelyMisheard);
    }

    Ok(title_case(&cleaned))
}

/// Discards everything up to and including the first carrier phrase found,
/// matching case-insensitively. Phrases are tried in declaration order.
fn strip_carrier_phrase(text: &str) -> &str {
    let lower = text.to_lowercase();
    // Case folding that changes byte length would misalign offsets; such
    // transcripts skip carrier stripping.
    if lower.len() != text.len() {
        return text;
    }
    for phrase in CARRIER_PHRASES {
        if let Some(pos) = lower.find(phrase) {
            let rest_start = pos + phrase.len();
            if text.is_char_boundary(rest_start) {
                return text[rest_start..].trim_start();
            }
        }
    }
    text
}

/// Removes filler tokens (whole-word, case-insensitive) and collapses the
/// remaining tokens with single spaces.
fn remove_fillers(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| {
            let folded = token.to_lowercase();
            !FILLER_TOKENS.contains(&folded.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` if any single character repeats `limit` or more times in
/// a row.
fn has_repeat_run(text: &str, limit: usize) -> bool {
    let mut run = 0usize;
    let mut previous = None;
    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
        } else {
            run = 1;
            previous = Some(c);
        }
        if run >= limit {
            return true;
        }
    }
    false
}

/// Capitalizes the first letter of each whitespace-delimited token and
/// lowercases the rest.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
