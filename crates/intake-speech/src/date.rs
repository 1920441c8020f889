//! Loose validation of a spoken date of birth.
//!
//! Callers say dates in free form ("March 3rd, 1985"); the platform's
//! recognizer is too unreliable for strict calendar parsing, so the checks
//! here are deliberately shallow: the transcript must carry digits and
//! enough text to plausibly be a full date. No range checking and no
//! normalization to a canonical calendar date happens.

use thiserror::Error;

/// Lead-in phrases stripped wherever they occur in the transcript.
const DATE_PHRASES: [&str; 4] = ["the date is", "date of birth is", "born on", "birthday is"];

/// Minimum character count of the cleaned transcript for a plausible date.
const MIN_DATE_LEN: usize = 8;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A validated spoken date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenDate {
    /// The cleaned transcript in title case, stored verbatim otherwise.
    pub text: String,
    /// Whether a month name was heard. Soft signal only; absence never
    /// fails validation.
    pub has_month_name: bool,
}

/// Why a transcript was rejected as a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("no date provided")]
    Empty,
    #[error("need numeric values")]
    NoDigits,
    #[error("date seems incomplete")]
    Incomplete,
}

/// Validates and normalizes a spoken date of birth.
///
/// Lowercases and trims the transcript, strips lead-in phrases, then
/// requires at least one digit and [`MIN_DATE_LEN`] characters of remaining
/// text. The surviving text is title-cased (a letter following a non-letter
/// is uppercased), so "march 3rd 1985" becomes "March 3Rd 1985".
///
/// # Errors
///
/// Returns a [`DateError`] whose display string is suitable to speak back
/// to the caller as the correction reason.
pub fn parse_spoken_date(raw: &str) -> Result<SpokenDate, DateError> {
    if raw.trim().is_empty() {
        return Err(DateError::Empty);
    }

    let mut cleaned = raw.trim().to_lowercase();
    for phrase in DATE_PHRASES {
        cleaned = cleaned.replace(phrase, " ");
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(DateError::NoDigits);
    }
    if cleaned.chars().count() < MIN_DATE_LEN {
        return Err(DateError::Incomplete);
    }

    let has_month_name = MONTH_NAMES.iter().any(|month| cleaned.contains(month));

    Ok(SpokenDate {
        text: title_case_runs(&cleaned),
        has_month_name,
    })
}

/// Uppercases every letter that follows a non-letter (and the first letter),
/// lowercasing the rest. Unlike token-based title casing this capitalizes
/// after digits too: "3rd" becomes "3Rd".
fn title_case_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
