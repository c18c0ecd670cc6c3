//! Per-slot answer validators.
//!
//! Each function takes the lowercased transcript of one answer and either
//! yields the value to store or a message to speak before asking again.

use chrono::NaiveDate;
use thiserror::Error;

use super::dates::{parse_spoken_date, DateParseError};
use super::record::TravelClass;

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

/// The restart keyword. Matched as a plain substring of the transcript.
pub const RESET_KEYWORD: &str = "reset";

/// Whether the transcript asks to start over.
///
/// ```
/// use voice_flight_agent::booking::is_reset_request;
///
/// assert!(is_reset_request("please RESET everything"));
/// assert!(!is_reset_request("mumbai"));
/// ```
pub fn is_reset_request(transcript: &str) -> bool {
    transcript.to_lowercase().contains(RESET_KEYWORD)
}

// ---------------------------------------------------------------------------
// Free text
// ---------------------------------------------------------------------------

/// Trim and title-case a free-text answer; `None` when nothing is left.
///
/// ```
/// use voice_flight_agent::booking::title_case;
///
/// assert_eq!(title_case("  jane doe ").as_deref(), Some("Jane Doe"));
/// assert_eq!(title_case("new york").as_deref(), Some("New York"));
/// assert_eq!(title_case("   "), None);
/// ```
pub fn title_case(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut at_word_start = true;
    for c in trimmed.chars() {
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
    Some(out)
}

// ---------------------------------------------------------------------------
// Travel class
// ---------------------------------------------------------------------------

/// Keyword sets in priority order; the first set with a hit wins.
const CLASS_KEYWORDS: &[(TravelClass, &[&str])] = &[
    (TravelClass::Economy, &["economy", "coach"]),
    (TravelClass::Business, &["business"]),
    (TravelClass::First, &["first", "1st"]),
];

/// Match a class from keywords anywhere in the transcript.
///
/// ```
/// use voice_flight_agent::booking::{parse_class, TravelClass};
///
/// assert_eq!(parse_class("coach please"), Some(TravelClass::Economy));
/// assert_eq!(parse_class("economy or first"), Some(TravelClass::Economy));
/// assert_eq!(parse_class("window seat"), None);
/// ```
pub fn parse_class(transcript: &str) -> Option<TravelClass> {
    let text = transcript.to_lowercase();
    CLASS_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(class, _)| *class)
}

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// Answer to "Is this correct?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Rejected,
}

const YES_WORDS: &[&str] = &["yes", "correct", "yeah"];
const NO_WORDS: &[&str] = &["no", "incorrect"];

/// Read a yes/no answer. `None` means neither was heard.
///
/// "incorrect" is tested before the yes words because it contains "correct".
pub fn parse_confirmation(transcript: &str) -> Option<Confirmation> {
    let text = transcript.to_lowercase();
    if text.contains("incorrect") {
        return Some(Confirmation::Rejected);
    }
    if YES_WORDS.iter().any(|w| text.contains(w)) {
        return Some(Confirmation::Accepted);
    }
    if NO_WORDS.iter().any(|w| text.contains(w)) {
        return Some(Confirmation::Rejected);
    }
    None
}

// ---------------------------------------------------------------------------
// Date slots
// ---------------------------------------------------------------------------

/// Which date slot is being filled; each has its own allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSlot {
    /// Today or later.
    Departure,
    /// Strictly before today.
    DateOfBirth,
}

/// A parsed date that falls outside the slot's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("Departure date cannot be in the past. Please provide a date from today onwards.")]
    DepartureInPast,
    #[error(
        "Date of birth cannot be today or in the future. Please state the correct date of birth."
    )]
    BirthNotInPast,
}

/// Why a date answer was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateAnswerError {
    #[error("I couldn't understand '{text}' as a date format. Please try saying it again (e.g., 'April 15th', 'Tomorrow', 'May 10 1990').")]
    Unparsed {
        text: String,
        #[source]
        cause: DateParseError,
    },
    #[error(transparent)]
    OutOfRange(#[from] DateRangeError),
}

impl DateSlot {
    /// Range check only; the date has already been parsed.
    pub fn check(&self, date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, DateRangeError> {
        match self {
            DateSlot::Departure if date < today => Err(DateRangeError::DepartureInPast),
            DateSlot::DateOfBirth if date >= today => Err(DateRangeError::BirthNotInPast),
            _ => Ok(date),
        }
    }

    /// Parse the transcript and apply this slot's range check.
    pub fn accept(&self, transcript: &str, today: NaiveDate) -> Result<NaiveDate, DateAnswerError> {
        let date = parse_spoken_date(transcript, today).map_err(|cause| {
            DateAnswerError::Unparsed {
                text: transcript.trim().to_string(),
                cause,
            }
        })?;
        Ok(self.check(date, today)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
