//! The booking conversation as a pure function.
//!
//! [`transition`] takes the current [`DialogueContext`], one [`StageInput`]
//! and today's date, and returns the next context together with the
//! [`Effect`]s to perform. It never touches a collaborator: the controller
//! captures speech, runs the search, and feeds the results back in.

use chrono::NaiveDate;

use crate::booking::{
    is_reset_request, parse_class, parse_confirmation, title_case, Confirmation, DateSlot,
};
use crate::store::FlightRow;

use super::state::{DialogueContext, Stage};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const LISTEN_FAILED: &str = "Listening failed. Please try again.";
pub const RESET_ACK: &str = "Okay, let's start over.";
pub const CLASS_UNRECOGNIZED: &str =
    "I didn't recognize that class. Please say Economy, Business, or First.";
pub const CONFIRMATION_UNCLEAR: &str =
    "Sorry, I didn't understand if that was a yes or no. Please say 'Yes' to confirm or 'No' to restart.";
pub const SEARCHING: &str = "Great! Searching for flights now.";
pub const CONFIRMATION_REJECTED: &str = "Okay, let's start over to correct the details.";
pub const GENERATION_FAILED: &str =
    "Could not generate the flight search query using the AI model.";
pub const STORE_FAILED: &str = "There was an error querying the database.";
pub const NO_FLIGHTS: &str =
    "Sorry, I found 0 flights matching your exact criteria for that date.";
pub const SEARCH_AGAIN: &str = "Would you like to search again?";

// ---------------------------------------------------------------------------
// Inputs and effects
// ---------------------------------------------------------------------------

/// Result of the search performed while in `Querying`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No query could be produced.
    GenerationFailed,
    /// The query was produced but the store rejected or failed it.
    ExecutionFailed { query: String },
    /// The query ran; `rows` may be empty.
    Rows { query: String, rows: Vec<FlightRow> },
}

/// What the controller feeds into one transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StageInput {
    /// Prompt stages, the `Init` start action, `Confirm` and `ShowResults`.
    Proceed,
    /// Listen stages; `None` when nothing usable was heard.
    Heard(Option<String>),
    /// `Querying`.
    Searched(SearchOutcome),
}

impl StageInput {
    /// Whether this input is the kind `stage` consumes.
    pub fn fits(&self, stage: Stage) -> bool {
        match self {
            StageInput::Proceed => {
                !stage.is_listen() && !stage.is_terminal() && stage != Stage::Querying
            }
            StageInput::Heard(_) => stage.is_listen(),
            StageInput::Searched(_) => stage == Stage::Querying,
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Speak(String),
}

// ---------------------------------------------------------------------------
// transition
// ---------------------------------------------------------------------------

/// Advance the conversation by one step.
///
/// An input that does not fit the current stage returns the context
/// unchanged with no effects.
///
/// ```
/// use chrono::NaiveDate;
/// use voice_flight_agent::dialogue::{transition, DialogueContext, Effect, Stage, StageInput};
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
/// let mut ctx = DialogueContext::new();
/// ctx.stage = Stage::GetDate;
///
/// let (ctx, effects) = transition(ctx, StageInput::Heard(Some("tomorrow".into())), today);
/// assert_eq!(ctx.stage, Stage::AskOrigin);
/// assert_eq!(ctx.booking.departure_date, NaiveDate::from_ymd_opt(2026, 10, 16));
/// assert_eq!(effects, vec![Effect::Speak("Okay, departing on October 16, 2026.".into())]);
/// ```
pub fn transition(
    ctx: DialogueContext,
    input: StageInput,
    today: NaiveDate,
) -> (DialogueContext, Vec<Effect>) {
    if !input.fits(ctx.stage) {
        log::debug!("dialogue: ignoring {input:?} in {}", ctx.stage);
        return (ctx, Vec::new());
    }

    let mut step = Step {
        ctx,
        effects: Vec::new(),
    };
    match input {
        StageInput::Proceed => step.proceed(),
        StageInput::Heard(transcript) => step.heard(transcript, today),
        StageInput::Searched(outcome) => step.searched(outcome),
    }
    (step.ctx, step.effects)
}

/// "October 05, 2026"
pub fn spoken_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

struct Step {
    ctx: DialogueContext,
    effects: Vec<Effect>,
}

impl Step {
    fn say(&mut self, text: impl Into<String>) {
        self.effects.push(Effect::Speak(text.into()));
    }

    fn advance(&mut self) {
        if let Some(next) = self.ctx.stage.next() {
            self.ctx.stage = next;
        }
    }

    /// Store nothing, speak `message`, stay in the same listen stage.
    fn retry(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.say(message.clone());
        self.ctx.last_error = Some(message);
    }

    /// Slot accepted: acknowledge and move to the next prompt.
    fn accept(&mut self, ack: String) {
        self.ctx.last_error = None;
        self.say(ack);
        self.advance();
    }

    fn reset(&mut self) {
        self.ctx.reset();
        self.say(RESET_ACK);
    }

    fn fail(&mut self, message: &str) {
        self.ctx.last_error = Some(message.to_string());
        self.say(message);
        self.ctx.stage = Stage::Error;
    }

    // -----------------------------------------------------------------------
    // Proceed
    // -----------------------------------------------------------------------

    fn proceed(&mut self) {
        match self.ctx.stage {
            Stage::Init => self.advance(),
            Stage::Confirm => self.confirm(),
            Stage::ShowResults => self.show_results(),
            stage => {
                if let Some(prompt) = stage.prompt() {
                    self.say(prompt);
                }
                self.advance();
            }
        }
    }

    fn confirm(&mut self) {
        let booking = &self.ctx.booking;
        let (
            Some(origin),
            Some(destination),
            Some(date),
            Some(class),
            Some(name),
            Some(dob),
        ) = (
            booking.origin.as_deref(),
            booking.destination.as_deref(),
            booking.departure_date,
            booking.travel_class,
            booking.passenger_name.as_deref(),
            booking.date_of_birth,
        )
        else {
            let message = format!(
                "Something went wrong, I seem to be missing some details ({}). Let's start over.",
                booking.missing_fields().join(", ")
            );
            log::warn!("dialogue: {message}");
            self.say(message.clone());
            self.reset();
            self.ctx.last_error = Some(message);
            return;
        };

        let summary = format!(
            "Okay, let me confirm: You want to fly from {origin} to {destination} on {} in {class} class. \
             The passenger's name is {name} with date of birth {}. Is this correct?",
            spoken_date(date),
            spoken_date(dob),
        );
        self.say(summary);
        self.advance();
    }

    fn show_results(&mut self) {
        let count = self.ctx.result_rows.len();
        if count == 0 {
            self.say(NO_FLIGHTS);
        } else {
            let plural = if count == 1 { "" } else { "s" };
            self.say(format!(
                "Okay, I found {count} flight{plural} matching your criteria. Please see the details on screen."
            ));
        }
        self.say(SEARCH_AGAIN);
        self.advance();
    }

    // -----------------------------------------------------------------------
    // Heard
    // -----------------------------------------------------------------------

    fn heard(&mut self, transcript: Option<String>, today: NaiveDate) {
        let transcript = transcript
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let Some(text) = transcript else {
            self.ctx.last_transcript = None;
            self.ctx.last_error = Some(LISTEN_FAILED.to_string());
            return;
        };
        self.ctx.last_transcript = Some(text.clone());

        if is_reset_request(&text) {
            log::info!("dialogue: reset requested in {}", self.ctx.stage);
            self.reset();
            return;
        }

        match self.ctx.stage {
            Stage::GetDate => match DateSlot::Departure.accept(&text, today) {
                Ok(date) => {
                    self.ctx.booking.departure_date = Some(date);
                    self.accept(format!("Okay, departing on {}.", spoken_date(date)));
                }
                Err(e) => self.retry(e.to_string()),
            },
            Stage::GetOrigin => {
                let origin = title_case(&text).unwrap_or(text);
                self.ctx.booking.origin = Some(origin.clone());
                self.accept(format!("Got it, departing from {origin}."));
            }
            Stage::GetDestination => {
                let destination = title_case(&text).unwrap_or(text);
                self.ctx.booking.destination = Some(destination.clone());
                self.accept(format!("Okay, flying to {destination}."));
            }
            Stage::GetClass => match parse_class(&text) {
                Some(class) => {
                    self.ctx.booking.travel_class = Some(class);
                    self.accept(format!("Alright, {class} class."));
                }
                None => self.retry(CLASS_UNRECOGNIZED),
            },
            Stage::GetName => {
                let name = title_case(&text).unwrap_or(text);
                self.ctx.booking.passenger_name = Some(name.clone());
                self.accept(format!("Thank you, {name}."));
            }
            Stage::GetDob => match DateSlot::DateOfBirth.accept(&text, today) {
                Ok(dob) => {
                    self.ctx.booking.date_of_birth = Some(dob);
                    self.accept(format!("Got it, date of birth {}.", spoken_date(dob)));
                }
                Err(e) => self.retry(e.to_string()),
            },
            Stage::GetConfirmation => match parse_confirmation(&text) {
                Some(Confirmation::Accepted) => self.accept(SEARCHING.to_string()),
                Some(Confirmation::Rejected) => {
                    self.say(CONFIRMATION_REJECTED);
                    self.reset();
                }
                None => self.retry(CONFIRMATION_UNCLEAR),
            },
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Searched
    // -----------------------------------------------------------------------

    fn searched(&mut self, outcome: SearchOutcome) {
        match outcome {
            SearchOutcome::GenerationFailed => {
                self.ctx.query_text = None;
                self.fail(GENERATION_FAILED);
            }
            SearchOutcome::ExecutionFailed { query } => {
                self.ctx.query_text = Some(query);
                self.fail(STORE_FAILED);
            }
            SearchOutcome::Rows { query, rows } => {
                self.ctx.query_text = Some(query);
                self.ctx.result_rows = rows;
                self.ctx.last_error = None;
                self.advance();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
