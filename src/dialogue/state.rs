//! Dialogue stages and shared conversation state.
//!
//! [`Stage`] is the position in the booking conversation. [`DialogueContext`]
//! holds everything a driver or display needs: the stage, the booking record,
//! the last transcript and error, and the most recent search results.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<DialogueContext>>`; cheap
//! to clone and safe to read from another thread.

use std::sync::{Arc, Mutex};

use crate::booking::BookingRecord;
use crate::store::FlightRow;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Stages of the booking conversation.
///
/// ```text
/// Init ──start──▶ AskDate ─▶ GetDate ─▶ AskOrigin ─▶ GetOrigin
///   ─▶ AskDestination ─▶ GetDestination ─▶ AskClass ─▶ GetClass
///   ─▶ AskName ─▶ GetName ─▶ AskDob ─▶ GetDob
///   ─▶ Confirm ─▶ GetConfirmation ─▶ Querying ─▶ ShowResults ─▶ Done
/// Querying ──failure──▶ Error
/// any Get* ──"reset"──▶ Init
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Waiting for the driver's start action.
    #[default]
    Init,
    AskDate,
    GetDate,
    AskOrigin,
    GetOrigin,
    AskDestination,
    GetDestination,
    AskClass,
    GetClass,
    AskName,
    GetName,
    AskDob,
    GetDob,
    /// Check the record and read back a summary.
    Confirm,
    GetConfirmation,
    /// Generate the query and run it.
    Querying,
    ShowResults,
    Done,
    Error,
}

impl Stage {
    /// The upper-case name used in logs and on screen.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Init => "INIT",
            Stage::AskDate => "ASK_DATE",
            Stage::GetDate => "GET_DATE",
            Stage::AskOrigin => "ASK_ORIGIN",
            Stage::GetOrigin => "GET_ORIGIN",
            Stage::AskDestination => "ASK_DESTINATION",
            Stage::GetDestination => "GET_DESTINATION",
            Stage::AskClass => "ASK_CLASS",
            Stage::GetClass => "GET_CLASS",
            Stage::AskName => "ASK_NAME",
            Stage::GetName => "GET_NAME",
            Stage::AskDob => "ASK_DOB",
            Stage::GetDob => "GET_DOB",
            Stage::Confirm => "CONFIRM",
            Stage::GetConfirmation => "GET_CONFIRMATION",
            Stage::Querying => "QUERYING",
            Stage::ShowResults => "SHOW_RESULTS",
            Stage::Done => "DONE",
            Stage::Error => "ERROR",
        }
    }

    /// The question spoken by a prompt stage.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Stage::AskDate => Some("What date would you like to depart?"),
            Stage::AskOrigin => Some("Which city are you departing from?"),
            Stage::AskDestination => Some("And where are you flying to?"),
            Stage::AskClass => Some("Which class would you like to fly? (Economy, Business, or First)?"),
            Stage::AskName => Some("What is the full name of the passenger?"),
            Stage::AskDob => Some("And what is the passenger's date of birth?"),
            _ => None,
        }
    }

    /// Stages that capture a spoken answer.
    ///
    /// ```
    /// use voice_flight_agent::dialogue::Stage;
    ///
    /// assert!(Stage::GetOrigin.is_listen());
    /// assert!(!Stage::AskOrigin.is_listen());
    /// assert!(!Stage::Confirm.is_listen());
    /// ```
    pub fn is_listen(&self) -> bool {
        matches!(
            self,
            Stage::GetDate
                | Stage::GetOrigin
                | Stage::GetDestination
                | Stage::GetClass
                | Stage::GetName
                | Stage::GetDob
                | Stage::GetConfirmation
        )
    }

    /// `Done` and `Error`; only a reset leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Error)
    }

    /// The stage that follows on the happy path; `None` for terminal stages.
    pub fn next(&self) -> Option<Stage> {
        let next = match self {
            Stage::Init => Stage::AskDate,
            Stage::AskDate => Stage::GetDate,
            Stage::GetDate => Stage::AskOrigin,
            Stage::AskOrigin => Stage::GetOrigin,
            Stage::GetOrigin => Stage::AskDestination,
            Stage::AskDestination => Stage::GetDestination,
            Stage::GetDestination => Stage::AskClass,
            Stage::AskClass => Stage::GetClass,
            Stage::GetClass => Stage::AskName,
            Stage::AskName => Stage::GetName,
            Stage::GetName => Stage::AskDob,
            Stage::AskDob => Stage::GetDob,
            Stage::GetDob => Stage::Confirm,
            Stage::Confirm => Stage::GetConfirmation,
            Stage::GetConfirmation => Stage::Querying,
            Stage::Querying => Stage::ShowResults,
            Stage::ShowResults => Stage::Done,
            Stage::Done | Stage::Error => return None,
        };
        Some(next)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// Whether a step is currently being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Busy,
}

// ---------------------------------------------------------------------------
// DialogueContext
// ---------------------------------------------------------------------------

/// The whole conversation state.
#[derive(Debug, Clone, Default)]
pub struct DialogueContext {
    pub stage: Stage,
    pub booking: BookingRecord,
    /// Most recent transcript; `None` after absent input.
    pub last_transcript: Option<String>,
    /// Message describing the most recent failure, if any.
    pub last_error: Option<String>,
    /// Query produced for the current search.
    pub query_text: Option<String>,
    /// Rows returned by the current search.
    pub result_rows: Vec<FlightRow>,
    pub activity: Activity,
    /// A reset arrived while `Busy`; performed when the step completes.
    pub pending_reset: bool,
}

impl DialogueContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to `Init` with an empty record. The activity tag is left alone.
    pub fn reset(&mut self) {
        *self = Self {
            activity: self.activity,
            ..Self::default()
        };
    }

    pub fn is_busy(&self) -> bool {
        self.activity == Activity::Busy
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`DialogueContext`].
///
/// Lock for a short critical section only; never hold the guard across an
/// `.await`.
pub type SharedState = Arc<Mutex<DialogueContext>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(DialogueContext::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
