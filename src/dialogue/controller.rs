//! Dialogue controller: runs one stage per call against real collaborators.
//!
//! [`DialogueController`] owns the [`SharedState`] and the three
//! collaborators. Each [`step`](DialogueController::step) gathers the input
//! the current stage needs, feeds it through [`transition`], commits the new
//! context and performs the spoken effects.
//!
//! ```text
//! step()
//!   ├─ Busy?            → StepOutcome::Busy
//!   ├─ Init             → StepOutcome::AwaitingStart
//!   ├─ Done / Error     → StepOutcome::Finished
//!   └─ mark Busy
//!        ├─ Get*        → spawn_blocking(voice.listen)        → Heard
//!        ├─ Querying    → generator.generate_query (async)
//!        │                  └─ spawn_blocking(store.execute_query) → Searched
//!        └─ otherwise   → Proceed
//!      transition() → commit → spawn_blocking(voice.speak …)
//!      mark Idle, run a deferred reset if one was requested
//! ```
//!
//! Blocking collaborator work goes through `tokio::task::spawn_blocking`;
//! the state lock is never held across an `.await`.

use std::sync::{Arc, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};

use crate::booking::BookingRecord;
use crate::llm::{QueryGenError, QueryGenerator};
use crate::store::FlightStore;
use crate::voice::{VoiceError, VoiceIo};

use super::state::{Activity, DialogueContext, SharedState, Stage};
use super::transition::{transition, Effect, SearchOutcome, StageInput, RESET_ACK};

/// Source of "today" for date validation.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a call to [`DialogueController::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One transition ran; the conversation is now in this stage.
    Advanced(Stage),
    /// Another step is in flight; nothing was done.
    Busy,
    /// In `Init`; call [`DialogueController::start`] first.
    AwaitingStart,
    /// In `Done` or `Error`; only a reset continues.
    Finished(Stage),
    /// A transition ran but the voice input is gone for good.
    Disconnected(Stage),
}

/// What a call to [`DialogueController::request_reset`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Performed,
    /// A step is in flight; the reset runs when it completes.
    Deferred,
}

// ---------------------------------------------------------------------------
// DialogueController
// ---------------------------------------------------------------------------

/// Drives the booking conversation.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use voice_flight_agent::config::AppConfig;
/// use voice_flight_agent::dialogue::{new_shared_state, DialogueController, StepOutcome};
/// use voice_flight_agent::llm::ApiQueryGenerator;
/// use voice_flight_agent::store::SqliteFlightStore;
/// use voice_flight_agent::voice::ConsoleVoice;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = AppConfig::default();
/// let controller = DialogueController::new(
///     new_shared_state(),
///     Arc::new(ConsoleVoice::from_config(&config.voice)),
///     Arc::new(ApiQueryGenerator::from_config(&config.llm)),
///     Arc::new(SqliteFlightStore::from_config(&config.store)?),
/// );
///
/// controller.start();
/// while let StepOutcome::Advanced(_) = controller.step().await {}
/// # Ok(())
/// # }
/// ```
pub struct DialogueController {
    state: SharedState,
    voice: Arc<dyn VoiceIo>,
    generator: Arc<dyn QueryGenerator>,
    store: Arc<dyn FlightStore>,
    clock: Clock,
}

impl DialogueController {
    pub fn new(
        state: SharedState,
        voice: Arc<dyn VoiceIo>,
        generator: Arc<dyn QueryGenerator>,
        store: Arc<dyn FlightStore>,
    ) -> Self {
        Self {
            state,
            voice,
            generator,
            store,
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Replace the local-date clock.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Handle for readers such as a display loop.
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// A copy of the current context.
    pub fn snapshot(&self) -> DialogueContext {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, DialogueContext> {
        // Every write replaces whole fields, so a poisoned context is still
        // consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // External actions
    // -----------------------------------------------------------------------

    /// Leave `Init`. Returns `false` if not idle in `Init`.
    pub fn start(&self) -> bool {
        let current = {
            let ctx = self.lock();
            if ctx.stage != Stage::Init || ctx.is_busy() {
                return false;
            }
            ctx.clone()
        };
        let (next, _) = transition(current, StageInput::Proceed, (self.clock)());
        log::debug!("dialogue: start → {}", next.stage);
        *self.lock() = next;
        true
    }

    /// Start over from `Init`, now or as soon as the in-flight step ends.
    pub async fn request_reset(&self) -> ResetOutcome {
        {
            let mut ctx = self.lock();
            if ctx.is_busy() {
                log::info!("dialogue: reset deferred until {} completes", ctx.stage);
                ctx.pending_reset = true;
                return ResetOutcome::Deferred;
            }
            log::info!("dialogue: reset from {}", ctx.stage);
            ctx.reset();
        }
        self.speak_all(vec![RESET_ACK.to_string()]).await;
        ResetOutcome::Performed
    }

    // -----------------------------------------------------------------------
    // Step
    // -----------------------------------------------------------------------

    /// Run the current stage once.
    pub async fn step(&self) -> StepOutcome {
        let current = {
            let mut ctx = self.lock();
            if ctx.is_busy() {
                return StepOutcome::Busy;
            }
            match ctx.stage {
                Stage::Init => return StepOutcome::AwaitingStart,
                stage if stage.is_terminal() => return StepOutcome::Finished(stage),
                _ => {}
            }
            ctx.activity = Activity::Busy;
            ctx.clone()
        };
        let stage = current.stage;

        let mut disconnected = false;
        let input = if stage.is_listen() {
            let (heard, closed) = self.listen().await;
            disconnected = closed;
            StageInput::Heard(heard)
        } else if stage == Stage::Querying {
            StageInput::Searched(self.search(&current.booking).await)
        } else {
            StageInput::Proceed
        };

        // Transition the live context, not `current`: a reset may have been
        // requested while the input was being gathered.
        let effects = {
            let mut ctx = self.lock();
            let (next, effects) = transition(std::mem::take(&mut *ctx), input, (self.clock)());
            if next.stage != stage {
                log::debug!("dialogue: {stage} → {}", next.stage);
            }
            *ctx = next;
            effects
        };

        let texts = effects
            .into_iter()
            .map(|effect| match effect {
                Effect::Speak(text) => text,
            })
            .collect();
        self.speak_all(texts).await;

        let (stage, reset) = {
            let mut ctx = self.lock();
            ctx.activity = Activity::Idle;
            let reset = std::mem::take(&mut ctx.pending_reset);
            if reset {
                log::info!("dialogue: performing deferred reset");
                ctx.reset();
            }
            (ctx.stage, reset)
        };
        if reset {
            self.speak_all(vec![RESET_ACK.to_string()]).await;
        }

        if disconnected {
            StepOutcome::Disconnected(stage)
        } else {
            StepOutcome::Advanced(stage)
        }
    }

    // -----------------------------------------------------------------------
    // Collaborator calls
    // -----------------------------------------------------------------------

    /// Returns the transcript (if any) and whether the input has closed.
    async fn listen(&self) -> (Option<String>, bool) {
        let voice = Arc::clone(&self.voice);
        match tokio::task::spawn_blocking(move || voice.listen()).await {
            Ok(Ok(text)) => (Some(text), false),
            Ok(Err(VoiceError::InputClosed)) => {
                log::warn!("voice: input closed");
                (None, true)
            }
            Ok(Err(e)) => {
                log::warn!("voice: listen failed: {e}");
                (None, false)
            }
            Err(e) => {
                log::error!("dialogue: listen task failed: {e}");
                (None, false)
            }
        }
    }

    async fn search(&self, booking: &BookingRecord) -> SearchOutcome {
        let Some(criteria) = booking.search_criteria() else {
            let e = QueryGenError::MissingCriteria(booking.missing_fields().join(", "));
            log::error!("dialogue: {e}");
            return SearchOutcome::GenerationFailed;
        };

        let query = match self.generator.generate_query(&criteria).await {
            Ok(query) => query,
            Err(e) => {
                log::error!("llm: query generation failed: {e}");
                return SearchOutcome::GenerationFailed;
            }
        };

        let store = Arc::clone(&self.store);
        let sql = query.clone();
        match tokio::task::spawn_blocking(move || store.execute_query(&sql)).await {
            Ok(Ok(rows)) => SearchOutcome::Rows { query, rows },
            Ok(Err(e)) => {
                log::error!("store: query failed: {e}");
                SearchOutcome::ExecutionFailed { query }
            }
            Err(e) => {
                log::error!("dialogue: store task failed: {e}");
                SearchOutcome::ExecutionFailed { query }
            }
        }
    }

    /// Speak each text in order; failures are logged and skipped.
    async fn speak_all(&self, texts: Vec<String>) {
        if texts.is_empty() {
            return;
        }
        let voice = Arc::clone(&self.voice);
        let spoken = tokio::task::spawn_blocking(move || {
            for text in &texts {
                if let Err(e) = voice.speak(text) {
                    log::warn!("voice: speak failed: {e}");
                }
            }
        })
        .await;
        if let Err(e) = spoken {
            log::error!("dialogue: speak task failed: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
