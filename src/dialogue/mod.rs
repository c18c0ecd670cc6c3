//! The flight-booking conversation.
//!
//! # Architecture
//!
//! ```text
//! driver (main loop)
//!        │ start() / step() / request_reset()
//!        ▼
//! DialogueController  ← async, one stage per step()
//!        │
//!        ├─ spawn_blocking(VoiceIo::listen / speak)
//!        ├─ QueryGenerator::generate_query (async)
//!        ├─ spawn_blocking(FlightStore::execute_query)
//!        └─ transition(context, input, today) → (context, effects)   [pure]
//!
//! SharedState (Arc<Mutex<DialogueContext>>) ←── read by the driver
//! ```

pub mod controller;
pub mod state;
pub mod transition;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{Clock, DialogueController, ResetOutcome, StepOutcome};
pub use state::{new_shared_state, Activity, DialogueContext, SharedState, Stage};
pub use transition::{spoken_date, transition, Effect, SearchOutcome, StageInput};
