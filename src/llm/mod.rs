//! Search-query generation.
//!
//! This module provides:
//! * [`QueryGenerator`]: async trait implemented by all generator backends.
//! * [`ApiQueryGenerator`]: OpenAI-compatible REST API backend.
//! * [`PromptBuilder`]: builds the schema and criteria prompts.
//! * [`extract_select`]: reduces a model reply to one `SELECT` statement.
//! * [`QueryGenError`]: error variants for generation.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use voice_flight_agent::booking::{SearchCriteria, TravelClass};
//! use voice_flight_agent::config::AppConfig;
//! use voice_flight_agent::llm::{ApiQueryGenerator, QueryGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = ApiQueryGenerator::from_config(&config.llm);
//!
//!     let criteria = SearchCriteria {
//!         origin: "Mumbai".into(),
//!         destination: "Delhi".into(),
//!         date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
//!         travel_class: TravelClass::Economy,
//!     };
//!     let sql = generator.generate_query(&criteria).await.unwrap();
//!     println!("{sql}");
//! }
//! ```

pub mod extract;
pub mod generator;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use extract::extract_select;
pub use generator::{ApiQueryGenerator, QueryGenError, QueryGenerator};
pub use prompt::PromptBuilder;

#[cfg(test)]
pub use generator::StaticGenerator;
