//! Voice-driven flight search agent.
//!
//! A scripted conversation collects a departure date, route, cabin class and
//! passenger details, confirms them, asks a language model for an SQLite
//! query and shows the matching flights.

pub mod booking;
pub mod config;
pub mod dialogue;
pub mod llm;
pub mod progress;
pub mod results;
pub mod store;
pub mod voice;
