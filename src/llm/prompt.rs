//! Prompt builder for flight-search SQL generation.
//!
//! [`PromptBuilder`] produces a `(system_msg, user_msg)` pair for any
//! OpenAI-compatible `/v1/chat/completions` endpoint. The system message
//! describes the `flights` table; the user message carries the criteria and
//! the filtering rules the query must follow.

use crate::booking::SearchCriteria;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SCHEMA_DESCRIPTION: &str = "\
You are interacting with an SQLite database containing flight information in a table named 'flights'.
The table has the following columns:
- flight_id (TEXT, Primary Key): Unique identifier for the flight (e.g., 'BA234-E').
- airline (TEXT): Name of the airline (e.g., 'British Airways').
- origin (TEXT): Departure city (e.g., 'London').
- destination (TEXT): Arrival city (e.g., 'New York').
- departure_datetime (TEXT): Departure date and time in 'YYYY-MM-DD HH:MM:SS' format.
- arrival_datetime (TEXT): Arrival date and time in 'YYYY-MM-DD HH:MM:SS' format.
- travel_class (TEXT): Cabin class ('Economy', 'Business', 'First').
- price (REAL): Price of the flight ticket.
- seats_available (INTEGER): Number of seats remaining.";

const OUTPUT_RULES: &str = "\
Return ONLY the SQL query string, without any explanation, comments, markdown formatting (like ```sql), or introductory text.
Example format: SELECT * FROM flights WHERE ...;";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds SQL-generation prompts.
///
/// # Example
/// ```rust
/// use chrono::NaiveDate;
/// use voice_flight_agent::booking::{SearchCriteria, TravelClass};
/// use voice_flight_agent::llm::PromptBuilder;
///
/// let criteria = SearchCriteria {
///     origin: "Mumbai".into(),
///     destination: "Delhi".into(),
///     date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
///     travel_class: TravelClass::Economy,
/// };
/// let (system, user) = PromptBuilder::new().build_chat(&criteria);
/// assert!(system.contains("flights"));
/// assert!(user.contains("2026-10-16"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a **(system_msg, user_msg)** pair.
    pub fn build_chat(&self, criteria: &SearchCriteria) -> (String, String) {
        let date = criteria.date.format("%Y-%m-%d").to_string();

        let mut user_msg = String::with_capacity(1024);
        user_msg.push_str("User wants to find flights based on the following criteria:\n");
        user_msg.push_str(&format!("- Origin: {}\n", criteria.origin));
        user_msg.push_str(&format!("- Destination: {}\n", criteria.destination));
        user_msg.push_str(&format!(
            "- Departure Date: {date} (This is the specific date, format YYYY-MM-DD)\n"
        ));
        user_msg.push_str(&format!("- Travel Class: {}\n\n", criteria.travel_class));
        user_msg.push_str(
            "Generate an SQLite SELECT query to retrieve all matching flights from the 'flights' table.\n\
             The query should filter based on:\n\
             1. Exact match for 'origin' (case-insensitive).\n\
             2. Exact match for 'destination' (case-insensitive).\n",
        );
        user_msg.push_str(&format!(
            "3. The departure date must match the given date. Use the `date()` function on the \
             'departure_datetime' column for comparison (e.g., `date(departure_datetime) = '{date}'`).\n"
        ));
        user_msg.push_str("4. Exact match for 'travel_class' (case-insensitive).\n\n");
        user_msg.push_str(OUTPUT_RULES);

        (SCHEMA_DESCRIPTION.to_string(), user_msg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
