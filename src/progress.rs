//! What the terminal driver prints between dialogue steps.

use crate::booking::BookingRecord;
use crate::dialogue::{spoken_date, DialogueContext};

/// Lines describing what one step changed, from the contexts before and
/// after it.
///
/// A step that listened always reports the transcript and any error, so
/// repeated timeouts stay visible. Other errors are shown when they change,
/// and the collected record whenever a slot changed. Terminal stages print
/// their own outcome and add nothing here.
///
/// ```
/// use voice_flight_agent::dialogue::{DialogueContext, Stage};
/// use voice_flight_agent::progress::progress_lines;
///
/// let before = DialogueContext { stage: Stage::GetOrigin, ..Default::default() };
/// let mut after = before.clone();
/// after.stage = Stage::AskDestination;
/// after.last_transcript = Some("mumbai".into());
/// after.booking.origin = Some("Mumbai".into());
///
/// assert_eq!(
///     progress_lines(&before, &after),
///     vec!["You said: mumbai", "Collected: From: Mumbai"]
/// );
/// ```
pub fn progress_lines(before: &DialogueContext, after: &DialogueContext) -> Vec<String> {
    let mut lines = Vec::new();
    if after.stage.is_terminal() {
        return lines;
    }

    let listened = before.stage.is_listen();
    if listened {
        if let Some(transcript) = &after.last_transcript {
            lines.push(format!("You said: {transcript}"));
        }
    }
    if let Some(error) = &after.last_error {
        if listened || after.last_error != before.last_error {
            lines.push(format!("Error: {error}"));
        }
    }
    if after.booking != before.booking && !after.booking.is_empty() {
        lines.push(format!("Collected: {}", collected(&after.booking)));
    }
    lines
}

fn collected(booking: &BookingRecord) -> String {
    let fields = [
        ("Departure", booking.departure_date.map(spoken_date)),
        ("From", booking.origin.clone()),
        ("To", booking.destination.clone()),
        ("Class", booking.travel_class.map(|c| c.to_string())),
        ("Name", booking.passenger_name.clone()),
        ("Date of birth", booking.date_of_birth.map(spoken_date)),
    ];
    fields
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::TravelClass;
    use crate::dialogue::transition::LISTEN_FAILED;
    use crate::dialogue::Stage;
    use chrono::NaiveDate;

    fn at(stage: Stage) -> DialogueContext {
        DialogueContext {
            stage,
            ..Default::default()
        }
    }

    #[test]
    fn every_failed_listen_is_reported() {
        let mut before = at(Stage::GetDate);
        before.last_error = Some(LISTEN_FAILED.into());
        let after = before.clone();

        assert_eq!(
            progress_lines(&before, &after),
            vec![format!("Error: {LISTEN_FAILED}")]
        );
    }

    #[test]
    fn rejected_answer_shows_transcript_and_error() {
        let before = at(Stage::GetClass);
        let mut after = before.clone();
        after.last_transcript = Some("window seat".into());
        after.last_error = Some("Sorry, I didn't recognize that class.".into());

        assert_eq!(
            progress_lines(&before, &after),
            vec![
                "You said: window seat".to_string(),
                "Error: Sorry, I didn't recognize that class.".to_string(),
            ]
        );
    }

    #[test]
    fn record_lists_filled_slots_in_order() {
        let before = at(Stage::GetClass);
        let mut after = at(Stage::AskName);
        after.booking.departure_date = NaiveDate::from_ymd_opt(2026, 10, 16);
        after.booking.origin = Some("Mumbai".into());
        after.booking.travel_class = Some(TravelClass::Business);

        let lines = progress_lines(&before, &after);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Collected: Departure: October 16, 2026 | From: Mumbai | Class: Business")
        );
    }

    #[test]
    fn prompt_steps_print_nothing_new() {
        let before = at(Stage::AskOrigin);
        let after = at(Stage::GetOrigin);
        assert!(progress_lines(&before, &after).is_empty());
    }

    #[test]
    fn error_from_a_prompt_stage_is_shown_once() {
        let before = at(Stage::Confirm);
        let mut after = at(Stage::Init);
        after.last_error = Some("Missing origin".into());
        assert_eq!(progress_lines(&before, &after), vec!["Error: Missing origin"]);
    }

    #[test]
    fn terminal_stage_is_left_to_the_outcome_printer() {
        let before = at(Stage::Querying);
        let mut after = at(Stage::Error);
        after.last_error = Some("boom".into());
        assert!(progress_lines(&before, &after).is_empty());
    }
}
