//! Permissive parser for dates as people say them.
//!
//! Transcripts arrive lowercased and loosely punctuated ("may 10th 1990",
//! "the day after tomorrow", "next friday", "04/15/2025"), so the parser
//! scans tokens for date parts and ignores everything else.
//!
//! Resolution rules:
//!
//! | Input                               | Result                                 |
//! |-------------------------------------|----------------------------------------|
//! | `today` / `tomorrow` / `yesterday`  | relative to `today`                    |
//! | `day after tomorrow`                | `today + 2`                            |
//! | `in N days` / `in N weeks`          | digits, `a`/`an`, or `one`..`twelve`   |
//! | `next week`                         | `today + 7`                            |
//! | `friday` / `this friday`            | next Friday, today included            |
//! | `next friday`                       | next Friday, today excluded            |
//! | `2025-04-15`                        | ISO year-month-day                     |
//! | `4/15/2025`, `15.04.2025`           | month first unless the first part > 12 |
//! | `may 10 1990`, `10th of may`        | missing year → current year            |
//! | `march 1990`                        | missing day → today's day, clamped     |
//! | `june 5 at 9 30`, `june 5 10 am`    | times of day are skipped               |
//!
//! Two-digit years land within fifty years of the current one and are only
//! read directly after the month or day.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DateParseError
// ---------------------------------------------------------------------------

/// Why a transcript could not be read as a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// Nothing in the text looked like part of a date.
    #[error("no date found in {0:?}")]
    NotADate(String),

    /// The text named two different values for the same part, or mixed a
    /// relative day ("tomorrow") with an explicit date.
    #[error("conflicting date parts in {0:?}")]
    Ambiguous(String),

    /// The parts were read but do not form a real calendar day.
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    NoSuchDay { year: i32, month: u32, day: u32 },
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sep", 9),
    ("sept", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("thur", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
];

const ORDINALS: &[(&str, u32)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
    ("eleventh", 11),
    ("twelfth", 12),
    ("thirteenth", 13),
    ("fourteenth", 14),
    ("fifteenth", 15),
    ("sixteenth", 16),
    ("seventeenth", 17),
    ("eighteenth", 18),
    ("nineteenth", 19),
    ("twentieth", 20),
    ("thirtieth", 30),
];

const COUNTS: &[(&str, i64)] = &[
    ("a", 1),
    ("an", 1),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
];

fn lookup<T: Copy>(table: &[(&str, T)], word: &str) -> Option<T> {
    table.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

fn count(word: &str) -> Option<i64> {
    lookup(COUNTS, word).or_else(|| word.parse::<u32>().ok().map(i64::from))
}

fn unit_days(word: &str) -> Option<i64> {
    match word {
        "day" | "days" => Some(1),
        "week" | "weeks" => Some(7),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Parse a spoken date relative to `today`.
///
/// ```
/// use chrono::NaiveDate;
/// use voice_flight_agent::booking::parse_spoken_date;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
/// assert_eq!(
///     parse_spoken_date("tomorrow", today),
///     Ok(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
/// );
/// assert_eq!(
///     parse_spoken_date("may 10 1990", today),
///     Ok(NaiveDate::from_ymd_opt(1990, 5, 10).unwrap())
/// );
/// assert!(parse_spoken_date("somewhere warm", today).is_err());
/// ```
pub fn parse_spoken_date(text: &str, today: NaiveDate) -> Result<NaiveDate, DateParseError> {
    let tokens = tokenize(text);
    let mut used = vec![false; tokens.len()];

    let conflict = |_: Conflict| DateParseError::Ambiguous(text.trim().to_string());
    let relative = relative_date(&tokens, &mut used, today).map_err(conflict)?;
    mark_time_of_day(&tokens, &mut used);
    let parts = absolute_parts(&tokens, &used, today, relative.is_some()).map_err(conflict)?;

    if let Some(date) = relative {
        if parts.has_calendar_part() {
            return Err(DateParseError::Ambiguous(text.trim().to_string()));
        }
        return Ok(date);
    }

    if !parts.has_calendar_part() {
        return match parts.weekday {
            Some((weekday, skip_today)) => Ok(upcoming(today, weekday, skip_today)),
            None => Err(DateParseError::NotADate(text.trim().to_string())),
        };
    }

    if parts.month.is_none() && parts.day.is_none() {
        // A bare year is not a day.
        return Err(DateParseError::NotADate(text.trim().to_string()));
    }

    let year = parts.year.unwrap_or_else(|| today.year());
    let month = parts.month.unwrap_or_else(|| today.month());
    let day = parts
        .day
        .unwrap_or_else(|| today.day().min(days_in_month(year, month)));

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateParseError::NoSuchDay { year, month, day })
}

// ---------------------------------------------------------------------------
// Tokenizing
// ---------------------------------------------------------------------------

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .flat_map(|raw| {
            let t = raw.trim_matches(|c: char| {
                matches!(c, '.' | '!' | '?' | ';' | ':' | '"' | '(' | ')')
            });
            // "twenty-first" splits; "2025-04-15" stays whole.
            if t.contains('-') && t.chars().any(|c| c.is_ascii_alphabetic()) {
                t.split('-').map(str::to_string).collect::<Vec<_>>()
            } else {
                vec![t.to_string()]
            }
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Two different values were given for the same part.
struct Conflict;

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn number_in(tokens: &[String], index: usize, range: std::ops::RangeInclusive<u32>) -> bool {
    tokens
        .get(index)
        .filter(|t| is_digits(t) && t.len() <= 2)
        .and_then(|t| t.parse::<u32>().ok())
        .is_some_and(|v| range.contains(&v))
}

/// Skip clock times: `at H [MM]` and `H [MM] am|pm|o'clock`.
///
/// Before a marker a number above 12 can only be minutes, so "june 20 10 pm"
/// keeps its day while "9 30 pm" drops both numbers.
fn mark_time_of_day(tokens: &[String], used: &mut [bool]) {
    for (i, token) in tokens.iter().enumerate() {
        let mut clock = Vec::new();
        match token.as_str() {
            "at" => {
                if number_in(tokens, i + 1, 0..=23) {
                    clock.push(i + 1);
                    if tokens.get(i + 2).is_some_and(|t| t.len() == 2)
                        && number_in(tokens, i + 2, 0..=59)
                    {
                        clock.push(i + 2);
                    }
                }
            }
            "am" | "pm" | "a.m" | "p.m" | "o'clock" | "oclock" => {
                if let Some(prev) = i.checked_sub(1) {
                    if number_in(tokens, prev, 1..=12) {
                        clock.push(prev);
                    } else if tokens[prev].len() == 2 && number_in(tokens, prev, 13..=59) {
                        clock.push(prev);
                        let hour = prev
                            .checked_sub(1)
                            .filter(|h| number_in(tokens, *h, 1..=12));
                        clock.extend(hour);
                    }
                }
            }
            _ => {}
        }
        for index in clock {
            used[index] = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Relative phrases
// ---------------------------------------------------------------------------

fn relative_date(
    tokens: &[String],
    used: &mut [bool],
    today: NaiveDate,
) -> Result<Option<NaiveDate>, Conflict> {
    let mut found: Option<NaiveDate> = None;
    let mut i = 0;

    while i < tokens.len() {
        let words: Vec<&str> = tokens[i..].iter().take(3).map(String::as_str).collect();
        let (offset, width) = match words.as_slice() {
            ["day", "after", "tomorrow", ..] => (2, 3),
            ["tomorrow", ..] => (1, 1),
            ["today", ..] | ["tonight", ..] => (0, 1),
            ["yesterday", ..] => (-1, 1),
            ["next", "week", ..] => (7, 2),
            ["in", n, unit] => match (count(n), unit_days(unit)) {
                (Some(n), Some(unit)) => (n * unit, 3),
                _ => {
                    i += 1;
                    continue;
                }
            },
            _ => {
                i += 1;
                continue;
            }
        };

        let date = today.checked_add_signed(Duration::days(offset)).ok_or(Conflict)?;
        match found {
            Some(existing) if existing != date => return Err(Conflict),
            _ => found = Some(date),
        }
        used[i..i + width].iter_mut().for_each(|u| *u = true);
        i += width;
    }

    Ok(found)
}

fn upcoming(today: NaiveDate, target: Weekday, skip_today: bool) -> NaiveDate {
    let ahead = (7 + i64::from(target.num_days_from_monday())
        - i64::from(today.weekday().num_days_from_monday()))
        % 7;
    let ahead = if ahead == 0 && skip_today { 7 } else { ahead };
    today + Duration::days(ahead)
}

// ---------------------------------------------------------------------------
// Calendar parts
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    /// Weekday named without a calendar date; the flag means "next …".
    weekday: Option<(Weekday, bool)>,
}

impl Parts {
    fn has_calendar_part(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    fn set_day(&mut self, day: u32) -> Result<(), Conflict> {
        if !(1..=31).contains(&day) || self.day.is_some_and(|d| d != day) {
            return Err(Conflict);
        }
        self.day = Some(day);
        Ok(())
    }

    fn set_year(&mut self, year: i32) -> Result<(), Conflict> {
        if self.year.is_some_and(|y| y != year) {
            return Err(Conflict);
        }
        self.year = Some(year);
        Ok(())
    }
}

fn absolute_parts(
    tokens: &[String],
    used: &[bool],
    today: NaiveDate,
    has_relative: bool,
) -> Result<Parts, Conflict> {
    let mut parts = Parts::default();
    let mut months: Vec<(u32, bool)> = Vec::new();
    let mut ordinal_day: Option<u32> = None;
    let mut numeric = false;
    // Index of the last token that was part of the month/day group.
    let mut group_end: Option<usize> = None;

    let mut i = 0;
    while i < tokens.len() {
        if used[i] {
            i += 1;
            continue;
        }
        let token = tokens[i].as_str();
        let prev = i.checked_sub(1).map(|p| tokens[p].as_str());

        if let Some((y, m, d)) = numeric_date(token, today) {
            if numeric || parts.has_calendar_part() {
                return Err(Conflict);
            }
            numeric = true;
            parts.year = Some(y);
            parts.month = Some(m);
            parts.day = Some(d);
        } else if let Some(month) = lookup(MONTHS, token) {
            months.push((month, token == "may"));
            group_end = Some(i);
        } else if let Some(weekday) = lookup(WEEKDAYS, token) {
            parts.weekday = Some((weekday, prev == Some("next")));
        } else if matches!(token, "twenty" | "thirty") {
            let tens = if token == "twenty" { 20 } else { 30 };
            let unit = tokens
                .get(i + 1)
                .and_then(|next| lookup(ORDINALS, next))
                .filter(|u| (1..=9).contains(u));
            if let Some(unit) = unit {
                if ordinal_day.is_some_and(|d| d != tens + unit) {
                    return Err(Conflict);
                }
                ordinal_day = Some(tens + unit);
                i += 1;
                group_end = Some(i);
            }
        } else if let Some(day) = lookup(ORDINALS, token) {
            if ordinal_day.is_some_and(|d| d != day) {
                return Err(Conflict);
            }
            ordinal_day = Some(day);
            group_end = Some(i);
        } else if let Some(day) = suffixed_day(token) {
            parts.set_day(day)?;
            group_end = Some(i);
        } else if is_digits(token) {
            let value: u32 = token.parse().map_err(|_| Conflict)?;
            let after_group = group_end.is_some() && group_end == i.checked_sub(1);
            if token.len() == 4 {
                parts.set_year(value as i32)?;
            } else if value <= 31 && parts.day.is_none() {
                // Day 0 is kept so the calendar check rejects it.
                parts.day = Some(value);
                group_end = Some(i);
            } else if value < 100 && parts.year.is_none() && after_group {
                parts.year = Some(expand_two_digit_year(value as i32, today));
            }
        }

        i += 1;
    }

    // "may" doubles as a verb: a real month name outranks it, and next to
    // a relative day it is never a month.
    let named: Vec<u32> = months.iter().filter(|(_, may)| !may).map(|(m, _)| *m).collect();
    let candidates: Vec<u32> = if !named.is_empty() {
        named
    } else if has_relative && parts.day.is_none() && parts.year.is_none() {
        Vec::new()
    } else {
        months.iter().map(|(m, _)| *m).collect()
    };
    if let Some(&first) = candidates.first() {
        if candidates.iter().any(|&m| m != first) || (numeric && first != parts.month.unwrap_or(first)) {
            return Err(Conflict);
        }
        parts.month = Some(first);
    }

    // Ordinal words only count next to a month ("first class" is not a date).
    if let (Some(day), Some(_)) = (ordinal_day, parts.month) {
        parts.set_day(day)?;
    }

    Ok(parts)
}

/// `10th`, `1st`, `22nd`, `3rd`.
fn suffixed_day(token: &str) -> Option<u32> {
    let digits = token
        .strip_suffix("st")
        .or_else(|| token.strip_suffix("nd"))
        .or_else(|| token.strip_suffix("rd"))
        .or_else(|| token.strip_suffix("th"))?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `2025-04-15`, `4/15/2025`, `15.04.25`, `4/15`.
fn numeric_date(token: &str, today: NaiveDate) -> Option<(i32, u32, u32)> {
    let is_sep = |c: char| matches!(c, '/' | '-' | '.');
    if !token.contains(is_sep) || !token.chars().all(|c| c.is_ascii_digit() || is_sep(c)) {
        return None;
    }

    let fields: Vec<&str> = token.split(is_sep).collect();
    if fields.iter().any(|f| f.is_empty() || f.len() > 4) {
        return None;
    }
    let nums: Vec<u32> = fields.iter().map(|f| f.parse().ok()).collect::<Option<_>>()?;

    let year_of = |field: &str, value: u32| {
        if field.len() <= 2 {
            expand_two_digit_year(value as i32, today)
        } else {
            value as i32
        }
    };
    let month_day = |a: u32, b: u32| if a > 12 { (b, a) } else { (a, b) };

    match (fields.as_slice(), nums.as_slice()) {
        ([y, _, _], [yv, m, d]) if y.len() == 4 => Some((*yv as i32, *m, *d)),
        ([_, _, y], [a, b, yv]) => {
            let (m, d) = month_day(*a, *b);
            Some((year_of(*y, *yv), m, d))
        }
        ([_, _], [a, b]) => {
            let (m, d) = month_day(*a, *b);
            Some((today.year(), m, d))
        }
        _ => None,
    }
}

fn expand_two_digit_year(yy: i32, today: NaiveDate) -> i32 {
    let this_year = today.year();
    let year = this_year / 100 * 100 + yy;
    if year > this_year + 49 {
        year - 100
    } else if year < this_year - 50 {
        year + 100
    } else {
        year
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A Thursday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(text: &str) -> Result<NaiveDate, DateParseError> {
        parse_spoken_date(text, today())
    }

    #[test]
    fn fixture_is_a_thursday() {
        assert_eq!(today().weekday(), Weekday::Thu);
    }

    // ---- relative ---

    #[test]
    fn relative_words() {
        assert_eq!(parse("today"), Ok(ymd(2026, 10, 15)));
        assert_eq!(parse("tomorrow"), Ok(ymd(2026, 10, 16)));
        assert_eq!(parse("yesterday"), Ok(ymd(2026, 10, 14)));
        assert_eq!(parse("the day after tomorrow"), Ok(ymd(2026, 10, 17)));
        assert_eq!(parse("next week"), Ok(ymd(2026, 10, 22)));
    }

    #[test]
    fn relative_word_inside_a_sentence() {
        assert_eq!(parse("i want to leave tomorrow please"), Ok(ymd(2026, 10, 16)));
    }

    #[test]
    fn in_n_days_and_weeks() {
        assert_eq!(parse("in 3 days"), Ok(ymd(2026, 10, 18)));
        assert_eq!(parse("in three days"), Ok(ymd(2026, 10, 18)));
        assert_eq!(parse("in a week"), Ok(ymd(2026, 10, 22)));
        assert_eq!(parse("in two weeks"), Ok(ymd(2026, 10, 29)));
    }

    #[test]
    fn weekdays() {
        assert_eq!(parse("friday"), Ok(ymd(2026, 10, 16)));
        assert_eq!(parse("next friday"), Ok(ymd(2026, 10, 16)));
        assert_eq!(parse("thursday"), Ok(ymd(2026, 10, 15)));
        assert_eq!(parse("next thursday"), Ok(ymd(2026, 10, 22)));
        assert_eq!(parse("this monday"), Ok(ymd(2026, 10, 19)));
    }

    #[test]
    fn may_as_a_verb_next_to_relative_day() {
        assert_eq!(parse("i may leave tomorrow"), Ok(ymd(2026, 10, 16)));
    }

    // ---- month names ---

    #[test]
    fn month_day_year_orders() {
        assert_eq!(parse("may 10 1990"), Ok(ymd(1990, 5, 10)));
        assert_eq!(parse("10 may 1990"), Ok(ymd(1990, 5, 10)));
        assert_eq!(parse("May 10th, 1990"), Ok(ymd(1990, 5, 10)));
        assert_eq!(parse("the 10th of may 1990"), Ok(ymd(1990, 5, 10)));
        assert_eq!(parse("sept. 3rd 2027"), Ok(ymd(2027, 9, 3)));
    }

    #[test]
    fn missing_year_uses_current_year() {
        assert_eq!(parse("april 15th"), Ok(ymd(2026, 4, 15)));
        assert_eq!(parse("december 1"), Ok(ymd(2026, 12, 1)));
    }

    #[test]
    fn ordinal_words() {
        assert_eq!(parse("june fifth"), Ok(ymd(2026, 6, 5)));
        assert_eq!(parse("the twenty first of june 1985"), Ok(ymd(1985, 6, 21)));
        assert_eq!(parse("march thirty-first 2030"), Ok(ymd(2030, 3, 31)));
    }

    #[test]
    fn ordinal_word_without_month_is_not_a_date() {
        assert!(matches!(parse("first"), Err(DateParseError::NotADate(_))));
    }

    #[test]
    fn bare_day_uses_current_month() {
        assert_eq!(parse("the 20th"), Ok(ymd(2026, 10, 20)));
    }

    #[test]
    fn two_digit_years() {
        assert_eq!(parse("may 10 90"), Ok(ymd(1990, 5, 10)));
        assert_eq!(parse("jan 5 30"), Ok(ymd(2030, 1, 5)));
    }

    #[test]
    fn month_and_year_takes_todays_day_clamped() {
        assert_eq!(parse("march 1990"), Ok(ymd(1990, 3, 15)));
        let end_of_month = ymd(2026, 10, 31);
        assert_eq!(
            parse_spoken_date("february 2025", end_of_month),
            Ok(ymd(2025, 2, 28))
        );
    }

    // ---- numeric ---

    #[test]
    fn iso_dates() {
        assert_eq!(parse("2025-04-15"), Ok(ymd(2025, 4, 15)));
    }

    #[test]
    fn slashed_dates_month_first_unless_impossible() {
        assert_eq!(parse("04/15/2025"), Ok(ymd(2025, 4, 15)));
        assert_eq!(parse("15/04/2025"), Ok(ymd(2025, 4, 15)));
        assert_eq!(parse("3/4/2025"), Ok(ymd(2025, 3, 4)));
        assert_eq!(parse("15.04.25"), Ok(ymd(2025, 4, 15)));
        assert_eq!(parse("12/25"), Ok(ymd(2026, 12, 25)));
    }

    // ---- failures ---

    #[test]
    fn no_date_parts() {
        assert_eq!(
            parse("somewhere warm"),
            Err(DateParseError::NotADate("somewhere warm".into()))
        );
        assert!(matches!(parse("1990"), Err(DateParseError::NotADate(_))));
    }

    #[test]
    fn impossible_day() {
        assert_eq!(
            parse("february 30 2025"),
            Err(DateParseError::NoSuchDay {
                year: 2025,
                month: 2,
                day: 30
            })
        );
    }

    #[test]
    fn relative_and_absolute_conflict() {
        assert!(matches!(
            parse("tomorrow june 10"),
            Err(DateParseError::Ambiguous(_))
        ));
    }

    #[test]
    fn two_months_conflict() {
        assert!(matches!(
            parse("june or july 4"),
            Err(DateParseError::Ambiguous(_))
        ));
    }

    #[test]
    fn time_of_day_is_ignored() {
        assert_eq!(parse("june 10 at 5"), Ok(ymd(2026, 6, 10)));
    }

    #[test]
    fn hour_and_minutes_after_a_date_are_not_a_year() {
        assert_eq!(parse("june 5 at 9 30"), Ok(ymd(2026, 6, 5)));
        assert_eq!(parse("december 3rd 10 am"), Ok(ymd(2026, 12, 3)));
        assert_eq!(parse("november 20 9 pm"), Ok(ymd(2026, 11, 20)));
        assert_eq!(parse("november 20 9 30 p.m."), Ok(ymd(2026, 11, 20)));
        assert_eq!(parse("9 o'clock on june 5"), Ok(ymd(2026, 6, 5)));
        assert_eq!(parse("november 20 10 pm"), Ok(ymd(2026, 11, 20)));
    }

    #[test]
    fn stray_number_away_from_the_date_is_ignored() {
        assert_eq!(parse("june 5 gate 12"), Ok(ymd(2026, 6, 5)));
        assert_eq!(parse("10 may 90"), Ok(ymd(1990, 5, 10)));
    }

    #[test]
    fn day_zero_is_not_a_year() {
        assert_eq!(
            parse("may 0"),
            Err(DateParseError::NoSuchDay {
                year: 2026,
                month: 5,
                day: 0
            })
        );
    }

    #[test]
    fn error_message_names_the_text() {
        let err = parse("blue sky").unwrap_err();
        assert!(err.to_string().contains("blue sky"));
    }
}
