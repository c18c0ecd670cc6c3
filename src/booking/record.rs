//! The booking record filled slot by slot during the dialogue.

use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// TravelClass
// ---------------------------------------------------------------------------

/// Cabin class. The string forms match the `travel_class` column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelClass {
    Economy,
    Business,
    First,
}

impl TravelClass {
    pub const ALL: [TravelClass; 3] = [Self::Economy, Self::Business, Self::First];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Business => "Business",
            Self::First => "First",
        }
    }

    /// First letter, used as the suffix of generated flight ids.
    pub fn initial(&self) -> char {
        match self {
            Self::Economy => 'E',
            Self::Business => 'B',
            Self::First => 'F',
        }
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SearchCriteria
// ---------------------------------------------------------------------------

/// The subset of the booking handed to query generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub travel_class: TravelClass,
}

// ---------------------------------------------------------------------------
// BookingRecord
// ---------------------------------------------------------------------------

/// Trip and passenger details collected over one conversation.
///
/// Every field starts as `None`; the record is complete once all six are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRecord {
    pub departure_date: Option<NaiveDate>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub travel_class: Option<TravelClass>,
    pub passenger_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl BookingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Whether no slot has been filled yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the unset fields, in the order the confirmation checks them.
    ///
    /// ```
    /// use voice_flight_agent::booking::BookingRecord;
    ///
    /// let mut record = BookingRecord::new();
    /// record.origin = Some("Mumbai".into());
    /// assert_eq!(
    ///     record.missing_fields(),
    ///     vec!["destination", "date", "class", "name", "dob"]
    /// );
    /// ```
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let slots = [
            ("origin", self.origin.is_some()),
            ("destination", self.destination.is_some()),
            ("date", self.departure_date.is_some()),
            ("class", self.travel_class.is_some()),
            ("name", self.passenger_name.is_some()),
            ("dob", self.date_of_birth.is_some()),
        ];
        slots
            .into_iter()
            .filter(|(_, set)| !set)
            .map(|(name, _)| name)
            .collect()
    }

    /// Clear every slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The four query fields, or `None` if any of them is unset.
    pub fn search_criteria(&self) -> Option<SearchCriteria> {
        Some(SearchCriteria {
            origin: self.origin.clone()?,
            destination: self.destination.clone()?,
            date: self.departure_date?,
            travel_class: self.travel_class?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
