//! Booking data and the pure functions that validate each spoken answer.
//!
//! * [`BookingRecord`]: the six slots collected during one conversation.
//! * [`TravelClass`] / [`SearchCriteria`]: cabin class and the query subset.
//! * [`parse_spoken_date`]: permissive natural-language date parser.
//! * [`DateSlot`], [`parse_class`], [`parse_confirmation`], [`title_case`],
//!   [`is_reset_request`]: per-slot validators.

pub mod dates;
pub mod record;
pub mod slots;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use dates::{parse_spoken_date, DateParseError};
pub use record::{BookingRecord, SearchCriteria, TravelClass};
pub use slots::{
    is_reset_request, parse_class, parse_confirmation, title_case, Confirmation,
    DateAnswerError, DateRangeError, DateSlot, RESET_KEYWORD,
};
