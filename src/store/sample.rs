//! Synthetic flight data for a fresh database.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::booking::TravelClass;

pub const AIRLINES: [&str; 8] = [
    "Indigo",
    "Air India",
    "SpiceJet",
    "Vistara",
    "GoAir",
    "Emirates",
    "British Airways",
    "Lufthansa",
];

pub const CITIES: [&str; 12] = [
    "Delhi",
    "Mumbai",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Ahmedabad",
    "Pune",
    "London",
    "New York",
    "Dubai",
    "Singapore",
];

const MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Storage format of `departure_datetime` / `arrival_datetime`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the `flights` table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFlight {
    pub flight_id: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub travel_class: TravelClass,
    pub price: f64,
    pub seats_available: u32,
}

/// Generate `count` random flights departing in the calendar month of
/// `month_of`.
pub fn generate<R: Rng + ?Sized>(count: usize, month_of: NaiveDate, rng: &mut R) -> Vec<SampleFlight> {
    let first = month_of.with_day(1).unwrap_or(month_of);
    let last_day = days_in_month(first);

    (0..count)
        .map(|index| {
            let airline = *AIRLINES.choose(rng).unwrap_or(&AIRLINES[0]);
            let origin = *CITIES.choose(rng).unwrap_or(&CITIES[0]);
            let destinations: Vec<&str> = CITIES.iter().copied().filter(|c| *c != origin).collect();
            let destination = *destinations.choose(rng).unwrap_or(&CITIES[1]);
            let travel_class = *TravelClass::ALL.choose(rng).unwrap_or(&TravelClass::Economy);

            let day = rng.gen_range(1..=last_day);
            let hour = rng.gen_range(0..24);
            let minute = *MINUTES.choose(rng).unwrap_or(&0);
            let departure = first
                .with_day(day)
                .and_then(|d| d.and_hms_opt(hour, minute, 0))
                .unwrap_or_else(|| first.and_time(chrono::NaiveTime::MIN));

            let duration_secs = (rng.gen_range(1.5..=15.0_f64) * 3600.0).round() as i64;
            let arrival = departure + Duration::seconds(duration_secs);

            let flight_number: u32 = rng.gen_range(100..=999);
            let flight_id = format!(
                "{}{}-{}{}",
                airline_code(airline),
                flight_number,
                travel_class.initial(),
                index
            );

            let base_price = rng.gen_range(3000.0..25000.0_f64);
            let price = match travel_class {
                TravelClass::Economy => base_price,
                TravelClass::Business => base_price * rng.gen_range(1.8..=3.0),
                TravelClass::First => base_price * rng.gen_range(3.5..=6.0),
            };

            SampleFlight {
                flight_id,
                airline: airline.to_string(),
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure,
                arrival,
                travel_class,
                price: (price * 100.0).round() / 100.0,
                seats_available: rng.gen_range(5..=50),
            }
        })
        .collect()
}

/// Up to two upper-cased word initials: "British Airways" -> "BA".
fn airline_code(airline: &str) -> String {
    airline
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.and_then(|n| n.pred_opt()).map_or(28, |d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn flights(count: usize) -> Vec<SampleFlight> {
        let mut rng = StdRng::seed_from_u64(7);
        generate(count, NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(), &mut rng)
    }

    #[test]
    fn departures_stay_in_the_month() {
        for f in flights(300) {
            assert_eq!((f.departure.year(), f.departure.month()), (2026, 2));
            assert!(MINUTES.contains(&f.departure.minute()));
            assert_eq!(f.departure.second(), 0);
        }
    }

    #[test]
    fn durations_and_ranges() {
        for f in flights(300) {
            let minutes = (f.arrival - f.departure).num_minutes();
            assert!((90..=900).contains(&minutes), "duration {minutes} min");
            assert!((5..=50).contains(&f.seats_available));
            assert_ne!(f.origin, f.destination);

            let (low, high) = match f.travel_class {
                TravelClass::Economy => (3000.0, 25000.0),
                TravelClass::Business => (3000.0 * 1.8, 25000.0 * 3.0),
                TravelClass::First => (3000.0 * 3.5, 25000.0 * 6.0),
            };
            assert!(f.price >= low - 0.01 && f.price <= high + 0.01, "{f:?}");
            assert_eq!((f.price * 100.0).round() / 100.0, f.price);
        }
    }

    #[test]
    fn ids_are_unique_and_shaped() {
        let all = flights(200);
        let ids: HashSet<_> = all.iter().map(|f| f.flight_id.as_str()).collect();
        assert_eq!(ids.len(), all.len());

        let f = &all[0];
        let code = airline_code(&f.airline);
        assert!(f.flight_id.starts_with(&code));
        assert!(f.flight_id.ends_with(&format!("-{}0", f.travel_class.initial())));
    }

    #[test]
    fn airline_codes() {
        assert_eq!(airline_code("British Airways"), "BA");
        assert_eq!(airline_code("Air India"), "AI");
        assert_eq!(airline_code("Indigo"), "I");
    }

    #[test]
    fn december_has_31_days() {
        let first = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(days_in_month(first), 31);
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2028, 2, 1).unwrap()), 29);
    }
}
