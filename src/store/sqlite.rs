//! SQLite-backed flight store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{Local, NaiveDate};
use rand::Rng;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::config::StoreConfig;

use super::sample::{self, SampleFlight, DATETIME_FORMAT};
use super::{FlightRow, FlightStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS flights (
    flight_id TEXT PRIMARY KEY,
    airline TEXT NOT NULL,
    origin TEXT NOT NULL,
    destination TEXT NOT NULL,
    departure_datetime TEXT NOT NULL,
    arrival_datetime TEXT NOT NULL,
    travel_class TEXT NOT NULL,
    price REAL NOT NULL,
    seats_available INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_flights_route ON flights(origin, destination);";

/// Flight database in a single SQLite file.
///
/// The connection sits behind a `Mutex` so the store can be shared as
/// `Arc<dyn FlightStore>` and called from any blocking-pool thread.
pub struct SqliteFlightStore {
    conn: Mutex<Connection>,
    sample_flights: usize,
}

impl SqliteFlightStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path, sample_flights: usize) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        log::debug!("store: opened {}", path.display());
        Self::with_connection(conn, sample_flights)
    }

    /// Open the database named by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::open(&config.database_path(), config.sample_flights)
    }

    /// A private in-memory database.
    pub fn open_in_memory(sample_flights: usize) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, sample_flights)
    }

    fn with_connection(conn: Connection, sample_flights: usize) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            sample_flights,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Number of rows in `flights`.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM flights", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Seed an empty table with flights for the month of `month_of`.
    pub fn populate_with<R: Rng + ?Sized>(
        &self,
        month_of: NaiveDate,
        rng: &mut R,
    ) -> Result<usize, StoreError> {
        if self.count()? > 0 {
            return Ok(0);
        }
        let flights = sample::generate(self.sample_flights, month_of, rng);
        self.insert(&flights)?;
        log::info!(
            "store: inserted {} sample flights for {}",
            flights.len(),
            month_of.format("%B %Y")
        );
        Ok(flights.len())
    }

    /// Insert `flights` in one transaction.
    pub fn insert(&self, flights: &[SampleFlight]) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO flights (flight_id, airline, origin, destination, departure_datetime, arrival_datetime, travel_class, price, seats_available)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for f in flights {
                stmt.execute(params![
                    f.flight_id,
                    f.airline,
                    f.origin,
                    f.destination,
                    f.departure.format(DATETIME_FORMAT).to_string(),
                    f.arrival.format(DATETIME_FORMAT).to_string(),
                    f.travel_class.as_str(),
                    f.price,
                    f.seats_available,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl FlightStore for SqliteFlightStore {
    fn ensure_populated(&self) -> Result<usize, StoreError> {
        self.populate_with(Local::now().date_naive(), &mut rand::thread_rng())
    }

    fn execute_query(&self, sql: &str) -> Result<Vec<FlightRow>, StoreError> {
        let sql = single_select(sql)?;
        let conn = self.lock()?;

        let mut stmt = conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(StoreError::Rejected(format!("not read-only: {sql}")));
        }
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = FlightRow::new();
            for (i, name) in columns.iter().enumerate() {
                record.insert(name.clone(), json_value(row.get_ref(i)?));
            }
            out.push(record);
        }

        log::info!("store: query returned {} row(s)", out.len());
        Ok(out)
    }
}

/// Accept exactly one `SELECT` statement, ignoring trailing semicolons.
fn single_select(sql: &str) -> Result<&str, StoreError> {
    let sql = sql.trim().trim_end_matches(';').trim_end();
    if has_statement_break(sql) {
        return Err(StoreError::Rejected(format!("multiple statements: {sql}")));
    }
    let is_select = sql
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"));
    if !is_select {
        return Err(StoreError::Rejected(format!("not a SELECT: {sql}")));
    }
    Ok(sql)
}

/// `true` when a `;` appears outside quoted literals and identifiers.
fn has_statement_break(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    for c in sql.chars() {
        match (quote, c) {
            // A doubled quote ('') closes and reopens, which nets out.
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, ';') => return true,
            (None, _) => {}
        }
    }
    false
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<{} bytes>", b.len())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::TravelClass;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn flight(id: &str, origin: &str, destination: &str, when: &str, class: TravelClass) -> SampleFlight {
        let departure = chrono::NaiveDateTime::parse_from_str(when, DATETIME_FORMAT).unwrap();
        SampleFlight {
            flight_id: id.into(),
            airline: "Indigo".into(),
            origin: origin.into(),
            destination: destination.into(),
            departure,
            arrival: departure + chrono::Duration::hours(2),
            travel_class: class,
            price: 4321.5,
            seats_available: 12,
        }
    }

    #[test]
    fn populate_is_idempotent() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("data").join("flights.db");
        let store = SqliteFlightStore::open(&path, 40).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let month = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();

        assert_eq!(store.populate_with(month, &mut rng).unwrap(), 40);
        assert_eq!(store.populate_with(month, &mut rng).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 40);
        drop(store);

        let reopened = SqliteFlightStore::open(&path, 40).unwrap();
        assert_eq!(reopened.ensure_populated().unwrap(), 0);
        assert_eq!(reopened.count().unwrap(), 40);
    }

    #[test]
    fn ensure_populated_seeds_empty_table() {
        let store = SqliteFlightStore::open_in_memory(25).unwrap();
        assert_eq!(store.ensure_populated().unwrap(), 25);
        let rows = store
            .execute_query("SELECT COUNT(*) AS n FROM flights")
            .unwrap();
        assert_eq!(rows[0]["n"], Value::from(25));
    }

    #[test]
    fn generated_style_query_matches_case_insensitively() {
        let store = SqliteFlightStore::open_in_memory(0).unwrap();
        store
            .insert(&[
                flight("I101-E0", "Mumbai", "Delhi", "2026-10-16 09:30:00", TravelClass::Economy),
                flight("I102-E1", "Mumbai", "Delhi", "2026-10-17 09:30:00", TravelClass::Economy),
                flight("I103-B2", "Mumbai", "Delhi", "2026-10-16 11:00:00", TravelClass::Business),
            ])
            .unwrap();

        let rows = store
            .execute_query(
                "SELECT * FROM flights WHERE LOWER(origin) = LOWER('mumbai') \
                 AND LOWER(destination) = LOWER('DELHI') \
                 AND date(departure_datetime) = '2026-10-16' \
                 AND LOWER(travel_class) = LOWER('economy');",
            )
            .unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["flight_id"], "I101-E0");
        assert_eq!(row["departure_datetime"], "2026-10-16 09:30:00");
        assert_eq!(row["arrival_datetime"], "2026-10-16 11:30:00");
        assert_eq!(row["price"], Value::from(4321.5));
        assert_eq!(row["seats_available"], Value::from(12));
        assert_eq!(row.len(), 9);
    }

    #[test]
    fn no_match_is_an_empty_list() {
        let store = SqliteFlightStore::open_in_memory(0).unwrap();
        let rows = store
            .execute_query("SELECT * FROM flights WHERE origin = 'Atlantis'")
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn writes_are_rejected() {
        let store = SqliteFlightStore::open_in_memory(5).unwrap();
        store.ensure_populated().unwrap();

        for sql in [
            "DELETE FROM flights",
            "DROP TABLE flights",
            "SELECT 1; DELETE FROM flights",
            "SELECT 'it''s'; DELETE FROM flights",
            "",
        ] {
            assert!(
                matches!(store.execute_query(sql), Err(StoreError::Rejected(_))),
                "{sql:?} should be rejected"
            );
        }
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn bad_sql_is_a_sqlite_error() {
        let store = SqliteFlightStore::open_in_memory(0).unwrap();
        assert!(matches!(
            store.execute_query("SELECT * FROM no_such_table"),
            Err(StoreError::Sqlite(_))
        ));
    }

    #[test]
    fn single_select_strips_semicolons() {
        assert_eq!(single_select("  select 1 ;; ").unwrap(), "select 1");
    }

    #[test]
    fn semicolon_inside_a_literal_is_not_a_second_statement() {
        let store = SqliteFlightStore::open_in_memory(0).unwrap();
        store
            .insert(&[flight("I101-E0", "a;b", "Delhi", "2026-10-16 09:30:00", TravelClass::Economy)])
            .unwrap();

        let rows = store
            .execute_query("SELECT flight_id FROM flights WHERE origin = 'a;b';")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["flight_id"], "I101-E0");
    }
}
