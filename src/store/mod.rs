//! Flight data store.
//!
//! [`FlightStore`] is the read side the dialogue needs: make sure there is
//! something to search, then run one generated `SELECT`. Rows come back
//! loosely typed as column name to JSON value so that whatever columns the
//! generated query projects can be displayed.
//!
//! [`SqliteFlightStore`] is the production backend. [`CannedStore`] (only
//! under `#[cfg(test)]`) returns fixed rows for dialogue tests.

pub mod sample;
pub mod sqlite;

pub use sqlite::SqliteFlightStore;

use thiserror::Error;

/// One result row: column name to value.
pub type FlightRow = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The statement is not a single read-only `SELECT`.
    #[error("statement rejected: {0}")]
    Rejected(String),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("could not prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// FlightStore trait
// ---------------------------------------------------------------------------

/// Blocking flight database interface.
///
/// Implementors must be `Send + Sync`; the dialogue calls them from the
/// blocking thread pool through an `Arc<dyn FlightStore>`.
pub trait FlightStore: Send + Sync {
    /// Create the schema and seed sample data when the table is empty.
    /// Returns the number of rows inserted; `0` when data already existed.
    fn ensure_populated(&self) -> Result<usize, StoreError>;

    /// Run one `SELECT` and return every row.
    fn execute_query(&self, sql: &str) -> Result<Vec<FlightRow>, StoreError>;
}

// Compile-time assertion: Box<dyn FlightStore> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn FlightStore>) {}
};

// ---------------------------------------------------------------------------
// CannedStore  (test-only)
// ---------------------------------------------------------------------------

/// Returns a fixed result for every query and remembers the SQL it saw.
#[cfg(test)]
pub struct CannedStore {
    rows: Option<Vec<FlightRow>>,
    queries: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl CannedStore {
    pub fn with_rows(rows: Vec<FlightRow>) -> Self {
        Self {
            rows: Some(rows),
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: None,
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// A row with just a flight id and airline.
    pub fn row(flight_id: &str, airline: &str) -> FlightRow {
        let mut row = FlightRow::new();
        row.insert("flight_id".into(), flight_id.into());
        row.insert("airline".into(), airline.into());
        row
    }
}

#[cfg(test)]
impl FlightStore for CannedStore {
    fn ensure_populated(&self) -> Result<usize, StoreError> {
        Ok(0)
    }

    fn execute_query(&self, sql: &str) -> Result<Vec<FlightRow>, StoreError> {
        self.queries.lock().unwrap().push(sql.to_string());
        self.rows
            .clone()
            .ok_or_else(|| StoreError::Rejected("canned failure".into()))
    }
}
