pub mod employee;
pub mod executor;
pub mod store;

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// The database file could not be opened.
    Connection(String),
    /// A statement failed; carries the engine's message verbatim.
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "Error connecting to database: {}", msg),
            StoreError::Query(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for StoreError {}

impl From<duckdb::Error> for StoreError {
    fn from(e: duckdb::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}
