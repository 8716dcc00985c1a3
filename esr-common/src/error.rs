//! Common error types for ESR

use thiserror::Error;

/// Common result type for ESR operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shape guidance appended to load failures so users know what to fix
pub const EXPECTED_SHAPE: &str = "expected a workbook (.xlsx/.xls/.ods) or delimited export \
with 2 header rows (section titles, then column names) and 39 columns: \
id_participants, Age, Genre, Etude, Item4-Item7, the 27 dimension items (Item 8 .. Item 34) \
and Total ES, Total valo, Total MR, Total GC";

/// Common error types across the ESR crates
#[derive(Error, Debug)]
pub enum Error {
    /// Input file unreadable, wrongly shaped, or missing required columns
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A statistic was requested on a column the table does not have
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `MalformedInput` error carrying the expected-shape guidance
    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Error::MalformedInput(format!("{}; {}", detail, EXPECTED_SHAPE))
    }
}

impl From<calamine::Error> for Error {
    fn from(e: calamine::Error) -> Self {
        Error::malformed(format!("unreadable workbook ({})", e))
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::malformed(format!("unreadable delimited text ({})", e))
    }
}
