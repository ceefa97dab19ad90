mod parser;

pub use parser::parse_month;

use chrono::Month;
use std::io::Read;
use std::path::Path;

/// A single booking row reduced to the fields the detector needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingRecord {
    pub arrival_month: Month,
    /// Cancellation indicator in `[0, 1]`.
    pub cancellation: f64,
}

impl BookingRecord {
    pub fn new(arrival_month: Month, canceled: bool) -> Self {
        Self {
            arrival_month,
            cancellation: if canceled { 1.0 } else { 0.0 },
        }
    }
}

#[derive(Debug)]
pub enum DatasetLoadError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownMonth { row: usize, value: String },
    InvalidCancellation { row: usize, value: String },
}

impl std::fmt::Display for DatasetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLoadError::Io(err) => write!(f, "failed to read booking dataset: {}", err),
            DatasetLoadError::Csv(err) => write!(f, "invalid booking CSV data: {}", err),
            DatasetLoadError::UnknownMonth { row, value } => write!(
                f,
                "row {}: arrival_date_month '{}' is not a calendar month name",
                row, value
            ),
            DatasetLoadError::InvalidCancellation { row, value } => write!(
                f,
                "row {}: is_canceled '{}' must be a number between 0 and 1",
                row, value
            ),
        }
    }
}

impl std::error::Error for DatasetLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetLoadError::Io(err) => Some(err),
            DatasetLoadError::Csv(err) => Some(err),
            DatasetLoadError::UnknownMonth { .. } | DatasetLoadError::InvalidCancellation { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for DatasetLoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetLoadError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads hotel booking exports with `arrival_date_month` and `is_canceled`
/// columns. Other columns are ignored.
pub struct BookingLoader;

impl BookingLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BookingRecord>, DatasetLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<BookingRecord>, DatasetLoadError> {
        parser::parse_records(reader)
    }
}
