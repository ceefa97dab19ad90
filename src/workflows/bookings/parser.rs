use super::{BookingRecord, DatasetLoadError};
use chrono::Month;
use serde::Deserialize;
use std::io::Read;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BookingRecord>, DatasetLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<BookingRow>().enumerate() {
        let row = record?;
        let line = index + 1;

        let arrival_month =
            parse_month(&row.arrival_date_month).ok_or_else(|| DatasetLoadError::UnknownMonth {
                row: line,
                value: row.arrival_date_month.clone(),
            })?;
        let cancellation = parse_cancellation(&row.is_canceled).ok_or_else(|| {
            DatasetLoadError::InvalidCancellation {
                row: line,
                value: row.is_canceled.clone(),
            }
        })?;

        records.push(BookingRecord {
            arrival_month,
            cancellation,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BookingRow {
    arrival_date_month: String,
    is_canceled: String,
}

/// Accepts full English month names and three-letter abbreviations in any case.
pub fn parse_month(raw: &str) -> Option<Month> {
    raw.trim().parse::<Month>().ok()
}

fn parse_cancellation(raw: &str) -> Option<f64> {
    let value = match raw.trim().to_ascii_lowercase().as_str() {
        "true" => 1.0,
        "false" => 0.0,
        other => other.parse::<f64>().ok()?,
    };
    (0.0..=1.0).contains(&value).then_some(value)
}
