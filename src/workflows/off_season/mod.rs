//! Off-season detection.
//!
//! A month is off-season when its mean cancellation rate sits more than
//! [`OFF_SEASON_THRESHOLD_PERCENT`] below the unweighted mean of all monthly
//! means. Months absent from the dataset do not take part in the average.

use crate::workflows::bookings::BookingRecord;
use chrono::Month;
use serde::Serialize;

/// Minimum relative drop, in percent, for a month to count as off-season.
pub const OFF_SEASON_THRESHOLD_PERCENT: f64 = 10.0;

const CALENDAR: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyStat {
    pub month: Month,
    pub bookings: usize,
    pub mean_cancellation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffSeasonEntry {
    pub month: Month,
    pub percentage_drop: f64,
}

/// Result of a detection pass. `entries` follow calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct OffSeasonDetection {
    pub overall_average: f64,
    pub monthly: Vec<MonthlyStat>,
    pub entries: Vec<OffSeasonEntry>,
}

impl OffSeasonDetection {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drop_for(&self, month: Month) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.month == month)
            .map(|entry| entry.percentage_drop)
    }

    pub fn view(&self) -> OffSeasonView {
        OffSeasonView {
            overall_average: self.overall_average,
            monthly: self
                .monthly
                .iter()
                .map(|stat| MonthlyStatView {
                    month: stat.month.name(),
                    bookings: stat.bookings,
                    mean_cancellation: stat.mean_cancellation,
                })
                .collect(),
            off_season: self
                .entries
                .iter()
                .map(|entry| OffSeasonEntryView {
                    month: entry.month.name(),
                    percentage_drop: entry.percentage_drop,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStatView {
    pub month: &'static str,
    pub bookings: usize,
    pub mean_cancellation: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OffSeasonEntryView {
    pub month: &'static str,
    pub percentage_drop: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OffSeasonView {
    pub overall_average: f64,
    pub monthly: Vec<MonthlyStatView>,
    pub off_season: Vec<OffSeasonEntryView>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectionError {
    #[error("booking dataset contains no records")]
    EmptyDataset,
    #[error("overall cancellation average is zero; percentage drop is undefined")]
    DivisionByZero,
}

/// Mean cancellation indicator per month present in `records`, in calendar order.
pub fn monthly_stats(records: &[BookingRecord]) -> Vec<MonthlyStat> {
    let mut totals = [(0.0_f64, 0_usize); 12];
    for record in records {
        let slot = &mut totals[record.arrival_month.number_from_month() as usize - 1];
        slot.0 += record.cancellation;
        slot.1 += 1;
    }

    CALENDAR
        .iter()
        .zip(totals)
        .filter(|(_, (_, count))| *count > 0)
        .map(|(month, (sum, count))| MonthlyStat {
            month: *month,
            bookings: count,
            mean_cancellation: sum / count as f64,
        })
        .collect()
}

/// Relative deviation of `month_average` below `overall_average`, in percent.
pub fn percentage_drop(overall_average: f64, month_average: f64) -> Result<f64, DetectionError> {
    if overall_average == 0.0 {
        return Err(DetectionError::DivisionByZero);
    }
    Ok((overall_average - month_average) / overall_average * 100.0)
}

pub fn is_off_season(percentage_drop: f64) -> bool {
    percentage_drop > OFF_SEASON_THRESHOLD_PERCENT
}

pub fn detect_off_season(records: &[BookingRecord]) -> Result<OffSeasonDetection, DetectionError> {
    let monthly = monthly_stats(records);
    if monthly.is_empty() {
        return Err(DetectionError::EmptyDataset);
    }

    let overall_average =
        monthly.iter().map(|stat| stat.mean_cancellation).sum::<f64>() / monthly.len() as f64;

    let mut entries = Vec::new();
    for stat in &monthly {
        let drop = percentage_drop(overall_average, stat.mean_cancellation)?;
        if is_off_season(drop) {
            entries.push(OffSeasonEntry {
                month: stat.month,
                percentage_drop: drop,
            });
        }
    }

    Ok(OffSeasonDetection {
        overall_average,
        monthly,
        entries,
    })
}
