use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::workflows::bookings::{BookingLoader, DatasetLoadError};
use crate::workflows::off_season::{detect_off_season, DetectionError, OffSeasonDetection};
use crate::workflows::promotion::{CampaignError, CampaignReport, OffSeasonCampaign};

/// Calendar day (month and day of month) on which the yearly run happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyTrigger {
    month: u32,
    day: u32,
}

impl YearlyTrigger {
    /// `None` unless the day exists in some year; February 29 is accepted.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub const fn new_year() -> Self {
        Self { month: 1, day: 1 }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

impl Default for YearlyTrigger {
    fn default() -> Self {
        Self::new_year()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    Skipped {
        today: NaiveDate,
    },
    Completed {
        detection: OffSeasonDetection,
        report: CampaignReport,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum YearlyRunError {
    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error(transparent)]
    Campaign(#[from] CampaignError),
}

/// Load, detect and promote, gated on the trigger date. Any failure aborts
/// the current run; nothing is retried until the next trigger date.
#[derive(Debug)]
pub struct YearlyDetection {
    dataset_path: PathBuf,
    trigger: YearlyTrigger,
    campaign: OffSeasonCampaign,
}

impl YearlyDetection {
    pub fn new(
        dataset_path: impl Into<PathBuf>,
        trigger: YearlyTrigger,
        campaign: OffSeasonCampaign,
    ) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            trigger,
            campaign,
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn run_for(&self, today: NaiveDate) -> Result<DetectionOutcome, YearlyRunError> {
        if !self.trigger.matches(today) {
            info!(
                %today,
                trigger_month = self.trigger.month,
                trigger_day = self.trigger.day,
                "skipping yearly detection: not the trigger date"
            );
            return Ok(DetectionOutcome::Skipped { today });
        }

        info!(
            %today,
            dataset = %self.dataset_path.display(),
            "running yearly off-season detection"
        );

        let records = BookingLoader::from_path(&self.dataset_path).map_err(|err| {
            error!(stage = "load", error = %err, "yearly detection aborted");
            err
        })?;
        let detection = detect_off_season(&records).map_err(|err| {
            error!(
                stage = "detect",
                bookings = records.len(),
                error = %err,
                "yearly detection aborted"
            );
            err
        })?;

        info!(
            bookings = records.len(),
            overall_average = detection.overall_average,
            off_season_months = detection.entries.len(),
            "off-season detection complete"
        );

        let report = self.campaign.launch(&detection)?;
        Ok(DetectionOutcome::Completed { detection, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn new_year_trigger_matches_only_january_first() {
        let trigger = YearlyTrigger::default();
        assert!(trigger.matches(date(2025, 1, 1)));
        assert!(trigger.matches(date(2031, 1, 1)));
        assert!(!trigger.matches(date(2025, 1, 2)));
        assert!(!trigger.matches(date(2025, 12, 31)));
        assert!(!trigger.matches(date(2025, 2, 1)));
    }

    #[test]
    fn rejects_days_that_never_exist() {
        assert!(YearlyTrigger::new(2, 29).is_some());
        assert!(YearlyTrigger::new(2, 30).is_none());
        assert!(YearlyTrigger::new(13, 1).is_none());
        assert!(YearlyTrigger::new(4, 31).is_none());
    }
}
