use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::bookings::DatasetLoadError;
use crate::workflows::off_season::DetectionError;
use crate::workflows::promotion::{CampaignError, NotifierSetupError};
use crate::workflows::schedule::YearlyRunError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Dataset(DatasetLoadError),
    Detection(DetectionError),
    Campaign(CampaignError),
    Notifier(NotifierSetupError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Dataset(err) => write!(f, "dataset error: {}", err),
            AppError::Detection(err) => write!(f, "detection error: {}", err),
            AppError::Campaign(err) => write!(f, "campaign error: {}", err),
            AppError::Notifier(err) => write!(f, "notifier setup error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Detection(err) => Some(err),
            AppError::Campaign(err) => Some(err),
            AppError::Notifier(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DatasetLoadError> for AppError {
    fn from(value: DatasetLoadError) -> Self {
        Self::Dataset(value)
    }
}

impl From<DetectionError> for AppError {
    fn from(value: DetectionError) -> Self {
        Self::Detection(value)
    }
}

impl From<CampaignError> for AppError {
    fn from(value: CampaignError) -> Self {
        Self::Campaign(value)
    }
}

impl From<NotifierSetupError> for AppError {
    fn from(value: NotifierSetupError) -> Self {
        Self::Notifier(value)
    }
}

impl From<YearlyRunError> for AppError {
    fn from(value: YearlyRunError) -> Self {
        match value {
            YearlyRunError::Dataset(err) => Self::Dataset(err),
            YearlyRunError::Detection(err) => Self::Detection(err),
            YearlyRunError::Campaign(err) => Self::Campaign(err),
        }
    }
}
