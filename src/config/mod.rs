use chrono::NaiveTime;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::promotion::PostStatus;
use crate::workflows::schedule::YearlyTrigger;

/// Top-level configuration for the promotion service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub schedule: ScheduleConfig,
    pub notifier: NotifierConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let dataset = DatasetConfig {
            path: PathBuf::from(var_or("PROMO_DATASET_PATH", "data/hotel_bookings.csv")),
        };

        let run_at = parse_run_at(&var_or("PROMO_RUN_AT", "00:00"))?;
        let poll_interval_secs = var_or("PROMO_POLL_INTERVAL_SECS", "60")
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidPollInterval)?;
        let trigger = parse_trigger(&var_or("PROMO_TRIGGER_DATE", "01-01"))?;

        let smtp_port = var_or("SMTP_PORT", "587")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidSmtpPort)?;
        let blog_status = parse_post_status(&var_or("BLOG_POST_STATUS", "publish"))?;

        let notifier = NotifierConfig {
            smtp_host: var_or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port,
            from_address: var_or("SMTP_FROM_ADDRESS", "promotions@example.com"),
            credential_reference: var_or("SMTP_CREDENTIAL_REF", "SMTP_PASSWORD"),
            recipient: var_or("PROMO_RECIPIENT", "recipient@example.com"),
            blog_endpoint: var_or(
                "BLOG_ENDPOINT",
                "https://example.com/wp-json/wp/v2/posts",
            ),
            blog_username: var_or("BLOG_USERNAME", "promotions"),
            blog_credential_reference: var_or("BLOG_CREDENTIAL_REF", "WORDPRESS_APP_PASSWORD"),
            blog_status,
        };

        Ok(Self {
            dataset,
            schedule: ScheduleConfig {
                run_at,
                poll_interval: Duration::from_secs(poll_interval_secs),
                trigger,
            },
            notifier,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the booking export read on every yearly run.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

/// Daily polling settings and the calendar date the yearly run is gated on.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub run_at: NaiveTime,
    pub poll_interval: Duration,
    pub trigger: YearlyTrigger,
}

/// Outbound email and blog settings handed to the notifier at construction.
///
/// Credential references name environment variables holding the secret; the
/// secrets themselves never live in this struct.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub credential_reference: String,
    pub recipient: String,
    pub blog_endpoint: String,
    pub blog_username: String,
    pub blog_credential_reference: String,
    pub blog_status: PostStatus,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Looks up the secret named by a credential reference.
pub fn resolve_credential(reference: &str) -> Result<String, ConfigError> {
    match env::var(reference) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential {
            reference: reference.to_string(),
        }),
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_run_at(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| ConfigError::InvalidRunAt {
        value: raw.to_string(),
    })
}

fn parse_trigger(raw: &str) -> Result<YearlyTrigger, ConfigError> {
    let invalid = || ConfigError::InvalidTriggerDate {
        value: raw.to_string(),
    };
    let (month, day) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    let day = day.parse::<u32>().map_err(|_| invalid())?;
    YearlyTrigger::new(month, day).ok_or_else(invalid)
}

fn parse_post_status(raw: &str) -> Result<PostStatus, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "publish" => Ok(PostStatus::Publish),
        "draft" => Ok(PostStatus::Draft),
        _ => Err(ConfigError::InvalidPostStatus {
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSmtpPort,
    InvalidPollInterval,
    InvalidRunAt { value: String },
    InvalidTriggerDate { value: String },
    InvalidPostStatus { value: String },
    MissingCredential { reference: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::InvalidPollInterval => {
                write!(f, "PROMO_POLL_INTERVAL_SECS must be a positive integer")
            }
            ConfigError::InvalidRunAt { value } => {
                write!(f, "PROMO_RUN_AT must be HH:MM, got '{}'", value)
            }
            ConfigError::InvalidTriggerDate { value } => write!(
                f,
                "PROMO_TRIGGER_DATE must be a calendar date as MM-DD, got '{}'",
                value
            ),
            ConfigError::InvalidPostStatus { value } => write!(
                f,
                "BLOG_POST_STATUS must be 'publish' or 'draft', got '{}'",
                value
            ),
            ConfigError::MissingCredential { reference } => write!(
                f,
                "credential reference '{}' does not name a populated environment variable",
                reference
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
