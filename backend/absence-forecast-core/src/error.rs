// src/error.rs
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization/deserialization failed: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("CSV processing failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("School holiday '{label}' ends ({end}) before it starts ({start})")]
    InvalidInterval {
        label: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),
    #[error("Date {date} shifted by {days} days falls outside the supported calendar range")]
    DateOutOfRange { date: NaiveDate, days: i64 },
    #[error("Horizon of {requested} weeks exceeds the maximum of {max}")]
    HorizonTooLong { requested: u32, max: u32 },
}

pub type Result<T, E = ForecastError> = std::result::Result<T, E>;
