// src/report.rs
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::alerts::PredictiveAlert;
use crate::error::{ForecastError, Result};

// One flat CSV row per alert; suggestions are left out
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertRow<'a> {
    id: &'a str,
    week_number: u32,
    week_start_date: String,
    risk_level: &'static str,
    expected_absences: u32,
    available_staff: i64,
    total_staff: u32,
    message: &'a str,
}

impl<'a> From<&'a PredictiveAlert> for AlertRow<'a> {
    fn from(alert: &'a PredictiveAlert) -> Self {
        Self {
            id: &alert.id,
            week_number: alert.week_number,
            week_start_date: alert.week_start_date.format("%Y-%m-%d").to_string(),
            risk_level: alert.risk_level.as_str(),
            expected_absences: alert.expected_absences,
            available_staff: alert.available_staff,
            total_staff: alert.total_staff,
            message: &alert.message,
        }
    }
}

pub fn write_alerts_csv<W: Write>(writer: W, alerts: &[PredictiveAlert]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for alert in alerts {
        csv_writer.serialize(AlertRow::from(alert))?;
    }
    csv_writer.flush().map_err(|e| ForecastError::Csv(e.into()))?;
    Ok(())
}

pub fn save_alerts_csv(path: &Path, alerts: &[PredictiveAlert]) -> Result<()> {
    let file = File::create(path).map_err(|source| ForecastError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_alerts_csv(file, alerts)?;
    info!("Saved {} alerts to {}", alerts.len(), path.display());
    Ok(())
}
