// src/alerts.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar_rules::{end_of_week, shift_days, start_of_week, week_number, CalendarRules};
use crate::error::{ForecastError, Result};
use crate::risk_assessment::{assess_week, RiskLevel};

pub const DEFAULT_HORIZON_WEEKS: u32 = 12;
pub const DEFAULT_TOTAL_STAFF: u32 = 32;
// Past one year, week numbers (and so alert ids) start repeating
pub const MAX_HORIZON_WEEKS: u32 = 52;

pub fn check_horizon(horizon_weeks: u32) -> Result<()> {
    if horizon_weeks > MAX_HORIZON_WEEKS {
        return Err(ForecastError::HorizonTooLong {
            requested: horizon_weeks,
            max: MAX_HORIZON_WEEKS,
        });
    }
    Ok(())
}

// --- Alert Structures ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveAlert {
    pub id: String,
    pub week_number: u32,
    pub risk_level: RiskLevel,
    pub expected_absences: u32,
    // Left unclamped: a negative value means more absences than staff
    pub available_staff: i64,
    pub total_staff: u32,
    pub staff_deficit: bool,
    pub staffing_percent: Option<i64>,
    pub message: String,
    pub suggestions: Vec<String>,
    pub week_start_date: NaiveDate,
}

impl PredictiveAlert {
    pub fn alert_id(week_number: u32) -> String {
        format!("alert-week-{}", week_number)
    }
}

fn staffing_percent(available_staff: i64, total_staff: u32) -> Option<i64> {
    if total_staff == 0 {
        return None;
    }
    let ratio = available_staff as f64 / total_staff as f64 * 100.0;
    // Halves round towards positive infinity
    Some((ratio + 0.5).floor() as i64)
}

/// How the generated alert list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertOrdering {
    /// Most severe first; weeks of equal severity stay in calendar order.
    #[default]
    Severity,
    /// Level names compared as strings, descending: medium, low, high, critical.
    /// Kept for consumers that depend on the legacy dashboard order.
    Lexicographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertSettings {
    pub total_staff: u32,
    pub ordering: AlertOrdering,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            total_staff: DEFAULT_TOTAL_STAFF,
            ordering: AlertOrdering::default(),
        }
    }
}

pub fn sort_alerts(alerts: &mut [PredictiveAlert], ordering: AlertOrdering) {
    match ordering {
        AlertOrdering::Severity => alerts.sort_by(|a, b| b.risk_level.cmp(&a.risk_level)),
        AlertOrdering::Lexicographic => {
            alerts.sort_by(|a, b| b.risk_level.as_str().cmp(a.risk_level.as_str()))
        }
    }
}

/// Assesses each of the `horizon_weeks` weeks following `reference` and
/// returns an alert for every week that is not low risk.
///
/// Fails with `DateOutOfRange` when a probed week lies beyond the dates chrono
/// can represent.
pub fn generate_alerts(
    rules: &CalendarRules,
    reference: NaiveDate,
    horizon_weeks: u32,
    settings: AlertSettings,
) -> Result<Vec<PredictiveAlert>> {
    let mut alerts = Vec::new();

    for i in 1..=horizon_weeks {
        let week_start = start_of_week(shift_days(reference, 7 * i as i64)?)?;
        let week_end = end_of_week(week_start)?;
        let assessment = assess_week(rules, week_start, week_end);

        if assessment.risk_level == RiskLevel::Low {
            continue;
        }

        let number = week_number(week_start);
        let available_staff = settings.total_staff as i64 - assessment.expected_absences as i64;
        alerts.push(PredictiveAlert {
            id: PredictiveAlert::alert_id(number),
            week_number: number,
            risk_level: assessment.risk_level,
            expected_absences: assessment.expected_absences,
            available_staff,
            total_staff: settings.total_staff,
            staff_deficit: available_staff < 0,
            staffing_percent: staffing_percent(available_staff, settings.total_staff),
            message: assessment.message,
            suggestions: assessment.suggestions,
            week_start_date: week_start,
        });
    }

    sort_alerts(&mut alerts, settings.ordering);
    info!(
        "Generated {} alerts over {} weeks from {}",
        alerts.len(),
        horizon_weeks,
        reference
    );
    Ok(alerts)
}

// --- Dashboard Summary ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub high_or_critical: usize,
    pub by_level: LevelCounts,
    pub lowest_staffing_percent: Option<i64>,
}

pub fn summarize_alerts(alerts: &[PredictiveAlert]) -> AlertSummary {
    let mut summary = AlertSummary {
        total_alerts: alerts.len(),
        ..AlertSummary::default()
    };

    for alert in alerts {
        match alert.risk_level {
            RiskLevel::Medium => summary.by_level.medium += 1,
            RiskLevel::High => summary.by_level.high += 1,
            RiskLevel::Critical => summary.by_level.critical += 1,
            RiskLevel::Low => {}
        }
        if alert.risk_level.is_high_or_critical() {
            summary.high_or_critical += 1;
        }
    }
    summary.lowest_staffing_percent = alerts.iter().filter_map(|a| a.staffing_percent).min();

    summary
}
