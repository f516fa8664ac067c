// src/engine.rs
use chrono::NaiveDate;

use crate::alerts::{self, AlertSettings, AlertSummary, PredictiveAlert, DEFAULT_HORIZON_WEEKS};
use crate::calendar_rules::{end_of_week, start_of_week, CalendarRules};
use crate::error::Result;
use crate::historical::HistoricalStore;
use crate::patterns::{self, AbsencePattern};
use crate::redistribution::{self, TeamRedistribution};
use crate::risk_assessment::{self, WeekRiskAssessment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub horizon_weeks: u32,
    pub alerts: AlertSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            horizon_weeks: DEFAULT_HORIZON_WEEKS,
            alerts: AlertSettings::default(),
        }
    }
}

/// Owns the immutable input tables. Every query recomputes its result, so a
/// single engine can be shared freely between request handlers.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    history: HistoricalStore,
    rules: CalendarRules,
    settings: EngineSettings,
}

impl ForecastEngine {
    pub fn new(history: HistoricalStore, rules: CalendarRules, settings: EngineSettings) -> Self {
        Self {
            history,
            rules,
            settings,
        }
    }

    pub fn seeded() -> Self {
        Self::new(
            HistoricalStore::seeded(),
            CalendarRules::seeded(),
            EngineSettings::default(),
        )
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn rules(&self) -> &CalendarRules {
        &self.rules
    }

    pub fn history(&self) -> &HistoricalStore {
        &self.history
    }

    pub fn analyze_patterns(&self) -> Vec<AbsencePattern> {
        patterns::analyze_patterns(&self.history, &self.rules)
    }

    pub fn assess_week(&self, week_start: NaiveDate, week_end: NaiveDate) -> WeekRiskAssessment {
        risk_assessment::assess_week(&self.rules, week_start, week_end)
    }

    // Assesses the Sunday-to-Saturday week containing `date`
    pub fn assess_week_containing(&self, date: NaiveDate) -> Result<WeekRiskAssessment> {
        let week_start = start_of_week(date)?;
        Ok(self.assess_week(week_start, end_of_week(week_start)?))
    }

    pub fn generate_alerts(&self, reference: NaiveDate) -> Result<Vec<PredictiveAlert>> {
        self.generate_alerts_for(reference, self.settings.horizon_weeks)
    }

    pub fn generate_alerts_for(&self, reference: NaiveDate, horizon_weeks: u32) -> Result<Vec<PredictiveAlert>> {
        alerts::generate_alerts(&self.rules, reference, horizon_weeks, self.settings.alerts)
    }

    pub fn find_alert(&self, reference: NaiveDate, alert_id: &str) -> Result<Option<PredictiveAlert>> {
        Ok(self
            .generate_alerts(reference)?
            .into_iter()
            .find(|alert| alert.id == alert_id))
    }

    pub fn generate_redistributions(&self, alert: &PredictiveAlert) -> Vec<TeamRedistribution> {
        redistribution::generate_redistributions(alert)
    }

    pub fn summarize(&self, generated: &[PredictiveAlert]) -> AlertSummary {
        alerts::summarize_alerts(generated)
    }
}
