// src/risk_assessment.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar_rules::CalendarRules;

// --- Scoring Constants ---

const BASE_EXPECTED_ABSENCES: u32 = 3;
const SCHOOL_HOLIDAY_WEIGHT: u32 = 8;
const BRIDGE_DAY_WEIGHT: u32 = 5;
const SUMMER_WEIGHT: u32 = 6;
const YEAR_END_WEIGHT: u32 = 4;

const CRITICAL_THRESHOLD: u32 = 15;
const HIGH_THRESHOLD: u32 = 10;
const MEDIUM_THRESHOLD: u32 = 6;

// Declaration order is severity order; derived Ord relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Maps an expected absence count to a level. Thresholds are checked
    /// from the top, so a count equal to a threshold lands in the higher tier.
    pub fn from_expected_absences(expected: u32) -> Self {
        if expected >= CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if expected >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if expected >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn is_high_or_critical(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    SchoolHoliday,
    BridgeDay,
    SummerPeriod,
    YearEnd,
}

impl RiskFactor {
    pub fn weight(&self) -> u32 {
        match self {
            RiskFactor::SchoolHoliday => SCHOOL_HOLIDAY_WEIGHT,
            RiskFactor::BridgeDay => BRIDGE_DAY_WEIGHT,
            RiskFactor::SummerPeriod => SUMMER_WEIGHT,
            RiskFactor::YearEnd => YEAR_END_WEIGHT,
        }
    }

    // Wording shown to managers
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::SchoolHoliday => "vacances scolaires",
            RiskFactor::BridgeDay => "jour de pont",
            RiskFactor::SummerPeriod => "période estivale",
            RiskFactor::YearEnd => "fin d'année",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRiskAssessment {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub risk_level: RiskLevel,
    pub expected_absences: u32,
    pub factors: Vec<RiskFactor>,
    pub message: String,
    pub suggestions: Vec<String>,
}

fn matched_factors(rules: &CalendarRules, week_start: NaiveDate, week_end: NaiveDate) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if rules.overlaps_school_holiday(week_start, week_end) {
        factors.push(RiskFactor::SchoolHoliday);
    }
    if rules.contains_bridge_day(week_start, week_end) {
        factors.push(RiskFactor::BridgeDay);
    }
    // Month checks look at the first day of the week only
    match week_start.month() {
        7 | 8 => factors.push(RiskFactor::SummerPeriod),
        12 => factors.push(RiskFactor::YearEnd),
        _ => {}
    }

    factors
}

const CRITICAL_SUGGESTIONS: &[&str] = &[
    "Bloquer les nouvelles demandes de congés",
    "Activer le plan de continuité d'activité",
    "Envisager le recours à l'intérim",
];

const HIGH_SUGGESTIONS: &[&str] = &[
    "Redistribuer les équipes en fonction des priorités",
    "Reporter les projets non critiques",
    "Sensibiliser les équipes sur la planification",
];

const MEDIUM_SUGGESTIONS: &[&str] = &[
    "Planifier les tâches critiques en avance",
    "Vérifier la disponibilité des ressources clés",
];

fn message_and_suggestions(level: RiskLevel, expected: u32, factors: &[RiskFactor]) -> (String, Vec<String>) {
    let (message, suggestions) = match level {
        RiskLevel::Critical => (
            format!("Risque critique de sous-effectif : {} absences prévues", expected),
            CRITICAL_SUGGESTIONS,
        ),
        RiskLevel::High => (
            format!("Risque élevé de sous-effectif : {} absences prévues", expected),
            HIGH_SUGGESTIONS,
        ),
        RiskLevel::Medium => {
            let labels: Vec<&str> = factors.iter().map(|f| f.label()).collect();
            (
                format!("Attention : {} absences prévues ({})", expected, labels.join(", ")),
                MEDIUM_SUGGESTIONS,
            )
        }
        RiskLevel::Low => (String::new(), &[][..]),
    };

    (message, suggestions.iter().map(|s| s.to_string()).collect())
}

/// Scores the week `[week_start, week_end]` against the calendar rules.
///
/// Starts from a base of three expected absences and adds the weight of each
/// matching factor. Factors are independent and may all apply to one week.
pub fn assess_week(rules: &CalendarRules, week_start: NaiveDate, week_end: NaiveDate) -> WeekRiskAssessment {
    let factors = matched_factors(rules, week_start, week_end);
    let expected_absences = BASE_EXPECTED_ABSENCES + factors.iter().map(|f| f.weight()).sum::<u32>();
    let risk_level = RiskLevel::from_expected_absences(expected_absences);
    let (message, suggestions) = message_and_suggestions(risk_level, expected_absences, &factors);

    debug!(
        "Week {}..{}: {} expected absences ({:?}) -> {}",
        week_start, week_end, expected_absences, factors, risk_level
    );

    WeekRiskAssessment {
        week_start,
        week_end,
        risk_level,
        expected_absences,
        factors,
        message,
        suggestions,
    }
}
