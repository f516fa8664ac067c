// src/calendar_rules.rs
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ForecastError, Result};

// --- Calendar Rule Tables ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolHoliday {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub label: String,
}

impl SchoolHoliday {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, label: &str) -> Self {
        Self {
            start_date,
            end_date,
            label: label.to_string(),
        }
    }

    // Both ranges are inclusive at each end
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeDay {
    pub date: NaiveDate,
    pub label: String,
}

impl BridgeDay {
    pub fn new(date: NaiveDate, label: &str) -> Self {
        Self {
            date,
            label: label.to_string(),
        }
    }

    pub fn falls_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.date && self.date <= end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRules {
    #[serde(default)]
    pub school_holidays: Vec<SchoolHoliday>,
    #[serde(default)]
    pub bridge_days: Vec<BridgeDay>,
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("seed dates are valid calendar dates")
}

static SEED_RULES: Lazy<CalendarRules> = Lazy::new(|| CalendarRules {
    school_holidays: vec![
        SchoolHoliday::new(d(2025, 2, 15), d(2025, 3, 3), "Vacances d'hiver"),
        SchoolHoliday::new(d(2025, 4, 12), d(2025, 4, 28), "Vacances de printemps"),
        SchoolHoliday::new(d(2025, 7, 5), d(2025, 9, 1), "Vacances d'été"),
        SchoolHoliday::new(d(2025, 10, 18), d(2025, 11, 3), "Vacances de la Toussaint"),
        SchoolHoliday::new(d(2025, 12, 20), d(2026, 1, 5), "Vacances de Noël"),
    ],
    bridge_days: vec![
        BridgeDay::new(d(2025, 5, 2), "Pont du 1er mai"),
        BridgeDay::new(d(2025, 5, 30), "Pont de l'Ascension"),
        BridgeDay::new(d(2025, 7, 14), "Pont du 14 juillet"),
        BridgeDay::new(d(2025, 11, 11), "Pont du 11 novembre"),
    ],
});

impl CalendarRules {
    pub fn seeded() -> Self {
        SEED_RULES.clone()
    }

    /// Parses a rules document and rejects holidays whose end precedes their start.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: CalendarRules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| ForecastError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_json_str(&json)?;
        info!(
            "Loaded {} school holidays and {} bridge days from {}",
            rules.school_holidays.len(),
            rules.bridge_days.len(),
            path.display()
        );
        Ok(rules)
    }

    fn validate(&self) -> Result<()> {
        match self
            .school_holidays
            .iter()
            .find(|h| h.end_date < h.start_date)
        {
            Some(h) => Err(ForecastError::InvalidInterval {
                label: h.label.clone(),
                start: h.start_date,
                end: h.end_date,
            }),
            None => Ok(()),
        }
    }

    pub fn overlaps_school_holiday(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.school_holidays.iter().any(|h| h.overlaps(start, end))
    }

    pub fn contains_bridge_day(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.bridge_days.iter().any(|b| b.falls_within(start, end))
    }
}

// --- Week Helpers ---
// Weeks run Sunday through Saturday.

// Fails rather than overflowing chrono's representable range
pub fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(ForecastError::DateOutOfRange { date, days })
}

pub fn start_of_week(date: NaiveDate) -> Result<NaiveDate> {
    shift_days(date, -(date.weekday().num_days_from_sunday() as i64))
}

pub fn end_of_week(week_start: NaiveDate) -> Result<NaiveDate> {
    shift_days(start_of_week(week_start)?, 6)
}

/// Sequence number of a week: days elapsed since January 1st of the same year,
/// divided by seven and rounded up. Not an ISO week number.
pub fn week_number(date: NaiveDate) -> u32 {
    (date.ordinal0() + 6) / 7
}

#[cfg(test)]
mod calendar_rules_tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn start_of_week_is_sunday() {
        // 2025-12-25 is a Thursday
        let start = start_of_week(d(2025, 12, 25)).unwrap();
        assert_eq!(start, d(2025, 12, 21));
        assert_eq!(start.weekday(), Weekday::Sun);
        assert_eq!(start_of_week(start).unwrap(), start);
    }

    #[test]
    fn end_of_week_is_following_saturday() {
        let end = end_of_week(d(2025, 12, 21)).unwrap();
        assert_eq!(end, d(2025, 12, 27));
        assert_eq!(end.weekday(), Weekday::Sat);
    }

    #[test]
    fn shifting_past_calendar_range_fails() {
        assert_eq!(shift_days(d(2025, 12, 21), 7).unwrap(), d(2025, 12, 28));
        match shift_days(NaiveDate::MAX, 1) {
            Err(ForecastError::DateOutOfRange { date, days }) => {
                assert_eq!(date, NaiveDate::MAX);
                assert_eq!(days, 1);
            }
            other => panic!("Expected DateOutOfRange, got {:?}", other),
        }
        assert!(shift_days(NaiveDate::MIN, -1).is_err());
    }

    #[test]
    fn week_number_rounds_elapsed_weeks_up() {
        assert_eq!(week_number(d(2025, 1, 1)), 0);
        assert_eq!(week_number(d(2025, 1, 2)), 1);
        assert_eq!(week_number(d(2025, 1, 8)), 1);
        assert_eq!(week_number(d(2025, 1, 9)), 2);
        // 354 days after Jan 1st
        assert_eq!(week_number(d(2025, 12, 21)), 51);
    }

    #[test]
    fn consecutive_sundays_get_distinct_numbers() {
        let mut sunday = d(2025, 1, 5);
        let mut previous = week_number(sunday);
        for _ in 0..50 {
            sunday += Duration::days(7);
            let current = week_number(sunday);
            assert_eq!(current, previous + 1);
            previous = current;
        }
    }

    #[test]
    fn holiday_overlap_is_inclusive() {
        let holiday = SchoolHoliday::new(d(2025, 4, 12), d(2025, 4, 28), "Printemps");
        assert!(holiday.overlaps(d(2025, 4, 27), d(2025, 5, 3)));
        assert!(holiday.overlaps(d(2025, 4, 28), d(2025, 5, 3)));
        assert!(holiday.overlaps(d(2025, 4, 6), d(2025, 4, 12)));
        assert!(!holiday.overlaps(d(2025, 4, 29), d(2025, 5, 5)));
        assert!(!holiday.overlaps(d(2025, 4, 5), d(2025, 4, 11)));
    }

    #[test]
    fn bridge_day_within_week() {
        let rules = CalendarRules::seeded();
        assert!(rules.contains_bridge_day(d(2025, 5, 25), d(2025, 5, 31)));
        assert!(!rules.contains_bridge_day(d(2025, 6, 1), d(2025, 6, 7)));
    }

    #[test]
    fn seeded_tables_match_reference_calendar() {
        let rules = CalendarRules::seeded();
        assert_eq!(rules.school_holidays.len(), 5);
        assert_eq!(rules.bridge_days.len(), 4);
        assert_eq!(rules.school_holidays[4].label, "Vacances de Noël");
        assert_eq!(rules.school_holidays[4].end_date, d(2026, 1, 5));
    }

    #[test]
    fn parses_rules_document() {
        let json = r#"{
            "schoolHolidays": [
                { "startDate": "2026-02-07", "endDate": "2026-02-23", "label": "Hiver" }
            ],
            "bridgeDays": [
                { "date": "2026-05-15", "label": "Ascension" }
            ]
        }"#;
        let rules = CalendarRules::from_json_str(json).unwrap();
        assert_eq!(rules.school_holidays[0].start_date, d(2026, 2, 7));
        assert_eq!(rules.bridge_days[0].label, "Ascension");
    }

    #[test]
    fn missing_tables_default_to_empty() {
        let rules = CalendarRules::from_json_str(r#"{ "bridgeDays": [] }"#).unwrap();
        assert!(rules.school_holidays.is_empty());
        assert!(rules.bridge_days.is_empty());
    }

    #[test]
    fn rejects_inverted_interval() {
        let json = r#"{
            "schoolHolidays": [
                { "startDate": "2026-02-23", "endDate": "2026-02-07", "label": "Hiver" }
            ]
        }"#;
        match CalendarRules::from_json_str(json) {
            Err(ForecastError::InvalidInterval { label, start, end }) => {
                assert_eq!(label, "Hiver");
                assert_eq!(start, d(2026, 2, 23));
                assert_eq!(end, d(2026, 2, 7));
            }
            other => panic!("Expected InvalidInterval, got {:?}", other),
        }
    }

    #[test]
    fn loads_bundled_rules_file() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/calendar_rules_2026.json"));
        let rules = CalendarRules::from_json_file(path).unwrap();
        assert_eq!(rules.school_holidays.len(), 5);
        assert_eq!(rules.bridge_days.len(), 2);
        assert!(rules.overlaps_school_holiday(d(2026, 12, 27), d(2027, 1, 2)));
    }

    #[test]
    fn rejects_malformed_json() {
        let result = CalendarRules::from_json_str("{ not json");
        assert!(matches!(result, Err(ForecastError::SerdeJson(_))));
    }
}
