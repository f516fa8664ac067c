// src/patterns.rs
use serde::{Deserialize, Serialize};

use crate::calendar_rules::CalendarRules;
use crate::historical::{CauseCategory, HistoricalStore};

const SCHOOL_HOLIDAY_PROBABILITY: f64 = 0.75;
const BRIDGE_DAY_PROBABILITY: f64 = 0.65;
const SUMMER_PEAK_PROBABILITY: f64 = 0.85;
const SUMMER_PEAK_PERIOD: &str = "Période estivale (Juillet-Août)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsencePattern {
    pub period: String,
    pub probability: f64,
    pub historical_count: u32,
    pub category: CauseCategory,
}

/// Builds one pattern per school holiday, one per bridge day, and a single
/// summer peak pattern, in that order.
pub fn analyze_patterns(history: &HistoricalStore, rules: &CalendarRules) -> Vec<AbsencePattern> {
    let holiday_total = history.total_for(CauseCategory::SchoolHoliday);
    let bridge_total = history.total_for(CauseCategory::BridgeDay);

    let holidays = rules.school_holidays.iter().map(|h| AbsencePattern {
        period: h.label.clone(),
        probability: SCHOOL_HOLIDAY_PROBABILITY,
        historical_count: holiday_total,
        category: CauseCategory::SchoolHoliday,
    });
    let bridges = rules.bridge_days.iter().map(|b| AbsencePattern {
        period: b.label.clone(),
        probability: BRIDGE_DAY_PROBABILITY,
        historical_count: bridge_total,
        category: CauseCategory::BridgeDay,
    });
    let summer = AbsencePattern {
        period: SUMMER_PEAK_PERIOD.to_string(),
        probability: SUMMER_PEAK_PROBABILITY,
        historical_count: history.total_for(CauseCategory::SummerPeak),
        category: CauseCategory::SummerPeak,
    };

    holidays.chain(bridges).chain(std::iter::once(summer)).collect()
}

#[cfg(test)]
mod patterns_tests {
    use super::*;
    use crate::calendar_rules::BridgeDay;
    use crate::historical::HistoricalAbsenceRecord;
    use chrono::NaiveDate;

    #[test]
    fn seeded_patterns_cover_every_rule_plus_summer() {
        let rules = CalendarRules::seeded();
        let patterns = analyze_patterns(&HistoricalStore::seeded(), &rules);
        assert_eq!(
            patterns.len(),
            rules.school_holidays.len() + rules.bridge_days.len() + 1
        );

        assert_eq!(patterns[0].period, "Vacances d'hiver");
        assert_eq!(patterns[0].probability, 0.75);
        assert_eq!(patterns[0].historical_count, 8);
        assert_eq!(patterns[0].category, CauseCategory::SchoolHoliday);

        assert_eq!(patterns[5].period, "Pont du 1er mai");
        assert_eq!(patterns[5].probability, 0.65);
        assert_eq!(patterns[5].historical_count, 13);
        assert_eq!(patterns[5].category, CauseCategory::BridgeDay);

        let summer = patterns.last().unwrap();
        assert_eq!(summer.period, "Période estivale (Juillet-Août)");
        assert_eq!(summer.probability, 0.85);
        assert_eq!(summer.historical_count, 45);
        assert_eq!(summer.category, CauseCategory::SummerPeak);
    }

    #[test]
    fn empty_history_yields_zero_counts() {
        let patterns = analyze_patterns(&HistoricalStore::default(), &CalendarRules::seeded());
        assert_eq!(patterns.len(), 10);
        assert!(patterns.iter().all(|p| p.historical_count == 0));
    }

    #[test]
    fn empty_rules_yield_only_summer_peak() {
        let patterns = analyze_patterns(&HistoricalStore::seeded(), &CalendarRules::default());
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].category, CauseCategory::SummerPeak);
    }

    #[test]
    fn count_depends_only_on_history_and_rules() {
        let history = HistoricalStore::new(vec![HistoricalAbsenceRecord::new(
            NaiveDate::from_ymd_opt(2023, 5, 19).unwrap(),
            4,
            CauseCategory::BridgeDay,
        )]);
        let rules = CalendarRules {
            school_holidays: vec![],
            bridge_days: vec![
                BridgeDay::new(NaiveDate::from_ymd_opt(2026, 5, 15).unwrap(), "Ascension"),
                BridgeDay::new(NaiveDate::from_ymd_opt(2026, 11, 10).unwrap(), "Armistice"),
            ],
        };
        let first = analyze_patterns(&history, &rules);
        let second = analyze_patterns(&history, &rules);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].historical_count, 4);
        assert_eq!(first[1].historical_count, 4);
        assert_eq!(first[2].historical_count, 0);
    }
}
