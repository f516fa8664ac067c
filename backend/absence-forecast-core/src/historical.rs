// src/historical.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ForecastError, Result};

// --- Historical Absence Records ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseCategory {
    SchoolHoliday,
    BridgeDay,
    SummerPeak,
    EndYear,
    Seasonal,
}

impl CauseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CauseCategory::SchoolHoliday => "school_holiday",
            CauseCategory::BridgeDay => "bridge_day",
            CauseCategory::SummerPeak => "summer_peak",
            CauseCategory::EndYear => "end_year",
            CauseCategory::Seasonal => "seasonal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalAbsenceRecord {
    pub date: NaiveDate,
    #[serde(alias = "absences")]
    pub absence_count: u32,
    #[serde(alias = "reason")]
    pub cause_category: CauseCategory,
}

impl HistoricalAbsenceRecord {
    pub fn new(date: NaiveDate, absence_count: u32, cause_category: CauseCategory) -> Self {
        Self {
            date,
            absence_count,
            cause_category,
        }
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("seed dates are valid calendar dates")
}

static SEED_RECORDS: Lazy<Vec<HistoricalAbsenceRecord>> = Lazy::new(|| {
    use CauseCategory::*;
    vec![
        HistoricalAbsenceRecord::new(d(2024, 7, 15), 12, SummerPeak),
        HistoricalAbsenceRecord::new(d(2024, 7, 22), 15, SummerPeak),
        HistoricalAbsenceRecord::new(d(2024, 8, 15), 18, SummerPeak),
        HistoricalAbsenceRecord::new(d(2024, 10, 28), 8, SchoolHoliday),
        HistoricalAbsenceRecord::new(d(2024, 12, 23), 20, EndYear),
        HistoricalAbsenceRecord::new(d(2024, 12, 30), 22, EndYear),
        HistoricalAbsenceRecord::new(d(2024, 11, 1), 6, BridgeDay),
        HistoricalAbsenceRecord::new(d(2024, 5, 8), 7, BridgeDay),
    ]
});

/// Read-only store of past absence events. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalStore {
    records: Vec<HistoricalAbsenceRecord>,
}

impl HistoricalStore {
    pub fn new(records: Vec<HistoricalAbsenceRecord>) -> Self {
        Self { records }
    }

    pub fn seeded() -> Self {
        Self::new(SEED_RECORDS.clone())
    }

    /// Loads records from a CSV file with the header `date,absence_count,cause_category`.
    pub fn from_csv_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ForecastError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_csv_reader(file)?;
        info!(
            "Loaded {} historical absence records from {}",
            store.records.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = csv_reader
            .deserialize::<HistoricalAbsenceRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[HistoricalAbsenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Sum of absence counts tagged with the given cause
    pub fn total_for(&self, category: CauseCategory) -> u32 {
        let total: u32 = self
            .records
            .iter()
            .filter(|r| r.cause_category == category)
            .map(|r| r.absence_count)
            .sum();
        debug!("{} past absences recorded as {}", total, category.as_str());
        total
    }
}

#[cfg(test)]
mod historical_tests {
    use super::*;

    #[test]
    fn seeded_totals_per_category() {
        let store = HistoricalStore::seeded();
        assert_eq!(store.len(), 8);
        assert_eq!(store.total_for(CauseCategory::SummerPeak), 45);
        assert_eq!(store.total_for(CauseCategory::SchoolHoliday), 8);
        assert_eq!(store.total_for(CauseCategory::BridgeDay), 13);
        assert_eq!(store.total_for(CauseCategory::EndYear), 42);
        assert_eq!(store.total_for(CauseCategory::Seasonal), 0);
    }

    #[test]
    fn category_names_match_serialized_form() {
        for category in [
            CauseCategory::SchoolHoliday,
            CauseCategory::BridgeDay,
            CauseCategory::SummerPeak,
            CauseCategory::EndYear,
            CauseCategory::Seasonal,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn empty_store_totals_are_zero() {
        let store = HistoricalStore::default();
        assert!(store.is_empty());
        assert_eq!(store.total_for(CauseCategory::SchoolHoliday), 0);
    }

    #[test]
    fn loads_records_from_csv() {
        let data = "date,absence_count,cause_category\n\
                    2023-07-10, 9, summer_peak\n\
                    2023-11-10,4,bridge_day\n";
        let store = HistoricalStore::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.records()[0],
            HistoricalAbsenceRecord::new(d(2023, 7, 10), 9, CauseCategory::SummerPeak)
        );
        assert_eq!(store.total_for(CauseCategory::BridgeDay), 4);
    }

    #[test]
    fn bundled_csv_matches_seed() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/history.csv"));
        let store = HistoricalStore::from_csv_file(path).unwrap();
        assert_eq!(store, HistoricalStore::seeded());
    }

    #[test]
    fn rejects_unknown_cause_category() {
        let data = "date,absence_count,cause_category\n2023-07-10,9,heatwave\n";
        let result = HistoricalStore::from_csv_reader(data.as_bytes());
        assert!(matches!(result, Err(ForecastError::Csv(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/history.csv");
        match HistoricalStore::from_csv_file(path) {
            Err(ForecastError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
