// src/config.rs
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use crate::alerts::{check_horizon, AlertOrdering, AlertSettings, DEFAULT_HORIZON_WEEKS, DEFAULT_TOTAL_STAFF};
use crate::calendar_rules::CalendarRules;
use crate::engine::{EngineSettings, ForecastEngine};
use crate::error::Result;
use crate::historical::HistoricalStore;

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_total_staff() -> u32 {
    DEFAULT_TOTAL_STAFF
}

fn default_horizon_weeks() -> u32 {
    DEFAULT_HORIZON_WEEKS
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    // Server Configuration
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    // Forecast Settings
    #[serde(default = "default_total_staff")]
    pub total_staff: u32,
    #[serde(default = "default_horizon_weeks")]
    pub horizon_weeks: u32,
    #[serde(default)]
    pub alert_ordering: AlertOrdering,

    // Optional data files replacing the built-in tables
    pub calendar_rules_path: Option<PathBuf>,
    pub historical_data_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        envy::from_env::<Config>()?.validated()
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)?.validated()
    }

    // HORIZON_WEEKS is bounded like the HTTP `weeks` parameter
    fn validated(self) -> Result<Self> {
        check_horizon(self.horizon_weeks)?;
        Ok(self)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            horizon_weeks: self.horizon_weeks,
            alerts: AlertSettings {
                total_staff: self.total_staff,
                ordering: self.alert_ordering,
            },
        }
    }

    /// Builds the engine, reading the data files when paths are configured and
    /// falling back to the built-in tables otherwise.
    pub fn build_engine(&self) -> Result<ForecastEngine> {
        let rules = match &self.calendar_rules_path {
            Some(path) => CalendarRules::from_json_file(path)?,
            None => {
                info!("No CALENDAR_RULES_PATH set, using built-in calendar rules");
                CalendarRules::seeded()
            }
        };
        let history = match &self.historical_data_path {
            Some(path) => HistoricalStore::from_csv_file(path)?,
            None => {
                info!("No HISTORICAL_DATA_PATH set, using built-in absence history");
                HistoricalStore::seeded()
            }
        };

        Ok(ForecastEngine::new(history, rules, self.engine_settings()))
    }
}
