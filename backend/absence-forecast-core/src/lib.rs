// src/lib.rs
pub mod alerts;
pub mod calendar_rules;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod historical;
pub mod patterns;
pub mod redistribution;
pub mod report;
pub mod risk_assessment;
pub mod server;


pub use alerts::{AlertOrdering, AlertSettings, AlertSummary, PredictiveAlert};
pub use calendar_rules::{BridgeDay, CalendarRules, SchoolHoliday};
pub use config::Config;
pub use engine::{EngineSettings, ForecastEngine};
pub use error::ForecastError;
pub use historical::{CauseCategory, HistoricalAbsenceRecord, HistoricalStore};
pub use patterns::AbsencePattern;
pub use redistribution::{Impact, TeamRedistribution};
pub use risk_assessment::{RiskFactor, RiskLevel, WeekRiskAssessment};
