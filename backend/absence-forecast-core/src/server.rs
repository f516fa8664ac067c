// src/server.rs
use axum::http::StatusCode;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::alerts::{check_horizon, AlertSummary, PredictiveAlert};
use crate::clock::Clock;
use crate::engine::ForecastEngine;
use crate::error::ForecastError;
use crate::patterns::AbsencePattern;
use crate::redistribution::TeamRedistribution;
use crate::risk_assessment::WeekRiskAssessment;

// --- Error Handling ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Requested horizon of {requested} weeks exceeds the maximum of {max}")]
    InvalidHorizon { requested: u32, max: u32 },
    #[error("No alert with id '{0}' for the requested reference date")]
    AlertNotFound(String),
    #[error("Reference date {0} is too close to the end of the supported calendar")]
    InvalidReference(NaiveDate),
    #[error("Forecast error: {0}")]
    Forecast(ForecastError),
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::HorizonTooLong { requested, max } => AppError::InvalidHorizon { requested, max },
            ForecastError::DateOutOfRange { date, .. } => AppError::InvalidReference(date),
            other => AppError::Forecast(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Error occurred: {}", self);

        let status_code = match self {
            AppError::InvalidHorizon { .. } | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::AlertNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forecast(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status_code,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

// --- Shared Application State ---

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ForecastEngine>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(engine: ForecastEngine, clock: impl Clock + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
            clock: Arc::new(clock),
        }
    }

    fn reference_or_today(&self, reference: Option<NaiveDate>) -> NaiveDate {
        reference.unwrap_or_else(|| self.clock.today())
    }
}

// --- Query Parameters ---

#[derive(Deserialize, Debug, Default)]
pub struct AlertsQuery {
    weeks: Option<u32>,
    reference: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ReferenceQuery {
    reference: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AssessmentQuery {
    start: Option<NaiveDate>,
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/patterns", get(handle_patterns))
        .route("/alerts", get(handle_alerts))
        .route("/alerts/summary", get(handle_alert_summary))
        .route("/alerts/{id}/redistributions", post(handle_redistributions))
        .route("/weeks/assessment", get(handle_week_assessment));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- Web Handlers ---

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_patterns(State(state): State<AppState>) -> Json<Vec<AbsencePattern>> {
    info!("Handling /api/patterns request...");
    Json(state.engine.analyze_patterns())
}

fn alerts_for_query(state: &AppState, query: AlertsQuery) -> Result<Vec<PredictiveAlert>, AppError> {
    let weeks = query
        .weeks
        .unwrap_or(state.engine.settings().horizon_weeks);
    check_horizon(weeks)?;
    let reference = state.reference_or_today(query.reference);
    Ok(state.engine.generate_alerts_for(reference, weeks)?)
}

async fn handle_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Vec<PredictiveAlert>>, AppError> {
    info!("Handling /api/alerts request: {:?}", query);
    Ok(Json(alerts_for_query(&state, query)?))
}

async fn handle_alert_summary(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<AlertSummary>, AppError> {
    info!("Handling /api/alerts/summary request: {:?}", query);
    let alerts = alerts_for_query(&state, query)?;
    Ok(Json(state.engine.summarize(&alerts)))
}

async fn handle_redistributions(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
    Query(query): Query<ReferenceQuery>,
) -> Result<Json<Vec<TeamRedistribution>>, AppError> {
    info!("Handling redistribution request for {}", alert_id);
    let reference = state.reference_or_today(query.reference);
    let alert = state
        .engine
        .find_alert(reference, &alert_id)?
        .ok_or_else(|| AppError::AlertNotFound(alert_id.clone()))?;
    Ok(Json(state.engine.generate_redistributions(&alert)))
}

async fn handle_week_assessment(
    State(state): State<AppState>,
    Query(query): Query<AssessmentQuery>,
) -> Result<Json<WeekRiskAssessment>, AppError> {
    let date = state.reference_or_today(query.start);
    info!("Handling /api/weeks/assessment request for {}", date);
    Ok(Json(state.engine.assess_week_containing(date)?))
}
