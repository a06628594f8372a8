// HTTP request handlers
use crate::application::error::MonitorError;
use crate::domain::filter::StatusFilter;
use crate::infrastructure::csv_input::read_rows;
use crate::presentation::app_state::AppState;
use crate::presentation::views::{
    analytics_panel, status_table, viewer_offset, AnalyticsPanel, ConsoleView, StatusTable,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/state", get(console_state))
        .route("/statuses", get(list_statuses))
        .route("/urls", post(submit_urls).delete(clear_urls))
        .route("/urls/csv", post(import_csv))
        .route("/draft", put(update_draft))
        .route("/filter", put(update_filter))
        .route("/selection", put(update_selection))
        .route("/refresh", post(refresh))
        .route("/analytics", get(analytics))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    Monitor(MonitorError),
    BadRequest(String),
}

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        ApiError::Monitor(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, retryable) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, false),
            ApiError::Monitor(err) => {
                let status = match &err {
                    MonitorError::SubmissionInProgress => StatusCode::CONFLICT,
                    MonitorError::UnknownUrl(_) => StatusCode::NOT_FOUND,
                    MonitorError::Transport(_)
                    | MonitorError::Backend { .. }
                    | MonitorError::Decode(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string(), err.is_retryable())
            }
        };
        (status, Json(json!({ "error": message, "retryable": retryable }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct ZoneQuery {
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub filter: Option<String>,
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub submitted: Vec<String>,
    pub acknowledged: usize,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct FilterRequest {
    pub mode: String,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub url: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn console_state(State(state): State<Arc<AppState>>) -> Json<ConsoleView> {
    Json(ConsoleView::from(state.monitor.state().await))
}

/// Status table, filtered by `filter` or the stored mode
pub async fn list_statuses(
    Query(query): Query<StatusQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusTable>, ApiError> {
    let mode = match query.filter {
        Some(raw) => Some(raw.parse::<StatusFilter>().map_err(ApiError::BadRequest)?),
        None => None,
    };
    let filter = match mode {
        Some(mode) => mode,
        None => state.monitor.filter().await,
    };
    let records = state.monitor.filtered_results(Some(filter)).await;
    let now = Utc::now();

    let table = match zone(query.tz_offset_minutes)? {
        Some(offset) => status_table(&records, filter, &offset, now),
        None => status_table(&records, filter, &Local, now),
    };
    Ok(Json(table))
}

/// Normalize, submit and refresh
pub async fn submit_urls(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let outcome = state.monitor.submit(request.text).await?;
    Ok(Json(SubmitResponse {
        submitted: outcome.submitted,
        acknowledged: outcome.acknowledged,
    }))
}

/// Load CSV cells into the draft for review
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ConsoleView>, ApiError> {
    let rows = read_rows(&body)
        .map_err(|e| ApiError::BadRequest(format!("could not read CSV input: {}", e)))?;
    state.monitor.import_rows(rows).await;
    Ok(Json(ConsoleView::from(state.monitor.state().await)))
}

pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DraftRequest>,
) -> StatusCode {
    state.monitor.set_draft(request.text).await;
    StatusCode::NO_CONTENT
}

pub async fn update_filter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FilterRequest>,
) -> Result<StatusCode, ApiError> {
    let mode = request
        .mode
        .parse::<StatusFilter>()
        .map_err(ApiError::BadRequest)?;
    state.monitor.set_filter(mode).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_selection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Result<StatusCode, ApiError> {
    state.monitor.select(&request.url).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<ConsoleView>, ApiError> {
    state.monitor.refresh().await?;
    Ok(Json(ConsoleView::from(state.monitor.state().await)))
}

/// Uptime and response-time chart for the selected URL
pub async fn analytics(
    Query(query): Query<ZoneQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalyticsPanel>, ApiError> {
    let snapshot = state.monitor.state().await;
    let panel = match zone(query.tz_offset_minutes)? {
        Some(offset) => analytics_panel(&snapshot, &offset),
        None => analytics_panel(&snapshot, &Local),
    };
    Ok(Json(panel))
}

pub async fn clear_urls(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.monitor.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

fn zone(offset_minutes: Option<i32>) -> Result<Option<chrono::FixedOffset>, ApiError> {
    match offset_minutes {
        Some(minutes) => viewer_offset(minutes)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid tz offset: {}", minutes))),
        None => Ok(None),
    }
}
