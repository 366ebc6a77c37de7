use crate::infra::{AppState, Monitor, ScrapeResponse};
use admission_monitor::analysis::{
    diff_snapshots, find_applicant, snapshot_statistics, ApplicantSearch, DiffReport,
    StatisticsReport,
};
use admission_monitor::error::AppError;
use admission_monitor::registry::DirectionRegistry;
use admission_monitor::snapshot::Snapshot;
use admission_monitor::store::SessionInfo;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct SessionsResponse {
    pub(crate) sessions: Vec<SessionInfo>,
    pub(crate) total: usize,
}

pub(crate) fn with_monitor_routes(monitor: Arc<Monitor>) -> Router {
    Router::new()
        .route("/", get(root_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/config", get(config_endpoint))
        .route("/api/scrape", post(scrape_endpoint))
        .route("/api/sessions", get(sessions_endpoint))
        .route("/api/sessions/:timestamp", get(session_endpoint))
        .route("/api/latest", get(latest_endpoint))
        .route(
            "/api/compare/:timestamp1/:timestamp2",
            get(compare_endpoint),
        )
        .route("/api/applicant/:code", get(applicant_endpoint))
        .route("/api/statistics", get(statistics_endpoint))
        .layer(Extension(monitor))
}

pub(crate) async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Admission Monitor API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn config_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
) -> Result<Json<DirectionRegistry>, AppError> {
    Ok(Json(monitor.registry()?))
}

pub(crate) async fn scrape_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
) -> Result<Json<ScrapeResponse>, AppError> {
    // The blocking HTTP client must be created and dropped outside the async workers.
    let response = tokio::task::spawn_blocking(move || monitor.scrape())
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))??;
    Ok(Json(response))
}

pub(crate) async fn sessions_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
) -> Result<Json<SessionsResponse>, AppError> {
    let sessions = monitor.sessions()?;
    Ok(Json(SessionsResponse {
        total: sessions.len(),
        sessions,
    }))
}

pub(crate) async fn session_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
    Path(timestamp): Path<String>,
) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(monitor.session(&timestamp)?))
}

pub(crate) async fn latest_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(monitor.latest()?))
}

pub(crate) async fn compare_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
    Path((timestamp1, timestamp2)): Path<(String, String)>,
) -> Result<Json<DiffReport>, AppError> {
    let older = monitor.session(&timestamp1)?;
    let newer = monitor.session(&timestamp2)?;
    Ok(Json(diff_snapshots(&older, &newer, timestamp1, timestamp2)))
}

pub(crate) async fn applicant_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
    Path(code): Path<String>,
) -> Result<Json<ApplicantSearch>, AppError> {
    let latest = monitor.latest()?;
    let search = find_applicant(&latest, &code);
    if search.is_empty() {
        return Err(AppError::not_found(format!("applicant {code}")));
    }
    Ok(Json(search))
}

pub(crate) async fn statistics_endpoint(
    Extension(monitor): Extension<Arc<Monitor>>,
) -> Result<Json<StatisticsReport>, AppError> {
    Ok(Json(snapshot_statistics(&monitor.latest()?)))
}
