// HTTP request handlers
use crate::application::prediction_service::Resolved;
use crate::domain::alert::Alert;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::prediction::{HealthScores, MaintenanceSchedule, Predictions, SystemStatus};
use crate::domain::reading::RawReading;
use crate::domain::telemetry::{HistoryPoint, Kpi, Metric};
use crate::domain::turbine::{Turbine, TurbineId};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SelectTurbine {
    pub turbine: TurbineId,
}

#[derive(Serialize)]
pub struct AnimationState {
    pub running: bool,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/turbines", get(list_turbines))
        .route("/api/turbine", put(select_turbine))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/kpis", get(get_kpis))
        .route("/api/history/:metric", get(get_history))
        .route("/api/readings", post(ingest_reading))
        .route("/api/alerts", get(list_alerts).post(push_alert))
        .route("/api/alerts/:id", delete(dismiss_alert))
        .route("/api/animation/toggle", post(toggle_animation))
        .route("/api/predictions", get(get_predictions))
        .route("/api/health-scores", get(get_health_scores))
        .route("/api/maintenance-schedule", get(get_maintenance_schedule))
        .route("/api/system-status", get(get_system_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_turbines(State(state): State<Arc<AppState>>) -> Json<Vec<Turbine>> {
    Json(state.turbine_service.list_turbines())
}

pub async fn select_turbine(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectTurbine>,
) -> impl IntoResponse {
    state.turbine_service.select(body.turbine.clone()).await;
    Json(json!({ "selected": body.turbine }))
}

/// Full store snapshot, taken under one read lock
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.store.read().await.snapshot())
}

pub async fn get_kpis(State(state): State<Arc<AppState>>) -> Json<Vec<Kpi>> {
    Json(state.store.read().await.kpis().to_vec())
}

pub async fn get_history(
    Path(metric): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryPoint>>, StatusCode> {
    let metric = Metric::from_slug(&metric)
        .filter(|m| m.is_tracked())
        .ok_or(StatusCode::NOT_FOUND)?;

    let store = state.store.read().await;
    let series = store.history(metric).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(series.to_vec()))
}

/// Accept a reading from an external feed
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawReading>,
) -> impl IntoResponse {
    match state.store.write().await.ingest(raw) {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))),
        Err(e) => {
            tracing::warn!("Rejected posted reading: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "accepted": false, "error": e.to_string() })),
            )
        }
    }
}

pub async fn list_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.store.read().await.alerts().cloned().collect())
}

pub async fn push_alert(
    State(state): State<Arc<AppState>>,
    Json(alert): Json<Alert>,
) -> StatusCode {
    state.store.write().await.push_alert(alert);
    StatusCode::CREATED
}

/// Dismissing an unknown id is not an error
pub async fn dismiss_alert(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    if !state.store.write().await.dismiss_alert(&id) {
        tracing::debug!("Dismiss for unknown alert {}", id);
    }
    StatusCode::NO_CONTENT
}

pub async fn toggle_animation(State(state): State<Arc<AppState>>) -> Json<AnimationState> {
    let running = state.store.write().await.toggle_animation_running();
    Json(AnimationState { running })
}

pub async fn get_predictions(State(state): State<Arc<AppState>>) -> Json<Resolved<Predictions>> {
    Json(state.prediction_service.predictions().await)
}

pub async fn get_health_scores(State(state): State<Arc<AppState>>) -> Json<Resolved<HealthScores>> {
    Json(state.prediction_service.health_scores().await)
}

pub async fn get_maintenance_schedule(
    State(state): State<Arc<AppState>>,
) -> Json<Resolved<MaintenanceSchedule>> {
    Json(state.prediction_service.maintenance_schedule().await)
}

pub async fn get_system_status(State(state): State<Arc<AppState>>) -> Json<Resolved<SystemStatus>> {
    Json(state.prediction_service.system_status().await)
}
