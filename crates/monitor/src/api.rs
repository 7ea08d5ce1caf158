//! HTTP API for session control, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use monitor_lib::{MonitorController, SessionPhase};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<MonitorController>,
}

impl AppState {
    pub fn new(controller: Arc<MonitorController>) -> Self {
        Self { controller }
    }
}

/// Response body for session control endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub phase: SessionPhase,
    pub message: String,
}

async fn start_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let already_active = state.controller.phase() != SessionPhase::Idle;
    state.controller.start();

    let message = if already_active {
        "session already active".to_string()
    } else {
        "session starting".to_string()
    };
    Json(SessionResponse {
        phase: state.controller.phase(),
        message,
    })
}

async fn stop_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let was_idle = state.controller.phase() == SessionPhase::Idle;
    state.controller.stop().await;

    let message = if was_idle {
        "no active session".to_string()
    } else {
        "session stopped".to_string()
    };
    Json(SessionResponse {
        phase: state.controller.phase(),
        message,
    })
}

async fn reset_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.controller.reset();
    Json(SessionResponse {
        phase: state.controller.phase(),
        message: "session state cleared".to_string(),
    })
}

async fn snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.snapshot())
}

async fn export(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let csv = state.controller.export();
    (
        StatusCode::OK,
        [("content-type", "text/csv; charset=utf-8")],
        csv,
    )
}

/// Health response: the process is healthy as long as it answers;
/// the phase tells probes whether a session is live
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.controller.snapshot();
    Json(serde_json::json!({
        "status": "healthy",
        "phase": snapshot.phase,
        "ticks": snapshot.ticks,
        "skipped_ticks": snapshot.skipped_ticks,
    }))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session/start", post(start_session))
        .route("/session/stop", post(stop_session))
        .route("/session/reset", post(reset_session))
        .route("/session/snapshot", get(snapshot))
        .route("/session/export", get(export))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
