//! HTTP endpoint for the voice platform.
//!
//! `POST /skill` takes a request envelope and returns the skill's response
//! envelope. `GET /api/health` reports uptime and store availability.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use besso_core::config::ServerConfig;
use besso_core::envelope::{RequestEnvelope, ResponseEnvelope};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::skill::Skill;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    skill: Arc<Skill>,
    uptime: Instant,
}

/// `GET /api/health`: uptime and document store status.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "store": state.skill.store().status(),
    }))
}

/// `POST /skill`: one voice-platform invocation.
async fn skill(
    State(state): State<ApiState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    Json(state.skill.dispatch(&envelope).await)
}

fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/skill", post(skill))
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, skill: Arc<Skill>) -> anyhow::Result<()> {
    let state = ApiState {
        skill,
        uptime: Instant::now(),
    };

    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;

    info!("skill endpoint listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
