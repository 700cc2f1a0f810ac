use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{health::HealthResponse, public::StatusResponse},
    services::{health_service, public_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Process status and aggregate counters", body = StatusResponse))
)]
/// Report process health alongside connection, vote and comment counters.
pub async fn status(State(state): State<SharedState>) -> Json<StatusResponse> {
    Json(public_service::get_status(&state).await)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
/// Plain liveness check.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(health_service::health_status(&state))
}

/// Configure the health routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/", get(status))
        .route("/health", get(healthcheck))
}
