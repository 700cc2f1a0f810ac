use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload; the process has no external dependencies to probe.
pub fn health_status(state: &SharedState) -> HealthResponse {
    debug!(connections = state.connections().len(), "health check");
    HealthResponse::ok()
}
