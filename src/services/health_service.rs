use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let rooms = state.rooms().room_numbers().count();
    debug!(rooms, "health check");
    HealthResponse::ok(rooms)
}
