use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::room4::{Room4Query, Room4View},
    routes::extract::Team,
    services::room4_service,
    state::SharedState,
};

/// Route driving the Room 4 puzzle.
pub fn router() -> Router<SharedState> {
    Router::new().route("/room4/puzzle", get(play))
}

#[utoipa::path(
    get,
    path = "/room4/puzzle",
    tag = "room4",
    params(Room4Query),
    responses(
        (status = 200, description = "What the puzzle page should display", body = Room4View),
        (status = 303, description = "Caller is not registered")
    )
)]
/// Start a run, submit a coordinate, or just poll the current code.
pub async fn play(
    State(state): State<SharedState>,
    Team(identity): Team,
    Query(query): Query<Room4Query>,
) -> Json<Room4View> {
    Json(room4_service::play(&state, &identity, query).await)
}
