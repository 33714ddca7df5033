use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
};

use crate::{
    dto::rooms::{AnswerView, LockboxQuery, RgbQuery, RoomQuery, RoomView},
    error::AppError,
    routes::extract::Team,
    services::rooms_service,
    state::SharedState,
};

/// Room views, lockboxes and RGB gates. Every route requires a registered team.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms/{room}", get(get_room))
        .route("/rooms/{room}/lockbox", get(open_lockbox))
        .route("/rooms/{room}/rgb", get(open_rgb_gate))
        .route("/rooms/{room}/answer", get(get_answer))
}

#[utoipa::path(
    get,
    path = "/rooms/{room}",
    tag = "rooms",
    params(("room" = u32, Path, description = "Room number"), RoomQuery),
    responses(
        (status = 200, description = "Room state for the calling team", body = RoomView),
        (status = 303, description = "Caller is not registered"),
        (status = 404, description = "Unknown room")
    )
)]
/// Describe a room for the calling team.
pub async fn get_room(
    State(state): State<SharedState>,
    Team(identity): Team,
    Path(room): Path<u32>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<RoomView>, AppError> {
    let view = rooms_service::room_view(&state, &identity, room, query).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/rooms/{room}/lockbox",
    tag = "rooms",
    params(("room" = u32, Path, description = "Room number"), LockboxQuery),
    responses(
        (status = 303, description = "Redirect to the answer on success, back to the room otherwise"),
        (status = 404, description = "Unknown room or room without lockbox")
    )
)]
/// Submit a lockbox key.
pub async fn open_lockbox(
    State(state): State<SharedState>,
    Team(identity): Team,
    Path(room): Path<u32>,
    Query(query): Query<LockboxQuery>,
) -> Result<Redirect, AppError> {
    let navigation = rooms_service::open_lockbox(&state, &identity, room, &query.key).await?;
    Ok(Redirect::to(&navigation.location()))
}

#[utoipa::path(
    get,
    path = "/rooms/{room}/rgb",
    tag = "rooms",
    params(("room" = u32, Path, description = "Room number"), RgbQuery),
    responses(
        (status = 303, description = "Redirect back to the room, flagged on failure"),
        (status = 404, description = "Unknown room or room without RGB gate")
    )
)]
/// Submit an RGB key.
pub async fn open_rgb_gate(
    State(state): State<SharedState>,
    Team(identity): Team,
    Path(room): Path<u32>,
    Query(query): Query<RgbQuery>,
) -> Result<Redirect, AppError> {
    let navigation =
        rooms_service::open_rgb_gate(&state, &identity, room, &query.r, &query.g, &query.b)
            .await?;
    Ok(Redirect::to(&navigation.location()))
}

#[utoipa::path(
    get,
    path = "/rooms/{room}/answer",
    tag = "rooms",
    params(("room" = u32, Path, description = "Room number")),
    responses(
        (status = 200, description = "Revealed room content", body = AnswerView),
        (status = 404, description = "Unknown room or no content"),
        (status = 409, description = "Lockbox not opened yet")
    )
)]
/// Return the content revealed by a room's lockbox.
pub async fn get_answer(
    State(state): State<SharedState>,
    Team(identity): Team,
    Path(room): Path<u32>,
) -> Result<Json<AnswerView>, AppError> {
    let view = rooms_service::answer(&state, &identity, room).await?;
    Ok(Json(view))
}
