use axum::{
    Json, Router,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::get,
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{
        identity::{IndexView, RegisterQuery},
        rooms::Navigation,
    },
    error::AppError,
    state::{
        SharedState,
        identity::{NAME_COOKIE, Registration, TEAM_COOKIE},
    },
};

/// Registration endpoints and the landing page.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register))
        .route("/unregister", get(unregister))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "identity",
    responses((status = 200, description = "Landing page data", body = IndexView))
)]
/// Report whether the caller is registered and which rooms exist.
pub async fn index(State(state): State<SharedState>, registration: Registration) -> Json<IndexView> {
    let rooms = state.rooms().room_numbers().collect();
    Json(IndexView::new(&registration, rooms))
}

#[utoipa::path(
    get,
    path = "/register",
    tag = "identity",
    params(RegisterQuery),
    responses(
        (status = 303, description = "Identity cookies set, redirect to the landing page"),
        (status = 400, description = "Invalid name or team")
    )
)]
/// Store the player's name and team in cookies.
pub async fn register(Query(query): Query<RegisterQuery>) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    info!(team = query.team, name = %query.name, "player registered");

    let cookies = AppendHeaders([
        (SET_COOKIE, format!("{NAME_COOKIE}={}; Path=/", query.name)),
        (SET_COOKIE, format!("{TEAM_COOKIE}={}; Path=/", query.team)),
    ]);
    Ok((cookies, Redirect::to(&Navigation::Register.location())))
}

#[utoipa::path(
    get,
    path = "/unregister",
    tag = "identity",
    responses((status = 303, description = "Identity cookies cleared"))
)]
/// Forget the caller's identity.
pub async fn unregister() -> impl IntoResponse {
    let cookies = AppendHeaders([
        (SET_COOKIE, format!("{NAME_COOKIE}=; Path=/; Max-Age=0")),
        (SET_COOKIE, format!("{TEAM_COOKIE}=; Path=/; Max-Age=0")),
    ]);
    (cookies, Redirect::to(&Navigation::Register.location()))
}
