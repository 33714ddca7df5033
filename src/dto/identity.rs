use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{dto::validation::validate_player_name, state::identity::Registration};

/// Query accepted by `/register`.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct RegisterQuery {
    /// Display name of the player.
    #[validate(custom(function = "validate_player_name"))]
    pub name: String,
    /// Team the player belongs to.
    #[validate(range(min = 1, max = 9999))]
    pub team: u32,
}

/// Landing page data.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IndexView {
    /// Whether the caller carries both identity cookies.
    pub registered: bool,
    /// Registered display name.
    pub name: Option<String>,
    /// Registered team number.
    pub team: Option<u32>,
    /// Rooms available in this game.
    pub rooms: Vec<u32>,
}

impl IndexView {
    /// Project a registration and the room list.
    pub fn new(registration: &Registration, rooms: Vec<u32>) -> Self {
        let identity = registration.identity();
        Self {
            registered: identity.is_some(),
            name: identity.map(|identity| identity.name.clone()),
            team: identity.map(|identity| identity.team),
            rooms,
        }
    }
}
