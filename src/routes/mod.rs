use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

pub mod extract;
pub mod health;
pub mod identity;
pub mod room4;
pub mod rooms;

/// Swagger UI path; the raw document is served next to it.
const DOCS_PATH: &str = "/docs";
const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Compose the game routes and the Swagger UI, wiring in shared state.
pub fn router(state: SharedState) -> Router<()> {
    let swagger: Router<SharedState> = SwaggerUi::new(DOCS_PATH)
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into();

    health::router()
        .merge(identity::router())
        .merge(rooms::router())
        .merge(room4::router())
        .merge(swagger)
        .with_state(state)
}
