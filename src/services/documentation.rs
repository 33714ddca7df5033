use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Escape Rooms Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::identity::index,
        crate::routes::identity::register,
        crate::routes::identity::unregister,
        crate::routes::rooms::get_room,
        crate::routes::rooms::open_lockbox,
        crate::routes::rooms::open_rgb_gate,
        crate::routes::rooms::get_answer,
        crate::routes::room4::play,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::identity::IndexView,
            crate::dto::rooms::RoomView,
            crate::dto::rooms::AnswerView,
            crate::dto::room4::Room4View,
            crate::dto::room4::MessageColor,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "identity", description = "Team registration through cookies"),
        (name = "rooms", description = "Room views, lockboxes and RGB gates"),
        (name = "room4", description = "Room 4 coordinate puzzle"),
    )
)]
pub struct ApiDoc;
