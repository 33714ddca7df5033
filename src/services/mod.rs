/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Room 4 puzzle requests.
pub mod room4_service;
/// Room views, lockboxes and RGB gates.
pub mod rooms_service;
