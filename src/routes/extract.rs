//! Extractors turning request cookies into a team identity.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
    response::Redirect,
};
use tracing::debug;

use crate::{
    dto::rooms::Navigation,
    state::identity::{Registration, TeamIdentity},
};

impl<S> FromRequestParts<S> for Registration
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");
        let header = (!header.is_empty()).then_some(header.as_str());
        Ok(Registration::from_cookie_header(header))
    }
}

/// Identity of a registered caller. Unregistered callers are redirected to the registration page.
#[derive(Debug, Clone)]
pub struct Team(pub TeamIdentity);

impl<S> FromRequestParts<S> for Team
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let registration = match Registration::from_request_parts(parts, state).await {
            Ok(registration) => registration,
            Err(never) => match never {},
        };
        match registration {
            Registration::Registered(identity) => Ok(Team(identity)),
            Registration::Unregistered => {
                debug!(path = %parts.uri.path(), "unregistered caller redirected");
                Err(Redirect::to(&Navigation::Register.location()))
            }
        }
    }
}
