use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use super::{read_cookie, SessionId};
use crate::{error::AppError, state::AppState};

/// Session taken from the cookie; requests without one are rejected.
pub struct RequiredSession(pub SessionId);

/// Session taken from the cookie, if the client sent one.
pub struct OptionalSession(pub Option<SessionId>);

#[async_trait]
impl FromRequestParts<AppState> for RequiredSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match read_cookie(&parts.headers, &state.config.session.cookie_name) {
            Some(session) => Ok(RequiredSession(session)),
            None => {
                debug!(uri = %parts.uri, "request without session cookie");
                Err(AppError::Unauthorized)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(read_cookie(
            &parts.headers,
            &state.config.session.cookie_name,
        )))
    }
}
