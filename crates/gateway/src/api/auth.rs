//! Session authentication — `AuthedUser` Axum extractor.
//!
//! The access token is taken from `Authorization: Bearer <token>` or, when
//! no header is sent, from the session cookie named by
//! `config.store.session_cookie`. Tokens are resolved through the
//! identity provider behind a SHA-256 keyed TTL cache.
//!
//! Handlers that need to shape their own "no user" response take
//! `Option<AuthedUser>` instead.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use la_domain::error::Error;

use crate::api::error::{api_error, ApiError};
use crate::state::AppState;

/// The authenticated user behind a request.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = access_token(&parts.headers, &state.config.store.session_cookie) else {
            return Err(api_error(StatusCode::UNAUTHORIZED, "not authenticated"));
        };

        let resolved = state
            .identity_cache
            .resolve(state.identity.as_ref(), &token)
            .await
            .map_err(|e| match e {
                Error::Auth(_) => ApiError(e).into_response(),
                other => ApiError(Error::Auth(other.to_string())).into_response(),
            })?;

        match resolved {
            Some(user) => Ok(AuthedUser {
                id: user.id,
                email: user.email,
            }),
            None => Err(api_error(StatusCode::UNAUTHORIZED, "invalid or expired session")),
        }
    }
}

/// Extract the access token from the bearer header or the session cookie.
pub fn access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|t| !t.is_empty())
}
