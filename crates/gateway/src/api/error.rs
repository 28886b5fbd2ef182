//! Mapping of runtime errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use la_domain::error::Error;

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// A runtime [`Error`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Provider { .. }
                if self.0.provider_status().is_some_and(|code| (400..500).contains(&code)) =>
            {
                StatusCode::BAD_REQUEST
            }
            Error::Provider { .. } | Error::Http(_) | Error::RunFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Error::RunTimeout { .. } | Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Store(_) | Error::Config(_) | Error::Io(_) | Error::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        api_error(status, self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: Error) -> StatusCode {
        ApiError(err).status()
    }

    #[test]
    fn maps_error_kinds_to_statuses() {
        assert_eq!(status_of(Error::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::Auth("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(Error::Provider {
                status: Some(404),
                message: "No thread found".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::Provider {
                status: Some(503),
                message: "overloaded".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(Error::RunFailed {
                run_id: "run_1".into(),
                status: "expired".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(Error::RunTimeout {
                run_id: "run_1".into(),
                polls: 3
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(status_of(Error::Store("down".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
