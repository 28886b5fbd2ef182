pub mod assistants;
pub mod auth;
pub mod chat;
pub mod error;
pub mod health;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full API router.
///
/// `/health` is public. The other routes authenticate per handler through
/// the [`auth::AuthedUser`] extractor, so `/upload-file` can answer an
/// unknown user with its own 404.
pub fn router(state: AppState) -> Router<AppState> {
    let max_upload = state.config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route(
            "/upload-file",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/create-assistant", post(assistants::create_assistant))
        .layer(TraceLayer::new_for_http())
}
