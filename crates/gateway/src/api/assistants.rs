//! `POST /create-assistant` — explicitly provision the user's assistant.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use crate::api::auth::AuthedUser;
use crate::api::error::{api_error, ApiError};
use crate::runtime::AssistantProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantBody {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
}

pub async fn create_assistant(
    State(state): State<AppState>,
    user: AuthedUser,
    body: Result<Json<CreateAssistantBody>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(serde_json::json!({ "message": rejection.body_text() })),
            )
                .into_response();
        }
    };
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(user_id), Some(name)) = (non_blank(body.user_id), non_blank(body.name)) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": "User ID and name are required" })),
        )
            .into_response();
    };

    if user_id != user.id {
        return api_error(
            StatusCode::FORBIDDEN,
            "userId does not match the authenticated user",
        );
    }

    let profile = AssistantProfile {
        name: Some(name),
        file_id: non_blank(body.file_id),
    };

    let _guard = state.user_locks.acquire(&user_id).await;
    match state
        .assistant_registry
        .get_or_create_with(&user_id, profile)
        .await
    {
        Ok(binding) => Json(serde_json::json!({ "assistantId": binding.assistant_id }))
            .into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
