//! `POST /upload-file` — upload a lease document and attach it to the
//! user's assistant.
//!
//! The three expected failures answer with plain-text bodies:
//! 400 `No file uploaded.`, 404 `User not found.`, and
//! 500 `Error linking file to assistant.`. A body that breaks off while
//! being read (e.g. past `server.max_upload_bytes`) answers with the
//! multipart error's own status and text.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use la_assistants::FileUpload;
use la_domain::trace::TraceEvent;

use crate::api::auth::AuthedUser;
use crate::api::error::ApiError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

pub async fn upload_file(
    State(state): State<AppState>,
    user: Option<AuthedUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let file = match multipart {
        Ok(multipart) => match read_file_field(multipart).await {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read upload body");
                return (e.status(), e.body_text()).into_response();
            }
        },
        Err(rejection) => {
            tracing::debug!(error = %rejection, "upload body is not multipart");
            None
        }
    };
    let Some((filename, content_type, bytes)) = file else {
        return (StatusCode::BAD_REQUEST, "No file uploaded.").into_response();
    };

    let Some(user) = user else {
        return (StatusCode::NOT_FOUND, "User not found.").into_response();
    };

    let assistant_id = {
        let _guard = state.user_locks.acquire(&user.id).await;
        match state.assistant_registry.get_or_create(&user.id).await {
            Ok(id) => id,
            Err(e) => return ApiError(e).into_response(),
        }
    };

    let size = bytes.len();
    let upload = FileUpload {
        filename,
        content_type,
        bytes,
        purpose: state.config.assistants.file_purpose.clone(),
    };
    let file = match state.assistants.upload_file(upload).await {
        Ok(file) => file,
        Err(e) => return ApiError(e).into_response(),
    };

    let assistant_file = match state.assistants.attach_file(&assistant_id, &file.id).await {
        Ok(af) => af,
        Err(e) => {
            tracing::error!(
                assistant_id = %assistant_id,
                file_id = %file.id,
                error = %e,
                "error linking file to assistant"
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error linking file to assistant.",
            )
                .into_response();
        }
    };

    TraceEvent::FileUploaded {
        user_id: user.id,
        assistant_id,
        file_id: file.id.clone(),
        bytes: size,
    }
    .emit();

    Json(serde_json::json!({
        "fileId": file.id,
        "assistantFile": assistant_file.id,
    }))
    .into_response()
}

type UploadedFile = (String, Option<String>, Vec<u8>);

/// Pull the first `file` part out of the form. `Ok(None)` means the form
/// has no such part.
async fn read_file_field(
    mut multipart: Multipart,
) -> Result<Option<UploadedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(Some((filename, content_type, bytes.to_vec())));
    }
    Ok(None)
}
