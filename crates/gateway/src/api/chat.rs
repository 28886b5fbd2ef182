//! `POST /chat` — run one turn and stream the assistant's reply as SSE.
//!
//! Every stage up to run completion happens before the response starts,
//! so failures (including terminal run statuses like `expired`) come back
//! as a plain JSON error. Once streaming, the events are:
//!
//! | event     | data                         |
//! |-----------|------------------------------|
//! | `thread`  | `{threadId, runId}`          |
//! | `message` | `{id, role, content}` (×N)   |
//! | `done`    | `{}`                         |
//! | `error`   | `{error}` (relay failed)     |

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::Deserialize;

use la_domain::error::Result;
use la_domain::stream::BoxStream;

use crate::api::auth::AuthedUser;
use crate::api::error::{api_error, ApiError};
use crate::runtime::{run_turn, CompletedTurn, RelayedMessage, TurnInput};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Existing thread to continue. `null` uses (or creates) the user's thread.
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat(
    State(state): State<AppState>,
    user: AuthedUser,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(api_error(rejection.status(), rejection.body_text())),
    };
    let input = TurnInput {
        user_id: user.id,
        thread_id: body.thread_id,
        message: body.message,
    };

    let turn = run_turn(&state, input).await?;
    let messages = turn.relay(&state);

    Ok(Sse::new(make_sse_stream(turn, messages))
        .keep_alive(KeepAlive::default())
        .into_response())
}

fn make_sse_stream(
    turn: CompletedTurn,
    mut messages: BoxStream<'static, Result<RelayedMessage>>,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    async_stream::stream! {
        let header = serde_json::json!({
            "threadId": turn.thread_id,
            "runId": turn.run.run_id,
        });
        yield Ok(Event::default().event("thread").data(header.to_string()));

        let mut failed = false;
        while let Some(item) = messages.next().await {
            match item {
                Ok(message) => {
                    let data = serde_json::to_string(&message).unwrap_or_default();
                    yield Ok(Event::default().event("message").data(data));
                }
                Err(e) => {
                    tracing::warn!(thread_id = %turn.thread_id, error = %e, "relay failed mid-stream");
                    let data = serde_json::json!({ "error": e.to_string() });
                    yield Ok(Event::default().event("error").data(data.to_string()));
                    failed = true;
                    break;
                }
            }
        }

        if !failed {
            yield Ok(Event::default().event("done").data("{}"));
        }
    }
}
