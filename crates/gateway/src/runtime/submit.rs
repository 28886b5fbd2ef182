//! Message Submitter.

use la_assistants::{AssistantsApi, CreateMessageRequest};
use la_domain::error::{Error, Result};
use la_domain::trace::TraceEvent;

/// Append a user message to `thread_id` and return the new message id.
///
/// The returned id is the relay watermark: only messages after it are
/// delivered back to the caller. Content is only checked for being
/// non-blank; every other limit is the provider's to enforce.
pub async fn submit_message(
    api: &dyn AssistantsApi,
    thread_id: &str,
    content: &str,
) -> Result<String> {
    if content.trim().is_empty() {
        return Err(Error::Validation("message is required".into()));
    }

    let message = api
        .create_message(thread_id, CreateMessageRequest::user(content))
        .await?;

    TraceEvent::MessageSubmitted {
        thread_id: thread_id.to_owned(),
        message_id: message.id.clone(),
        chars: content.chars().count(),
    }
    .emit();
    Ok(message.id)
}
