//! Response Relay: stream the assistant messages a run produced.
//!
//! Messages are listed in ascending order starting strictly after the
//! submitted message, page by page, and yielded as soon as each page
//! arrives. Only text content parts survive; image files and other part
//! kinds are dropped and counted in the `RelayDelivered` trace.

use std::sync::Arc;

use la_assistants::{AssistantsApi, ListMessagesQuery, MessageRole, SortOrder, ThreadMessage};
use la_domain::error::Result;
use la_domain::stream::BoxStream;
use la_domain::trace::TraceEvent;
use serde::Serialize;

/// One relayed assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayedMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
}

/// Join the text parts of `message`.
///
/// Returns `None` when the message has no text at all, along with the
/// number of non-text parts that were dropped.
pub fn text_content(message: &ThreadMessage) -> (Option<String>, usize) {
    let texts: Vec<&str> = message
        .content
        .iter()
        .filter_map(|part| part.as_text())
        .collect();
    let dropped = message.content.len() - texts.len();
    if texts.is_empty() {
        (None, dropped)
    } else {
        (Some(texts.join("\n")), dropped)
    }
}

/// Lazily relay assistant messages created after `after_message_id`.
///
/// The stream is finite and cannot be restarted; it ends with the first
/// provider error.
pub fn relay_new_messages(
    api: Arc<dyn AssistantsApi>,
    thread_id: String,
    after_message_id: String,
    page_size: u32,
) -> BoxStream<'static, Result<RelayedMessage>> {
    Box::pin(async_stream::stream! {
        let mut cursor = after_message_id;
        let mut delivered = 0usize;
        let mut dropped_parts = 0usize;
        let mut failed = false;

        'pages: loop {
            let query = ListMessagesQuery {
                order: SortOrder::Asc,
                after: Some(cursor.clone()),
                limit: Some(page_size),
            };
            let page = match api.list_messages(&thread_id, &query).await {
                Ok(page) => page,
                Err(e) => {
                    failed = true;
                    yield Err(e);
                    break 'pages;
                }
            };

            for message in &page.data {
                cursor = message.id.clone();
                if message.role != MessageRole::Assistant {
                    continue;
                }
                let (text, dropped) = text_content(message);
                dropped_parts += dropped;
                if dropped > 0 {
                    tracing::debug!(message_id = %message.id, dropped, "non-text parts dropped");
                }
                if let Some(content) = text {
                    delivered += 1;
                    yield Ok(RelayedMessage {
                        id: message.id.clone(),
                        role: MessageRole::Assistant,
                        content,
                    });
                }
            }

            if !page.has_more || page.data.is_empty() {
                break;
            }
        }

        if !failed {
            TraceEvent::RelayDelivered {
                thread_id: thread_id.clone(),
                messages: delivered,
                dropped_parts,
            }
            .emit();
        }
    })
}
