//! One chat turn: provision → submit → run → relay.
//!
//! [`run_turn`] drives every stage up to run completion so that any
//! failure is reported before a response starts. The relay is returned
//! as a lazy stream on the [`CompletedTurn`].

use futures_util::StreamExt;

use la_domain::error::{Error, Result};
use la_domain::stream::BoxStream;
use la_store::{BindingStore, Direction, MessageRecord};

use crate::runtime::orchestrator::{run_to_completion, PollPolicy, RunOutcome};
use crate::runtime::relay::{relay_new_messages, RelayedMessage};
use crate::runtime::submit::submit_message;
use crate::runtime::threads::ThreadSource;
use crate::state::AppState;

/// Input to a single turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub user_id: String,
    /// Caller-supplied thread; trusted as-is when present.
    pub thread_id: Option<String>,
    pub message: String,
}

/// A turn whose run reached `completed`.
#[derive(Debug, Clone)]
pub struct CompletedTurn {
    pub assistant_id: String,
    pub thread_id: String,
    pub thread_source: ThreadSource,
    /// Id of the submitted user message (relay watermark).
    pub message_id: String,
    pub run: RunOutcome,
}

/// Run every stage of a turn up to and including run completion.
///
/// Stages run strictly in order. Provisioning holds the per-user lock;
/// submission and polling do not.
pub async fn run_turn(state: &AppState, input: TurnInput) -> Result<CompletedTurn> {
    if input.message.trim().is_empty() {
        return Err(Error::Validation("message is required".into()));
    }

    let (assistant_id, thread_id, thread_source) = {
        let _guard = state.user_locks.acquire(&input.user_id).await;
        let assistant_id = state.assistant_registry.get_or_create(&input.user_id).await?;
        let (thread_id, source) = state
            .thread_registry
            .get_or_create(&input.user_id, input.thread_id.as_deref())
            .await?;
        (assistant_id, thread_id, source)
    };

    let message_id = submit_message(state.assistants.as_ref(), &thread_id, &input.message).await?;
    if state.config.store.log_messages {
        log_message(
            state.store.as_ref(),
            &thread_id,
            Direction::Outbound,
            &input.message,
        )
        .await;
    }

    let run = run_to_completion(
        state.assistants.as_ref(),
        &thread_id,
        &assistant_id,
        PollPolicy::from(&state.config.runs),
    )
    .await?;

    tracing::info!(
        user_id = %input.user_id,
        thread_id = %thread_id,
        run_id = %run.run_id,
        polls = run.polls,
        "turn completed"
    );

    Ok(CompletedTurn {
        assistant_id,
        thread_id,
        thread_source,
        message_id,
        run,
    })
}

impl CompletedTurn {
    /// Stream the assistant messages produced by this turn's run,
    /// appending each to the message log when logging is enabled.
    pub fn relay(&self, state: &AppState) -> BoxStream<'static, Result<RelayedMessage>> {
        let mut inner = relay_new_messages(
            state.assistants.clone(),
            self.thread_id.clone(),
            self.message_id.clone(),
            state.config.runs.relay_page_size,
        );
        if !state.config.store.log_messages {
            return inner;
        }

        let store = state.store.clone();
        let chat_id = self.thread_id.clone();
        Box::pin(async_stream::stream! {
            while let Some(item) = inner.next().await {
                if let Ok(message) = &item {
                    log_message(store.as_ref(), &chat_id, Direction::Inbound, &message.content).await;
                }
                yield item;
            }
        })
    }
}

/// Append to the message log. Failures are logged and swallowed.
async fn log_message(store: &dyn BindingStore, chat_id: &str, direction: Direction, content: &str) {
    let record = MessageRecord {
        chat_id: chat_id.to_owned(),
        direction,
        content: content.to_owned(),
    };
    if let Err(e) = store.append_message(record).await {
        tracing::warn!(chat_id, ?direction, error = %e, "message log append failed");
    }
}
