//! `lease-abstract ask` — one chat turn without the HTTP listener.
//!
//! Useful for scripting and for checking provider credentials end to end.

use std::sync::Arc;

use futures_util::StreamExt;

use la_domain::config::Config;

use crate::bootstrap;
use crate::runtime::{run_turn, TurnInput};

/// Execute a single turn as `user_id` and print the relayed messages.
pub async fn ask(
    config: Arc<Config>,
    message: String,
    user_id: String,
    thread_id: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let state = bootstrap::build_app_state(config)?;

    let turn = run_turn(
        &state,
        TurnInput {
            user_id,
            thread_id,
            message,
        },
    )
    .await?;

    let mut relayed = Vec::new();
    let mut messages = turn.relay(&state);
    while let Some(message) = messages.next().await {
        let message = message?;
        if !json_output {
            println!("{}\n", message.content);
        }
        relayed.push(message);
    }

    if json_output {
        let out = serde_json::json!({
            "threadId": turn.thread_id,
            "runId": turn.run.run_id,
            "polls": turn.run.polls,
            "messages": relayed,
        });
        let json = serde_json::to_string_pretty(&out)
            .map_err(|e| anyhow::anyhow!("serializing response: {e}"))?;
        println!("{json}");
    } else {
        eprintln!("thread: {}", turn.thread_id);
    }

    Ok(())
}
