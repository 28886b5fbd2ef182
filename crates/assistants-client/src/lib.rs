//! `la-assistants` — typed client for the AI provider's assistants API.
//!
//! Provides the [`AssistantsApi`] trait, a production REST implementation
//! ([`RestAssistantsClient`]) and the wire DTOs for assistants, threads,
//! messages, runs and files.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use la_domain::config::AssistantsConfig;
//! use la_assistants::{AssistantsApi, CreateMessageRequest, RestAssistantsClient};
//!
//! # async fn example() -> la_domain::error::Result<()> {
//! let client = RestAssistantsClient::new(&AssistantsConfig::default(), "sk-test".into())?;
//! let thread = client.create_thread().await?;
//! client
//!     .create_message(&thread.id, CreateMessageRequest::user("Summarize section 3"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use provider::AssistantsApi;
pub use rest::{from_reqwest, RestAssistantsClient};
pub use types::{
    Assistant, AssistantFile, AssistantTool, CreateAssistantRequest, CreateMessageRequest,
    CreateRunRequest, FileObject, FileUpload, ListMessagesQuery, MessageContent, MessageList,
    MessageRole, Run, RunError, RunPhase, RunStatus, SortOrder, TextContent, Thread,
    ThreadMessage,
};

use std::sync::Arc;

use la_domain::config::AssistantsConfig;
use la_domain::error::{Error, Result};

/// Build the REST client, reading the API key from the environment
/// variable named by `cfg.api_key_env`.
pub fn create_client(cfg: &AssistantsConfig) -> Result<Arc<dyn AssistantsApi>> {
    let api_key = std::env::var(&cfg.api_key_env)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::Config(format!("{} is not set", cfg.api_key_env)))?;
    let client = RestAssistantsClient::new(cfg, api_key)?;
    tracing::info!(
        base_url = %cfg.base_url,
        model = %cfg.model,
        "assistants client ready"
    );
    Ok(Arc::new(client))
}
