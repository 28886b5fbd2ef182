//! The `AssistantsApi` trait defines the interface for every assistants
//! backend (REST, scripted test doubles).

use async_trait::async_trait;
use la_domain::error::Result;

use crate::types::{
    Assistant, AssistantFile, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    FileObject, FileUpload, ListMessagesQuery, MessageList, Run, Thread, ThreadMessage,
};

/// Abstraction over the AI provider's assistants surface.
///
/// Implementations must not retry: every failure is surfaced to the
/// caller as a single `la_domain::error::Error`.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Create an assistant (POST /assistants).
    async fn create_assistant(&self, req: CreateAssistantRequest) -> Result<Assistant>;

    /// Create an empty conversation thread (POST /threads).
    async fn create_thread(&self) -> Result<Thread>;

    /// Append a message to a thread (POST /threads/{thread_id}/messages).
    async fn create_message(
        &self,
        thread_id: &str,
        req: CreateMessageRequest,
    ) -> Result<ThreadMessage>;

    /// List thread messages (GET /threads/{thread_id}/messages).
    async fn list_messages(&self, thread_id: &str, query: &ListMessagesQuery)
        -> Result<MessageList>;

    /// Start a run of an assistant on a thread (POST /threads/{thread_id}/runs).
    async fn create_run(&self, thread_id: &str, req: CreateRunRequest) -> Result<Run>;

    /// Fetch the current state of a run (GET /threads/{thread_id}/runs/{run_id}).
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Upload a document (POST /files, multipart).
    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject>;

    /// Attach an uploaded file to an assistant (POST /assistants/{assistant_id}/files).
    async fn attach_file(&self, assistant_id: &str, file_id: &str) -> Result<AssistantFile>;
}
