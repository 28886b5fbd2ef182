//! Data Transfer Objects for the assistants API.
//!
//! Field names match the provider's wire format (`snake_case`). Unknown
//! fields are ignored so newer API revisions keep deserializing.

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Assistants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A tool enabled on an assistant, e.g. `{"type": "retrieval"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantTool {
    #[serde(rename = "type")]
    pub kind: String,
}

impl AssistantTool {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// POST /assistants — request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAssistantRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AssistantTool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<AssistantTool>,
    #[serde(default)]
    pub file_ids: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Threads & messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// POST /threads/{thread_id}/messages — request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    pub role: MessageRole,
    pub content: String,
}

impl CreateMessageRequest {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// One content part of a thread message.
///
/// Only text parts are relayed; every other kind is kept as
/// [`MessageContent::Other`] so it can be counted and dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

impl MessageContent {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            text: TextContent {
                value: value.into(),
                annotations: Vec::new(),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text.value.as_str()),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// GET /threads/{thread_id}/messages — query parameters.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListMessagesQuery {
    pub order: SortOrder,
    /// Cursor: only messages after this id (in `order`) are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// A page of thread messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Runs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Coarse classification of a [`RunStatus`] for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Keep polling.
    Pending,
    Succeeded,
    Failed,
}

impl RunStatus {
    /// Classify a status. Only `queued` and `in_progress` keep the poll
    /// loop alive; `requires_action` counts as a failure because no tool
    /// outputs are ever submitted, and `cancelling` is treated as already
    /// cancelled.
    pub fn phase(self) -> RunPhase {
        match self {
            Self::Queued | Self::InProgress => RunPhase::Pending,
            Self::Completed => RunPhase::Succeeded,
            Self::RequiresAction
            | Self::Cancelling
            | Self::Cancelled
            | Self::Failed
            | Self::Expired
            | Self::Unknown => RunPhase::Failed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POST /threads/{thread_id}/runs — request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
    #[serde(default)]
    pub created_at: i64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Files
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A document to upload via POST /files.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// Link between an uploaded file and an assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantFile {
    pub id: String,
    #[serde(default)]
    pub assistant_id: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_queued_and_in_progress_are_pending() {
        let pending: Vec<RunStatus> = [
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::RequiresAction,
            RunStatus::Cancelling,
            RunStatus::Cancelled,
            RunStatus::Failed,
            RunStatus::Completed,
            RunStatus::Expired,
            RunStatus::Unknown,
        ]
        .into_iter()
        .filter(|s| s.phase() == RunPhase::Pending)
        .collect();
        assert_eq!(pending, vec![RunStatus::Queued, RunStatus::InProgress]);
    }

    #[test]
    fn completed_is_the_only_success() {
        assert_eq!(RunStatus::Completed.phase(), RunPhase::Succeeded);
        assert_eq!(RunStatus::Expired.phase(), RunPhase::Failed);
        assert_eq!(RunStatus::Cancelling.phase(), RunPhase::Failed);
        assert_eq!(RunStatus::RequiresAction.phase(), RunPhase::Failed);
    }

    #[test]
    fn unrecognised_status_deserializes_as_unknown() {
        let run: Run =
            serde_json::from_str(r#"{"id":"run_1","status":"incomplete"}"#).unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert_eq!(run.status.phase(), RunPhase::Failed);
    }

    #[test]
    fn status_strings_match_wire_names() {
        let s: RunStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(s, RunStatus::InProgress);
        assert_eq!(s.to_string(), "in_progress");
        assert_eq!(RunStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn non_text_content_parts_deserialize_as_other() {
        let raw = r#"{
            "id": "msg_2",
            "thread_id": "thread_1",
            "role": "assistant",
            "content": [
                {"type": "image_file", "image_file": {"file_id": "file_9"}},
                {"type": "text", "text": {"value": "Term: 5 years", "annotations": []}}
            ]
        }"#;
        let msg: ThreadMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.content.len(), 2);
        assert!(msg.content[0].as_text().is_none());
        assert_eq!(msg.content[1].as_text(), Some("Term: 5 years"));
    }

    #[test]
    fn create_assistant_omits_empty_file_ids() {
        let req = CreateAssistantRequest {
            model: "gpt-4-1106-preview".into(),
            name: Some("Real Estate expert".into()),
            instructions: None,
            tools: vec![AssistantTool::new("retrieval")],
            file_ids: Vec::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["tools"][0]["type"], "retrieval");
        assert!(json.get("file_ids").is_none());
        assert!(json.get("instructions").is_none());
    }
}
