use httpmock::prelude::*;
use la_assistants::{
    AssistantTool, AssistantsApi, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    FileUpload, ListMessagesQuery, RestAssistantsClient, RunStatus, SortOrder,
};
use la_domain::config::AssistantsConfig;
use la_domain::error::Error;
use serde_json::json;

fn client_for(server: &MockServer) -> RestAssistantsClient {
    let cfg = AssistantsConfig {
        base_url: format!("{}/v1", server.base_url()),
        timeout_ms: 5_000,
        ..AssistantsConfig::default()
    };
    RestAssistantsClient::new(&cfg, "test-openai-key".into()).expect("client should build")
}

#[tokio::test]
async fn create_assistant_sends_auth_beta_header_and_tools() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/assistants")
            .header("authorization", "Bearer test-openai-key")
            .header("openai-beta", "assistants=v1")
            .header_exists("x-request-id")
            .json_body_includes(
                json!({
                    "model": "gpt-4-1106-preview",
                    "name": "Real Estate expert",
                    "tools": [{"type": "retrieval"}]
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "id": "asst_123",
            "object": "assistant",
            "name": "Real Estate expert",
            "model": "gpt-4-1106-preview",
            "tools": [{"type": "retrieval"}],
            "file_ids": []
        }));
    });

    let assistant = client_for(&server)
        .create_assistant(CreateAssistantRequest {
            model: "gpt-4-1106-preview".into(),
            name: Some("Real Estate expert".into()),
            instructions: Some("Summarize leases.".into()),
            tools: vec![AssistantTool::new("retrieval")],
            file_ids: Vec::new(),
        })
        .await
        .expect("assistant should be created");

    mock.assert();
    assert_eq!(assistant.id, "asst_123");
    assert_eq!(assistant.tools, vec![AssistantTool::new("retrieval")]);
}

#[tokio::test]
async fn create_message_posts_user_role() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/threads/thread_1/messages")
            .json_body(json!({"role": "user", "content": "Summarize section 3"}));
        then.status(200).json_body(json!({
            "id": "msg_1",
            "thread_id": "thread_1",
            "role": "user",
            "created_at": 1_700_000_000,
            "content": [{"type": "text", "text": {"value": "Summarize section 3", "annotations": []}}]
        }));
    });

    let msg = client_for(&server)
        .create_message("thread_1", CreateMessageRequest::user("Summarize section 3"))
        .await
        .expect("message should be created");

    mock.assert();
    assert_eq!(msg.id, "msg_1");
    assert_eq!(msg.content[0].as_text(), Some("Summarize section 3"));
}

#[tokio::test]
async fn list_messages_passes_cursor_and_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/threads/thread_1/messages")
            .query_param("order", "asc")
            .query_param("after", "msg_1")
            .query_param("limit", "20");
        then.status(200).json_body(json!({
            "object": "list",
            "data": [{
                "id": "msg_2",
                "thread_id": "thread_1",
                "role": "assistant",
                "content": [{"type": "text", "text": {"value": "Section 3 covers rent.", "annotations": []}}]
            }],
            "first_id": "msg_2",
            "last_id": "msg_2",
            "has_more": false
        }));
    });

    let page = client_for(&server)
        .list_messages(
            "thread_1",
            &ListMessagesQuery {
                order: SortOrder::Asc,
                after: Some("msg_1".into()),
                limit: Some(20),
            },
        )
        .await
        .expect("list should succeed");

    mock.assert();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.last_id.as_deref(), Some("msg_2"));
    assert!(!page.has_more);
}

#[tokio::test]
async fn run_create_and_retrieve_decode_status() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/threads/thread_1/runs")
            .json_body(json!({"assistant_id": "asst_1"}));
        then.status(200).json_body(json!({
            "id": "run_1", "thread_id": "thread_1", "assistant_id": "asst_1", "status": "queued"
        }));
    });
    let retrieve = server.mock(|when, then| {
        when.method(GET).path("/v1/threads/thread_1/runs/run_1");
        then.status(200).json_body(json!({
            "id": "run_1", "thread_id": "thread_1", "assistant_id": "asst_1",
            "status": "expired",
            "last_error": null
        }));
    });

    let client = client_for(&server);
    let run = client
        .create_run("thread_1", CreateRunRequest { assistant_id: "asst_1".into() })
        .await
        .unwrap();
    assert_eq!(run.status, RunStatus::Queued);

    let run = client.retrieve_run("thread_1", &run.id).await.unwrap();
    assert_eq!(run.status, RunStatus::Expired);

    create.assert();
    retrieve.assert();
}

#[tokio::test]
async fn upload_file_sends_multipart_purpose() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/files")
            .header_exists("content-type")
            .body_includes("name=\"purpose\"")
            .body_includes("assistants")
            .body_includes("filename=\"lease.pdf\"");
        then.status(200).json_body(json!({
            "id": "file_1", "filename": "lease.pdf", "bytes": 5, "purpose": "assistants"
        }));
    });

    let file = client_for(&server)
        .upload_file(FileUpload {
            filename: "lease.pdf".into(),
            content_type: Some("application/pdf".into()),
            bytes: b"%PDF-".to_vec(),
            purpose: "assistants".into(),
        })
        .await
        .expect("upload should succeed");

    mock.assert();
    assert_eq!(file.id, "file_1");
}

#[tokio::test]
async fn attach_file_links_to_assistant() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/assistants/asst_1/files")
            .json_body(json!({"file_id": "file_1"}));
        then.status(200)
            .json_body(json!({"id": "file_1", "object": "assistant.file", "assistant_id": "asst_1"}));
    });

    let link = client_for(&server).attach_file("asst_1", "file_1").await.unwrap();

    mock.assert();
    assert_eq!(link.id, "file_1");
    assert_eq!(link.assistant_id.as_deref(), Some("asst_1"));
}

#[tokio::test]
async fn provider_error_message_is_surfaced_without_retry() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/threads");
        then.status(500).json_body(json!({
            "error": {"message": "The server had an error while processing your request.", "type": "server_error"}
        }));
    });

    let err = client_for(&server).create_thread().await.unwrap_err();

    mock.assert_calls(1);
    match err {
        Error::Provider { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "The server had an error while processing your request.");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
