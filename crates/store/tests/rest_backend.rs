use httpmock::prelude::*;
use la_domain::config::StoreConfig;
use la_domain::error::Error;
use la_store::{
    AssistantBinding, BindingStore, BindingWrite, Direction, IdentityProvider, Lookup,
    MessageRecord, RestBackendClient, ThreadBinding,
};
use serde_json::json;

fn client_for(server: &MockServer) -> RestBackendClient {
    let cfg = StoreConfig {
        base_url: server.base_url(),
        timeout_ms: 5_000,
        ..StoreConfig::default()
    };
    RestBackendClient::new(&cfg, "service-key".into(), "anon-key".into())
        .expect("client should build")
}

#[tokio::test]
async fn find_assistant_filters_by_user_and_uses_service_key() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/assistants")
            .query_param("user_id", "eq.user-1")
            .query_param("limit", "1")
            .header("apikey", "service-key")
            .header("authorization", "Bearer service-key");
        then.status(200).json_body(json!([
            {"user_id": "user-1", "assistant_id": "asst_1", "file_id": null}
        ]));
    });

    let found = client_for(&server).find_assistant("user-1").await.unwrap();

    mock.assert();
    assert_eq!(
        found,
        Lookup::Found(AssistantBinding {
            user_id: "user-1".into(),
            assistant_id: "asst_1".into(),
            file_id: None,
        })
    );
}

#[tokio::test]
async fn empty_result_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/user_threads");
        then.status(200).json_body(json!([]));
    });

    let found = client_for(&server).find_thread("user-2").await.unwrap();
    assert_eq!(found, Lookup::NotFound);
}

#[tokio::test]
async fn lookup_failure_is_a_store_error_not_absence() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/assistants");
        then.status(503).body("upstream unavailable");
    });

    let err = client_for(&server).find_assistant("user-1").await.unwrap_err();
    assert!(matches!(err, Error::Store(ref m) if m.contains("503")), "got {err:?}");
}

#[tokio::test]
async fn insert_thread_ignores_duplicates_and_returns_row() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/user_threads")
            .query_param("on_conflict", "user_id")
            .header("prefer", "resolution=ignore-duplicates,return=representation")
            .body_includes("\"thread_id\":\"thread_9\"");
        then.status(201).json_body(json!([
            {"user_id": "user-1", "thread_id": "thread_9"}
        ]));
    });

    let write = client_for(&server)
        .insert_thread(ThreadBinding {
            user_id: "user-1".into(),
            thread_id: "thread_9".into(),
        })
        .await
        .unwrap();

    mock.assert();
    assert!(matches!(write, BindingWrite::Inserted(ref b) if b.thread_id == "thread_9"));
}

#[tokio::test]
async fn ignored_insert_reads_back_the_winning_row() {
    let server = MockServer::start();
    let insert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/user_threads");
        then.status(201).json_body(json!([]));
    });
    let read_back = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/user_threads")
            .query_param("user_id", "eq.user-1");
        then.status(200).json_body(json!([
            {"user_id": "user-1", "thread_id": "thread_winner"}
        ]));
    });

    let write = client_for(&server)
        .insert_thread(ThreadBinding {
            user_id: "user-1".into(),
            thread_id: "thread_loser".into(),
        })
        .await
        .unwrap();

    insert.assert();
    read_back.assert();
    assert_eq!(
        write,
        BindingWrite::Conflict(ThreadBinding {
            user_id: "user-1".into(),
            thread_id: "thread_winner".into(),
        })
    );
}

#[tokio::test]
async fn append_message_posts_minimal() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/messages")
            .header("prefer", "return=minimal")
            .body_includes("\"chat_id\":\"thread_1\"")
            .body_includes("\"direction\":\"outbound\"");
        then.status(201);
    });

    client_for(&server)
        .append_message(MessageRecord {
            chat_id: "thread_1".into(),
            direction: Direction::Outbound,
            content: "Summarize the lease".into(),
        })
        .await
        .unwrap();

    mock.assert();
}

#[tokio::test]
async fn identity_resolves_user_with_anon_key() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/auth/v1/user")
            .header("apikey", "anon-key")
            .header("authorization", "Bearer session-token");
        then.status(200)
            .json_body(json!({"id": "user-7", "email": "tenant@example.com", "aud": "authenticated"}));
    });

    let user = client_for(&server)
        .resolve("session-token")
        .await
        .unwrap()
        .expect("token should resolve");

    mock.assert();
    assert_eq!(user.id, "user-7");
    assert_eq!(user.email.as_deref(), Some("tenant@example.com"));
}

#[tokio::test]
async fn rejected_token_resolves_to_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/v1/user");
        then.status(401).json_body(json!({"msg": "invalid JWT"}));
    });

    assert!(client_for(&server).resolve("stale").await.unwrap().is_none());
}
