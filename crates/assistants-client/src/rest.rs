//! REST implementation of [`AssistantsApi`].
//!
//! `RestAssistantsClient` wraps a `reqwest::Client` and translates every
//! trait method into the corresponding HTTP call against the provider's
//! assistants API. Requests are sent exactly once; a non-2xx reply
//! becomes `Error::Provider` carrying the provider's own error message.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use la_domain::config::AssistantsConfig;
use la_domain::error::{Error, Result};
use la_domain::trace::TraceEvent;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::provider::AssistantsApi;
use crate::types::{
    Assistant, AssistantFile, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    FileObject, FileUpload, ListMessagesQuery, MessageList, Run, Thread, ThreadMessage,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the assistants API.
///
/// Created once at startup and shared by every request handler.
/// The underlying `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestAssistantsClient {
    http: Client,
    base_url: Url,
    api_key: String,
    beta_header: Option<String>,
}

impl RestAssistantsClient {
    pub fn new(cfg: &AssistantsConfig, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        let beta_header = Some(cfg.beta_header.clone()).filter(|h| !h.is_empty());

        let base_url = Url::parse(cfg.base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("assistants.base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "assistants.base_url is not a base URL: {base_url}"
            )));
        }

        Ok(Self {
            http,
            base_url,
            api_key,
            beta_header,
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let rb = rb
            .bearer_auth(&self.api_key)
            .header("X-Request-Id", Uuid::new_v4().to_string());
        match self.beta_header {
            Some(ref beta) => rb.header("OpenAI-Beta", beta),
            None => rb,
        }
    }

    /// Append path segments to the base URL. Each segment is
    /// percent-encoded, so ids cannot add segments or a query.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("assistants.base_url is not a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request once and map non-2xx replies to `Error::Provider`.
    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::AssistantsCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        TraceEvent::AssistantsCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(
            endpoint,
            status = status.as_u16(),
            body = %body,
            "assistants API request failed"
        );
        Err(Error::Provider {
            status: Some(status.as_u16()),
            message: provider_message(&body)
                .unwrap_or_else(|| format!("{endpoint} returned {}", status.as_u16())),
        })
    }

    async fn decode<T: DeserializeOwned>(&self, endpoint: &str, resp: Response) -> Result<T> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| Error::Provider {
            status: None,
            message: format!("failed to parse {endpoint} response: {e}"),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl AssistantsApi for RestAssistantsClient {
    async fn create_assistant(&self, req: CreateAssistantRequest) -> Result<Assistant> {
        let endpoint = "POST /assistants";
        let resp = self
            .execute(endpoint, self.http.post(self.url(&["assistants"])?).json(&req))
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn create_thread(&self) -> Result<Thread> {
        let endpoint = "POST /threads";
        let resp = self
            .execute(
                endpoint,
                self.http
                    .post(self.url(&["threads"])?)
                    .json(&serde_json::json!({})),
            )
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        req: CreateMessageRequest,
    ) -> Result<ThreadMessage> {
        let endpoint = "POST /threads/{thread_id}/messages";
        let url = self.url(&["threads", thread_id, "messages"])?;
        let resp = self.execute(endpoint, self.http.post(url).json(&req)).await?;
        self.decode(endpoint, resp).await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        query: &ListMessagesQuery,
    ) -> Result<MessageList> {
        let endpoint = "GET /threads/{thread_id}/messages";
        let url = self.url(&["threads", thread_id, "messages"])?;
        let resp = self.execute(endpoint, self.http.get(url).query(query)).await?;
        self.decode(endpoint, resp).await
    }

    async fn create_run(&self, thread_id: &str, req: CreateRunRequest) -> Result<Run> {
        let endpoint = "POST /threads/{thread_id}/runs";
        let url = self.url(&["threads", thread_id, "runs"])?;
        let resp = self.execute(endpoint, self.http.post(url).json(&req)).await?;
        self.decode(endpoint, resp).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let endpoint = "GET /threads/{thread_id}/runs/{run_id}";
        let url = self.url(&["threads", thread_id, "runs", run_id])?;
        let resp = self.execute(endpoint, self.http.get(url)).await?;
        self.decode(endpoint, resp).await
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject> {
        let endpoint = "POST /files";
        let mut part = Part::bytes(upload.bytes).file_name(upload.filename);
        if let Some(ref content_type) = upload.content_type {
            part = part.mime_str(content_type).map_err(from_reqwest)?;
        }
        let form = Form::new().text("purpose", upload.purpose).part("file", part);

        let resp = self
            .execute(endpoint, self.http.post(self.url(&["files"])?).multipart(form))
            .await?;
        self.decode(endpoint, resp).await
    }

    async fn attach_file(&self, assistant_id: &str, file_id: &str) -> Result<AssistantFile> {
        let endpoint = "POST /assistants/{assistant_id}/files";
        let url = self.url(&["assistants", assistant_id, "files"])?;
        let resp = self
            .execute(
                endpoint,
                self.http
                    .post(url)
                    .json(&serde_json::json!({ "file_id": file_id })),
            )
            .await?;
        self.decode(endpoint, resp).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract `error.message` from a provider error body.
fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_owned)
}

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_reads_nested_error() {
        let body = r#"{"error":{"message":"No thread found with id 'thread_x'.","type":"invalid_request_error"}}"#;
        assert_eq!(
            provider_message(body).as_deref(),
            Some("No thread found with id 'thread_x'.")
        );
    }

    #[test]
    fn provider_message_ignores_non_json() {
        assert!(provider_message("<html>bad gateway</html>").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let cfg = AssistantsConfig {
            base_url: "http://localhost:9000/v1/".into(),
            ..AssistantsConfig::default()
        };
        let client = RestAssistantsClient::new(&cfg, "sk".into()).unwrap();
        assert_eq!(
            client.url(&["threads"]).unwrap().as_str(),
            "http://localhost:9000/v1/threads"
        );
    }

    #[test]
    fn ids_are_escaped_as_single_path_segments() {
        let cfg = AssistantsConfig {
            base_url: "http://localhost:9000/v1".into(),
            ..AssistantsConfig::default()
        };
        let client = RestAssistantsClient::new(&cfg, "sk".into()).unwrap();
        let url = client.url(&["threads", "a/../b?x", "runs"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v1/threads/a%2F..%2Fb%3Fx/runs"
        );
        assert!(url.query().is_none());
    }
}
