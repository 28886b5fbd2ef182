//! REST implementation of [`BindingStore`] and [`IdentityProvider`] for a
//! PostgREST + GoTrue style hosted backend.
//!
//! Tables are read with plain filtered selects (`user_id=eq.<id>`) that
//! return a JSON array, so "no row" is an empty array rather than an
//! error status. Inserts use `on_conflict=user_id` with
//! `resolution=ignore-duplicates`: a conflicting insert returns an empty
//! array and the winning row is read back.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use la_domain::config::StoreConfig;
use la_domain::error::{Error, Result};
use la_domain::trace::TraceEvent;

use crate::identity::IdentityProvider;
use crate::store::BindingStore;
use crate::types::{
    AssistantBinding, BindingWrite, Lookup, MessageRecord, ThreadBinding, UserIdentity,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct RestBackendClient {
    http: Client,
    base_url: String,
    service_key: String,
    anon_key: String,
    assistants_table: String,
    threads_table: String,
    messages_table: String,
}

impl RestBackendClient {
    pub fn new(cfg: &StoreConfig, service_key: String, anon_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            service_key,
            anon_key,
            assistants_table: cfg.tables.assistants.clone(),
            threads_table: cfg.tables.threads.clone(),
            messages_table: cfg.tables.messages.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn with_service_key(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Send once; map transport failures and non-2xx replies to `Error::Store`.
    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = rb.send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::StoreCall {
                    endpoint: endpoint.to_owned(),
                    status: 0,
                    duration_ms,
                }
                .emit();
                return Err(Error::Store(format!("{endpoint}: {e}")));
            }
        };

        let status = resp.status();
        TraceEvent::StoreCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Store(format!(
            "{endpoint} returned {}: {body}",
            status.as_u16()
        )))
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T> {
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Store(format!("{endpoint}: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Store(format!("failed to parse {endpoint} response: {e}: {body}")))
    }

    async fn find_by_user<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        user_id: &str,
    ) -> Result<Lookup<T>> {
        let endpoint = format!("GET /rest/v1/{table}");
        let rb = self.with_service_key(self.http.get(self.table_url(table))).query(&[
            ("user_id", format!("eq.{user_id}")),
            ("select", "*".to_owned()),
            ("limit", "1".to_owned()),
        ]);
        let resp = self.execute(&endpoint, rb).await?;
        let rows: Vec<T> = Self::decode(&endpoint, resp).await?;
        Ok(rows.into_iter().next().into())
    }

    async fn insert_if_absent<T>(&self, table: &str, user_id: &str, row: T) -> Result<BindingWrite<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let endpoint = format!("POST /rest/v1/{table}");
        let rb = self
            .with_service_key(self.http.post(self.table_url(table)))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(&[&row]);
        let resp = self.execute(&endpoint, rb).await?;
        let mut inserted: Vec<T> = Self::decode(&endpoint, resp).await?;

        if let Some(row) = inserted.pop() {
            return Ok(BindingWrite::Inserted(row));
        }

        match self.find_by_user(table, user_id).await? {
            Lookup::Found(existing) => Ok(BindingWrite::Conflict(existing)),
            Lookup::NotFound => Err(Error::Store(format!(
                "{endpoint}: insert for user {user_id} was ignored but no existing row was found"
            ))),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl BindingStore for RestBackendClient {
    async fn find_assistant(&self, user_id: &str) -> Result<Lookup<AssistantBinding>> {
        self.find_by_user(&self.assistants_table, user_id).await
    }

    async fn insert_assistant(
        &self,
        binding: AssistantBinding,
    ) -> Result<BindingWrite<AssistantBinding>> {
        let user_id = binding.user_id.clone();
        self.insert_if_absent(&self.assistants_table, &user_id, binding)
            .await
    }

    async fn find_thread(&self, user_id: &str) -> Result<Lookup<ThreadBinding>> {
        self.find_by_user(&self.threads_table, user_id).await
    }

    async fn insert_thread(&self, binding: ThreadBinding) -> Result<BindingWrite<ThreadBinding>> {
        let user_id = binding.user_id.clone();
        self.insert_if_absent(&self.threads_table, &user_id, binding)
            .await
    }

    async fn append_message(&self, record: MessageRecord) -> Result<()> {
        let endpoint = format!("POST /rest/v1/{}", self.messages_table);
        let rb = self
            .with_service_key(self.http.post(self.table_url(&self.messages_table)))
            .header("Prefer", "return=minimal")
            .json(&[&record]);
        self.execute(&endpoint, rb).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for RestBackendClient {
    async fn resolve(&self, access_token: &str) -> Result<Option<UserIdentity>> {
        let endpoint = "GET /auth/v1/user";
        let start = Instant::now();
        let result = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = result.map_err(|e| Error::Auth(format!("{endpoint}: {e}")))?;
        let status = resp.status();
        TraceEvent::StoreCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "{endpoint} returned {}: {body}",
                status.as_u16()
            )));
        }
        Self::decode(endpoint, resp).await.map(Some)
    }
}
