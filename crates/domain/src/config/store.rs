use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Hosted backend (bindings, message log, identity)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "d_transport")]
    pub transport: StoreTransport,
    /// Backend project URL; REST lives under `/rest/v1`, auth under `/auth/v1`.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the service key used for table access.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Environment variable holding the public anon key used for identity lookups.
    #[serde(default = "d_anon_key_env")]
    pub anon_key_env: String,
    #[serde(default)]
    pub tables: TableNames,
    /// Cookie carrying the session access token when no bearer header is sent.
    #[serde(default = "d_session_cookie")]
    pub session_cookie: String,
    #[serde(default = "d_60")]
    pub identity_cache_ttl_secs: u64,
    /// Append submitted and relayed messages to the message log table.
    #[serde(default = "d_true")]
    pub log_messages: bool,
    #[serde(default = "d_8000")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreTransport {
    Rest,
    /// Process-local maps; identity tokens are trusted as user ids.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableNames {
    #[serde(default = "d_assistants_table")]
    pub assistants: String,
    #[serde(default = "d_threads_table")]
    pub threads: String,
    #[serde(default = "d_messages_table")]
    pub messages: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            assistants: d_assistants_table(),
            threads: d_threads_table(),
            messages: d_messages_table(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            transport: StoreTransport::Rest,
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            anon_key_env: d_anon_key_env(),
            tables: TableNames::default(),
            session_cookie: d_session_cookie(),
            identity_cache_ttl_secs: 60,
            log_messages: true,
            timeout_ms: 8000,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_transport() -> StoreTransport {
    StoreTransport::Rest
}
fn d_base_url() -> String {
    "http://localhost:54321".into()
}
fn d_api_key_env() -> String {
    "SUPABASE_SERVICE_ROLE_KEY".into()
}
fn d_anon_key_env() -> String {
    "SUPABASE_ANON_KEY".into()
}
fn d_assistants_table() -> String {
    "assistants".into()
}
fn d_threads_table() -> String {
    "user_threads".into()
}
fn d_messages_table() -> String {
    "messages".into()
}
fn d_session_cookie() -> String {
    "sb-access-token".into()
}
fn d_60() -> u64 {
    60
}
fn d_true() -> bool {
    true
}
fn d_8000() -> u64 {
    8000
}
