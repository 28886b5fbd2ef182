use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AI provider (assistants API)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const DEFAULT_INSTRUCTIONS: &str = "You are an expert real estate paralegal that just knows how to \
summarize leases by creating professional and clean lease abstracts. You should use your expert \
intuition to understand words, phrases, and paragraphs in order to create uniform lease abstracts. \
If you can't find needed information, please insert and use the logic 'Not Applicable'. References \
regarding where you find the information should be included under each piece of extracted text. \
This lease abstract shall be formatted professionally, cleanly, and concisely for ultimate \
readability and effectiveness when real estate companies need to go back and review the key pieces \
that could be a substantive fact of the lease and their operations.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantsConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the provider API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "d_model")]
    pub model: String,
    /// Display name given to assistants provisioned on first use.
    #[serde(default = "d_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "d_instructions")]
    pub instructions: String,
    /// Capability set requested for every new assistant.
    #[serde(default = "d_tools")]
    pub tools: Vec<String>,
    /// Value of the `OpenAI-Beta` header. Empty disables the header.
    #[serde(default = "d_beta_header")]
    pub beta_header: String,
    #[serde(default = "d_file_purpose")]
    pub file_purpose: String,
    #[serde(default = "d_60000")]
    pub timeout_ms: u64,
}

impl Default for AssistantsConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            model: d_model(),
            assistant_name: d_assistant_name(),
            instructions: d_instructions(),
            tools: d_tools(),
            beta_header: d_beta_header(),
            file_purpose: d_file_purpose(),
            timeout_ms: 60_000,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn d_model() -> String {
    "gpt-4-1106-preview".into()
}
fn d_assistant_name() -> String {
    "Real Estate expert".into()
}
fn d_instructions() -> String {
    DEFAULT_INSTRUCTIONS.into()
}
fn d_tools() -> Vec<String> {
    vec!["retrieval".into()]
}
fn d_beta_header() -> String {
    "assistants=v1".into()
}
fn d_file_purpose() -> String {
    "assistants".into()
}
fn d_60000() -> u64 {
    60_000
}
