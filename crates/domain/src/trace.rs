use serde::Serialize;

/// Structured trace events emitted across all LeaseAbstract crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    AssistantsCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    StoreCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    IdentityResolved {
        user_id: String,
        cache_hit: bool,
    },
    AssistantResolved {
        user_id: String,
        assistant_id: String,
        created: bool,
    },
    ThreadResolved {
        user_id: String,
        thread_id: String,
        /// `supplied`, `existing` or `created`.
        source: String,
    },
    BindingConflict {
        table: String,
        user_id: String,
        orphaned_id: String,
        kept_id: String,
    },
    MessageSubmitted {
        thread_id: String,
        message_id: String,
        chars: usize,
    },
    RunPolled {
        run_id: String,
        status: String,
        poll: u32,
    },
    RunFinished {
        run_id: String,
        status: String,
        polls: u32,
        duration_ms: u64,
    },
    RelayDelivered {
        thread_id: String,
        messages: usize,
        dropped_parts: usize,
    },
    FileUploaded {
        user_id: String,
        assistant_id: String,
        file_id: String,
        bytes: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "la_event");
    }
}
