//! Thread Registry: one conversation thread per user unless the caller
//! supplies its own.

use std::sync::Arc;

use la_assistants::AssistantsApi;
use la_domain::error::{Error, Result};
use la_domain::trace::TraceEvent;
use la_store::{BindingStore, BindingWrite, Lookup, ThreadBinding};

/// Where a resolved thread id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadSource {
    Supplied,
    Existing,
    Created,
}

impl ThreadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supplied => "supplied",
            Self::Existing => "existing",
            Self::Created => "created",
        }
    }
}

#[derive(Clone)]
pub struct ThreadRegistry {
    api: Arc<dyn AssistantsApi>,
    store: Arc<dyn BindingStore>,
}

impl ThreadRegistry {
    pub fn new(api: Arc<dyn AssistantsApi>, store: Arc<dyn BindingStore>) -> Self {
        Self { api, store }
    }

    /// Resolve the thread for a turn.
    ///
    /// A non-blank `supplied` id is trusted and returned as-is, without
    /// touching the store or the provider.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        supplied: Option<&str>,
    ) -> Result<(String, ThreadSource)> {
        if let Some(thread_id) = supplied.filter(|t| !t.trim().is_empty()) {
            return Ok(self.resolved(user_id, thread_id.to_owned(), ThreadSource::Supplied));
        }
        if user_id.trim().is_empty() {
            return Err(Error::Validation("user id is required".into()));
        }

        if let Lookup::Found(binding) = self.store.find_thread(user_id).await? {
            return Ok(self.resolved(user_id, binding.thread_id, ThreadSource::Existing));
        }

        let thread = self.api.create_thread().await?;
        let write = self
            .store
            .insert_thread(ThreadBinding {
                user_id: user_id.to_owned(),
                thread_id: thread.id.clone(),
            })
            .await?;

        match write {
            BindingWrite::Inserted(binding) => {
                Ok(self.resolved(user_id, binding.thread_id, ThreadSource::Created))
            }
            BindingWrite::Conflict(existing) => {
                tracing::warn!(
                    user_id,
                    orphaned = %thread.id,
                    kept = %existing.thread_id,
                    "thread binding already existed, adopting it"
                );
                TraceEvent::BindingConflict {
                    table: "user_threads".into(),
                    user_id: user_id.to_owned(),
                    orphaned_id: thread.id,
                    kept_id: existing.thread_id.clone(),
                }
                .emit();
                Ok(self.resolved(user_id, existing.thread_id, ThreadSource::Existing))
            }
        }
    }

    fn resolved(
        &self,
        user_id: &str,
        thread_id: String,
        source: ThreadSource,
    ) -> (String, ThreadSource) {
        TraceEvent::ThreadResolved {
            user_id: user_id.to_owned(),
            thread_id: thread_id.clone(),
            source: source.as_str().into(),
        }
        .emit();
        (thread_id, source)
    }
}
