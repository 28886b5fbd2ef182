//! Assistant Registry: one remote assistant per user, created lazily.

use std::sync::Arc;

use la_assistants::{AssistantTool, AssistantsApi, CreateAssistantRequest};
use la_domain::config::AssistantsConfig;
use la_domain::error::{Error, Result};
use la_domain::trace::TraceEvent;
use la_store::{AssistantBinding, BindingStore, BindingWrite, Lookup};

/// Overrides for a newly provisioned assistant.
#[derive(Debug, Clone, Default)]
pub struct AssistantProfile {
    /// Display name; the configured `assistant_name` when `None`.
    pub name: Option<String>,
    /// File to attach at creation time.
    pub file_id: Option<String>,
}

#[derive(Clone)]
pub struct AssistantRegistry {
    api: Arc<dyn AssistantsApi>,
    store: Arc<dyn BindingStore>,
    config: AssistantsConfig,
}

impl AssistantRegistry {
    pub fn new(
        api: Arc<dyn AssistantsApi>,
        store: Arc<dyn BindingStore>,
        config: &AssistantsConfig,
    ) -> Self {
        Self {
            api,
            store,
            config: config.clone(),
        }
    }

    /// Return the user's assistant id, provisioning one with the default
    /// profile if the user has none.
    pub async fn get_or_create(&self, user_id: &str) -> Result<String> {
        self.get_or_create_with(user_id, AssistantProfile::default())
            .await
            .map(|b| b.assistant_id)
    }

    /// Like [`get_or_create`](Self::get_or_create) but applies `profile`
    /// when a new assistant is created. An existing binding is returned
    /// unchanged and `profile` is ignored.
    pub async fn get_or_create_with(
        &self,
        user_id: &str,
        profile: AssistantProfile,
    ) -> Result<AssistantBinding> {
        if user_id.trim().is_empty() {
            return Err(Error::Validation("user id is required".into()));
        }

        if let Lookup::Found(binding) = self.store.find_assistant(user_id).await? {
            TraceEvent::AssistantResolved {
                user_id: user_id.to_owned(),
                assistant_id: binding.assistant_id.clone(),
                created: false,
            }
            .emit();
            return Ok(binding);
        }

        let assistant = self.api.create_assistant(self.creation_request(&profile)).await?;
        tracing::info!(user_id, assistant_id = %assistant.id, "assistant created");

        let write = self
            .store
            .insert_assistant(AssistantBinding {
                user_id: user_id.to_owned(),
                assistant_id: assistant.id.clone(),
                file_id: profile.file_id,
            })
            .await?;

        let (binding, created) = match write {
            BindingWrite::Inserted(binding) => (binding, true),
            BindingWrite::Conflict(existing) => {
                tracing::warn!(
                    user_id,
                    orphaned = %assistant.id,
                    kept = %existing.assistant_id,
                    "assistant binding already existed, adopting it"
                );
                TraceEvent::BindingConflict {
                    table: "assistants".into(),
                    user_id: user_id.to_owned(),
                    orphaned_id: assistant.id,
                    kept_id: existing.assistant_id.clone(),
                }
                .emit();
                (existing, false)
            }
        };

        TraceEvent::AssistantResolved {
            user_id: user_id.to_owned(),
            assistant_id: binding.assistant_id.clone(),
            created,
        }
        .emit();
        Ok(binding)
    }

    fn creation_request(&self, profile: &AssistantProfile) -> CreateAssistantRequest {
        CreateAssistantRequest {
            model: self.config.model.clone(),
            name: Some(
                profile
                    .name
                    .clone()
                    .unwrap_or_else(|| self.config.assistant_name.clone()),
            ),
            instructions: Some(self.config.instructions.clone()),
            tools: self.config.tools.iter().map(AssistantTool::new).collect(),
            file_ids: profile.file_id.iter().cloned().collect(),
        }
    }
}
