//! The `BindingStore` trait: user → remote-resource bindings and the
//! append-only message log.

use async_trait::async_trait;
use la_domain::error::Result;

use crate::types::{AssistantBinding, BindingWrite, Lookup, MessageRecord, ThreadBinding};

/// Narrow accessor contract over the persistent store.
///
/// At most one binding exists per `user_id` in each table. Inserts are
/// insert-if-absent: when a row already exists the existing row is
/// returned as [`BindingWrite::Conflict`] and nothing is overwritten.
#[async_trait]
pub trait BindingStore: Send + Sync {
    async fn find_assistant(&self, user_id: &str) -> Result<Lookup<AssistantBinding>>;

    async fn insert_assistant(
        &self,
        binding: AssistantBinding,
    ) -> Result<BindingWrite<AssistantBinding>>;

    async fn find_thread(&self, user_id: &str) -> Result<Lookup<ThreadBinding>>;

    async fn insert_thread(&self, binding: ThreadBinding) -> Result<BindingWrite<ThreadBinding>>;

    async fn append_message(&self, record: MessageRecord) -> Result<()>;
}
