//! Process-local [`BindingStore`] backed by `parking_lot` maps.
//!
//! Nothing survives a restart. Used for local development
//! (`store.transport = "memory"`) and as the test double for the gateway.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use la_domain::error::Result;

use crate::store::BindingStore;
use crate::types::{AssistantBinding, BindingWrite, Lookup, MessageRecord, ThreadBinding};

#[derive(Default)]
pub struct MemoryBindingStore {
    assistants: RwLock<HashMap<String, AssistantBinding>>,
    threads: RwLock<HashMap<String, ThreadBinding>>,
    messages: RwLock<Vec<MessageRecord>>,
}

impl MemoryBindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assistant_count(&self) -> usize {
        self.assistants.read().len()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.read().len()
    }

    /// Snapshot of the message log in append order.
    pub fn messages(&self) -> Vec<MessageRecord> {
        self.messages.read().clone()
    }
}

fn insert_if_absent<T: Clone>(map: &RwLock<HashMap<String, T>>, key: &str, row: T) -> BindingWrite<T> {
    match map.write().entry(key.to_owned()) {
        Entry::Occupied(existing) => BindingWrite::Conflict(existing.get().clone()),
        Entry::Vacant(slot) => BindingWrite::Inserted(slot.insert(row).clone()),
    }
}

#[async_trait]
impl BindingStore for MemoryBindingStore {
    async fn find_assistant(&self, user_id: &str) -> Result<Lookup<AssistantBinding>> {
        Ok(self.assistants.read().get(user_id).cloned().into())
    }

    async fn insert_assistant(
        &self,
        binding: AssistantBinding,
    ) -> Result<BindingWrite<AssistantBinding>> {
        let key = binding.user_id.clone();
        Ok(insert_if_absent(&self.assistants, &key, binding))
    }

    async fn find_thread(&self, user_id: &str) -> Result<Lookup<ThreadBinding>> {
        Ok(self.threads.read().get(user_id).cloned().into())
    }

    async fn insert_thread(&self, binding: ThreadBinding) -> Result<BindingWrite<ThreadBinding>> {
        let key = binding.user_id.clone();
        Ok(insert_if_absent(&self.threads, &key, binding))
    }

    async fn append_message(&self, record: MessageRecord) -> Result<()> {
        self.messages.write().push(record);
        Ok(())
    }
}
