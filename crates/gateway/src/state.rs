use std::sync::Arc;
use std::time::Duration;

use la_assistants::AssistantsApi;
use la_domain::config::Config;
use la_store::{BindingStore, IdentityProvider};

use crate::runtime::{AssistantRegistry, IdentityCache, ThreadRegistry, UserLockMap};

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services**: config, the assistants client, store and identity
/// - **Runtime**: registries and per-user provisioning locks
/// - **Caches**: resolved identities
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub assistants: Arc<dyn AssistantsApi>,
    pub store: Arc<dyn BindingStore>,
    pub identity: Arc<dyn IdentityProvider>,

    // ── Runtime ───────────────────────────────────────────────────────
    pub assistant_registry: AssistantRegistry,
    pub thread_registry: ThreadRegistry,
    pub user_locks: Arc<UserLockMap>,

    // ── Caches ────────────────────────────────────────────────────────
    /// Access-token digest → user, with `store.identity_cache_ttl_secs` TTL.
    pub identity_cache: Arc<IdentityCache>,
}

impl AppState {
    /// Wire the runtime around already-constructed clients.
    pub fn new(
        config: Arc<Config>,
        assistants: Arc<dyn AssistantsApi>,
        store: Arc<dyn BindingStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let assistant_registry =
            AssistantRegistry::new(assistants.clone(), store.clone(), &config.assistants);
        let thread_registry = ThreadRegistry::new(assistants.clone(), store.clone());
        let identity_cache = Arc::new(IdentityCache::new(Duration::from_secs(
            config.store.identity_cache_ttl_secs,
        )));

        Self {
            config,
            assistants,
            store,
            identity,
            assistant_registry,
            thread_registry,
            user_locks: Arc::new(UserLockMap::new()),
            identity_cache,
        }
    }
}
