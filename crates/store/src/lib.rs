//! `la-store` — access to the hosted backend: per-user assistant and
//! thread bindings, the message log, and access-token identity.
//!
//! | Transport | Store                  | Identity                |
//! |-----------|------------------------|-------------------------|
//! | `rest`    | [`RestBackendClient`]  | [`RestBackendClient`]   |
//! | `memory`  | [`MemoryBindingStore`] | [`TrustedTokenIdentity`] |

pub mod identity;
pub mod memory;
pub mod rest;
pub mod store;
pub mod types;

pub use identity::{IdentityProvider, TrustedTokenIdentity};
pub use memory::MemoryBindingStore;
pub use rest::RestBackendClient;
pub use store::BindingStore;
pub use types::{
    AssistantBinding, BindingWrite, Direction, Lookup, MessageRecord, ThreadBinding,
    UserIdentity,
};

use std::sync::Arc;

use la_domain::config::{StoreConfig, StoreTransport};
use la_domain::error::{Error, Result};

/// The store and identity handles built from one `[store]` section.
#[derive(Clone)]
pub struct Backend {
    pub store: Arc<dyn BindingStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Create the backend for the configured transport.
pub fn create_backend(cfg: &StoreConfig) -> Result<Backend> {
    match cfg.transport {
        StoreTransport::Rest => {
            let service_key = read_key(&cfg.api_key_env)
                .ok_or_else(|| Error::Config(format!("{} is not set", cfg.api_key_env)))?;
            let anon_key = read_key(&cfg.anon_key_env).unwrap_or_else(|| {
                tracing::warn!(
                    env = %cfg.anon_key_env,
                    "anon key not set, using the service key for identity lookups"
                );
                service_key.clone()
            });
            let client = Arc::new(RestBackendClient::new(cfg, service_key, anon_key)?);
            tracing::info!(base_url = %cfg.base_url, "hosted backend client ready");
            Ok(Backend {
                store: client.clone(),
                identity: client,
            })
        }
        StoreTransport::Memory => {
            tracing::warn!(
                "using in-memory store: bindings are not persisted and access tokens \
                 are trusted as user ids"
            );
            Ok(Backend {
                store: Arc::new(MemoryBindingStore::new()),
                identity: Arc::new(TrustedTokenIdentity),
            })
        }
    }
}

fn read_key(env_var: &str) -> Option<String> {
    std::env::var(env_var).ok().filter(|k| !k.is_empty())
}
