//! Access-token → user resolution with a short TTL cache.
//!
//! Tokens are never stored; cache keys are their SHA-256 digests.
//! Only successful resolutions are cached so a freshly issued token is
//! never shadowed by an earlier rejection.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use la_domain::error::Result;
use la_domain::trace::TraceEvent;
use la_store::{IdentityProvider, UserIdentity};

#[derive(Clone)]
struct CachedIdentity {
    user: UserIdentity,
    fetched_at: Instant,
}

pub struct IdentityCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedIdentity>>,
}

impl IdentityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve `token` through the cache, falling back to `provider`.
    pub async fn resolve(
        &self,
        provider: &dyn IdentityProvider,
        token: &str,
    ) -> Result<Option<UserIdentity>> {
        let key = hex::encode(Sha256::digest(token.as_bytes()));

        let cached = self
            .entries
            .read()
            .get(&key)
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.user.clone());
        if let Some(user) = cached {
            TraceEvent::IdentityResolved {
                user_id: user.id.clone(),
                cache_hit: true,
            }
            .emit();
            return Ok(Some(user));
        }

        let resolved = provider.resolve(token).await?;
        match &resolved {
            Some(user) => {
                let mut entries = self.entries.write();
                entries.retain(|_, c| c.fetched_at.elapsed() < self.ttl);
                entries.insert(
                    key,
                    CachedIdentity {
                        user: user.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                TraceEvent::IdentityResolved {
                    user_id: user.id.clone(),
                    cache_hit: false,
                }
                .emit();
            }
            None => {
                self.entries.write().remove(&key);
            }
        }
        Ok(resolved)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for CountingProvider {
        async fn resolve(&self, access_token: &str) -> Result<Option<UserIdentity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if access_token == "bad" {
                return Ok(None);
            }
            Ok(Some(UserIdentity {
                id: format!("user-for-{access_token}"),
                email: None,
            }))
        }
    }

    #[tokio::test]
    async fn second_lookup_hits_cache() {
        let cache = IdentityCache::new(Duration::from_secs(60));
        let provider = CountingProvider::default();

        let first = cache.resolve(&provider, "tok").await.unwrap().unwrap();
        let second = cache.resolve(&provider, "tok").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn rejections_are_not_cached() {
        let cache = IdentityCache::new(Duration::from_secs(60));
        let provider = CountingProvider::default();

        assert!(cache.resolve(&provider, "bad").await.unwrap().is_none());
        assert!(cache.resolve(&provider, "bad").await.unwrap().is_none());

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn zero_ttl_always_refetches() {
        let cache = IdentityCache::new(Duration::ZERO);
        let provider = CountingProvider::default();

        cache.resolve(&provider, "tok").await.unwrap();
        cache.resolve(&provider, "tok").await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
