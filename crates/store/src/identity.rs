//! Identity resolution — map a session access token to a stable user id.

use async_trait::async_trait;
use la_domain::error::Result;

use crate::types::UserIdentity;

/// Resolves access tokens issued by the hosted auth service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the token is not (or no longer) valid.
    async fn resolve(&self, access_token: &str) -> Result<Option<UserIdentity>>;
}

/// Development provider that trusts the token as the user id.
///
/// Used with the `memory` store transport only.
#[derive(Debug, Clone, Default)]
pub struct TrustedTokenIdentity;

#[async_trait]
impl IdentityProvider for TrustedTokenIdentity {
    async fn resolve(&self, access_token: &str) -> Result<Option<UserIdentity>> {
        let token = access_token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(UserIdentity {
            id: token.to_owned(),
            email: None,
        }))
    }
}
