//! Caller identity
//!
//! Resolves the credential presented with a request to the tenant whose data
//! the caller may export. The tenant is never taken from request parameters.

use crate::config::{AuthConfig, SecretString};
use crate::domain::ids::TenantId;
use crate::domain::{EngineError, Result};
use secrecy::ExposeSecret;

/// Authenticated caller, bound to exactly one tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPrincipal {
    pub tenant_id: TenantId,
}

/// Maps a presented credential to a principal
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `EngineError::Authorization` when the credential is missing or
    /// unknown.
    fn authenticate(&self, token: Option<&str>) -> Result<TenantPrincipal>;
}

/// Extracts the token of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

struct ApiKey {
    token: SecretString,
    tenant_id: TenantId,
}

/// Static API keys from the `[auth]` section
pub struct ApiKeyIdentityProvider {
    keys: Vec<ApiKey>,
}

impl ApiKeyIdentityProvider {
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` if a key names a blank tenant.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let keys = config
            .api_keys
            .iter()
            .map(|key| {
                let tenant_id = TenantId::new(key.tenant_id.as_str())
                    .map_err(|e| EngineError::Configuration(format!("auth.api_keys: {e}")))?;
                Ok(ApiKey {
                    token: key.token.clone(),
                    tenant_id,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if keys.is_empty() {
            tracing::warn!("No API keys configured; every export request will be rejected");
        }

        Ok(Self { keys })
    }

    /// Number of configured keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl IdentityProvider for ApiKeyIdentityProvider {
    fn authenticate(&self, token: Option<&str>) -> Result<TenantPrincipal> {
        let token = token
            .ok_or_else(|| EngineError::Authorization("missing bearer token".to_string()))?;

        // Every key is compared so timing does not reveal the matching index
        let matched = self
            .keys
            .iter()
            .fold(None, |found, key| {
                let hit = key.token.expose_secret().matches(token);
                found.or(hit.then_some(key))
            });

        match matched {
            Some(key) => Ok(TenantPrincipal {
                tenant_id: key.tenant_id.clone(),
            }),
            None => Err(EngineError::Authorization("unknown API key".to_string())),
        }
    }
}

impl std::fmt::Debug for ApiKeyIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyIdentityProvider")
            .field("keys", &self.keys.len())
            .finish()
    }
}
