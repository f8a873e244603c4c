//! Token claims

use std::time::Duration;

use jsonwebtoken::get_current_timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scope::Scope;

/// Claim set carried by a signed token.
///
/// Holds the granted scopes alongside the registered temporal claims
/// (RFC 7519 section 4.1). Scopes travel as canonical scope strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Scopes granted to the token holder.
    pub scopes: Vec<Scope>,

    /// Expiration time, as a Unix timestamp.
    pub exp: u64,

    /// Not-before time, as a Unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,

    /// Issuance time, as a Unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl Claims {
    /// Create a claim set granting `scopes` until `ttl` from now.
    pub fn new(scopes: Vec<Scope>, ttl: Duration) -> Self {
        let now = get_current_timestamp();
        Self {
            scopes,
            exp: now + ttl.as_secs(),
            nbf: None,
            iat: Some(now),
        }
    }

    /// Create a claim set with an explicit expiration timestamp.
    pub fn expiring_at(scopes: Vec<Scope>, exp: u64) -> Self {
        Self {
            scopes,
            exp,
            nbf: None,
            iat: Some(get_current_timestamp()),
        }
    }

    /// Withhold validity until `nbf`.
    pub fn with_not_before(mut self, nbf: u64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Validate every granted scope.
    pub(crate) fn validate_scopes(&self) -> Result<()> {
        self.scopes.iter().try_for_each(Scope::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Permission;
    use crate::AuthError;

    #[test]
    fn test_new_sets_expiry_relative_to_now() {
        let claims = Claims::new(vec![], Duration::from_secs(300));
        let now = get_current_timestamp();

        assert!(claims.exp >= now + 299 && claims.exp <= now + 301);
        assert!(claims.iat.is_some());
        assert!(claims.nbf.is_none());
    }

    #[test]
    fn test_validate_scopes_reports_first_failure() {
        let claims = Claims::new(
            vec![
                Scope::new(Permission::Read, "ok"),
                Scope::new(Permission::Read, "white space"),
            ],
            Duration::from_secs(60),
        );

        assert!(matches!(
            claims.validate_scopes(),
            Err(AuthError::InvalidClass(c)) if c == "white space"
        ));
    }

    #[test]
    fn test_json_shape() {
        let mut claims = Claims::expiring_at(vec![Scope::new(Permission::Read, "files")], 1000);
        claims.iat = None;

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "scopes": ["read:files"], "exp": 1000 })
        );

        let back: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(back, claims);
    }
}
