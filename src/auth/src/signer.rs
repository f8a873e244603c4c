//! Token issuance and verification

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

use signet_keystore::KeyStore;

use crate::claims::Claims;
use crate::error::{AuthError, Result};

/// The one signing algorithm tokens are issued and accepted with. Tokens
/// naming any other algorithm are rejected outright to rule out
/// algorithm-confusion attacks.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing authority for creating and verifying authentication tokens.
///
/// Every issued token carries the ID of the key that signed it in its `kid`
/// header (RFC 7515 section 4.1.4). Verification resolves that ID through the
/// key store in one direct lookup instead of trying keys in turn, which is
/// what keeps key rotation cheap: old tokens stay verifiable for as long as
/// their key ID still resolves.
pub struct Signer<K> {
    key_store: K,
    validation: Validation,
}

impl<K: KeyStore> Signer<K> {
    /// Create a token authority over a persistent key store.
    pub fn new(key_store: K) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_nbf = true;

        Self {
            key_store,
            validation,
        }
    }

    /// Create a signed token with the given claims.
    ///
    /// The claims' scopes are validated before anything else; no invalid-scope
    /// token is ever produced, and invalid claims never cost a backend call.
    /// Each token is signed with a freshly minted key.
    pub fn new_token(&self, claims: &Claims) -> Result<String> {
        claims.validate_scopes()?;

        let (id, key) = self
            .key_store
            .new_key()
            .map_err(AuthError::KeyUnavailable)?;

        let mut header = Header::new(SIGNING_ALGORITHM);
        header.kid = Some(id.clone());

        let token = encode(&header, claims, &EncodingKey::from_secret(&key))
            .map_err(AuthError::Token)?;
        debug!(kid = %id, "issued token");
        Ok(token)
    }

    /// Verify a signed token and return its claims.
    ///
    /// Rejects tokens whose header lacks a key ID, whose key ID the store
    /// cannot resolve, whose signature or algorithm is wrong, or whose
    /// temporal claims or scopes fail validation.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let header = decode_header(token).map_err(AuthError::Token)?;
        let id = header.kid.ok_or(AuthError::UnknownSigningKey)?;

        let key = self.key_store.key_from_id(&id)?;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&key), &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::InvalidAlgorithm,
                _ => AuthError::Token(err),
            })?;

        Ok(data.claims)
    }

    /// Verify the token carried by an Authorization header value.
    pub fn auth_request(&self, authorization: &str) -> Result<Claims> {
        self.verify(bearer_token(authorization)?)
    }
}

/// Extract the bearer token from an Authorization header value.
fn bearer_token(authorization: &str) -> Result<&str> {
    let (scheme, token) = authorization
        .split_once(' ')
        .ok_or(AuthError::MissingToken)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}
