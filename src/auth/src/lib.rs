//! # Signet Auth
//!
//! Scoped bearer-token issuance and verification.
//!
//! A [`Signer`] mints HS256 tokens whose claims carry permission [`Scope`]s
//! and whose header carries the ID of the signing key. Verification resolves
//! that ID through a [`signet_keystore::KeyStore`], so keys can rotate freely
//! without invalidating outstanding tokens. Authorization decisions are made
//! against the verified scopes with [`Scope::allows`] and
//! [`Scope::allowed_by_any`].
//!
//! ```no_run
//! use std::time::Duration;
//! use signet_auth::{Claims, Permission, Scope, Signer};
//! use signet_keystore::MemoryKeyStore;
//!
//! # fn main() -> signet_auth::Result<()> {
//! let signer = Signer::new(MemoryKeyStore::new());
//!
//! let granted = Scope::new(Permission::Write, "files");
//! let token = signer.new_token(&Claims::new(vec![granted], Duration::from_secs(3600)))?;
//!
//! let claims = signer.verify(&token)?;
//! let required = Scope::new(Permission::Read, "files").with_resource("report.txt");
//! assert!(required.allowed_by_any(&claims.scopes));
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod error;
pub mod scope;
pub mod signer;

pub use claims::Claims;
pub use error::{AuthError, Result};
pub use scope::{Permission, Scope};
pub use signer::Signer;
