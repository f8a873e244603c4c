//! Random ID and key generation

use rand::RngCore;

use crate::error::Result;

/// Length in hex characters of generated key IDs.
pub const KEY_ID_LENGTH: usize = 4;

/// Length in hex characters of generated key material.
pub const KEY_LENGTH: usize = 32;

/// Draws `len` hex characters from `rng`.
///
/// Uses `ceil(len / 2)` random bytes, hex-encoded and truncated to exactly
/// `len` characters. IDs and keys are compared by exact equality downstream,
/// so the length must be exact rather than rounded up to a full byte.
pub fn random_hex<R: RngCore>(rng: &mut R, len: usize) -> Result<String> {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    rng.try_fill_bytes(&mut bytes)?;

    let mut encoded = hex::encode(bytes);
    encoded.truncate(len);
    Ok(encoded)
}
