//! Seed Commitment Hashing
//!
//! The house publishes `SHA-256(server_seed)` before a round and reveals
//! the seed afterwards. Anyone can then recompute the digest and compare.

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type SeedHash = [u8; 32];

/// Compute a simple hash of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> SeedHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Commit to a server seed.
///
/// Returns the lowercase hex SHA-256 of the seed's UTF-8 bytes.
pub fn commit(seed: &str) -> String {
    hex::encode(hash_bytes(seed.as_bytes()))
}

/// Decode a published commitment (case-insensitive hex, 32 bytes).
pub fn parse_commitment(hash: &str) -> Option<SeedHash> {
    let bytes = hex::decode(hash.trim()).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Some(out)
}

/// Check a revealed seed against a published commitment.
///
/// A malformed `hash` never verifies. The digest comparison does not
/// short-circuit on the first differing byte.
pub fn verify_commitment(seed: &str, hash: &str) -> bool {
    match parse_commitment(hash) {
        Some(expected) => ct_eq(&hash_bytes(seed.as_bytes()), &expected),
        None => false,
    }
}

/// Equality over byte slices whose running time depends only on length.
#[inline]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}
