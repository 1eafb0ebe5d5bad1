//! Provably Fair Roll Derivation
//!
//! `HMAC-SHA256(key = server_seed, msg = client_seed:nonce[:round])`,
//! first `digest_prefix_bytes` bytes read big-endian, reduced modulo
//! `roll_range`.
//!
//! # Example
//!
//! ```
//! use roll_intel::config::RollConfig;
//! use roll_intel::core::rng::derive_roll;
//!
//! let roll = derive_roll("abc123", "xyz", 1, &RollConfig::default()).unwrap();
//! assert_eq!(roll, 4726); // Always the same!
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{MessageFormat, RollConfig};
use crate::error::{Result, RollError};

/// HMAC-SHA256 instance.
pub type HmacSha256 = Hmac<Sha256>;

/// Raw HMAC output.
pub type RollDigest = [u8; 32];

/// Build the HMAC message for a round.
pub fn roll_message(client_seed: &str, nonce: u64, format: MessageFormat) -> String {
    match format {
        MessageFormat::ClientSeedNonce => format!("{}:{}", client_seed, nonce),
        MessageFormat::ClientSeedNonceRound { round } => {
            format!("{}:{}:{}", client_seed, nonce, round)
        }
    }
}

/// HMAC the message with the server seed as key.
pub fn hmac_digest(server_seed: &str, message: &str) -> Result<RollDigest> {
    let mut mac =
        HmacSha256::new_from_slice(server_seed.as_bytes()).map_err(|_| RollError::HmacKey)?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().into())
}

/// Read the first `prefix_bytes` bytes big-endian and reduce into the roll range.
#[inline]
pub fn digest_to_roll(digest: &RollDigest, prefix_bytes: usize, roll_range: u32) -> Result<u32> {
    if !(1..=8).contains(&prefix_bytes) {
        return Err(RollError::InvalidPrefixWidth(prefix_bytes));
    }
    if roll_range == 0 {
        return Err(RollError::InvalidRollRange(roll_range));
    }
    let value = digest[..prefix_bytes]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64);
    Ok((value % roll_range as u64) as u32)
}

/// Derive the roll for one round.
///
/// Pure function of its inputs: the same seeds, nonce and config always
/// produce the same roll.
pub fn derive_roll(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    config: &RollConfig,
) -> Result<u32> {
    config.validate()?;
    let message = roll_message(client_seed, nonce, config.message_format);
    let digest = hmac_digest(server_seed, &message)?;
    digest_to_roll(&digest, config.digest_prefix_bytes, config.roll_range)
}

/// Seeds for a sequence of rounds under one seed pair.
///
/// Holds the server seed, so only the house (or a verifier after the
/// reveal) should build one.
#[derive(Clone, Debug)]
pub struct ProvablyFairRoller {
    server_seed: String,
    client_seed: String,
    nonce: u64,
}

impl ProvablyFairRoller {
    /// Start at `nonce`.
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    /// Nonce the next call to [`Self::next_roll`] will use.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Derive the roll for the current nonce, then advance it.
    pub fn next_roll(&mut self, config: &RollConfig) -> Result<u32> {
        let roll = derive_roll(&self.server_seed, &self.client_seed, self.nonce, config)?;
        self.nonce += 1;
        Ok(roll)
    }
}
