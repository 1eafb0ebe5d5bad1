//! Seed Commitment Protocol
//!
//! The house commits to a server seed before the round starts and reveals
//! it once the round closes. The reveal plus the player's client seed and
//! nonce fully determine the roll.

use serde::{Deserialize, Serialize};

use crate::config::RollConfig;
use crate::core::color::RollColor;
use crate::core::hash::{commit, verify_commitment};
use crate::error::InputError;

/// Hash published before play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCommitment {
    /// Hex SHA-256 of the server seed.
    pub server_seed_hash: String,
}

impl SeedCommitment {
    /// Wrap a published hash.
    pub fn new(server_seed_hash: impl Into<String>) -> Self {
        Self {
            server_seed_hash: server_seed_hash.into(),
        }
    }

    /// Commit to a server seed at round start.
    pub fn issue(server_seed: &str) -> Self {
        Self::new(commit(server_seed))
    }
}

/// Seeds published after the round closes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedSeed {
    /// Secret seed chosen by the house.
    pub server_seed: String,
    /// Seed chosen by the player.
    pub client_seed: String,
    /// Round counter under this seed pair.
    pub nonce: i64,
}

impl RevealedSeed {
    /// Bundle the revealed values.
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: i64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    /// Does the server seed hash to the commitment?
    ///
    /// A published hash that is not 64 hex characters never matches.
    pub fn matches(&self, commitment: &SeedCommitment) -> bool {
        verify_commitment(&self.server_seed, &commitment.server_seed_hash)
    }

    /// Validate the encoding and return the nonce as unsigned.
    pub fn check(&self, config: &RollConfig) -> Result<u64, InputError> {
        if self.server_seed.is_empty() {
            return Err(InputError::EmptyServerSeed);
        }
        if config.require_hex_server_seed
            && !self.server_seed.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(InputError::NonHexServerSeed);
        }
        u64::try_from(self.nonce).map_err(|_| InputError::NegativeNonce { nonce: self.nonce })
    }
}

/// Outcome a player or site claims for a round.
///
/// Unlike [`crate::core::RollResult`] neither field is validated: the roll
/// may lie outside the roll range and the color need not match it. Both
/// surface as mismatches when verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claimed roll.
    pub roll: i64,
    /// Claimed color.
    pub color: RollColor,
}

impl Claim {
    /// Build a claim.
    pub fn new(roll: i64, color: RollColor) -> Self {
        Self { roll, color }
    }

    /// Does the claimed roll equal `roll`?
    pub fn is_roll(&self, roll: u32) -> bool {
        self.roll == i64::from(roll)
    }
}

impl From<crate::core::RollResult> for Claim {
    fn from(result: crate::core::RollResult) -> Self {
        Self::new(result.roll() as i64, result.color())
    }
}
