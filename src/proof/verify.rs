//! Fairness Verification
//!
//! Re-derive a round from its revealed seeds and compare it against the
//! published commitment and the claimed outcome.
//!
//! Every failure is reported inside [`VerificationOutcome`]; nothing here
//! returns an error or panics on bad input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RollConfig;
use crate::core::color::{map_to_color, RollColor};
use crate::core::rng::derive_roll;
use crate::error::InputError;
use crate::proof::commitment::{Claim, RevealedSeed, SeedCommitment};

/// Why a verification failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum MismatchReason {
    /// Revealed server seed does not hash to the commitment.
    SeedCommitmentMismatch,
    /// Recomputed roll differs from the claim.
    RollMismatch,
    /// Roll matches but the claimed color is wrong.
    ColorMismatch,
    /// Server seed or nonce is malformed, or the game config is invalid.
    InvalidInput {
        /// What was malformed.
        error: InputError,
    },
}

impl MismatchReason {
    /// Stable kebab-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedCommitmentMismatch => "seed-commitment-mismatch",
            Self::RollMismatch => "roll-mismatch",
            Self::ColorMismatch => "color-mismatch",
            Self::InvalidInput { .. } => "invalid-input",
        }
    }
}

impl std::fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { error } => write!(f, "invalid-input: {}", error),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Verdict for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Did every check pass?
    pub is_valid: bool,

    /// Roll derived from the revealed seeds. `None` when the input could
    /// not be used to derive one.
    pub recomputed_roll: Option<u32>,

    /// Color of the recomputed roll.
    pub recomputed_color: Option<RollColor>,

    /// First failed check.
    pub mismatch_reason: Option<MismatchReason>,
}

impl VerificationOutcome {
    fn invalid_input(error: InputError) -> Self {
        debug!(%error, "verification input rejected");
        Self {
            is_valid: false,
            recomputed_roll: None,
            recomputed_color: None,
            mismatch_reason: Some(MismatchReason::InvalidInput { error }),
        }
    }
}

/// Verify a claimed outcome against its commitment and revealed seeds.
///
/// Checks, in order: seed and nonce encoding, commitment, roll, color. A
/// published hash that is not valid hex fails the commitment check, and a
/// claimed roll outside the roll range fails the roll check. The recomputed
/// roll and color are included whenever the inputs are well formed, even if
/// a later check fails, so they can be shown next to the claim.
pub fn verify(
    commitment: &SeedCommitment,
    revealed: &RevealedSeed,
    claim: &Claim,
    config: &RollConfig,
) -> VerificationOutcome {
    // 1. Seed and nonce encoding
    if let Err(e) = config.validate() {
        return VerificationOutcome::invalid_input(InputError::Config { message: e.to_string() });
    }
    let nonce = match revealed.check(config) {
        Ok(nonce) => nonce,
        Err(error) => return VerificationOutcome::invalid_input(error),
    };

    // 2. Recompute
    let recomputed = derive_roll(&revealed.server_seed, &revealed.client_seed, nonce, config)
        .and_then(|roll| map_to_color(roll, config).map(|color| (roll, color)));
    let (roll, color) = match recomputed {
        Ok(pair) => pair,
        Err(e) => return VerificationOutcome::invalid_input(InputError::Config { message: e.to_string() }),
    };

    let mut outcome = VerificationOutcome {
        is_valid: false,
        recomputed_roll: Some(roll),
        recomputed_color: Some(color),
        mismatch_reason: None,
    };

    // 3. Commitment
    if !revealed.matches(commitment) {
        debug!(
            commitment = %commitment.server_seed_hash,
            "server seed does not match commitment"
        );
        outcome.mismatch_reason = Some(MismatchReason::SeedCommitmentMismatch);
        return outcome;
    }

    // 4. Claim
    if !claim.is_roll(roll) {
        debug!(claimed = claim.roll, recomputed = roll, "roll mismatch");
        outcome.mismatch_reason = Some(MismatchReason::RollMismatch);
        return outcome;
    }
    if claim.color != color {
        debug!(claimed = %claim.color, recomputed = %color, "color mismatch");
        outcome.mismatch_reason = Some(MismatchReason::ColorMismatch);
        return outcome;
    }

    outcome.is_valid = true;
    outcome
}

/// Verifier bound to one game variant.
#[derive(Clone, Debug, Default)]
pub struct FairnessVerifier {
    config: RollConfig,
}

impl FairnessVerifier {
    /// Verifier for a game variant.
    pub fn new(config: RollConfig) -> Self {
        Self { config }
    }

    /// Game variant in use.
    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// See [`verify`].
    pub fn verify(
        &self,
        commitment: &SeedCommitment,
        revealed: &RevealedSeed,
        claim: &Claim,
    ) -> VerificationOutcome {
        verify(commitment, revealed, claim, &self.config)
    }
}
