//! Error Types
//!
//! Configuration and derivation failures are `RollError`.
//! Malformed verifier input is `InputError`, which the verifier reports
//! as data instead of returning it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::color::RollColor;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, RollError>;

/// Errors raised by configuration validation and roll derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollError {
    /// Roll range must contain at least one outcome per color.
    #[error("roll range {0} is too small (need at least 3 outcomes)")]
    InvalidRollRange(u32),

    /// Color bands must satisfy `0 < black_end < yellow_end < roll_range`.
    #[error("invalid color bands: black_end={black_end}, yellow_end={yellow_end}, roll_range={roll_range}")]
    InvalidColorBands {
        /// End (exclusive) of the black band.
        black_end: u32,
        /// End (exclusive) of the yellow band.
        yellow_end: u32,
        /// Size of the roll space.
        roll_range: u32,
    },

    /// Digest prefix must be between 1 and 8 bytes.
    #[error("digest prefix width {0} is outside 1..=8 bytes")]
    InvalidPrefixWidth(usize),

    /// Roll is not inside `[0, roll_range)`.
    #[error("roll {roll} is outside [0, {roll_range})")]
    RollOutOfRange {
        /// Offending roll.
        roll: u32,
        /// Size of the roll space.
        roll_range: u32,
    },

    /// A roll was labelled with a color that does not match its band.
    #[error("roll {roll} is {actual:?}, not {claimed:?}")]
    ColorMismatch {
        /// Roll value.
        roll: u32,
        /// Color supplied with the roll.
        claimed: RollColor,
        /// Color the roll maps to.
        actual: RollColor,
    },

    /// HMAC could not be keyed.
    #[error("hmac key rejected")]
    HmacKey,

    /// Predictor tuning is out of bounds.
    #[error("invalid predictor config: {0}")]
    InvalidPredictorConfig(String),

    /// Settings could not be read or parsed.
    #[error("failed to load settings: {0}")]
    Settings(String),
}

/// Malformed verifier input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InputError {
    /// Server seed is empty.
    #[error("server seed is empty")]
    EmptyServerSeed,

    /// Server seed is not a hex string.
    #[error("server seed is not valid hex")]
    NonHexServerSeed,

    /// Nonce is negative.
    #[error("nonce {nonce} is negative")]
    NegativeNonce {
        /// Supplied nonce.
        nonce: i64,
    },

    /// Game configuration is invalid.
    #[error("invalid game config: {message}")]
    Config {
        /// Validation failure.
        message: String,
    },
}
