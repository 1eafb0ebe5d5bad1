//! Core deterministic primitives.
//!
//! Seed commitment, roll derivation and color mapping. Everything here is a
//! pure function of its inputs.

pub mod color;
pub mod hash;
pub mod rng;

// Re-export core types
pub use color::{map_to_color, RollColor, RollResult};
pub use hash::{commit, verify_commitment, SeedHash};
pub use rng::{derive_roll, ProvablyFairRoller};
