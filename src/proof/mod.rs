//! Provably Fair Verification
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs   - Seed commitment, reveal and claim        │
//! │  verify.rs       - Verification by recomputation            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod verify;

// Re-export key types
pub use commitment::{Claim, RevealedSeed, SeedCommitment};
pub use verify::{verify, FairnessVerifier, MismatchReason, VerificationOutcome};
