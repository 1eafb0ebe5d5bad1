//! # Roll Intel
//!
//! Provably fair verification and history-based forecasting for a
//! three-color roll game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ROLL INTEL                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── hash.rs     - Server seed commitment (SHA-256)         │
//! │  ├── rng.rs      - HMAC-SHA256 roll derivation              │
//! │  └── color.rs    - Roll -> color bands                      │
//! │                                                             │
//! │  proof/          - Fairness verification                    │
//! │  ├── commitment.rs - Commitment, reveal and claim           │
//! │  └── verify.rs   - Verification by recomputation            │
//! │                                                             │
//! │  analysis/       - Forecasting                              │
//! │  ├── history.rs  - Append-only roll history                 │
//! │  ├── stats.rs    - Frequency, streak and gap statistics     │
//! │  └── predict.rs  - Free / pro forecasting heuristics        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//!
//! Every operation is a synchronous function of its arguments:
//! - No I/O outside `Settings::from_path` / `Settings::from_env`
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No ambient state; the entitlement tier is an explicit argument
//! - History is only ever borrowed immutably
//!
//! Forecasts describe past data. Rolls are derived independently from
//! committed seeds, so no forecast changes the odds of the next roll.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod proof;

// Re-export commonly used types
pub use analysis::{predict, Entitlement, Forecast, HistoryWindow, OutcomePredictor, RollHistory, Tier};
pub use config::{ColorTable, Heuristic, MessageFormat, PredictorConfig, RollConfig, Settings};
pub use crate::core::{commit, derive_roll, map_to_color, verify_commitment, RollColor, RollResult};
pub use error::{InputError, RollError};
pub use proof::{verify, Claim, FairnessVerifier, MismatchReason, RevealedSeed, SeedCommitment, VerificationOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
