//! Roll Intel Demo
//!
//! Plays a seeded session, verifies one round and prints free and pro
//! forecasts over the resulting history.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roll_intel::{
    analysis::predict::DISCLAIMER,
    core::rng::ProvablyFairRoller,
    Claim, Entitlement, FairnessVerifier, OutcomePredictor, RevealedSeed, RollHistory,
    SeedCommitment, Settings, VERSION,
};

/// Rounds played in the demo session.
const DEMO_ROUNDS: u64 = 600;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Roll Intel v{}", VERSION);

    let settings = Settings::from_env().context("loading settings")?;
    info!(
        "Roll range: {} (black < {}, yellow < {})",
        settings.game.roll_range, settings.game.colors.black_end, settings.game.colors.yellow_end
    );

    demo_session(&settings)
}

/// Play, verify and forecast.
fn demo_session(settings: &Settings) -> anyhow::Result<()> {
    info!("=== Starting Demo Session ===");

    let server_seed = hex::encode(roll_intel::core::hash::hash_bytes(b"roll-intel-demo"));
    let client_seed = "demo-client";
    let commitment = SeedCommitment::issue(&server_seed);
    info!("Server seed commitment: {}", commitment.server_seed_hash);

    let mut roller = ProvablyFairRoller::new(server_seed.clone(), client_seed, 0);
    let mut history = RollHistory::new();
    for _ in 0..DEMO_ROUNDS {
        let roll = roller.next_roll(&settings.game)?;
        history.push_roll(roll, &settings.game)?;
    }
    info!("Played {} rounds", history.len());

    // Verify the last round after the reveal
    let last = history
        .snapshot()
        .as_slice()
        .last()
        .copied()
        .context("empty history")?;
    let revealed = RevealedSeed::new(server_seed, client_seed, (DEMO_ROUNDS - 1) as i64);
    let verifier = FairnessVerifier::new(settings.game.clone());

    let outcome = verifier.verify(&commitment, &revealed, &Claim::from(last));
    info!("Verification: {}", serde_json::to_string(&outcome)?);

    let forged = Claim::new(last.roll() as i64 + 1, last.color());
    let outcome = verifier.verify(&commitment, &revealed, &forged);
    match &outcome.mismatch_reason {
        Some(reason) => info!("Forged claim rejected: {}", reason),
        None => warn!("Forged claim accepted"),
    }

    // Forecasts
    let predictor = OutcomePredictor::from_settings(settings)?;
    for entitlement in [Entitlement::FREE, Entitlement::PRO] {
        let forecast = predictor.predict(history.snapshot(), entitlement);
        info!(
            "{:?} forecast: {} ({:.1}% confidence, {} rolls)",
            forecast.tier,
            forecast.predicted_color,
            forecast.confidence * 100.0,
            forecast.sample_size
        );
        info!("{}", serde_json::to_string(&forecast.supporting_stats)?);
    }
    info!("{}", DISCLAIMER);

    Ok(())
}
