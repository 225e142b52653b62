// Forbid unwrap() in production code to prevent panics from bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use engine::config::WorkloadConfig;
use engine::simulation::Simulator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match WorkloadConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: degree={}, operations={}, key_space={}, seed={}",
        config.degree,
        config.operations,
        config.key_space,
        config.seed
    );

    let mut simulator = match Simulator::new(config.simulator_config()) {
        Ok(simulator) => simulator,
        Err(e) => {
            tracing::error!("Failed to create tree: {e}");
            std::process::exit(1);
        }
    };

    let result = simulator.run(config.operations);
    let stats = &result.stats;

    tracing::info!(
        "Ran {} operations: {} inserts ({} duplicates), {} deletes ({} absent), {} searches ({} hits)",
        stats.operations_processed,
        stats.inserts,
        stats.duplicate_inserts,
        stats.deletes,
        stats.absent_deletes,
        stats.search_hits + stats.search_misses,
        stats.search_hits
    );
    tracing::info!(
        "Final tree: {} keys, height {}; page store saw {} fetches, {} flushes, {} releases",
        result.final_len,
        result.final_height,
        result.page_stats.fetches,
        result.page_stats.flushes,
        result.page_stats.releases
    );

    if !result.passed() {
        for violation in &result.invariant_violations {
            tracing::error!(
                "operation {}: {} ({})",
                violation.operation_index,
                violation.description,
                violation.context
            );
        }
        tracing::error!(
            "Simulation with seed {} found {} invariant violations",
            result.seed,
            result.invariant_violations.len()
        );
        std::process::exit(1);
    }

    tracing::info!("No invariant violations");
}
