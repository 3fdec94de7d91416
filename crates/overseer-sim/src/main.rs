//! Headless driver for the Overseer simulation.
//!
//! Replays a scenario against the engine and prints a JSON run report to
//! stdout. Logs go to stderr so the report can be piped straight into other
//! tools.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `OVERSEER_CONFIG` (default
//!    `overseer-config.yaml`; built-in defaults if the file is missing)
//! 2. Initialize structured logging (tracing), level from `RUST_LOG` or the
//!    `logging.level` config key
//! 3. Load the scenario from `OVERSEER_SCENARIO` (default
//!    `scenarios/baseline.yaml`; an idle run if the file is missing)
//! 4. Replay the scenario
//! 5. Print the run report

mod error;
mod observer;
mod report;

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use overseer_core::runner::{self, Scenario};
use overseer_core::OverseerConfig;
use overseer_types::RunId;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::SimError;
use crate::observer::LoggingObserver;
use crate::report::RunReport;

/// Config path used when `OVERSEER_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "overseer-config.yaml";

/// Scenario path used when `OVERSEER_SCENARIO` is unset.
const DEFAULT_SCENARIO_PATH: &str = "scenarios/baseline.yaml";

/// Length of the fallback idle run, in simulated seconds.
const IDLE_DURATION: f64 = 300.0;

/// Ticks between status lines.
const STATUS_EVERY: u64 = 100;

/// Application entry point for the headless driver.
///
/// # Errors
///
/// Returns an error if configuration or scenario loading fails, or if the
/// report cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging.level);
    info!("overseer-sim starting");
    info!(
        path = %config_path.display(),
        world_name = %config.world.name,
        seed = config.world.seed,
        "Configuration loaded"
    );

    // 3. Load the scenario.
    let scenario = load_scenario()?;
    info!(
        scenario = %scenario.name,
        description = %scenario.description,
        commands = scenario.commands.len(),
        "Scenario loaded"
    );

    // 4. Replay.
    let run_id = RunId::new();
    let started_at = Utc::now();
    let mut observer = LoggingObserver::new(STATUS_EVERY);
    let result = runner::run_scenario(config, &scenario, &mut observer)?;
    info!(
        %run_id,
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        events = observer.events_seen(),
        "overseer-sim run complete"
    );

    // 5. Report.
    let report = RunReport::new(run_id, started_at, &scenario.name, result);
    print_report(&report)?;
    Ok(())
}

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `default_level`. Set `OVERSEER_LOG_FORMAT=json` for
/// JSON lines.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = std::env::var("OVERSEER_LOG_FORMAT").is_ok_and(|format| format == "json");
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load and validate the configuration.
///
/// Runs before logging is set up, so the caller logs the outcome.
fn load_config() -> Result<(OverseerConfig, PathBuf), SimError> {
    let path = env_path("OVERSEER_CONFIG", DEFAULT_CONFIG_PATH);
    let config = if path.exists() {
        OverseerConfig::from_file(&path)?
    } else {
        OverseerConfig::default()
    };
    config.validate()?;
    Ok((config, path))
}

/// Load the scenario, falling back to an idle run.
fn load_scenario() -> Result<Scenario, SimError> {
    let path = env_path("OVERSEER_SCENARIO", DEFAULT_SCENARIO_PATH);
    if path.exists() {
        let scenario = Scenario::from_file(&path)?;
        info!(path = %path.display(), "Scenario file loaded");
        Ok(scenario)
    } else {
        info!(path = %path.display(), "Scenario file not found, running idle");
        Ok(Scenario::idle(IDLE_DURATION))
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var_os(key).map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Write the report to stdout as pretty JSON.
fn print_report(report: &RunReport) -> Result<(), SimError> {
    let json = serde_json::to_string_pretty(report)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
