//! Simulation engine for Overseer, a game about supervising an AI that
//! slowly drifts out of alignment.
//!
//! The engine is a synchronous state machine. The driver supplies a
//! timestamp per tick and feeds player commands in between; the engine
//! returns summaries, snapshots and events and never touches the wall clock
//! or the terminal.
//!
//! # Modules
//!
//! - [`ai`] -- The AI entity: intelligence growth, alignment drift, risk and
//!   behavior sampling.
//! - [`assessment`] -- Threat bands derived from risk, reports and alignment.
//! - [`clock`] -- Time deltas and elapsed simulation time.
//! - [`config`] -- Configuration loading from `overseer-config.yaml` into
//!   strongly-typed structs.
//! - [`economy`] -- Money, research and incident reports.
//! - [`emergency`] -- Reload/retrain state machine and the shutdown flag.
//! - [`engine`] -- [`SimulationEngine`], the tick cycle and command handling.
//! - [`error`] -- Construction errors and command rejections.
//! - [`runner`] -- Deterministic scenario playback.
//! - [`tools`] -- The monitoring tool catalog.
//!
//! [`SimulationEngine`]: engine::SimulationEngine

pub mod ai;
pub mod assessment;
pub mod clock;
pub mod config;
pub mod economy;
pub mod emergency;
pub mod engine;
pub mod error;
pub mod runner;
pub mod tools;

pub use config::{ConfigError, OverseerConfig};
pub use engine::{SimulationEngine, TickSummary};
pub use error::{EngineError, Rejection};
pub use runner::{
    NoOpObserver, RejectedCommand, Scenario, ScenarioEndReason, ScenarioError, ScenarioResult,
    TickObserver, run_scenario,
};
