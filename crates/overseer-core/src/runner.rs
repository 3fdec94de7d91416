//! Scripted, deterministic playback of the simulation.
//!
//! A [`Scenario`] fixes everything a run depends on: tick spacing, run
//! length, an optional seed override and a list of timed player commands.
//! [`run_scenario`] replays it without touching the wall clock, so the same
//! scenario and configuration always produce the same result.
//!
//! Scenario time starts at 0. Tick `k` (counting from 1) is measured at
//! `k * tick_interval`. Commands are applied in time order, each one just
//! before the first tick whose time is at or after its `at`. The run stops
//! after the first tick at or past `duration`, or as soon as the AI goes
//! rogue. Commands still pending at that point are reported as unapplied.

use std::path::Path;

use overseer_types::{EngineEvent, EngineSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::OverseerConfig;
use crate::engine::{SimulationEngine, TickSummary};
use crate::error::{EngineError, Rejection};

/// Errors that can occur while loading or running a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file from disk.
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the YAML content.
    #[error("failed to parse scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The scenario is structurally unusable.
    #[error("invalid scenario: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },

    /// The engine could not be built.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}

impl From<serde_yml::Error> for ScenarioError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A player command scheduled at a point in scenario time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    /// Scenario time in seconds.
    pub at: f64,
    /// Command token, e.g. `toggle_tool:basic_monitor` or `reload`.
    pub command: String,
}

/// A scripted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Short name used in logs and reports.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Overrides `world.seed` when set.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Seconds between ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval: f64,

    /// Scenario length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Timed player commands, in any order.
    #[serde(default)]
    pub commands: Vec<ScheduledCommand>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] if the file cannot be read, parsed or
    /// validated.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Yaml`] for malformed YAML and
    /// [`ScenarioError::Invalid`] for unusable values.
    pub fn parse(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_yml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// A run of `duration` seconds with no player input.
    pub fn idle(duration: f64) -> Self {
        Self {
            name: "idle".to_owned(),
            description: "No player input; the AI is left to its own devices.".to_owned(),
            seed: None,
            tick_interval: default_tick_interval(),
            duration,
            commands: Vec::new(),
        }
    }

    /// Check timing values.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Invalid`] describing the first problem.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.tick_interval.is_finite() && self.tick_interval > 0.0) {
            return Err(invalid("tick_interval must be a positive number"));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(invalid("duration must be a finite, non-negative number"));
        }
        if self.duration / self.tick_interval > f64::from(u32::MAX) {
            return Err(invalid("duration spans too many ticks"));
        }
        if self.commands.iter().any(|scheduled| !scheduled.at.is_finite()) {
            return Err(invalid("every command needs a finite `at` time"));
        }
        Ok(())
    }

    /// Commands in the order they will be applied.
    fn schedule(&self) -> Vec<&ScheduledCommand> {
        let mut ordered: Vec<&ScheduledCommand> = self.commands.iter().collect();
        // Stable: commands sharing a time keep their file order.
        ordered.sort_by(|a, b| a.at.total_cmp(&b.at));
        ordered
    }
}

fn invalid(reason: &str) -> ScenarioError {
    ScenarioError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Why a scenario run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioEndReason {
    /// The scripted duration elapsed.
    DurationReached,
    /// The AI went rogue.
    GameOver,
}

/// A scheduled command the engine refused.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedCommand {
    /// Scenario time the command was scheduled for.
    pub at: f64,
    /// The command token as written.
    pub command: String,
    /// Why it was refused.
    pub reason: Rejection,
}

/// Outcome of a scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Why the run stopped.
    pub end_reason: ScenarioEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Commands the engine carried out.
    pub accepted_commands: u64,
    /// Commands the engine refused, in application order.
    pub rejected: Vec<RejectedCommand>,
    /// Commands still pending when the run stopped, in schedule order.
    pub unapplied: Vec<ScheduledCommand>,
    /// State after the last tick.
    pub final_snapshot: EngineSnapshot,
}

/// Callback invoked after each scenario tick.
pub trait TickObserver {
    /// Called with the tick summary, the snapshot taken right after the
    /// tick, and the events drained since the previous tick.
    fn on_tick(&mut self, summary: &TickSummary, snapshot: &EngineSnapshot, events: &[EngineEvent]);

    /// Called when a scheduled command is refused.
    fn on_rejected(&mut self, _rejected: &RejectedCommand) {}
}

/// A no-op observer for tests.
pub struct NoOpObserver;

impl TickObserver for NoOpObserver {
    fn on_tick(&mut self, _summary: &TickSummary, _snapshot: &EngineSnapshot, _events: &[EngineEvent]) {}
}

/// Replay `scenario` against a fresh engine built from `config`.
///
/// # Errors
///
/// Returns [`ScenarioError`] if the scenario is invalid or the engine
/// cannot be built. Refused commands are not errors; they are collected in
/// [`ScenarioResult::rejected`].
pub fn run_scenario(
    mut config: OverseerConfig,
    scenario: &Scenario,
    observer: &mut dyn TickObserver,
) -> Result<ScenarioResult, ScenarioError> {
    scenario.validate()?;
    if let Some(seed) = scenario.seed {
        config.world.seed = seed;
    }

    info!(
        scenario = %scenario.name,
        seed = config.world.seed,
        tick_interval = scenario.tick_interval,
        duration = scenario.duration,
        commands = scenario.commands.len(),
        "Scenario starting"
    );

    let mut engine = SimulationEngine::new(config, 0.0)?;
    let schedule = scenario.schedule();
    let mut pending = schedule.into_iter().peekable();
    let mut rejected = Vec::new();
    let mut accepted_commands: u64 = 0;
    let mut tick_index: u32 = 0;
    let mut total_ticks: u64 = 0;

    let end_reason = loop {
        tick_index = tick_index.saturating_add(1);
        let now = f64::from(tick_index) * scenario.tick_interval;

        // --- Commands due before this tick ---
        while let Some(scheduled) = pending.next_if(|scheduled| scheduled.at <= now) {
            match engine.handle_command_str(&scheduled.command) {
                Ok(event) => {
                    debug!(at = scheduled.at, command = %scheduled.command, ?event, "Command applied");
                    accepted_commands = accepted_commands.saturating_add(1);
                }
                Err(reason) => {
                    let entry = RejectedCommand {
                        at: scheduled.at,
                        command: scheduled.command.clone(),
                        reason,
                    };
                    observer.on_rejected(&entry);
                    rejected.push(entry);
                }
            }
        }

        // --- Tick ---
        let summary = engine.tick(now);
        total_ticks = total_ticks.saturating_add(1);
        let events = engine.drain_events();
        let snapshot = engine.snapshot();
        observer.on_tick(&summary, &snapshot, &events);

        if summary.game_over {
            break ScenarioEndReason::GameOver;
        }
        if now >= scenario.duration {
            break ScenarioEndReason::DurationReached;
        }
    };

    let unapplied: Vec<ScheduledCommand> = pending
        .map(|scheduled| {
            warn!(
                at = scheduled.at,
                command = %scheduled.command,
                reason = ?end_reason,
                "Scheduled command never applied"
            );
            scheduled.clone()
        })
        .collect();

    let result = ScenarioResult {
        end_reason,
        total_ticks,
        accepted_commands,
        rejected,
        unapplied,
        final_snapshot: engine.snapshot(),
    };
    log_scenario_end(&scenario.name, &result);
    Ok(result)
}

/// Log the end of a scenario run.
pub fn log_scenario_end(name: &str, result: &ScenarioResult) {
    info!(
        scenario = name,
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        elapsed = result.final_snapshot.elapsed_time,
        accepted = result.accepted_commands,
        rejected = result.rejected.len(),
        unapplied = result.unapplied.len(),
        money = result.final_snapshot.money,
        alignment = result.final_snapshot.ai.alignment,
        "Scenario ended"
    );
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_tick_interval() -> f64 {
    0.1
}

const fn default_duration() -> f64 {
    300.0
}
