//! The JSON document printed at the end of a run.

use chrono::{DateTime, Utc};
use overseer_core::runner::ScheduledCommand;
use overseer_core::{ScenarioEndReason, ScenarioResult};
use overseer_types::{EngineSnapshot, RunId};
use serde::Serialize;

/// A refused scheduled command, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedEntry {
    /// Scenario time the command was scheduled for.
    pub at: f64,
    /// The command token.
    pub command: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Summary of one scenario replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Identifier minted for this run.
    pub run_id: RunId,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Scenario name.
    pub scenario: String,
    /// Why the run stopped.
    pub end_reason: ScenarioEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Commands the engine carried out.
    pub accepted_commands: u64,
    /// Commands the engine refused.
    pub rejected_commands: Vec<RejectedEntry>,
    /// Commands still pending when the run stopped.
    pub unapplied_commands: Vec<ScheduledCommand>,
    /// State after the last tick.
    pub final_snapshot: EngineSnapshot,
}

impl RunReport {
    /// Build a report from a finished run.
    pub fn new(
        run_id: RunId,
        started_at: DateTime<Utc>,
        scenario: &str,
        result: ScenarioResult,
    ) -> Self {
        let rejected_commands = result
            .rejected
            .into_iter()
            .map(|entry| RejectedEntry {
                at: entry.at,
                reason: entry.reason.to_string(),
                command: entry.command,
            })
            .collect();
        Self {
            run_id,
            started_at,
            scenario: scenario.to_owned(),
            end_reason: result.end_reason,
            total_ticks: result.total_ticks,
            accepted_commands: result.accepted_commands,
            rejected_commands,
            unapplied_commands: result.unapplied,
            final_snapshot: result.final_snapshot,
        }
    }
}
