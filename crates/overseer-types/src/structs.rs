//! Snapshot structs handed to renderers and other read-only consumers.
//!
//! A snapshot is a detached copy: holding one never borrows engine state,
//! and reading it has no side effects on the simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    AlignmentImpact, BehaviorKind, EmergencyAction, RogueTrigger, ThreatLevel, ToolId,
};

/// One sampled behavior of the AI during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BehaviorPattern {
    /// Classification of the sample.
    pub kind: BehaviorKind,
    /// Complexity in `[0, intelligence)`.
    pub complexity: f64,
    /// Simulation time at which the sample was drawn.
    pub timestamp: f64,
}

/// Read-only view of the AI entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AiSnapshot {
    /// Current intelligence.
    pub intelligence: f64,
    /// Current risk level.
    pub risk: f64,
    /// Current alignment.
    pub alignment: f64,
    /// Multiplier applied to alignment decay (1.0 until railguards).
    pub alignment_decay_multiplier: f64,
    /// Behavior samples from the most recent AI update.
    pub behavior_patterns: Vec<BehaviorPattern>,
    /// Running total of anomalous samples.
    pub anomaly_count: u32,
}

/// Catalog entry and activation state of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToolStatus {
    /// Human-readable name.
    pub name: String,
    /// Whether the tool is currently active.
    pub active: bool,
    /// Effectiveness in `(0, 1]`.
    pub effectiveness: f64,
    /// Money paid on each activation.
    pub cost: f64,
    /// Research points required before purchase.
    pub research_requirement: f64,
    /// Energy drawn while active.
    pub energy_consumption: f64,
}

/// Emergency-action and shutdown state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmergencySnapshot {
    /// Running emergency action.
    pub action: EmergencyAction,
    /// Whether the model is shut down.
    pub shutdown: bool,
    /// Fraction of the running action already elapsed, in `[0, 1]`.
    pub action_progress: f64,
    /// Fraction of the original user base still served.
    pub user_base_fraction: f64,
}

/// Severity bands derived from the raw numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Assessment {
    /// Band for the risk level.
    pub risk_level: ThreatLevel,
    /// Band for accumulated reports relative to the report threshold.
    pub report_level: ThreatLevel,
    /// Band for alignment.
    pub alignment_level: ThreatLevel,
    /// Qualitative alignment reading.
    pub alignment_impact: AlignmentImpact,
}

/// Complete, immutable view of the engine at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EngineSnapshot {
    /// Available money.
    pub money: f64,
    /// Available research points.
    pub research: f64,
    /// Accumulated incident reports.
    pub reports: f64,
    /// Simulation time elapsed since the engine started.
    pub elapsed_time: f64,
    /// Whether the game has ended.
    pub game_over: bool,
    /// Conditions that ended the game; empty while running.
    pub rogue_triggers: Vec<RogueTrigger>,
    /// AI entity state.
    pub ai: AiSnapshot,
    /// Per-tool status keyed by tool.
    pub tools: BTreeMap<ToolId, ToolStatus>,
    /// Total energy drawn by active tools.
    pub active_energy_draw: f64,
    /// Emergency-action state.
    pub emergency: EmergencySnapshot,
    /// Whether the railguards upgrade has been bought.
    pub railguards_purchased: bool,
    /// Severity bands for dashboards.
    pub assessment: Assessment,
}

impl EngineSnapshot {
    /// Number of tools currently active.
    pub fn active_tool_count(&self) -> usize {
        self.tools.values().filter(|status| status.active).count()
    }
}
