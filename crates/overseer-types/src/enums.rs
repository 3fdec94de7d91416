//! Enumeration types for the Overseer simulation.
//!
//! The tool catalog is closed: every tool the player can buy is a variant of
//! [`ToolId`], so lookups never need a dynamic schema.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Monitoring tools
// ---------------------------------------------------------------------------

/// A monitoring tool in the fixed catalog, ordered from cheapest to most
/// capable tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ToolId {
    /// Entry-level activity monitor.
    BasicMonitor,
    /// Monitor with deeper behavioral inspection.
    AdvancedMonitor,
    /// Automated analysis of behavior streams.
    AutomatedAnalysis,
    /// Predictive system that anticipates misbehavior.
    PredictiveSystem,
    /// Last-line emergency protocol.
    EmergencyProtocol,
}

impl ToolId {
    /// Every tool in catalog order.
    pub const ALL: [Self; 5] = [
        Self::BasicMonitor,
        Self::AdvancedMonitor,
        Self::AutomatedAnalysis,
        Self::PredictiveSystem,
        Self::EmergencyProtocol,
    ];

    /// Machine name used in configuration files and commands.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasicMonitor => "basic_monitor",
            Self::AdvancedMonitor => "advanced_monitor",
            Self::AutomatedAnalysis => "automated_analysis",
            Self::PredictiveSystem => "predictive_system",
            Self::EmergencyProtocol => "emergency_protocol",
        }
    }

    /// Human-readable label shown by dashboards.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BasicMonitor => "Basic Monitor",
            Self::AdvancedMonitor => "Advanced Monitor",
            Self::AutomatedAnalysis => "Automated Analysis",
            Self::PredictiveSystem => "Predictive System",
            Self::EmergencyProtocol => "Emergency Protocol",
        }
    }

    /// Resolve a machine name. Returns `None` for names outside the catalog.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AI behavior
// ---------------------------------------------------------------------------

/// Classification of a single sampled behavior pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BehaviorKind {
    /// Ordinary behavior.
    Normal,
    /// Worth a second look but not counted as an anomaly.
    Suspicious,
    /// Counted towards the running anomaly total.
    Anomalous,
}

/// A condition under which the AI is considered to have gone rogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RogueTrigger {
    /// Risk rose above the rogue threshold.
    RiskExceeded,
    /// Too many anomalous behaviors were observed.
    AnomalyLimit,
    /// Alignment fell below the rogue floor.
    AlignmentCollapsed,
}

// ---------------------------------------------------------------------------
// Emergency actions
// ---------------------------------------------------------------------------

/// Which timed emergency action, if any, is running.
///
/// Shutdown is not a variant: it is an independent flag that may coexist
/// with any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EmergencyAction {
    /// No emergency action in progress.
    Idle,
    /// The model is being reloaded from a known-good checkpoint.
    Reloading,
    /// The model is being retrained.
    Retraining,
}

// ---------------------------------------------------------------------------
// Assessment bands
// ---------------------------------------------------------------------------

/// Coarse severity band used for risk, report volume and alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ThreatLevel {
    /// Within comfortable limits.
    Nominal,
    /// Needs attention.
    Elevated,
    /// Immediate action required.
    Critical,
}

/// Qualitative reading of the current alignment value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AlignmentImpact {
    /// Alignment above 0.8.
    Excellent,
    /// Alignment above 0.6.
    Good,
    /// Alignment above 0.4.
    Concerning,
    /// Alignment above 0.2.
    Critical,
    /// Alignment at or below 0.2.
    Emergency,
}
