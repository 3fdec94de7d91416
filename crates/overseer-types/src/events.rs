//! Events emitted by the engine whenever its state changes in a way a
//! player would notice.
//!
//! The engine buffers events; the driver drains them after each call.
//! Every event carries `at`, the simulation time (elapsed seconds) at which
//! it happened.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EmergencyAction, RogueTrigger, ToolId};

/// A noteworthy state change inside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EngineEvent {
    /// A tool was bought and switched on.
    ToolActivated {
        /// Simulation time.
        at: f64,
        /// The tool.
        tool: ToolId,
        /// Money deducted.
        cost: f64,
    },
    /// A tool was switched off. No refund is given.
    ToolDeactivated {
        /// Simulation time.
        at: f64,
        /// The tool.
        tool: ToolId,
    },
    /// A reload or retrain began.
    EmergencyStarted {
        /// Simulation time.
        at: f64,
        /// Which action.
        action: EmergencyAction,
        /// Downtime in seconds.
        duration: f64,
    },
    /// A reload or retrain finished and its alignment boost was applied.
    EmergencyCompleted {
        /// Simulation time.
        at: f64,
        /// Which action.
        action: EmergencyAction,
        /// Alignment after the boost.
        alignment: f64,
    },
    /// The shutdown flag flipped.
    ShutdownToggled {
        /// Simulation time.
        at: f64,
        /// New value of the flag.
        shutdown: bool,
        /// User base after the toggle.
        user_base_fraction: f64,
    },
    /// The railguards upgrade was bought.
    RailguardsPurchased {
        /// Simulation time.
        at: f64,
        /// New alignment decay multiplier.
        decay_multiplier: f64,
    },
    /// The AI went rogue; the game is over.
    GameOver {
        /// Simulation time.
        at: f64,
        /// Conditions that held when the game ended.
        triggers: Vec<RogueTrigger>,
    },
}

impl EngineEvent {
    /// Simulation time at which the event happened.
    pub const fn at(&self) -> f64 {
        match self {
            Self::ToolActivated { at, .. }
            | Self::ToolDeactivated { at, .. }
            | Self::EmergencyStarted { at, .. }
            | Self::EmergencyCompleted { at, .. }
            | Self::ShutdownToggled { at, .. }
            | Self::RailguardsPurchased { at, .. }
            | Self::GameOver { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_kind() {
        let event = EngineEvent::ToolDeactivated {
            at: 3.5,
            tool: ToolId::BasicMonitor,
        };
        let json = serde_json::to_value(&event).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({"kind": "tool_deactivated", "at": 3.5, "tool": "basic_monitor"}))
        );
    }

    #[test]
    fn at_reads_every_variant() {
        let event = EngineEvent::GameOver {
            at: 12.0,
            triggers: vec![RogueTrigger::AnomalyLimit],
        };
        assert!((event.at() - 12.0).abs() < f64::EPSILON);
    }
}
