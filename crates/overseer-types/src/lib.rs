//! Shared type definitions for the Overseer simulation.
//!
//! Everything a renderer, dashboard or replay tool needs to read engine
//! state lives here. Types flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- Tool catalog, behavior kinds, emergency actions, bands
//! - [`commands`] -- Player commands and their text form
//! - [`structs`] -- Immutable engine snapshots
//! - [`events`] -- State-change events drained by drivers
//! - [`ids`] -- Run identifiers

pub mod commands;
pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

pub use commands::{Command, ParseCommandError};
pub use enums::{
    AlignmentImpact, BehaviorKind, EmergencyAction, RogueTrigger, ThreatLevel, ToolId,
};
pub use events::EngineEvent;
pub use ids::RunId;
pub use structs::{
    AiSnapshot, Assessment, BehaviorPattern, EmergencySnapshot, EngineSnapshot, ToolStatus,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::ids::RunId::export_all();

        let _ = crate::enums::ToolId::export_all();
        let _ = crate::enums::BehaviorKind::export_all();
        let _ = crate::enums::RogueTrigger::export_all();
        let _ = crate::enums::EmergencyAction::export_all();
        let _ = crate::enums::ThreatLevel::export_all();
        let _ = crate::enums::AlignmentImpact::export_all();

        let _ = crate::commands::Command::export_all();
        let _ = crate::events::EngineEvent::export_all();

        let _ = crate::structs::BehaviorPattern::export_all();
        let _ = crate::structs::AiSnapshot::export_all();
        let _ = crate::structs::ToolStatus::export_all();
        let _ = crate::structs::EmergencySnapshot::export_all();
        let _ = crate::structs::Assessment::export_all();
        let _ = crate::structs::EngineSnapshot::export_all();
    }
}
