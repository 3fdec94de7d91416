//! Error types for the overseer-core crate.
//!
//! [`EngineError`] covers construction failures. [`Rejection`] is the
//! ordinary "no" a player gets for a command that cannot be carried out;
//! it is a value, never a fault, and leaves the engine unchanged.

use overseer_types::{EmergencyAction, ParseCommandError, ToolId};

/// Errors that prevent an engine from being built.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration is unusable.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// The start timestamp is unusable.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },
}

/// Why a player command was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// The AI has gone rogue; the game accepts no further commands.
    #[error("game over")]
    GameOver,

    /// Not enough money.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Money needed.
        required: f64,
        /// Money held.
        available: f64,
    },

    /// Not enough research points.
    #[error("insufficient research: need {required}, have {available}")]
    InsufficientResearch {
        /// Research needed.
        required: f64,
        /// Research held.
        available: f64,
    },

    /// A reload or retrain is already running.
    #[error("emergency action already in progress: {action:?}")]
    ActionInProgress {
        /// The running action.
        action: EmergencyAction,
    },

    /// The one-time upgrade was already bought.
    #[error("railguards already purchased")]
    AlreadyPurchased,

    /// The tool is already in the requested state.
    #[error("tool {tool} is already {}", state_label(.active))]
    ToolUnchanged {
        /// The tool asked for.
        tool: ToolId,
        /// Its current state.
        active: bool,
    },

    /// The command text could not be understood.
    #[error("unparseable command: {source}")]
    Parse {
        /// The underlying parse error.
        #[from]
        source: ParseCommandError,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn state_label(active: &bool) -> &'static str {
    if *active { "active" } else { "inactive" }
}
