//! Player commands accepted by the engine.
//!
//! Commands arrive either as typed values from an input adapter or as short
//! text tokens from scenario files:
//!
//! | Text | Command |
//! |------|---------|
//! | `toggle_tool:<name>` | [`Command::ToggleTool`] |
//! | `reload` | [`Command::StartReload`] |
//! | `retrain` | [`Command::StartRetrain`] |
//! | `shutdown` | [`Command::ToggleShutdown`] |
//! | `railguards` | [`Command::PurchaseRailguards`] |

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ToolId;

/// A single player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "tool", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Command {
    /// Buy and activate the tool if it is inactive, otherwise deactivate it.
    ToggleTool(ToolId),
    /// Begin reloading the model.
    StartReload,
    /// Begin retraining the model.
    StartRetrain,
    /// Flip the shutdown flag.
    ToggleShutdown,
    /// Buy the one-time railguards upgrade.
    PurchaseRailguards,
}

/// Errors produced when parsing a command token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    /// The token named a tool outside the catalog.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// The name that failed to resolve.
        name: String,
    },

    /// The token is not a recognized command.
    #[error("unknown command: {input}")]
    UnknownCommand {
        /// The raw token.
        input: String,
    },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Some(name) = token.strip_prefix("toggle_tool:") {
            let name = name.trim();
            return ToolId::from_name(name)
                .map(Self::ToggleTool)
                .ok_or_else(|| ParseCommandError::UnknownTool {
                    name: name.to_owned(),
                });
        }
        match token {
            "reload" => Ok(Self::StartReload),
            "retrain" => Ok(Self::StartRetrain),
            "shutdown" => Ok(Self::ToggleShutdown),
            "railguards" => Ok(Self::PurchaseRailguards),
            other => Err(ParseCommandError::UnknownCommand {
                input: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToggleTool(tool) => write!(f, "toggle_tool:{tool}"),
            Self::StartReload => f.write_str("reload"),
            Self::StartRetrain => f.write_str("retrain"),
            Self::ToggleShutdown => f.write_str("shutdown"),
            Self::PurchaseRailguards => f.write_str("railguards"),
        }
    }
}
