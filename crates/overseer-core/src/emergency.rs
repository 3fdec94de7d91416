//! Emergency-action state machine and the shutdown flag.
//!
//! ```text
//!            reload cmd                     now - start >= duration
//!   Idle ─────────────────▶ Reloading ─────────────────────────────▶ Idle (+reload boost)
//!     │      retrain cmd                    now - start >= duration
//!     └───────────────────▶ Retraining ────────────────────────────▶ Idle (+retrain boost)
//! ```
//!
//! Reloading and Retraining are variants of one enum, so they cannot both
//! be running. Shutdown is an orthogonal flag: it can be toggled at any
//! time, including during an action. Running actions cannot be cancelled.

use overseer_types::{EmergencyAction, EmergencySnapshot};

use crate::config::EmergencyConfig;
use crate::error::Rejection;

/// The running emergency action and its timing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionState {
    /// Nothing running.
    Idle,
    /// Reload in progress.
    Reloading {
        /// Driver timestamp when the reload began.
        started_at: f64,
        /// Downtime in seconds.
        duration: f64,
    },
    /// Retrain in progress.
    Retraining {
        /// Driver timestamp when the retrain began.
        started_at: f64,
        /// Downtime in seconds.
        duration: f64,
    },
}

impl ActionState {
    /// The tag of this state.
    pub const fn kind(&self) -> EmergencyAction {
        match self {
            Self::Idle => EmergencyAction::Idle,
            Self::Reloading { .. } => EmergencyAction::Reloading,
            Self::Retraining { .. } => EmergencyAction::Retraining,
        }
    }

    /// `(started_at, duration)` while an action runs.
    const fn window(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Idle => None,
            Self::Reloading {
                started_at,
                duration,
            }
            | Self::Retraining {
                started_at,
                duration,
            } => Some((started_at, duration)),
        }
    }
}

/// An action that finished during [`EmergencyState::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedAction {
    /// Which action finished.
    pub action: EmergencyAction,
    /// Alignment boost to apply to the AI.
    pub alignment_boost: f64,
}

/// Emergency-action state, shutdown flag and user base.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyState {
    action: ActionState,
    shutdown: bool,
    user_base: f64,
    config: EmergencyConfig,
}

impl EmergencyState {
    /// Idle, serving, with the full user base.
    pub fn new(config: &EmergencyConfig) -> Self {
        Self {
            action: ActionState::Idle,
            shutdown: false,
            user_base: 1.0,
            config: config.clone(),
        }
    }

    /// Begin a reload at `now`. Returns the downtime.
    pub fn start_reload(&mut self, now: f64) -> Result<f64, Rejection> {
        self.ensure_idle()?;
        let duration = self.config.reload_downtime;
        self.action = ActionState::Reloading {
            started_at: now,
            duration,
        };
        Ok(duration)
    }

    /// Begin a retrain at `now`. Returns the downtime.
    pub fn start_retrain(&mut self, now: f64) -> Result<f64, Rejection> {
        self.ensure_idle()?;
        let duration = self.config.retrain_downtime;
        self.action = ActionState::Retraining {
            started_at: now,
            duration,
        };
        Ok(duration)
    }

    fn ensure_idle(&self) -> Result<(), Rejection> {
        match self.action {
            ActionState::Idle => Ok(()),
            running => Err(Rejection::ActionInProgress {
                action: running.kind(),
            }),
        }
    }

    /// Return to idle if the running action's downtime has elapsed by `now`.
    pub fn resolve(&mut self, now: f64) -> Option<CompletedAction> {
        let (started_at, duration) = self.action.window()?;
        if now - started_at < duration {
            return None;
        }
        let completed = CompletedAction {
            action: self.action.kind(),
            alignment_boost: match self.action {
                ActionState::Reloading { .. } => self.config.reload_alignment_boost,
                _ => self.config.retrain_alignment_boost,
            },
        };
        self.action = ActionState::Idle;
        Some(completed)
    }

    /// Flip the shutdown flag. Every switch-on costs a share of the users.
    /// Returns the new flag.
    pub fn toggle_shutdown(&mut self) -> bool {
        self.shutdown = !self.shutdown;
        if self.shutdown {
            self.user_base *= 1.0 - self.config.shutdown_user_loss;
        }
        self.shutdown
    }

    /// Whether a reload or retrain is running.
    pub const fn is_busy(&self) -> bool {
        !matches!(self.action, ActionState::Idle)
    }

    /// Multiplier applied to money income this tick.
    pub const fn money_multiplier(&self) -> f64 {
        if self.shutdown {
            self.config.shutdown_money_multiplier
        } else {
            self.user_base
        }
    }

    /// Fraction of the running action completed by `now`, in `[0, 1]`.
    ///
    /// Idle reads 0. A zero or negative downtime reads 1.
    pub fn progress(&self, now: f64) -> f64 {
        match self.action.window() {
            None => 0.0,
            Some((_, duration)) if duration <= 0.0 || duration.is_nan() => 1.0,
            Some((started_at, duration)) => {
                let ratio = (now - started_at) / duration;
                if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
            }
        }
    }

    /// The running action.
    pub const fn action(&self) -> ActionState {
        self.action
    }

    /// Whether the model is shut down.
    pub const fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Fraction of users still served.
    pub const fn user_base(&self) -> f64 {
        self.user_base
    }

    /// Detached copy for renderers, with progress measured at `now`.
    pub fn snapshot(&self, now: f64) -> EmergencySnapshot {
        EmergencySnapshot {
            action: self.action.kind(),
            shutdown: self.shutdown,
            action_progress: self.progress(now),
            user_base_fraction: self.user_base,
        }
    }
}
