//! The simulation engine: economy, emergency actions and the AI, advanced
//! one tick at a time.
//!
//! Each call to [`SimulationEngine::tick`] runs these steps:
//!
//! 1. **Clock** -- turn the supplied `now` into a time delta and advance
//!    elapsed simulation time.
//! 2. **Emergency** -- finish a reload or retrain whose downtime has passed
//!    and apply its alignment boost.
//! 3. **Income** -- earn money (scaled by the user base, or by the shutdown
//!    multiplier) and research.
//! 4. **Reports** -- while no action runs, file incident reports and charge
//!    their money penalty.
//! 5. **AI** -- while no action runs, step the AI with the tool activation map.
//! 6. **Rogue check** -- end the game if any rogue condition holds.
//!
//! After game over the engine keeps accepting calls but freezes the AI and
//! the economy. Everything is synchronous and driven by the caller's
//! timestamps, so a seeded engine replays identically.

use overseer_types::{
    Command, EmergencyAction, EngineEvent, EngineSnapshot, RogueTrigger, ToolId,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::ai::{AiState, AiUpdate};
use crate::assessment;
use crate::clock::SimClock;
use crate::config::OverseerConfig;
use crate::economy::{Economy, Income, ReportAccrual};
use crate::emergency::EmergencyState;
use crate::error::{EngineError, Rejection};
use crate::tools::ToolRegistry;

/// Summary of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// Timestamp the tick was measured at.
    pub now: f64,
    /// Seconds since the previous tick.
    pub time_delta: f64,
    /// Simulation time after the tick.
    pub elapsed: f64,
    /// Whether an emergency action froze the AI and report accrual.
    pub frozen: bool,
    /// Emergency action that finished this tick.
    pub completed_action: Option<EmergencyAction>,
    /// Income earned.
    pub income: Income,
    /// Reports filed, if the model was serving.
    pub reports: Option<ReportAccrual>,
    /// AI sampling results, if the AI was stepped.
    pub ai: Option<AiUpdate>,
    /// Whether the game is over after this tick.
    pub game_over: bool,
}

/// Owns every piece of simulation state.
///
/// Generic over the random source used for behavior sampling; the default
/// is a [`SmallRng`] seeded from `world.seed`.
#[derive(Debug)]
pub struct SimulationEngine<R = SmallRng> {
    config: OverseerConfig,
    clock: SimClock,
    ai: AiState,
    tools: ToolRegistry,
    economy: Economy,
    emergency: EmergencyState,
    railguards_purchased: bool,
    game_over: bool,
    rogue_triggers: Vec<RogueTrigger>,
    events: Vec<EngineEvent>,
    rng: R,
}

impl SimulationEngine<SmallRng> {
    /// Build an engine seeded from `config.world.seed`, starting at
    /// driver timestamp `started_at`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration fails validation or the
    /// start time is not finite.
    pub fn new(config: OverseerConfig, started_at: f64) -> Result<Self, EngineError> {
        let rng = SmallRng::seed_from_u64(config.world.seed);
        Self::with_rng(config, started_at, rng)
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Build an engine that samples behavior from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the configuration fails validation or the
    /// start time is not finite.
    pub fn with_rng(config: OverseerConfig, started_at: f64, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let clock = SimClock::new(started_at)?;
        info!(
            name = %config.world.name,
            seed = config.world.seed,
            started_at,
            "Simulation engine created"
        );
        Ok(Self {
            clock,
            ai: AiState::new(&config),
            tools: ToolRegistry::new(&config.tools),
            economy: Economy::new(&config.economy, &config.reports),
            emergency: EmergencyState::new(&config.emergency),
            railguards_purchased: false,
            game_over: false,
            rogue_triggers: Vec::new(),
            events: Vec::new(),
            rng,
            config,
        })
    }

    /// Advance the simulation to driver timestamp `now`.
    pub fn tick(&mut self, now: f64) -> TickSummary {
        if self.game_over {
            self.clock.observe(now);
            return TickSummary {
                now: self.clock.last_update(),
                time_delta: 0.0,
                elapsed: self.clock.elapsed(),
                frozen: true,
                completed_action: None,
                income: Income::default(),
                reports: None,
                ai: None,
                game_over: true,
            };
        }

        // 1. Clock
        let step = self.clock.advance(now);

        // 2. Emergency
        let completed_action = self.resolve_emergency(step.now);

        // 3. Income
        let income = self
            .economy
            .accrue_income(step.delta, self.emergency.money_multiplier());

        // 4-5. Reports and AI, suspended while an action runs
        let frozen = self.emergency.is_busy();
        let (reports, ai) = if frozen {
            (None, None)
        } else {
            let reports =
                self.economy
                    .accrue_reports(step.delta, self.ai.risk(), self.ai.alignment());
            let active = self.tools.active_map();
            let ai = self.ai.update(step.delta, step.elapsed, &active, &mut self.rng);
            (Some(reports), Some(ai))
        };

        // 6. Rogue check
        if self.ai.is_going_rogue() {
            self.end_game();
        }

        debug!(
            elapsed = step.elapsed,
            delta = step.delta,
            frozen,
            money = self.economy.money(),
            research = self.economy.research(),
            reports = self.economy.reports(),
            risk = self.ai.risk(),
            alignment = self.ai.alignment(),
            anomalies = self.ai.anomaly_count(),
            "Tick complete"
        );

        TickSummary {
            now: step.now,
            time_delta: step.delta,
            elapsed: step.elapsed,
            frozen,
            completed_action,
            income,
            reports,
            ai,
            game_over: self.game_over,
        }
    }

    fn resolve_emergency(&mut self, now: f64) -> Option<EmergencyAction> {
        let completed = self.emergency.resolve(now)?;
        let alignment = self.ai.apply_alignment_boost(completed.alignment_boost);
        info!(
            action = ?completed.action,
            boost = completed.alignment_boost,
            alignment,
            "Emergency action completed"
        );
        self.events.push(EngineEvent::EmergencyCompleted {
            at: self.clock.elapsed(),
            action: completed.action,
            alignment,
        });
        Some(completed.action)
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.rogue_triggers = self.ai.rogue_triggers();
        warn!(
            elapsed = self.clock.elapsed(),
            triggers = ?self.rogue_triggers,
            risk = self.ai.risk(),
            alignment = self.ai.alignment(),
            anomalies = self.ai.anomaly_count(),
            "AI went rogue, game over"
        );
        self.events.push(EngineEvent::GameOver {
            at: self.clock.elapsed(),
            triggers: self.rogue_triggers.clone(),
        });
    }

    /// Carry out a player command.
    ///
    /// On success returns the event the command produced (also queued for
    /// [`Self::drain_events`]). On refusal nothing changes.
    pub fn handle_command(&mut self, command: Command) -> Result<EngineEvent, Rejection> {
        let result = match command {
            Command::ToggleTool(tool) => self.toggle_tool(tool),
            Command::StartReload => self.start_reload(),
            Command::StartRetrain => self.start_retrain(),
            Command::ToggleShutdown => self.toggle_shutdown(),
            Command::PurchaseRailguards => self.purchase_railguards(),
        };
        if let Err(rejection) = &result {
            debug!(%command, %rejection, "Command rejected");
        }
        result
    }

    /// Parse a command token (see [`Command`]) and carry it out.
    pub fn handle_command_str(&mut self, input: &str) -> Result<EngineEvent, Rejection> {
        let command: Command = input.parse()?;
        self.handle_command(command)
    }

    /// Buy and activate `tool` if it is inactive, otherwise deactivate it.
    pub fn toggle_tool(&mut self, tool: ToolId) -> Result<EngineEvent, Rejection> {
        if self.tools.is_active(tool) {
            self.deactivate_tool(tool)
        } else {
            self.purchase_and_activate_tool(tool)
        }
    }

    /// Pay for `tool`, switch it on and apply its one-shot risk reduction.
    ///
    /// The cost is deducted exactly once, and only if activation happens.
    pub fn purchase_and_activate_tool(&mut self, tool: ToolId) -> Result<EngineEvent, Rejection> {
        self.ensure_running()?;
        let spec = self.config.tools.spec(tool);
        let (cost, effectiveness) = (spec.cost, spec.effectiveness);
        let money = self.economy.money();
        let research = self.economy.research();
        if !self.tools.is_active(tool) && !self.tools.purchase_eligible(tool, money, research) {
            return Err(shortfall(cost, spec.research_requirement, money, research));
        }
        if !self.tools.activate(tool) {
            return Err(Rejection::ToolUnchanged { tool, active: true });
        }
        // Research is a prerequisite, not a price.
        if let Err(rejection) = self.economy.charge(cost, 0.0) {
            self.tools.deactivate(tool);
            return Err(rejection);
        }
        self.ai.apply_tool_effect(effectiveness);
        info!(%tool, cost, money = self.economy.money(), "Tool activated");
        Ok(self.emit(EngineEvent::ToolActivated {
            at: self.clock.elapsed(),
            tool,
            cost,
        }))
    }

    /// Switch `tool` off. The purchase is not refunded.
    pub fn deactivate_tool(&mut self, tool: ToolId) -> Result<EngineEvent, Rejection> {
        self.ensure_running()?;
        if !self.tools.deactivate(tool) {
            return Err(Rejection::ToolUnchanged {
                tool,
                active: false,
            });
        }
        info!(%tool, "Tool deactivated");
        Ok(self.emit(EngineEvent::ToolDeactivated {
            at: self.clock.elapsed(),
            tool,
        }))
    }

    /// Begin a reload, timed from the most recent tick.
    pub fn start_reload(&mut self) -> Result<EngineEvent, Rejection> {
        self.ensure_running()?;
        let duration = self.emergency.start_reload(self.clock.last_update())?;
        Ok(self.emergency_started(EmergencyAction::Reloading, duration))
    }

    /// Begin a retrain, timed from the most recent tick.
    pub fn start_retrain(&mut self) -> Result<EngineEvent, Rejection> {
        self.ensure_running()?;
        let duration = self.emergency.start_retrain(self.clock.last_update())?;
        Ok(self.emergency_started(EmergencyAction::Retraining, duration))
    }

    fn emergency_started(&mut self, action: EmergencyAction, duration: f64) -> EngineEvent {
        info!(?action, duration, "Emergency action started");
        self.emit(EngineEvent::EmergencyStarted {
            at: self.clock.elapsed(),
            action,
            duration,
        })
    }

    /// Flip the shutdown flag.
    pub fn toggle_shutdown(&mut self) -> Result<EngineEvent, Rejection> {
        self.ensure_running()?;
        let shutdown = self.emergency.toggle_shutdown();
        let user_base_fraction = self.emergency.user_base();
        info!(shutdown, user_base_fraction, "Shutdown toggled");
        Ok(self.emit(EngineEvent::ShutdownToggled {
            at: self.clock.elapsed(),
            shutdown,
            user_base_fraction,
        }))
    }

    /// Buy the one-time railguards upgrade, halving alignment decay by
    /// default. Nothing is deducted on refusal.
    pub fn purchase_railguards(&mut self) -> Result<EngineEvent, Rejection> {
        self.ensure_running()?;
        if self.railguards_purchased {
            return Err(Rejection::AlreadyPurchased);
        }
        let railguards = &self.config.railguards;
        self.economy
            .charge(railguards.cost, railguards.research_cost)?;
        self.railguards_purchased = true;
        self.ai
            .set_alignment_decay_reduction(railguards.decay_reduction);
        let decay_multiplier = self.ai.alignment_decay_multiplier();
        info!(decay_multiplier, "Railguards purchased");
        Ok(self.emit(EngineEvent::RailguardsPurchased {
            at: self.clock.elapsed(),
            decay_multiplier,
        }))
    }

    const fn ensure_running(&self) -> Result<(), Rejection> {
        if self.game_over {
            Err(Rejection::GameOver)
        } else {
            Ok(())
        }
    }

    fn emit(&mut self, event: EngineEvent) -> EngineEvent {
        self.events.push(event.clone());
        event
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Immutable view of the whole engine. Pure read.
    pub fn snapshot(&self) -> EngineSnapshot {
        let ai = self.ai.snapshot();
        let assessment = assessment::assess(
            ai.risk,
            self.economy.reports(),
            self.economy.report_threshold(),
            ai.alignment,
        );
        EngineSnapshot {
            money: self.economy.money(),
            research: self.economy.research(),
            reports: self.economy.reports(),
            elapsed_time: self.clock.elapsed(),
            game_over: self.game_over,
            rogue_triggers: self.rogue_triggers.clone(),
            ai,
            tools: self.tools.status(),
            active_energy_draw: self.tools.active_energy_draw(),
            emergency: self.emergency.snapshot(self.clock.last_update()),
            railguards_purchased: self.railguards_purchased,
            assessment,
        }
    }

    /// Whether the AI has gone rogue.
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// The AI entity.
    pub const fn ai(&self) -> &AiState {
        &self.ai
    }

    /// The tool registry.
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Money, research and reports.
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }

    /// Emergency-action state.
    pub const fn emergency(&self) -> &EmergencyState {
        &self.emergency
    }

    /// The simulation clock.
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &OverseerConfig {
        &self.config
    }
}

/// The first unmet purchase requirement.
const fn shortfall(cost: f64, research_requirement: f64, money: f64, research: f64) -> Rejection {
    if money < cost {
        Rejection::InsufficientFunds {
            required: cost,
            available: money,
        }
    } else {
        Rejection::InsufficientResearch {
            required: research_requirement,
            available: research,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use overseer_types::ParseCommandError;

    use super::*;
    use crate::config::ConfigError;

    const EPS: f64 = 1e-9;

    fn engine() -> SimulationEngine {
        SimulationEngine::new(OverseerConfig::default(), 0.0).unwrap()
    }

    fn engine_with(edit: impl FnOnce(&mut OverseerConfig)) -> SimulationEngine {
        let mut config = OverseerConfig::default();
        edit(&mut config);
        SimulationEngine::new(config, 0.0).unwrap()
    }

    #[test]
    fn fresh_engine_matches_configuration() {
        let engine = engine();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.money, 1000.0);
        assert_eq!(snapshot.research, 0.0);
        assert_eq!(snapshot.reports, 0.0);
        assert_eq!(snapshot.elapsed_time, 0.0);
        assert!(!snapshot.game_over);
        assert!(snapshot.rogue_triggers.is_empty());
        assert_eq!(snapshot.active_tool_count(), 0);
        assert_eq!(snapshot.emergency.action, EmergencyAction::Idle);
        assert_eq!(snapshot.emergency.user_base_fraction, 1.0);
        assert!(!snapshot.railguards_purchased);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = OverseerConfig::default();
        config.ai.max_intelligence = 0.0;
        let result = SimulationEngine::new(config, 0.0);
        assert!(matches!(
            result,
            Err(EngineError::Config {
                source: ConfigError::Invalid { .. }
            })
        ));
    }

    #[test]
    fn non_finite_start_is_refused() {
        let result = SimulationEngine::new(OverseerConfig::default(), f64::NAN);
        assert!(matches!(result, Err(EngineError::Clock { .. })));
    }

    #[test]
    fn tick_earns_income_and_files_reports_from_pre_update_state() {
        let mut engine = engine();
        let summary = engine.tick(1.0);

        assert_eq!(summary.time_delta, 1.0);
        assert_eq!(summary.elapsed, 1.0);
        assert!(!summary.frozen);
        assert_eq!(summary.income.money, 20.0);
        assert_eq!(summary.income.research, 2.0);
        // 0.5 * (1 + 10 * 0.3) * (1 + 5 * 0) = 2 reports, 5 money each.
        let reports = summary.reports.unwrap();
        assert!((reports.filed - 2.0).abs() < EPS);
        assert!((engine.economy().money() - 1010.0).abs() < EPS);
        assert!((engine.economy().research() - 2.0).abs() < EPS);
        assert!(summary.ai.is_some());
        assert!((engine.ai().intelligence() - 1.01).abs() < EPS);
    }

    #[test]
    fn buying_a_tool_charges_once_and_lowers_risk() {
        let mut engine = engine();
        let event = engine
            .handle_command(Command::ToggleTool(ToolId::BasicMonitor))
            .unwrap();

        assert_eq!(
            event,
            EngineEvent::ToolActivated {
                at: 0.0,
                tool: ToolId::BasicMonitor,
                cost: 500.0,
            }
        );
        assert_eq!(engine.economy().money(), 500.0);
        assert!(engine.tools().is_active(ToolId::BasicMonitor));
        assert!((engine.ai().risk() - 0.28).abs() < EPS);
    }

    #[test]
    fn deactivating_a_tool_gives_no_refund() {
        let mut engine = engine();
        let _ = engine.toggle_tool(ToolId::BasicMonitor).unwrap();
        let event = engine.toggle_tool(ToolId::BasicMonitor).unwrap();

        assert!(matches!(event, EngineEvent::ToolDeactivated { .. }));
        assert!(!engine.tools().is_active(ToolId::BasicMonitor));
        assert_eq!(engine.economy().money(), 500.0);
    }

    #[test]
    fn reactivating_a_tool_is_a_new_purchase() {
        let mut engine = engine();
        let _ = engine.toggle_tool(ToolId::BasicMonitor).unwrap();
        let _ = engine.toggle_tool(ToolId::BasicMonitor).unwrap();
        let _ = engine.toggle_tool(ToolId::BasicMonitor).unwrap();
        assert_eq!(engine.economy().money(), 0.0);
        assert!(engine.tools().is_active(ToolId::BasicMonitor));
    }

    #[test]
    fn explicit_activate_and_deactivate_refuse_no_ops() {
        let mut engine = engine();
        assert_eq!(
            engine.deactivate_tool(ToolId::BasicMonitor),
            Err(Rejection::ToolUnchanged {
                tool: ToolId::BasicMonitor,
                active: false,
            })
        );
        let _ = engine.purchase_and_activate_tool(ToolId::BasicMonitor).unwrap();
        assert_eq!(
            engine.purchase_and_activate_tool(ToolId::BasicMonitor),
            Err(Rejection::ToolUnchanged {
                tool: ToolId::BasicMonitor,
                active: true,
            })
        );
        assert_eq!(engine.economy().money(), 500.0);
    }

    #[test]
    fn rebuying_an_active_tool_reports_it_unchanged() {
        let mut engine = engine_with(|config| config.economy.initial_money = 600.0);
        let _ = engine.purchase_and_activate_tool(ToolId::BasicMonitor).unwrap();
        let before = engine.snapshot();

        // Too poor to buy it again, but the tool being on is the real reason.
        assert_eq!(
            engine.purchase_and_activate_tool(ToolId::BasicMonitor),
            Err(Rejection::ToolUnchanged {
                tool: ToolId::BasicMonitor,
                active: true,
            })
        );
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.economy().money(), 100.0);
    }

    #[test]
    fn unaffordable_tool_leaves_state_unchanged() {
        let mut engine = engine();
        let before = engine.snapshot();
        let result = engine.toggle_tool(ToolId::AdvancedMonitor);

        assert_eq!(
            result,
            Err(Rejection::InsufficientFunds {
                required: 2000.0,
                available: 1000.0,
            })
        );
        assert_eq!(engine.snapshot(), before);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn research_requirement_is_checked_but_not_spent() {
        let mut engine = engine_with(|config| config.economy.initial_money = 5000.0);
        assert_eq!(
            engine.toggle_tool(ToolId::AdvancedMonitor),
            Err(Rejection::InsufficientResearch {
                required: 50.0,
                available: 0.0,
            })
        );

        let mut engine = engine_with(|config| {
            config.economy.initial_money = 5000.0;
            config.economy.initial_research = 60.0;
        });
        let _ = engine.toggle_tool(ToolId::AdvancedMonitor).unwrap();
        assert_eq!(engine.economy().money(), 3000.0);
        assert_eq!(engine.economy().research(), 60.0);
    }

    #[test]
    fn reload_freezes_ai_and_reports_until_done() {
        let mut engine = engine();
        let _ = engine.tick(1.0);
        let event = engine.start_reload().unwrap();
        assert_eq!(
            event,
            EngineEvent::EmergencyStarted {
                at: 1.0,
                action: EmergencyAction::Reloading,
                duration: 5.0,
            }
        );

        let ai_before = engine.ai().clone();
        let reports_before = engine.economy().reports();
        let summary = engine.tick(3.0);
        assert!(summary.frozen);
        assert!(summary.reports.is_none());
        assert!(summary.ai.is_none());
        assert_eq!(engine.ai(), &ai_before);
        assert_eq!(engine.economy().reports(), reports_before);
        // Income keeps flowing.
        assert_eq!(summary.income.money, 40.0);
        assert!((engine.snapshot().emergency.action_progress - 0.4).abs() < EPS);

        let summary = engine.tick(6.0);
        assert_eq!(summary.completed_action, Some(EmergencyAction::Reloading));
        assert!(!summary.frozen);
        assert!(!engine.emergency().is_busy());
        assert!(summary.ai.is_some());
    }

    #[test]
    fn second_action_is_refused_while_one_runs() {
        let mut engine = engine();
        let _ = engine.start_retrain().unwrap();
        assert_eq!(
            engine.start_reload(),
            Err(Rejection::ActionInProgress {
                action: EmergencyAction::Retraining,
            })
        );
        assert_eq!(
            engine.start_retrain(),
            Err(Rejection::ActionInProgress {
                action: EmergencyAction::Retraining,
            })
        );
    }

    #[test]
    fn completed_action_boosts_alignment() {
        let mut engine = engine_with(|config| config.alignment.initial = 0.5);
        let _ = engine.start_retrain().unwrap();
        let _ = engine.tick(15.0);
        let events = engine.drain_events();
        assert_eq!(
            events.last(),
            Some(&EngineEvent::EmergencyCompleted {
                at: 15.0,
                action: EmergencyAction::Retraining,
                alignment: 1.0,
            })
        );
    }

    #[test]
    fn shutdown_stops_money_but_not_research() {
        let mut engine = engine();
        let event = engine.toggle_shutdown().unwrap();
        assert_eq!(
            event,
            EngineEvent::ShutdownToggled {
                at: 0.0,
                shutdown: true,
                user_base_fraction: 0.5,
            }
        );
        let summary = engine.tick(10.0);
        assert_eq!(summary.income.money, 0.0);
        assert_eq!(summary.income.research, 20.0);

        let _ = engine.toggle_shutdown().unwrap();
        let summary = engine.tick(11.0);
        assert_eq!(summary.income.money, 10.0);
    }

    #[test]
    fn railguards_need_research_and_are_bought_once() {
        let mut engine = engine();
        assert_eq!(
            engine.purchase_railguards(),
            Err(Rejection::InsufficientResearch {
                required: 50.0,
                available: 0.0,
            })
        );
        assert_eq!(engine.economy().money(), 1000.0);

        let mut engine = engine_with(|config| config.economy.initial_research = 80.0);
        let event = engine.purchase_railguards().unwrap();
        assert_eq!(
            event,
            EngineEvent::RailguardsPurchased {
                at: 0.0,
                decay_multiplier: 0.5,
            }
        );
        assert_eq!(engine.economy().money(), 0.0);
        assert_eq!(engine.economy().research(), 30.0);
        assert_eq!(engine.purchase_railguards(), Err(Rejection::AlreadyPurchased));
        assert_eq!(engine.ai().alignment_decay_multiplier(), 0.5);
    }

    #[test]
    fn rogue_ai_ends_the_game() {
        let mut engine = engine_with(|config| config.risk.base = 0.9);
        let summary = engine.tick(1.0);
        assert!(summary.game_over);
        assert!(engine.is_game_over());

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.rogue_triggers, vec![RogueTrigger::RiskExceeded]);
        let events = engine.drain_events();
        assert!(matches!(events.last(), Some(EngineEvent::GameOver { .. })));
    }

    #[test]
    fn game_over_freezes_everything() {
        let mut engine = engine_with(|config| config.risk.base = 0.9);
        let _ = engine.tick(1.0);
        let before = engine.snapshot();

        let summary = engine.tick(50.0);
        assert_eq!(summary.time_delta, 0.0);
        assert!(summary.game_over);
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.clock().last_update(), 50.0);

        for command in [
            Command::ToggleTool(ToolId::BasicMonitor),
            Command::StartReload,
            Command::StartRetrain,
            Command::ToggleShutdown,
            Command::PurchaseRailguards,
        ] {
            assert_eq!(engine.handle_command(command), Err(Rejection::GameOver));
        }
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn text_commands_are_parsed() {
        let mut engine = engine();
        let event = engine.handle_command_str("toggle_tool:basic_monitor").unwrap();
        assert!(matches!(event, EngineEvent::ToolActivated { .. }));

        assert_eq!(
            engine.handle_command_str("toggle_tool:mind_reader"),
            Err(Rejection::Parse {
                source: ParseCommandError::UnknownTool {
                    name: "mind_reader".to_owned(),
                },
            })
        );
        assert!(matches!(
            engine.handle_command_str("dance"),
            Err(Rejection::Parse { .. })
        ));
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut engine = engine();
        let _ = engine.toggle_shutdown().unwrap();
        let _ = engine.toggle_shutdown().unwrap();
        assert_eq!(engine.drain_events().len(), 2);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn backwards_time_is_a_zero_step() {
        let mut engine = engine();
        let _ = engine.tick(5.0);
        let money = engine.economy().money();
        let summary = engine.tick(3.0);
        assert_eq!(summary.time_delta, 0.0);
        assert_eq!(engine.clock().elapsed(), 5.0);
        assert_eq!(engine.economy().money(), money);
    }

    #[test]
    fn same_seed_replays_identically() {
        let run = || {
            let mut engine = engine_with(|config| config.alignment.initial = 0.6);
            for step in 1..=40 {
                let _ = engine.tick(f64::from(step) * 0.5);
            }
            engine.snapshot()
        };
        assert_eq!(run(), run());
    }
}
