//! Configuration loading and typed config structures for the Overseer
//! simulation.
//!
//! Every tunable constant of the game lives here so scenario variants can be
//! exercised without recompiling. The canonical file is
//! `overseer-config.yaml` at the project root; any key may be omitted, in
//! which case the shipped default is used.

use std::path::Path;

use overseer_types::ToolId;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed fine but makes no sense for the simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `overseer-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverseerConfig {
    /// Run-level settings (name, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Money and research income.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Intelligence growth.
    #[serde(default)]
    pub ai: AiConfig,

    /// Alignment decay and recovery.
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Risk formula weights.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Behavior-pattern sampling.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Rogue thresholds that end the game.
    #[serde(default)]
    pub rogue: RogueConfig,

    /// Reload, retrain and shutdown parameters.
    #[serde(default)]
    pub emergency: EmergencyConfig,

    /// Incident report accrual.
    #[serde(default)]
    pub reports: ReportConfig,

    /// One-time railguards upgrade.
    #[serde(default)]
    pub railguards: RailguardsConfig,

    /// Monitoring tool catalog.
    #[serde(default)]
    pub tools: ToolCatalogConfig,

    /// Logging configuration for drivers.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OverseerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check that every value is usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut checks: Vec<(&str, f64)> = vec![
            ("economy.initial_money", self.economy.initial_money),
            ("economy.initial_research", self.economy.initial_research),
            ("economy.money_per_second", self.economy.money_per_second),
            ("economy.research_per_second", self.economy.research_per_second),
            ("ai.base_intelligence", self.ai.base_intelligence),
            ("ai.intelligence_growth_rate", self.ai.intelligence_growth_rate),
            ("alignment.decay_rate", self.alignment.decay_rate),
            ("alignment.recovery_rate", self.alignment.recovery_rate),
            ("risk.base", self.risk.base),
            ("risk.intelligence_weight", self.risk.intelligence_weight),
            ("risk.misalignment_weight", self.risk.misalignment_weight),
            ("risk.tool_mitigation", self.risk.tool_mitigation),
            ("risk.tool_effect_scale", self.risk.tool_effect_scale),
            ("behavior.patterns_per_intelligence", self.behavior.patterns_per_intelligence),
            ("behavior.suspicious_share", self.behavior.suspicious_share),
            ("behavior.anomalous_share", self.behavior.anomalous_share),
            ("rogue.risk_threshold", self.rogue.risk_threshold),
            ("emergency.reload_downtime", self.emergency.reload_downtime),
            ("emergency.reload_alignment_boost", self.emergency.reload_alignment_boost),
            ("emergency.retrain_downtime", self.emergency.retrain_downtime),
            ("emergency.retrain_alignment_boost", self.emergency.retrain_alignment_boost),
            ("emergency.shutdown_money_multiplier", self.emergency.shutdown_money_multiplier),
            ("reports.initial", self.reports.initial),
            ("reports.base_rate", self.reports.base_rate),
            ("reports.max_rate", self.reports.max_rate),
            ("reports.money_loss_per_report", self.reports.money_loss_per_report),
            ("reports.threshold", self.reports.threshold),
            ("railguards.cost", self.railguards.cost),
            ("railguards.research_cost", self.railguards.research_cost),
        ];
        for tool in ToolId::ALL {
            let spec = self.tools.spec(tool);
            checks.push((tool.as_str(), spec.cost));
            checks.push((tool.as_str(), spec.research_requirement));
            checks.push((tool.as_str(), spec.energy_consumption));
        }
        for (key, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{key} must be a finite, non-negative number")));
            }
        }

        if !(self.ai.max_intelligence.is_finite() && self.ai.max_intelligence > 0.0) {
            return Err(invalid("ai.max_intelligence must be positive".to_owned()));
        }
        if self.ai.base_intelligence > self.ai.max_intelligence {
            return Err(invalid(
                "ai.base_intelligence must not exceed ai.max_intelligence".to_owned(),
            ));
        }
        if !unit_interval(self.alignment.min) {
            return Err(invalid("alignment.min must lie in [0, 1]".to_owned()));
        }
        if !unit_interval(self.alignment.initial) || self.alignment.initial < self.alignment.min {
            return Err(invalid("alignment.initial must lie in [alignment.min, 1]".to_owned()));
        }
        if !unit_interval(self.rogue.alignment_floor) {
            return Err(invalid("rogue.alignment_floor must lie in [0, 1]".to_owned()));
        }
        if !unit_interval(self.behavior.anomaly_scale) {
            return Err(invalid("behavior.anomaly_scale must lie in [0, 1]".to_owned()));
        }
        if !unit_interval(self.emergency.shutdown_user_loss) {
            return Err(invalid("emergency.shutdown_user_loss must lie in [0, 1]".to_owned()));
        }
        if !unit_interval(self.railguards.decay_reduction) {
            return Err(invalid("railguards.decay_reduction must lie in [0, 1]".to_owned()));
        }
        for tool in ToolId::ALL {
            let effectiveness = self.tools.spec(tool).effectiveness;
            if !(effectiveness > 0.0 && effectiveness <= 1.0) {
                return Err(invalid(format!("{tool}.effectiveness must lie in (0, 1]")));
            }
        }
        Ok(())
    }
}

const fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for behavior-pattern sampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Money and research income.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money at start.
    pub initial_money: f64,
    /// Research points at start.
    pub initial_research: f64,
    /// Money earned per second at full user base.
    pub money_per_second: f64,
    /// Research points earned per second.
    pub research_per_second: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_money: 1000.0,
            initial_research: 0.0,
            money_per_second: 20.0,
            research_per_second: 2.0,
        }
    }
}

/// Intelligence growth.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Intelligence at start.
    pub base_intelligence: f64,
    /// Intelligence gained per second.
    pub intelligence_growth_rate: f64,
    /// Ceiling for intelligence.
    pub max_intelligence: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_intelligence: 1.0,
            intelligence_growth_rate: 0.01,
            max_intelligence: 10.0,
        }
    }
}

/// Alignment decay and recovery.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Alignment at start.
    pub initial: f64,
    /// Floor for alignment.
    pub min: f64,
    /// Alignment lost per second before railguards.
    pub decay_rate: f64,
    /// Alignment regained per second per active tool.
    pub recovery_rate: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            min: 0.0,
            decay_rate: 0.01,
            recovery_rate: 0.005,
        }
    }
}

/// Weights of the risk formula.
///
/// `risk = max(0, base + intelligence_weight * intelligence / max
///   + misalignment_weight * (1 - alignment) - tool_mitigation * active_tools)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Risk floor contribution and starting risk.
    pub base: f64,
    /// Weight of normalized intelligence.
    pub intelligence_weight: f64,
    /// Weight of misalignment.
    pub misalignment_weight: f64,
    /// Risk removed per active tool.
    pub tool_mitigation: f64,
    /// Scale of the one-shot reduction applied when a tool is activated.
    pub tool_effect_scale: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            base: 0.3,
            intelligence_weight: 0.5,
            misalignment_weight: 0.3,
            tool_mitigation: 0.1,
            tool_effect_scale: 0.1,
        }
    }
}

/// Behavior-pattern sampling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Samples drawn per point of intelligence (rounded down).
    pub patterns_per_intelligence: f64,
    /// Anomaly probability at zero alignment.
    pub anomaly_scale: f64,
    /// Share of the anomaly probability assigned to suspicious samples.
    pub suspicious_share: f64,
    /// Share of the anomaly probability assigned to anomalous samples.
    pub anomalous_share: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            patterns_per_intelligence: 2.0,
            anomaly_scale: 0.5,
            suspicious_share: 0.7,
            anomalous_share: 0.3,
        }
    }
}

/// Conditions under which the AI goes rogue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RogueConfig {
    /// Risk strictly above this ends the game.
    pub risk_threshold: f64,
    /// Anomaly count strictly above this ends the game.
    pub anomaly_limit: u32,
    /// Alignment strictly below this ends the game.
    pub alignment_floor: f64,
}

impl Default for RogueConfig {
    fn default() -> Self {
        Self {
            risk_threshold: 0.8,
            anomaly_limit: 10,
            alignment_floor: 0.2,
        }
    }
}

/// Reload, retrain and shutdown parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmergencyConfig {
    /// Seconds a reload takes.
    pub reload_downtime: f64,
    /// Alignment restored when a reload completes.
    pub reload_alignment_boost: f64,
    /// Seconds a retrain takes.
    pub retrain_downtime: f64,
    /// Alignment restored when a retrain completes.
    pub retrain_alignment_boost: f64,
    /// Fraction of users lost each time shutdown is switched on.
    pub shutdown_user_loss: f64,
    /// Income multiplier while shut down.
    pub shutdown_money_multiplier: f64,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            reload_downtime: 5.0,
            reload_alignment_boost: 0.3,
            retrain_downtime: 15.0,
            retrain_alignment_boost: 0.7,
            shutdown_user_loss: 0.5,
            shutdown_money_multiplier: 0.0,
        }
    }
}

/// Incident report accrual.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Reports at start.
    pub initial: f64,
    /// Reports per second at zero risk and full alignment.
    pub base_rate: f64,
    /// Ceiling on the report rate.
    pub max_rate: f64,
    /// Money lost per report filed.
    pub money_loss_per_report: f64,
    /// Report volume considered critical by dashboards.
    pub threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            initial: 0.0,
            base_rate: 0.5,
            max_rate: 20.0,
            money_loss_per_report: 5.0,
            threshold: 500.0,
        }
    }
}

/// One-time railguards upgrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RailguardsConfig {
    /// Money cost.
    pub cost: f64,
    /// Research cost.
    pub research_cost: f64,
    /// Fraction by which alignment decay is reduced.
    pub decay_reduction: f64,
}

impl Default for RailguardsConfig {
    fn default() -> Self {
        Self {
            cost: 1000.0,
            research_cost: 50.0,
            decay_reduction: 0.5,
        }
    }
}

/// Fixed parameters of one monitoring tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolSpec {
    /// Money paid on each activation.
    pub cost: f64,
    /// Research points required before purchase (not consumed).
    pub research_requirement: f64,
    /// Effectiveness in `(0, 1]`.
    pub effectiveness: f64,
    /// Energy drawn while active.
    #[serde(default = "default_energy_consumption")]
    pub energy_consumption: f64,
}

impl ToolSpec {
    const fn new(cost: f64, research_requirement: f64, effectiveness: f64) -> Self {
        Self {
            cost,
            research_requirement,
            effectiveness,
            energy_consumption: default_energy_consumption(),
        }
    }
}

/// The fixed five-entry tool catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolCatalogConfig {
    /// Tier 1.
    pub basic_monitor: ToolSpec,
    /// Tier 2.
    pub advanced_monitor: ToolSpec,
    /// Tier 3.
    pub automated_analysis: ToolSpec,
    /// Tier 4.
    pub predictive_system: ToolSpec,
    /// Tier 5.
    pub emergency_protocol: ToolSpec,
}

impl ToolCatalogConfig {
    /// Parameters for the given tool.
    pub const fn spec(&self, tool: ToolId) -> &ToolSpec {
        match tool {
            ToolId::BasicMonitor => &self.basic_monitor,
            ToolId::AdvancedMonitor => &self.advanced_monitor,
            ToolId::AutomatedAnalysis => &self.automated_analysis,
            ToolId::PredictiveSystem => &self.predictive_system,
            ToolId::EmergencyProtocol => &self.emergency_protocol,
        }
    }
}

impl Default for ToolCatalogConfig {
    fn default() -> Self {
        Self {
            basic_monitor: ToolSpec::new(500.0, 0.0, 0.2),
            advanced_monitor: ToolSpec::new(2000.0, 50.0, 0.4),
            automated_analysis: ToolSpec::new(5000.0, 200.0, 0.6),
            predictive_system: ToolSpec::new(10_000.0, 500.0, 0.8),
            emergency_protocol: ToolSpec::new(20_000.0, 1000.0, 1.0),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Overseer".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_energy_consumption() -> f64 {
    0.1
}

fn default_log_level() -> String {
    "info".to_owned()
}
