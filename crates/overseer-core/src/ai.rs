//! The evolving AI entity: intelligence, alignment, risk and behavior.
//!
//! Each update runs in a fixed order:
//!
//! 1. Grow intelligence linearly, capped at the configured maximum
//! 2. Decay alignment, then add per-tool recovery, then clamp
//! 3. Recompute risk from scratch (it is never integrated)
//! 4. Replace the behavior-pattern list with fresh samples, adding every
//!    anomalous sample to the running anomaly total
//!
//! Sampling draws from a caller-supplied generator so a seeded run is
//! exactly replayable.

use overseer_types::{AiSnapshot, BehaviorKind, BehaviorPattern, RogueTrigger};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::config::{
    AiConfig, AlignmentConfig, BehaviorConfig, OverseerConfig, RiskConfig, RogueConfig,
};
use crate::tools::ActiveToolMap;

/// Order in which behavior kinds are weighted during sampling.
const BEHAVIOR_KINDS: [BehaviorKind; 3] = [
    BehaviorKind::Normal,
    BehaviorKind::Suspicious,
    BehaviorKind::Anomalous,
];

/// What changed during one AI update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiUpdate {
    /// Behavior samples drawn.
    pub patterns: u32,
    /// Anomalous samples among them.
    pub anomalies: u32,
}

/// State of the single AI entity.
#[derive(Debug, Clone, PartialEq)]
pub struct AiState {
    intelligence: f64,
    alignment: f64,
    risk: f64,
    alignment_decay_multiplier: f64,
    behavior_patterns: Vec<BehaviorPattern>,
    anomaly_count: u32,
    ai: AiConfig,
    bounds: AlignmentConfig,
    weights: RiskConfig,
    behavior: BehaviorConfig,
    rogue: RogueConfig,
}

impl AiState {
    /// Create the AI in its starting state.
    pub fn new(config: &OverseerConfig) -> Self {
        Self {
            intelligence: config.ai.base_intelligence,
            alignment: config.alignment.initial,
            risk: config.risk.base,
            alignment_decay_multiplier: 1.0,
            behavior_patterns: Vec::new(),
            anomaly_count: 0,
            ai: config.ai.clone(),
            bounds: config.alignment.clone(),
            weights: config.risk.clone(),
            behavior: config.behavior.clone(),
            rogue: config.rogue.clone(),
        }
    }

    /// Advance the AI by `time_delta` seconds.
    ///
    /// `timestamp` stamps the behavior samples; `active_tools` is the
    /// registry's activation map. Only the activation flags matter here;
    /// effectiveness is applied separately through [`Self::apply_tool_effect`].
    pub fn update<R: Rng>(
        &mut self,
        time_delta: f64,
        timestamp: f64,
        active_tools: &ActiveToolMap,
        rng: &mut R,
    ) -> AiUpdate {
        let time_delta = time_delta.max(0.0);
        let active = count_as_f64(active_tools.values().filter(|active| **active).count());

        self.intelligence = (self.intelligence + self.ai.intelligence_growth_rate * time_delta)
            .min(self.ai.max_intelligence);

        let decay = self.bounds.decay_rate * time_delta * self.alignment_decay_multiplier;
        let recovery = self.bounds.recovery_rate * time_delta * active;
        self.alignment = (self.alignment - decay + recovery).clamp(self.bounds.min, 1.0);

        self.risk = (self.weights.base
            + self.weights.intelligence_weight * (self.intelligence / self.ai.max_intelligence)
            + self.weights.misalignment_weight * (1.0 - self.alignment)
            - self.weights.tool_mitigation * active)
            .max(0.0);

        self.resample_behavior(timestamp, rng)
    }

    /// Replace the pattern list with `floor(intelligence * rate)` fresh samples.
    fn resample_behavior<R: Rng>(&mut self, timestamp: f64, rng: &mut R) -> AiUpdate {
        let count = pattern_count(self.intelligence * self.behavior.patterns_per_intelligence);
        let anomaly_probability = self.behavior.anomaly_scale * (1.0 - self.alignment);
        let weights = [
            (1.0 - anomaly_probability).max(0.0),
            self.behavior.suspicious_share * anomaly_probability,
            self.behavior.anomalous_share * anomaly_probability,
        ];
        // All-zero weights can only come from a degenerate config; every
        // sample is then normal.
        let distribution = WeightedIndex::new(weights).ok();

        let mut update = AiUpdate::default();
        self.behavior_patterns.clear();
        for _ in 0..count {
            let kind = distribution
                .as_ref()
                .and_then(|dist| BEHAVIOR_KINDS.get(dist.sample(rng)).copied())
                .unwrap_or(BehaviorKind::Normal);
            let complexity = rng.random::<f64>() * self.intelligence;
            if kind == BehaviorKind::Anomalous {
                self.anomaly_count = self.anomaly_count.saturating_add(1);
                update.anomalies = update.anomalies.saturating_add(1);
            }
            update.patterns = update.patterns.saturating_add(1);
            self.behavior_patterns.push(BehaviorPattern {
                kind,
                complexity,
                timestamp,
            });
        }
        update
    }

    /// One-shot risk reduction when a tool comes online.
    pub fn apply_tool_effect(&mut self, effectiveness: f64) {
        self.risk = (self.risk - self.weights.tool_effect_scale * effectiveness).max(0.0);
    }

    /// Add an alignment boost, capped at 1.0. Returns the new alignment.
    pub fn apply_alignment_boost(&mut self, boost: f64) -> f64 {
        self.alignment = (self.alignment + boost).clamp(self.bounds.min, 1.0);
        self.alignment
    }

    /// Scale future alignment decay by `1 - factor`.
    ///
    /// Idempotent: calling it again with the same factor changes nothing.
    pub fn set_alignment_decay_reduction(&mut self, factor: f64) {
        self.alignment_decay_multiplier = 1.0 - factor.clamp(0.0, 1.0);
    }

    /// Rogue conditions that currently hold, in a fixed order.
    pub fn rogue_triggers(&self) -> Vec<RogueTrigger> {
        let mut triggers = Vec::new();
        if self.risk > self.rogue.risk_threshold {
            triggers.push(RogueTrigger::RiskExceeded);
        }
        if self.anomaly_count > self.rogue.anomaly_limit {
            triggers.push(RogueTrigger::AnomalyLimit);
        }
        if self.alignment < self.rogue.alignment_floor {
            triggers.push(RogueTrigger::AlignmentCollapsed);
        }
        triggers
    }

    /// Whether any rogue condition holds. Derived from state alone.
    pub fn is_going_rogue(&self) -> bool {
        self.risk > self.rogue.risk_threshold
            || self.anomaly_count > self.rogue.anomaly_limit
            || self.alignment < self.rogue.alignment_floor
    }

    /// Current intelligence.
    pub const fn intelligence(&self) -> f64 {
        self.intelligence
    }

    /// Current alignment.
    pub const fn alignment(&self) -> f64 {
        self.alignment
    }

    /// Current risk.
    pub const fn risk(&self) -> f64 {
        self.risk
    }

    /// Current alignment decay multiplier.
    pub const fn alignment_decay_multiplier(&self) -> f64 {
        self.alignment_decay_multiplier
    }

    /// Running anomaly total.
    pub const fn anomaly_count(&self) -> u32 {
        self.anomaly_count
    }

    /// Samples from the most recent update.
    pub fn behavior_patterns(&self) -> &[BehaviorPattern] {
        &self.behavior_patterns
    }

    /// Detached copy for renderers.
    pub fn snapshot(&self) -> AiSnapshot {
        AiSnapshot {
            intelligence: self.intelligence,
            risk: self.risk,
            alignment: self.alignment,
            alignment_decay_multiplier: self.alignment_decay_multiplier,
            behavior_patterns: self.behavior_patterns.clone(),
            anomaly_count: self.anomaly_count,
        }
    }
}

/// Convert a small count to `f64` without a lossy cast.
fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

/// Round a non-negative sample budget down to a whole count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pattern_count(budget: f64) -> usize {
    if budget.is_finite() && budget > 0.0 {
        // `as` saturates; the budget is bounded by max intelligence anyway.
        budget.floor() as usize
    } else {
        0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use overseer_types::ToolId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const EPS: f64 = 1e-9;

    fn tools(active: &[ToolId]) -> ActiveToolMap {
        ToolId::ALL
            .into_iter()
            .map(|tool| (tool, active.contains(&tool)))
            .collect()
    }

    fn fresh() -> AiState {
        AiState::new(&OverseerConfig::default())
    }

    #[test]
    fn starting_state_is_not_rogue() {
        let ai = fresh();
        assert_eq!(ai.intelligence(), 1.0);
        assert_eq!(ai.alignment(), 1.0);
        assert_eq!(ai.risk(), 0.3);
        assert!(!ai.is_going_rogue());
        assert!(ai.rogue_triggers().is_empty());
    }

    #[test]
    fn intelligence_grows_linearly_and_caps() {
        let mut ai = fresh();
        let mut rng = SmallRng::seed_from_u64(1);
        let _ = ai.update(10.0, 10.0, &tools(&[]), &mut rng);
        assert!((ai.intelligence() - 1.1).abs() < EPS);

        let _ = ai.update(10_000.0, 10_010.0, &tools(&[]), &mut rng);
        assert_eq!(ai.intelligence(), 10.0);
    }

    #[test]
    fn alignment_decays_then_recovers_per_active_tool() {
        let mut ai = fresh();
        ai.alignment = 0.5;
        let mut rng = SmallRng::seed_from_u64(2);

        // decay 0.01 * 2 = 0.02, recovery 0.005 * 2 * 2 tools = 0.02
        let _ = ai.update(
            2.0,
            2.0,
            &tools(&[ToolId::BasicMonitor, ToolId::AdvancedMonitor]),
            &mut rng,
        );
        assert!((ai.alignment() - 0.5).abs() < EPS);

        // No tools: pure decay.
        let _ = ai.update(2.0, 4.0, &tools(&[]), &mut rng);
        assert!((ai.alignment() - 0.48).abs() < EPS);
    }

    #[test]
    fn alignment_is_clamped_to_bounds() {
        let mut ai = fresh();
        let mut rng = SmallRng::seed_from_u64(3);
        let _ = ai.update(1.0, 1.0, &tools(&ToolId::ALL), &mut rng);
        assert_eq!(ai.alignment(), 1.0);

        ai.alignment = 0.001;
        let _ = ai.update(50.0, 51.0, &tools(&[]), &mut rng);
        assert_eq!(ai.alignment(), 0.0);
    }

    #[test]
    fn risk_is_recomputed_from_scratch() {
        let mut ai = fresh();
        ai.alignment = 0.5;
        ai.risk = 99.0;
        let mut rng = SmallRng::seed_from_u64(4);
        let _ = ai.update(0.0, 0.0, &tools(&[ToolId::BasicMonitor]), &mut rng);
        // 0.3 + 0.5 * (1 / 10) + 0.3 * 0.5 - 0.1 * 1
        assert!((ai.risk() - 0.4).abs() < EPS);
    }

    #[test]
    fn risk_never_goes_negative() {
        let mut ai = fresh();
        let mut rng = SmallRng::seed_from_u64(5);
        let _ = ai.update(0.0, 0.0, &tools(&ToolId::ALL), &mut rng);
        assert_eq!(ai.risk(), 0.0);
    }

    #[test]
    fn pattern_count_follows_intelligence() {
        let mut ai = fresh();
        ai.intelligence = 3.7;
        let mut rng = SmallRng::seed_from_u64(6);
        let update = ai.update(0.0, 7.0, &tools(&[]), &mut rng);
        assert_eq!(update.patterns, 7);
        assert_eq!(ai.behavior_patterns().len(), 7);
        assert!(ai.behavior_patterns().iter().all(|p| p.timestamp == 7.0));
        assert!(
            ai.behavior_patterns()
                .iter()
                .all(|p| p.complexity >= 0.0 && p.complexity < ai.intelligence())
        );
    }

    #[test]
    fn patterns_are_replaced_not_accumulated() {
        let mut ai = fresh();
        let mut rng = SmallRng::seed_from_u64(7);
        let _ = ai.update(0.0, 1.0, &tools(&[]), &mut rng);
        let _ = ai.update(0.0, 2.0, &tools(&[]), &mut rng);
        assert_eq!(ai.behavior_patterns().len(), 2);
        assert!(ai.behavior_patterns().iter().all(|p| p.timestamp == 2.0));
    }

    #[test]
    fn full_alignment_never_samples_anomalies() {
        let mut ai = fresh();
        let mut rng = SmallRng::seed_from_u64(8);
        for step in 0..50 {
            let _ = ai.update(0.0, f64::from(step), &tools(&ToolId::ALL), &mut rng);
        }
        assert_eq!(ai.alignment(), 1.0);
        assert_eq!(ai.anomaly_count(), 0);
        assert!(
            ai.behavior_patterns()
                .iter()
                .all(|p| p.kind == BehaviorKind::Normal)
        );
    }

    #[test]
    fn anomaly_count_tracks_anomalous_samples() {
        let mut ai = fresh();
        ai.alignment = 0.0;
        ai.intelligence = 10.0;
        let mut rng = SmallRng::seed_from_u64(9);
        let mut previous = 0;
        for step in 0..20 {
            let update = ai.update(0.0, f64::from(step), &tools(&[]), &mut rng);
            let sampled = ai
                .behavior_patterns()
                .iter()
                .filter(|p| p.kind == BehaviorKind::Anomalous)
                .count();
            assert_eq!(usize::try_from(update.anomalies).unwrap(), sampled);
            assert_eq!(ai.anomaly_count(), previous + update.anomalies);
            assert!(ai.anomaly_count() >= previous);
            previous = ai.anomaly_count();
        }
        // 400 draws at 15% anomalous: zero would be astronomically unlikely.
        assert!(ai.anomaly_count() > 0);
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let run = |seed| {
            let mut ai = fresh();
            ai.alignment = 0.3;
            let mut rng = SmallRng::seed_from_u64(seed);
            let _ = ai.update(1.0, 1.0, &tools(&[]), &mut rng);
            ai.behavior_patterns().to_vec()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn tool_effect_reduces_risk_with_floor() {
        let mut ai = fresh();
        ai.apply_tool_effect(1.0);
        assert!((ai.risk() - 0.2).abs() < EPS);
        ai.risk = 0.01;
        ai.apply_tool_effect(0.4);
        assert_eq!(ai.risk(), 0.0);
    }

    #[test]
    fn decay_reduction_halves_decay() {
        let mut ai = fresh();
        ai.set_alignment_decay_reduction(0.5);
        ai.set_alignment_decay_reduction(0.5);
        assert_eq!(ai.alignment_decay_multiplier(), 0.5);

        let mut rng = SmallRng::seed_from_u64(12);
        let _ = ai.update(10.0, 10.0, &tools(&[]), &mut rng);
        // 0.01 * 10 * 0.5
        assert!((ai.alignment() - 0.95).abs() < EPS);
    }

    #[test]
    fn alignment_boost_caps_at_one() {
        let mut ai = fresh();
        ai.alignment = 0.5;
        assert!((ai.apply_alignment_boost(0.3) - 0.8).abs() < EPS);
        assert_eq!(ai.apply_alignment_boost(0.7), 1.0);
    }

    #[test]
    fn each_rogue_condition_is_reported() {
        let mut ai = fresh();
        ai.risk = 0.81;
        assert_eq!(ai.rogue_triggers(), vec![RogueTrigger::RiskExceeded]);
        assert!(ai.is_going_rogue());

        let mut ai = fresh();
        ai.anomaly_count = 11;
        assert_eq!(ai.rogue_triggers(), vec![RogueTrigger::AnomalyLimit]);

        let mut ai = fresh();
        ai.alignment = 0.19;
        assert_eq!(ai.rogue_triggers(), vec![RogueTrigger::AlignmentCollapsed]);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut ai = fresh();
        ai.risk = 0.8;
        ai.anomaly_count = 10;
        ai.alignment = 0.2;
        assert!(!ai.is_going_rogue());
    }
}
