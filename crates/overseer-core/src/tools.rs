//! Monitoring tool catalog and activation state.
//!
//! The registry only answers questions and flips activation flags. It never
//! touches money or research: charging for a purchase is the engine's job,
//! done exactly once before [`ToolRegistry::activate`] is called.

use std::collections::BTreeMap;

use overseer_types::{ToolId, ToolStatus};

use crate::config::{ToolCatalogConfig, ToolSpec};

/// Activation flag per tool, as consumed by [`crate::ai::AiState::update`].
pub type ActiveToolMap = BTreeMap<ToolId, bool>;

/// One catalog entry and its activation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    /// Which tool this is.
    pub id: ToolId,
    /// Fixed parameters from configuration.
    pub spec: ToolSpec,
    /// Whether the tool is currently active.
    pub active: bool,
}

/// The fixed set of monitoring tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolId, Tool>,
}

impl ToolRegistry {
    /// Build the registry with every tool inactive.
    pub fn new(catalog: &ToolCatalogConfig) -> Self {
        let tools = ToolId::ALL
            .into_iter()
            .map(|id| {
                (
                    id,
                    Tool {
                        id,
                        spec: catalog.spec(id).clone(),
                        active: false,
                    },
                )
            })
            .collect();
        Self { tools }
    }

    /// Look up a tool.
    pub fn get(&self, id: ToolId) -> Option<&Tool> {
        self.tools.get(&id)
    }

    /// Whether the given funds cover the tool's cost and research requirement.
    ///
    /// Pure predicate: nothing is deducted.
    pub fn purchase_eligible(&self, id: ToolId, money: f64, research: f64) -> bool {
        self.tools
            .get(&id)
            .is_some_and(|tool| money >= tool.spec.cost && research >= tool.spec.research_requirement)
    }

    /// Switch a tool on. Returns `false` if it was already on or is unknown.
    pub fn activate(&mut self, id: ToolId) -> bool {
        self.set_active(id, true)
    }

    /// Switch a tool off. Returns `false` if it was already off or is unknown.
    pub fn deactivate(&mut self, id: ToolId) -> bool {
        self.set_active(id, false)
    }

    fn set_active(&mut self, id: ToolId, active: bool) -> bool {
        match self.tools.get_mut(&id) {
            Some(tool) if tool.active != active => {
                tool.active = active;
                true
            }
            _ => false,
        }
    }

    /// Whether a tool is active.
    pub fn is_active(&self, id: ToolId) -> bool {
        self.tools.get(&id).is_some_and(|tool| tool.active)
    }

    /// Activation flag for every tool.
    pub fn active_map(&self) -> ActiveToolMap {
        self.tools
            .iter()
            .map(|(id, tool)| (*id, tool.active))
            .collect()
    }

    /// Total energy drawn by active tools.
    pub fn active_energy_draw(&self) -> f64 {
        self.tools
            .values()
            .filter(|tool| tool.active)
            .map(|tool| tool.spec.energy_consumption)
            .sum()
    }

    /// Status of every tool for snapshots.
    pub fn status(&self) -> BTreeMap<ToolId, ToolStatus> {
        self.tools
            .iter()
            .map(|(id, tool)| {
                (
                    *id,
                    ToolStatus {
                        name: id.display_name().to_owned(),
                        active: tool.active,
                        effectiveness: tool.spec.effectiveness,
                        cost: tool.spec.cost,
                        research_requirement: tool.spec.research_requirement,
                        energy_consumption: tool.spec.energy_consumption,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(&ToolCatalogConfig::default())
    }

    #[test]
    fn all_tools_start_inactive() {
        let tools = registry();
        assert_eq!(tools.active_map().len(), 5);
        assert!(tools.active_map().values().all(|active| !active));
        assert_eq!(tools.active_energy_draw(), 0.0);
    }

    #[test]
    fn eligibility_needs_money_and_research() {
        let tools = registry();
        assert!(tools.purchase_eligible(ToolId::BasicMonitor, 500.0, 0.0));
        assert!(!tools.purchase_eligible(ToolId::BasicMonitor, 499.0, 0.0));
        assert!(!tools.purchase_eligible(ToolId::AdvancedMonitor, 5000.0, 49.0));
        assert!(tools.purchase_eligible(ToolId::AdvancedMonitor, 2000.0, 50.0));
    }

    #[test]
    fn activation_is_idempotent() {
        let mut tools = registry();
        assert!(tools.activate(ToolId::PredictiveSystem));
        assert!(!tools.activate(ToolId::PredictiveSystem));
        assert!(tools.is_active(ToolId::PredictiveSystem));

        assert!(tools.deactivate(ToolId::PredictiveSystem));
        assert!(!tools.deactivate(ToolId::PredictiveSystem));
        assert!(!tools.is_active(ToolId::PredictiveSystem));
    }

    #[test]
    fn active_map_reflects_flags() {
        let mut tools = registry();
        let _ = tools.activate(ToolId::BasicMonitor);
        let _ = tools.activate(ToolId::EmergencyProtocol);
        let map = tools.active_map();
        assert_eq!(map.get(&ToolId::BasicMonitor), Some(&true));
        assert_eq!(map.get(&ToolId::AdvancedMonitor), Some(&false));
        assert_eq!(map.get(&ToolId::EmergencyProtocol), Some(&true));
        assert!((tools.active_energy_draw() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn status_reports_catalog_values() {
        let tools = registry();
        let status = tools.status();
        let automated = status.get(&ToolId::AutomatedAnalysis).unwrap();
        assert_eq!(automated.name, "Automated Analysis");
        assert_eq!(automated.cost, 5000.0);
        assert_eq!(automated.research_requirement, 200.0);
        assert_eq!(automated.effectiveness, 0.6);
        assert!(!automated.active);
    }
}
