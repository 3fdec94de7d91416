//! Tick observer that turns engine activity into log lines.
//!
//! Events are logged at `info`, rejected commands at `warn`, and a status
//! line every `status_every` ticks at `info`. Everything else goes to
//! `debug`.

use overseer_core::runner::{RejectedCommand, TickObserver};
use overseer_core::TickSummary;
use overseer_types::{EngineEvent, EngineSnapshot};
use tracing::{debug, info, warn};

/// Observer that logs through `tracing`.
pub struct LoggingObserver {
    status_every: u64,
    ticks: u64,
    events: u64,
}

impl LoggingObserver {
    /// Log a status line every `status_every` ticks (0 disables them).
    pub const fn new(status_every: u64) -> Self {
        Self {
            status_every,
            ticks: 0,
            events: 0,
        }
    }

    /// Events seen so far.
    pub const fn events_seen(&self) -> u64 {
        self.events
    }
}

impl TickObserver for LoggingObserver {
    fn on_tick(&mut self, summary: &TickSummary, snapshot: &EngineSnapshot, events: &[EngineEvent]) {
        self.ticks = self.ticks.saturating_add(1);

        for event in events {
            self.events = self.events.saturating_add(1);
            info!(at = event.at(), ?event, "Engine event");
        }

        debug!(
            now = summary.now,
            delta = summary.time_delta,
            frozen = summary.frozen,
            money = snapshot.money,
            reports = snapshot.reports,
            "Tick observed"
        );

        if self.ticks.checked_rem(self.status_every) == Some(0) {
            info!(
                elapsed = snapshot.elapsed_time,
                money = snapshot.money,
                research = snapshot.research,
                reports = snapshot.reports,
                intelligence = snapshot.ai.intelligence,
                alignment = snapshot.ai.alignment,
                risk = snapshot.ai.risk,
                anomalies = snapshot.ai.anomaly_count,
                active_tools = snapshot.active_tool_count(),
                risk_level = ?snapshot.assessment.risk_level,
                alignment_impact = ?snapshot.assessment.alignment_impact,
                "Status"
            );
        }
    }

    fn on_rejected(&mut self, rejected: &RejectedCommand) {
        warn!(
            at = rejected.at,
            command = %rejected.command,
            reason = %rejected.reason,
            "Scheduled command rejected"
        );
    }
}
