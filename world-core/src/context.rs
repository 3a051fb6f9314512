use rand::Rng;

use crate::agent::Agent;
use crate::clock::WorldClock;
use crate::config::WorldConfig;
use crate::log::ActivityLog;
use crate::stats::WorldStats;
use crate::types::ActivityKind;

/// Mutable world services handed to per-agent behavior for one update.
///
/// Built by splitting borrows of `World`, so an agent can be mutated while the
/// log, stats and rng are written to.
pub struct TickContext<'a, R: Rng> {
    pub rng: &'a mut R,
    pub log: &'a mut ActivityLog,
    pub stats: &'a mut WorldStats,
    pub config: &'a WorldConfig,
    pub clock: WorldClock,
    /// Living agents at the start of this agent's update.
    pub living: usize,
}

impl<R: Rng> TickContext<'_, R> {
    pub fn narrate(&mut self, agent: &Agent, kind: ActivityKind, icon: &str, text: impl Into<String>) {
        self.log.record(self.clock, kind, agent.actor(), icon, text);
    }

    /// Uniform draw in [0, 1).
    pub fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
