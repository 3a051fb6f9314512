use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::automaton;
use crate::error::WorldError;

/// Largest accepted activity log.
pub const MAX_LOG_CAPACITY: usize = 10_000;

/// Tunable world parameters. Every field has a default, so a host may pass a
/// partial object (or nothing at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    /// Agents spawned by `start_world`.
    pub founding_population: usize,
    /// Living agents at or above this count block replication.
    pub max_population: usize,
    /// Below this many living agents the loop tries to spawn replacements.
    pub respawn_floor: usize,
    /// Per-frame replacement chance, multiplied by the speed.
    pub respawn_chance: f64,
    /// Base compute cost charged by every heartbeat.
    pub compute_cost: f64,
    /// Extra heartbeat cost per level, as a fraction of the base cost.
    pub level_cost_factor: f64,
    /// Balance an agent must exceed before it may replicate.
    pub replicate_threshold: f64,
    /// Flat cost paid by the parent on replication.
    pub replicate_cost: f64,
    /// Maximum number of retained activity log entries.
    pub log_capacity: usize,
    /// Frames between refreshes of the cached leaderboard/summary views.
    pub view_refresh_interval: u32,
    /// Automaton steps every `automaton_base_interval / speed` frames.
    pub automaton_base_interval: u32,
    pub automaton_cols: usize,
    pub automaton_rows: usize,
    /// Chance that a cell starts alive.
    pub automaton_density: f64,
    /// Fixed RNG seed. Hosts without one get a random seed.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            founding_population: 6,
            max_population: 20,
            respawn_floor: 4,
            respawn_chance: 0.008,
            compute_cost: 0.08,
            level_cost_factor: 0.05,
            replicate_threshold: 300.0,
            replicate_cost: 200.0,
            log_capacity: 200,
            view_refresh_interval: 25,
            automaton_base_interval: 120,
            automaton_cols: 60,
            automaton_rows: 30,
            automaton_density: 0.18,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.log_capacity == 0 {
            return Err(WorldError::ZeroLogCapacity);
        }
        if self.log_capacity > MAX_LOG_CAPACITY {
            return Err(WorldError::LogCapacityTooLarge {
                capacity: self.log_capacity,
                max: MAX_LOG_CAPACITY,
            });
        }
        if self.founding_population > self.max_population {
            return Err(WorldError::FoundersExceedCap {
                founders: self.founding_population,
                cap: self.max_population,
            });
        }
        for (field, value) in [
            ("computeCost", self.compute_cost),
            ("levelCostFactor", self.level_cost_factor),
            ("replicateThreshold", self.replicate_threshold),
            ("replicateCost", self.replicate_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WorldError::InvalidRate { field, value });
            }
        }
        // A parent must stay solvent after paying for its child.
        if self.replicate_cost >= self.replicate_threshold {
            return Err(WorldError::ReplicateCostExceedsThreshold {
                cost: self.replicate_cost,
                threshold: self.replicate_threshold,
            });
        }
        for (field, value) in [
            ("respawnChance", self.respawn_chance),
            ("automatonDensity", self.automaton_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WorldError::InvalidProbability { field, value });
            }
        }
        automaton::check_dimensions(self.automaton_cols, self.automaton_rows)?;
        if self.view_refresh_interval == 0 {
            return Err(WorldError::ZeroRefreshInterval);
        }
        Ok(())
    }

    /// Heartbeat cost for an agent at `level`.
    pub fn heartbeat_cost(&self, level: u32) -> f64 {
        self.compute_cost * (1.0 + level as f64 * self.level_cost_factor)
    }
}
