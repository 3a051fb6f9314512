use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

pub mod activity;
pub mod agent;
pub mod automaton;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod context;
pub mod defi;
pub mod error;
pub mod lifecycle;
pub mod log;
pub mod policy;
pub mod schedule;
pub mod snapshot;
pub mod stats;
pub mod tick;
pub mod types;
pub mod world;

pub use agent::Agent;
pub use automaton::Automaton;
pub use clock::WorldClock;
pub use config::WorldConfig;
pub use error::WorldError;
pub use log::{ActivityEntry, ActivityFeed, ActivityLog};
pub use snapshot::{
    AgentSnapshot, DerivedViews, Leaderboard, LeaderboardEntry, WorldSnapshot, WorldSummary,
};
pub use stats::WorldStats;
pub use types::*;
pub use world::World;

#[cfg(feature = "instrument")]
pub use instrument;

// ============================================================================
// WASM API - AgentWorld
// ============================================================================

#[wasm_bindgen]
pub struct AgentWorld {
    world: World,
}

#[wasm_bindgen]
impl AgentWorld {
    /// Build a world from an optional (possibly partial) config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AgentWorld, JsValue> {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        let mut config = if config.is_null() || config.is_undefined() {
            WorldConfig::default()
        } else {
            from_value::<WorldConfig>(config).map_err(js_error)?
        };
        if config.seed.is_none() {
            config.seed = Some(browser_seed());
        }

        let world = World::new(config).map_err(js_error)?;
        Ok(Self { world })
    }

    // === Controls ===

    /// Spawn the founders and start. Returns false if already running.
    #[wasm_bindgen(js_name = startWorld)]
    pub fn start_world(&mut self) -> bool {
        self.world.start_world()
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.world.pause();
    }

    #[wasm_bindgen]
    pub fn resume(&mut self) {
        self.world.resume();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> bool {
        self.world.toggle_pause()
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, multiplier: u32) -> Result<(), JsValue> {
        self.world.set_speed(multiplier).map_err(js_error)
    }

    #[wasm_bindgen(js_name = cycleSpeed)]
    pub fn cycle_speed(&mut self) -> u32 {
        self.world.cycle_speed()
    }

    /// Call once per animation frame.
    #[wasm_bindgen(js_name = advanceFrame)]
    pub fn advance_frame(&mut self) -> bool {
        self.world.advance_frame()
    }

    #[wasm_bindgen]
    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.world.restart().map_err(js_error)
    }

    #[wasm_bindgen(js_name = spawnFounder)]
    pub fn spawn_founder(&mut self) -> u32 {
        self.world.spawn_founder().0
    }

    // === Queries ===

    #[wasm_bindgen]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Newest-first feed. `filter` is `"all"` (or absent) or one activity kind.
    #[wasm_bindgen]
    pub fn activity(&self, filter: Option<String>, limit: u32) -> Result<ActivityFeed, JsValue> {
        let filter = parse_filter(filter.as_deref()).map_err(js_error)?;
        Ok(self.world.activity(filter, limit as usize))
    }

    /// Live ranking of every agent, dead included.
    #[wasm_bindgen]
    pub fn leaderboard(&self, limit: u32) -> Leaderboard {
        self.world.leaderboard(limit as usize)
    }

    /// Top agents as of the last view refresh.
    #[wasm_bindgen(js_name = cachedLeaderboard)]
    pub fn cached_leaderboard(&self) -> Leaderboard {
        self.world.views().leaderboard.clone()
    }

    #[wasm_bindgen]
    pub fn summary(&self) -> WorldSummary {
        self.world.summary()
    }

    #[wasm_bindgen(js_name = cachedSummary)]
    pub fn cached_summary(&self) -> WorldSummary {
        self.world.views().summary.clone()
    }

    #[wasm_bindgen]
    pub fn stats(&self) -> WorldStats {
        self.world.stats().clone()
    }

    /// Row-major 0/1 cells of the background automaton.
    #[wasm_bindgen(js_name = automatonCells)]
    pub fn automaton_cells(&self) -> Vec<u8> {
        self.world.automaton().cells().to_vec()
    }

    #[wasm_bindgen(js_name = automatonCols)]
    pub fn automaton_cols(&self) -> usize {
        self.world.automaton().cols()
    }

    #[wasm_bindgen(js_name = automatonRows)]
    pub fn automaton_rows(&self) -> usize {
        self.world.automaton().rows()
    }

    #[wasm_bindgen]
    pub fn tick(&self) -> u64 {
        self.world.clock().time
    }

    #[wasm_bindgen(js_name = clockLabel)]
    pub fn clock_label(&self) -> String {
        self.world.clock().label()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.world.run_state().running
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.world.run_state().paused
    }

    #[wasm_bindgen]
    pub fn speed(&self) -> u32 {
        self.world.speed().multiplier()
    }
}

#[wasm_bindgen(js_name = defaultConfig)]
pub fn default_config() -> WorldConfig {
    WorldConfig::default()
}

fn parse_filter(filter: Option<&str>) -> Result<ActivityFilter, WorldError> {
    filter.map_or(Ok(ActivityFilter::All), str::parse::<ActivityFilter>)
}

/// 64-bit seed from two `Math.random` draws.
fn browser_seed() -> u64 {
    let draw = || (js_sys::Math::random() * u32::MAX as f64) as u64;
    (draw() << 32) | draw()
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
