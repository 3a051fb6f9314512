// World registry and frame loop for the agent simulation

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::agent::Agent;
use crate::automaton::Automaton;
use crate::clock::WorldClock;
use crate::config::WorldConfig;
use crate::context::TickContext;
use crate::error::WorldError;
use crate::lifecycle;
use crate::log::{ActivityFeed, ActivityLog};
use crate::schedule::{self, Cadence, RunState};
use crate::snapshot::{self, DerivedViews, Leaderboard, WorldSnapshot, WorldSummary};
use crate::stats::WorldStats;
use crate::tick::{self, TickOutcome};
use crate::types::{ActivityFilter, AgentId, Speed};

/// Complete state of one simulated world. Agents are never removed: the dead
/// stay in the registry so ids remain valid indices.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    rng: StdRng,

    // Registry
    agents: Vec<Agent>,
    stats: WorldStats,
    log: ActivityLog,

    // Time and scheduling
    clock: WorldClock,
    run: RunState,
    frames: u64,
    automaton_cadence: Cadence,
    view_cadence: Cadence,

    // Background and cached views
    automaton: Automaton,
    views: DerivedViews,

    // ID counters
    next_uid: u64,
}

impl World {
    /// Validate `config` and build an idle world. Without a configured seed
    /// the rng is seeded from the thread rng.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let automaton = Automaton::seeded(
            config.automaton_cols,
            config.automaton_rows,
            config.automaton_density,
            &mut rng,
        )?;

        let mut world = Self {
            log: ActivityLog::new(config.log_capacity),
            config,
            rng,
            agents: Vec::new(),
            stats: WorldStats::default(),
            clock: WorldClock::default(),
            run: RunState::default(),
            frames: 0,
            automaton_cadence: Cadence::new(),
            view_cadence: Cadence::new(),
            automaton,
            views: DerivedViews::default(),
            next_uid: 0,
        };
        world.refresh_views();
        Ok(world)
    }

    /// Default configuration with a fixed seed.
    pub fn with_seed(seed: u64) -> Result<Self, WorldError> {
        Self::new(WorldConfig::default().with_seed(seed))
    }

    // === Accessors ===

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn clock(&self) -> WorldClock {
        self.clock
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn speed(&self) -> Speed {
        self.run.speed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Leaderboard and summary as of the last refresh.
    pub fn views(&self) -> &DerivedViews {
        &self.views
    }

    pub fn living_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    // === Run Control ===

    /// Spawn the founding population and start running. Does nothing if the
    /// world is already running.
    pub fn start_world(&mut self) -> bool {
        if self.run.running {
            return false;
        }
        self.run.running = true;
        self.run.paused = false;
        for _ in 0..self.config.founding_population {
            self.add_founder();
        }
        self.refresh_views();
        true
    }

    pub fn pause(&mut self) {
        self.run.paused = true;
    }

    pub fn resume(&mut self) {
        self.run.paused = false;
    }

    /// Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        self.run.paused = !self.run.paused;
        self.run.paused
    }

    pub fn set_speed(&mut self, multiplier: u32) -> Result<(), WorldError> {
        self.run.speed = Speed::try_from(multiplier)?;
        Ok(())
    }

    /// 1 -> 2 -> 4 -> 8 -> 1. Returns the new multiplier.
    pub fn cycle_speed(&mut self) -> u32 {
        self.run.speed = self.run.speed.next();
        self.run.speed.multiplier()
    }

    /// Drop all agents and history, reseed the automaton and start over with
    /// fresh founders. Speed is kept.
    pub fn restart(&mut self) -> Result<(), WorldError> {
        let automaton = Automaton::seeded(
            self.config.automaton_cols,
            self.config.automaton_rows,
            self.config.automaton_density,
            &mut self.rng,
        )?;
        self.automaton = automaton;
        self.agents.clear();
        self.stats = WorldStats::default();
        self.log.clear();
        self.clock = WorldClock::default();
        self.frames = 0;
        self.automaton_cadence.reset();
        self.view_cadence.reset();
        self.next_uid = 0;
        self.run = RunState {
            speed: self.run.speed,
            ..RunState::default()
        };
        self.start_world();
        Ok(())
    }

    // === Population ===

    /// Spawn a founder outside the frame loop. Cached views refresh at once.
    pub fn spawn_founder(&mut self) -> AgentId {
        let id = self.add_founder();
        self.refresh_views();
        id
    }

    fn add_founder(&mut self) -> AgentId {
        let id = AgentId::new(self.agents.len() as u32);
        let uid = self.next_uid;
        self.next_uid += 1;
        let agent = lifecycle::spawn_founder(
            id,
            uid,
            &mut self.rng,
            &mut self.log,
            &mut self.stats,
            self.clock,
        );
        self.agents.push(agent);
        id
    }

    // === Frame Loop ===

    /// Run one animation frame. Returns false (and changes nothing) unless the
    /// world is running and not paused.
    pub fn advance_frame(&mut self) -> bool {
        if !self.run.is_active() {
            return false;
        }
        let speed = self.run.speed;
        self.clock.advance(speed.multiplier() as u64);

        let interval = schedule::automaton_interval(self.config.automaton_base_interval, speed);
        if self.automaton_cadence.tick(interval) {
            self.automaton.step();
        }

        let living = self.living_count();
        if lifecycle::should_respawn(&mut self.rng, living, speed, &self.config) {
            self.add_founder();
        }

        // Children born during this frame are first stepped next frame.
        let count = self.agents.len();
        for index in 0..count {
            self.step_agent(index);
        }

        if self.view_cadence.tick(self.config.view_refresh_interval) {
            self.refresh_views();
        }
        self.frames += 1;

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "frame",
            tick = self.clock.time,
            living = self.living_count(),
            population = self.agents.len(),
            total_money = self.agents.iter().map(|a| a.money).sum::<f64>(),
            earned = self.stats.money,
        );
        true
    }

    /// Run up to `frames` frames; stops early if the world is not active.
    pub fn run_frames(&mut self, frames: u32) -> u32 {
        let mut ran = 0;
        while ran < frames && self.advance_frame() {
            ran += 1;
        }
        ran
    }

    fn step_agent(&mut self, index: usize) {
        let living = self.living_count();
        let child_id = AgentId::new(self.agents.len() as u32);
        let child_uid = self.next_uid;

        let child = {
            let (before, rest) = self.agents.split_at_mut(index);
            let Some((agent, after)) = rest.split_first_mut() else {
                return;
            };
            let peers: Vec<&Agent> = before
                .iter()
                .chain(after.iter())
                .filter(|a| a.alive)
                .collect();
            let mut ctx = TickContext {
                rng: &mut self.rng,
                log: &mut self.log,
                stats: &mut self.stats,
                config: &self.config,
                clock: self.clock,
                living,
            };
            match tick::update_agent(agent, &peers, &mut ctx) {
                TickOutcome::Replicate => {
                    Some(lifecycle::replicate(agent, child_id, child_uid, &mut ctx))
                }
                TickOutcome::Continued | TickOutcome::Inactive | TickOutcome::Died => None,
            }
        };

        if let Some(child) = child {
            self.next_uid += 1;
            self.agents.push(child);
        }
    }

    // === Views ===

    pub fn refresh_views(&mut self) {
        self.views = DerivedViews::compute(
            &self.agents,
            self.clock,
            &self.stats,
            self.run,
            &self.automaton,
        );
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        snapshot::snapshot(&self.agents, self.clock)
    }

    /// Live leaderboard over every agent ever created.
    pub fn leaderboard(&self, limit: usize) -> Leaderboard {
        snapshot::leaderboard(&self.agents, limit)
    }

    /// Live summary.
    pub fn summary(&self) -> WorldSummary {
        snapshot::summarize(
            &self.agents,
            self.clock,
            &self.stats,
            self.run,
            &self.automaton,
        )
    }

    pub fn activity(&self, filter: ActivityFilter, limit: usize) -> ActivityFeed {
        self.log.feed(filter, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_world_spawns_founders_once() {
        let mut world = World::with_seed(1).unwrap();
        assert!(world.start_world());
        assert_eq!(world.agents().len(), 6);
        assert_eq!(world.stats().births, 6);
        assert_eq!(world.log().len(), 6);
        assert!(!world.start_world());
        assert_eq!(world.agents().len(), 6);
        for (i, agent) in world.agents().iter().enumerate() {
            assert_eq!(agent.id.index(), i);
            assert_eq!(agent.uid, i as u64);
        }
    }

    #[test]
    fn frames_only_advance_while_running() {
        let mut world = World::with_seed(2).unwrap();
        assert!(!world.advance_frame());
        assert_eq!(world.clock().time, 0);

        world.start_world();
        assert!(world.advance_frame());
        assert_eq!(world.clock().time, 1);

        world.pause();
        assert!(!world.advance_frame());
        assert_eq!(world.clock().time, 1);

        assert!(!world.toggle_pause());
        world.set_speed(4).unwrap();
        world.advance_frame();
        assert_eq!(world.clock().time, 5);
    }

    #[test]
    fn speed_cycles_and_rejects_invalid() {
        let mut world = World::with_seed(3).unwrap();
        assert_eq!(world.cycle_speed(), 2);
        assert_eq!(world.cycle_speed(), 4);
        assert_eq!(world.cycle_speed(), 8);
        assert_eq!(world.cycle_speed(), 1);
        assert_eq!(world.set_speed(3), Err(WorldError::InvalidSpeed(3)));
        assert_eq!(world.speed(), Speed::X1);
    }

    #[test]
    fn automaton_steps_on_speed_scaled_cadence() {
        let mut world = World::with_seed(4).unwrap();
        world.start_world();
        world.set_speed(8).unwrap();
        world.run_frames(14);
        assert_eq!(world.automaton().generation(), 0);
        world.run_frames(1);
        assert_eq!(world.automaton().generation(), 1);
    }

    #[test]
    fn views_refresh_every_interval() {
        let mut world = World::with_seed(5).unwrap();
        world.start_world();
        assert_eq!(world.views().summary.tick, 0);
        world.run_frames(24);
        assert_eq!(world.views().summary.tick, 0);
        world.run_frames(1);
        assert_eq!(world.views().summary.tick, 25);
        assert!(world.views().leaderboard.entries.len() <= 8);
    }

    #[test]
    fn spawning_outside_a_frame_refreshes_views() {
        let mut world = World::with_seed(6).unwrap();
        world.start_world();
        let id = world.spawn_founder();
        assert_eq!(id, AgentId::new(6));
        assert_eq!(world.views().summary.population, 7);
    }

    #[test]
    fn restart_clears_history() {
        let mut world = World::with_seed(7).unwrap();
        world.start_world();
        world.set_speed(8).unwrap();
        world.run_frames(200);
        world.restart().unwrap();
        assert_eq!(world.clock().time, 0);
        assert_eq!(world.agents().len(), 6);
        assert_eq!(world.stats().births, 6);
        assert_eq!(world.stats().deaths, 0);
        assert_eq!(world.log().len(), 6);
        assert_eq!(world.speed(), Speed::X8);
        assert!(world.run_state().running);
    }

    #[test]
    fn seeded_worlds_are_reproducible() {
        let run = |seed| {
            let mut world = World::with_seed(seed).unwrap();
            world.start_world();
            world.run_frames(300);
            world
                .agents()
                .iter()
                .map(|a| (a.name.clone(), a.money.to_bits(), a.state))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WorldConfig {
            log_capacity: 0,
            ..Default::default()
        };
        assert_eq!(World::new(config).err(), Some(WorldError::ZeroLogCapacity));

        let config = WorldConfig {
            log_capacity: usize::MAX / 2,
            ..Default::default()
        };
        assert!(matches!(
            World::new(config),
            Err(WorldError::LogCapacityTooLarge { .. })
        ));
    }

    #[test]
    fn respawn_rolls_once_per_frame_against_frame_start_population() {
        let config = WorldConfig {
            respawn_chance: 1.0,
            ..Default::default()
        };
        let mut world = World::new(config.with_seed(8)).unwrap();
        world.start_world();
        for agent in &mut world.agents {
            agent.money = 0.01;
            agent.state = crate::types::AgentState::Working;
            agent.state_timer = 100;
        }

        world.advance_frame();
        assert_eq!(world.living_count(), 0);
        assert_eq!(world.agents().len(), 6);

        world.advance_frame();
        assert_eq!(world.agents().len(), 7);
        assert_eq!(world.living_count(), 1);
        assert_eq!(world.agents()[6].uptime, 1);
        assert_eq!(world.stats().births, 7);
    }
}
