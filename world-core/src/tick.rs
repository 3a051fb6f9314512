use rand::Rng;

use crate::activity;
use crate::agent::Agent;
use crate::context::TickContext;
use crate::lifecycle::{self, HeartbeatOutcome};
use crate::policy::{self, Decision};
use crate::types::AgentState;

// === CONSTANTS ===

pub const ENERGY_DECAY: f64 = 0.015;
pub const REST_RECOVERY: f64 = 0.12;

// === OUTCOME ===

/// What the world must do after an agent's update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing further.
    Continued,
    /// The agent was already dead and only faded.
    Inactive,
    /// The agent died this tick.
    Died,
    /// The agent chose to replicate; the world charges it and inserts the child.
    Replicate,
}

// === AGENT UPDATE ===

/// Advance one living agent by one tick.
///
/// Order: heartbeat, movement, passive income, activity timer, energy,
/// decision. A death in the heartbeat ends the update immediately.
pub fn update_agent<R: Rng>(
    agent: &mut Agent,
    peers: &[&Agent],
    ctx: &mut TickContext<'_, R>,
) -> TickOutcome {
    if !agent.alive {
        agent.fade();
        return TickOutcome::Inactive;
    }

    if lifecycle::heartbeat(agent, ctx) == HeartbeatOutcome::Died {
        return TickOutcome::Died;
    }

    agent.ease_position();
    activity::passive_income(agent, ctx);

    if agent.state_timer > 0 {
        agent.state_timer -= 1;
        if agent.state_timer == 0 {
            let finished = agent.state;
            agent.state = AgentState::Idle;
            activity::complete(agent, finished, ctx);
        }
    }

    agent.tick_bubble();
    if agent.state == AgentState::Resting {
        agent.energy += REST_RECOVERY;
    } else {
        agent.energy -= ENERGY_DECAY;
    }

    agent.decision_cooldown = agent.decision_cooldown.saturating_sub(1);
    let mut outcome = TickOutcome::Continued;
    if agent.state == AgentState::Idle && agent.decision_cooldown == 0 {
        match policy::decide(agent, ctx.living, ctx.config, ctx.rng) {
            Decision::Replicate => outcome = TickOutcome::Replicate,
            Decision::SelfImprove => activity::self_improve(agent, ctx),
            Decision::DeployProduct => activity::deploy_product(agent, ctx),
            Decision::Begin(next) => activity::begin(agent, next, peers, ctx),
        }
    }

    agent.clamp_vitals();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::WorldClock;
    use crate::config::WorldConfig;
    use crate::log::ActivityLog;
    use crate::stats::WorldStats;
    use crate::types::AgentId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        rng: StdRng,
        log: ActivityLog,
        stats: WorldStats,
        config: WorldConfig,
    }

    impl Fixture {
        fn new(seed: u64) -> Self {
            Self {
                rng: StdRng::seed_from_u64(seed),
                log: ActivityLog::new(200),
                stats: WorldStats::default(),
                config: WorldConfig::default(),
            }
        }

        fn ctx(&mut self) -> TickContext<'_, StdRng> {
            TickContext {
                rng: &mut self.rng,
                log: &mut self.log,
                stats: &mut self.stats,
                config: &self.config,
                clock: WorldClock::new(0),
                living: 1,
            }
        }
    }

    #[test]
    fn dead_agents_only_fade() {
        let mut fx = Fixture::new(1);
        let mut agent = Agent::founder(AgentId::new(0), 0, &mut fx.rng);
        agent.alive = false;
        agent.state = AgentState::Dead;
        let money = agent.money;

        assert_eq!(update_agent(&mut agent, &[], &mut fx.ctx()), TickOutcome::Inactive);
        assert_eq!(agent.money, money);
        assert_eq!(agent.uptime, 0);
        assert!((agent.death_fade - 0.99).abs() < 1e-12);
        assert!(fx.log.is_empty());
    }

    #[test]
    fn busy_agent_pays_upkeep_and_counts_down() {
        let mut fx = Fixture::new(2);
        let mut agent = Agent::founder(AgentId::new(0), 0, &mut fx.rng);
        agent.products.clear();
        agent.state = AgentState::Traveling;
        agent.state_timer = 5;
        agent.decision_cooldown = 5;
        agent.money = 10.0;
        let energy = agent.energy;

        assert_eq!(update_agent(&mut agent, &[], &mut fx.ctx()), TickOutcome::Continued);
        assert!((agent.money - (10.0 - 0.084)).abs() < 1e-12);
        assert_eq!(agent.state_timer, 4);
        assert_eq!(agent.decision_cooldown, 4);
        assert!((agent.energy - (energy - ENERGY_DECAY)).abs() < 1e-12);
    }

    #[test]
    fn resting_recovers_energy() {
        let mut fx = Fixture::new(3);
        let mut agent = Agent::founder(AgentId::new(0), 0, &mut fx.rng);
        agent.state = AgentState::Resting;
        agent.state_timer = 10;
        agent.decision_cooldown = 10;
        agent.energy = 50.0;

        update_agent(&mut agent, &[], &mut fx.ctx());
        assert!((agent.energy - 50.12).abs() < 1e-12);
    }

    #[test]
    fn finished_activity_returns_to_idle_and_decides_again() {
        let mut fx = Fixture::new(4);
        let mut agent = Agent::founder(AgentId::new(0), 0, &mut fx.rng);
        agent.state = AgentState::Traveling;
        agent.state_timer = 1;
        agent.decision_cooldown = 1;
        agent.money = 20.0;

        update_agent(&mut agent, &[], &mut fx.ctx());
        // Broke agents always pick work.
        assert_eq!(agent.state, AgentState::Working);
        assert!(agent.state_timer >= 25);
    }

    #[test]
    fn agents_keep_acting_over_a_long_run() {
        let mut fx = Fixture::new(5);
        let mut agent = Agent::founder(AgentId::new(0), 0, &mut fx.rng);
        agent.money = 500.0;
        fx.config.max_population = 1;

        for _ in 0..2000 {
            update_agent(&mut agent, &[], &mut fx.ctx());
            assert!((0.0..=100.0).contains(&agent.energy));
            assert!((0.0..=100.0).contains(&agent.intelligence));
            assert!((0.0..=100.0).contains(&agent.happiness));
        }
        assert!(fx.log.total_recorded() > 20);
    }
}
