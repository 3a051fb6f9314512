//! Agent lifecycle: upkeep, bankruptcy, founding and replication.
//!
//! Agents pay a compute cost every tick. An agent whose balance reaches zero
//! is terminated in the same tick; an agent with a large balance may spend
//! part of it on a child that inherits its role and skills.

use rand::Rng;

use crate::agent::Agent;
use crate::clock::WorldClock;
use crate::config::WorldConfig;
use crate::context::TickContext;
use crate::log::ActivityLog;
use crate::stats::WorldStats;
use crate::types::{ActivityKind, AgentId, AgentState, Speed};

/// Balance below which an agent may broadcast a warning.
pub const LOW_BALANCE: f64 = 15.0;
/// Chance per tick that a low-balance agent broadcasts.
pub const LOW_BALANCE_WARNING_CHANCE: f64 = 0.02;
pub const REPLICATE_COOLDOWN: u32 = 30;

/// Result of paying the per-tick compute cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    /// Upkeep paid, agent continues this tick.
    Alive,
    /// Balance hit zero; the agent is dead and must not be touched further.
    Died,
}

/// Charge upkeep, terminating the agent if it can no longer pay.
pub fn heartbeat<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) -> HeartbeatOutcome {
    agent.uptime += 1;
    let cost = ctx.config.heartbeat_cost(agent.level);
    agent.spend(cost);

    if agent.money <= 0.0 {
        terminate(agent, ctx);
        return HeartbeatOutcome::Died;
    }

    if agent.money < LOW_BALANCE && ctx.roll() < LOW_BALANCE_WARNING_CHANCE {
        agent.show_bubble("⚠️ Low $!");
        let text = format!(
            "⚠️ Balance critical ({:.1} Crypto). Must earn to survive!",
            agent.money
        );
        ctx.narrate(agent, ActivityKind::Earn, "⚠️", text);
    }
    HeartbeatOutcome::Alive
}

/// One-way transition to `Dead`.
pub fn terminate<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    agent.alive = false;
    agent.state = AgentState::Dead;
    agent.state_timer = 0;
    agent.decision_cooldown = 0;
    agent.show_bubble("💀");
    ctx.stats.deaths += 1;

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "death",
        tick = ctx.clock.time,
        uid = agent.uid,
        uptime = agent.uptime,
        level = agent.level,
        total_earned = agent.total_earned,
    );

    let text = format!(
        "☠️ TERMINATED: ran out of funds and could not pay for compute. Wallet: {}. Uptime: {} ticks.",
        agent.wallet, agent.uptime
    );
    ctx.narrate(agent, ActivityKind::Think, "💀", text);
}

/// Create a founder and record its arrival.
pub fn spawn_founder<R: Rng>(
    id: AgentId,
    uid: u64,
    rng: &mut R,
    log: &mut ActivityLog,
    stats: &mut WorldStats,
    clock: WorldClock,
) -> Agent {
    let agent = Agent::founder(id, uid, rng);
    stats.births += 1;
    trace_birth(&agent, None, clock);

    let text = format!(
        "{} spawned as {}! 🔗 {} | {} Crypto",
        agent.name, agent.role, agent.wallet, agent.money
    );
    log.record(clock, ActivityKind::Think, agent.actor(), "🌟", text);
    agent
}

/// Whether `agent` may replicate right now, ignoring the random gate.
pub fn can_replicate(agent: &Agent, living: usize, config: &WorldConfig) -> bool {
    agent.alive && agent.money > config.replicate_threshold && living < config.max_population
}

/// Charge the parent and build its child. The caller owns insertion into the
/// registry.
pub fn replicate<R: Rng>(
    parent: &mut Agent,
    child_id: AgentId,
    child_uid: u64,
    ctx: &mut TickContext<'_, R>,
) -> Agent {
    parent.spend(ctx.config.replicate_cost);
    ctx.stats.replications += 1;

    let child = Agent::offspring(child_id, child_uid, parent, ctx.rng);
    ctx.stats.births += 1;
    trace_birth(&child, Some(parent.uid), ctx.clock);

    parent.show_bubble("🧬 Replicate!");
    parent.decision_cooldown = REPLICATE_COOLDOWN;
    let text = format!(
        "REPLICATED! Spawned {} (Gen {}). Cost: {} Crypto",
        child.name, child.generation, ctx.config.replicate_cost
    );
    ctx.narrate(parent, ActivityKind::Innovate, "🧬", text);
    let text = format!(
        "Born from {}! Inherited {} skills. Wallet: {}",
        parent.name,
        child.skills.len(),
        child.wallet
    );
    ctx.narrate(&child, ActivityKind::Think, "🌱", text);
    child
}

/// Per-frame chance of spawning a replacement founder.
pub fn respawn_probability(living: usize, speed: Speed, config: &WorldConfig) -> f64 {
    if living >= config.respawn_floor {
        0.0
    } else {
        (config.respawn_chance * speed.multiplier() as f64).min(1.0)
    }
}

pub fn should_respawn<R: Rng>(rng: &mut R, living: usize, speed: Speed, config: &WorldConfig) -> bool {
    let p = respawn_probability(living, speed, config);
    p > 0.0 && rng.random::<f64>() < p
}

#[cfg_attr(not(feature = "instrument"), allow(unused_variables))]
fn trace_birth(agent: &Agent, parent_uid: Option<u64>, clock: WorldClock) {
    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "birth",
        tick = clock.time,
        uid = agent.uid,
        generation = agent.generation,
        parent_uid = parent_uid,
        money = agent.money,
    );
}
