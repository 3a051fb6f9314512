use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::agent::Agent;
use crate::automaton::Automaton;
use crate::catalog::LOCATIONS;
use crate::clock::WorldClock;
use crate::schedule::RunState;
use crate::stats::WorldStats;
use crate::types::AgentState;

/// Rows shown on the cached leaderboard.
pub const LEADERBOARD_SIZE: usize = 8;

// ============================================================================
// Serializable Snapshots for JS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub tick: u64,
    pub clock: String,
    pub agents: Vec<AgentSnapshot>,
    pub locations: Vec<LocationSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub emoji: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    pub id: u32,
    pub uid: u64,
    pub name: String,
    pub emoji: String,
    pub role: String,
    pub wallet: String,
    pub generation: u32,
    pub parent: Option<String>,
    pub state: AgentState,
    pub energy: f64,
    pub intelligence: f64,
    pub happiness: f64,
    pub money: f64,
    pub total_earned: f64,
    pub total_spent: f64,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub skills: Vec<String>,
    pub location: String,
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub followers: u32,
    pub friends: usize,
    pub social_platform: String,
    pub posts: usize,
    pub tasks_done: u32,
    pub self_improvements: u32,
    pub uptime: u64,
    pub staked: f64,
    pub lent: f64,
    pub tokens: Vec<String>,
    pub products: Vec<String>,
    pub videos: Vec<String>,
    pub music: Vec<String>,
    pub courses: Vec<String>,
    pub alive: bool,
    pub death_fade: f64,
    pub bubble: Option<String>,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.0,
            uid: agent.uid,
            name: agent.name.clone(),
            emoji: agent.emoji.to_string(),
            role: agent.role.clone(),
            wallet: agent.wallet.clone(),
            generation: agent.generation,
            parent: agent.parent.clone(),
            state: agent.state,
            energy: agent.energy,
            intelligence: agent.intelligence,
            happiness: agent.happiness,
            money: agent.money,
            total_earned: agent.total_earned,
            total_spent: agent.total_spent,
            level: agent.level,
            xp: agent.xp,
            xp_to_next: agent.xp_to_next_level(),
            skills: agent.skills.clone(),
            location: agent.location_name().to_string(),
            x: agent.position.0,
            y: agent.position.1,
            target_x: agent.target.0,
            target_y: agent.target.1,
            followers: agent.followers,
            friends: agent.friends.len(),
            social_platform: agent.social_platform.to_string(),
            posts: agent.posts.len(),
            tasks_done: agent.tasks_done,
            self_improvements: agent.self_improvements,
            uptime: agent.uptime,
            staked: agent.staked,
            lent: agent.lent,
            tokens: agent.tokens.clone(),
            products: agent.products.clone(),
            videos: agent.videos.clone(),
            music: agent.music.clone(),
            courses: agent.courses.clone(),
            alive: agent.alive,
            death_fade: agent.death_fade,
            bubble: agent.bubble.clone(),
        }
    }
}

pub fn snapshot(agents: &[Agent], clock: WorldClock) -> WorldSnapshot {
    WorldSnapshot {
        tick: clock.time,
        clock: clock.label(),
        agents: agents.iter().map(AgentSnapshot::from).collect(),
        locations: LOCATIONS
            .iter()
            .map(|loc| LocationSnapshot {
                name: loc.name.to_string(),
                x: loc.x,
                y: loc.y,
                emoji: loc.emoji.to_string(),
            })
            .collect(),
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub id: u32,
    pub name: String,
    pub emoji: String,
    pub level: u32,
    pub score: u64,
    pub money: f64,
    pub alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

/// Every agent (dead included) by score, highest first. Ties keep registry
/// order.
pub fn leaderboard(agents: &[Agent], limit: usize) -> Leaderboard {
    let mut ranked: Vec<&Agent> = agents.iter().collect();
    ranked.sort_by(|a, b| b.score().cmp(&a.score()));
    let entries = ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, agent)| LeaderboardEntry {
            rank: i + 1,
            id: agent.id.0,
            name: agent.name.clone(),
            emoji: agent.emoji.to_string(),
            level: agent.level,
            score: agent.score(),
            money: agent.money,
            alive: agent.alive,
        })
        .collect();
    Leaderboard { entries }
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WorldSummary {
    pub clock: String,
    pub tick: u64,
    pub day: u64,
    pub daytime: bool,
    pub population: usize,
    pub living: usize,
    pub dead: usize,
    /// Sum of current balances over all agents.
    pub total_money: f64,
    pub avg_happiness: f64,
    pub avg_intelligence: f64,
    pub speed: u32,
    pub running: bool,
    pub paused: bool,
    pub automaton_generation: u64,
    pub automaton_live: usize,
    pub stats: WorldStats,
}

pub fn summarize(
    agents: &[Agent],
    clock: WorldClock,
    stats: &WorldStats,
    run: RunState,
    automaton: &Automaton,
) -> WorldSummary {
    let population = agents.len();
    let living = agents.iter().filter(|a| a.alive).count();
    let average = |f: fn(&Agent) -> f64| {
        if population == 0 {
            0.0
        } else {
            agents.iter().map(f).sum::<f64>() / population as f64
        }
    };

    WorldSummary {
        clock: clock.label(),
        tick: clock.time,
        day: clock.day(),
        daytime: clock.is_daytime(),
        population,
        living,
        dead: population - living,
        total_money: agents.iter().map(|a| a.money).sum(),
        avg_happiness: average(|a| a.happiness),
        avg_intelligence: average(|a| a.intelligence),
        speed: run.speed.multiplier(),
        running: run.running,
        paused: run.paused,
        automaton_generation: automaton.generation(),
        automaton_live: automaton.live_count(),
        stats: stats.clone(),
    }
}

// ============================================================================
// Derived Views - refreshed on a cadence, not every frame
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedViews {
    pub leaderboard: Leaderboard,
    pub summary: WorldSummary,
}

impl DerivedViews {
    pub fn compute(
        agents: &[Agent],
        clock: WorldClock,
        stats: &WorldStats,
        run: RunState,
        automaton: &Automaton,
    ) -> Self {
        Self {
            leaderboard: leaderboard(agents, LEADERBOARD_SIZE),
            summary: summarize(agents, clock, stats, run, automaton),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn agents(n: u32) -> Vec<Agent> {
        let mut rng = StdRng::seed_from_u64(1);
        (0..n)
            .map(|i| Agent::founder(AgentId::new(i), i as u64, &mut rng))
            .collect()
    }

    #[test]
    fn agent_snapshot_serializes_state_not_styling() {
        let mut agents = agents(1);
        agents[0].show_bubble("hi");
        let value = serde_json::to_value(AgentSnapshot::from(&agents[0])).unwrap();
        assert_eq!(value["bubble"], "hi");
        assert_eq!(value["xpToNext"], 50);
        assert!(value.get("hue").is_none());
        assert!(value.get("bubbleAlpha").is_none());
    }

    #[test]
    fn leaderboard_orders_by_score_and_keeps_ties_stable() {
        let mut agents = agents(5);
        for agent in &mut agents {
            agent.skills.truncate(1);
        }
        agents[3].level = 3;
        agents[1].level = 2;
        agents[4].level = 2;
        agents[2].alive = false;

        let board = leaderboard(&agents, 10);
        let ids: Vec<u32> = board.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 4, 0, 2]);
        assert_eq!(board.entries[0].rank, 1);
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(!board.entries[4].alive);

        assert_eq!(leaderboard(&agents, 2).entries.len(), 2);
    }

    #[test]
    fn summary_covers_living_and_dead() {
        let mut agents = agents(4);
        agents[0].alive = false;
        agents[0].money = -0.05;
        for (i, agent) in agents.iter_mut().enumerate() {
            agent.happiness = 40.0 + i as f64 * 10.0;
        }
        let automaton = Automaton::empty(3, 3).unwrap();
        let summary = summarize(
            &agents,
            WorldClock::new(61),
            &WorldStats::default(),
            RunState::default(),
            &automaton,
        );
        assert_eq!((summary.population, summary.living, summary.dead), (4, 3, 1));
        assert!((summary.avg_happiness - 55.0).abs() < 1e-9);
        assert_eq!(summary.clock, "Day 1, 01:01");
        let balance: f64 = agents.iter().map(|a| a.money).sum();
        assert!((summary.total_money - balance).abs() < 1e-9);
    }

    #[test]
    fn empty_world_summary_has_zero_averages() {
        let automaton = Automaton::empty(3, 3).unwrap();
        let summary = summarize(
            &[],
            WorldClock::default(),
            &WorldStats::default(),
            RunState::default(),
            &automaton,
        );
        assert_eq!(summary.avg_happiness, 0.0);
        assert_eq!(summary.population, 0);
    }

    #[test]
    fn snapshot_exposes_every_agent_and_location() {
        let agents = agents(3);
        let snap = snapshot(&agents, WorldClock::new(0));
        assert_eq!(snap.agents.len(), 3);
        assert_eq!(snap.locations.len(), 14);
        assert_eq!(snap.agents[2].name, agents[2].name);
        assert_eq!(snap.locations[6].name, "Park");
    }
}
