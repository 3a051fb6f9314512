//! What an idle agent does next.
//!
//! Guards are checked in priority order and the first match wins; if none
//! fire, a weighted roll picks a timed activity.

use rand::Rng;

use crate::activity::Activity;
use crate::agent::Agent;
use crate::config::WorldConfig;
use crate::lifecycle;

/// Below this balance the agent always goes to work.
pub const BROKE: f64 = 25.0;
pub const TIRED: f64 = 20.0;
pub const LONELY: f64 = 30.0;

/// Cumulative thresholds for the fallback roll. Anything past the last entry
/// rests.
const FALLBACK: [(f64, Activity); 9] = [
    (0.25, Activity::Work),
    (0.38, Activity::Learn),
    (0.48, Activity::Socialize),
    (0.56, Activity::Post),
    (0.64, Activity::Create),
    (0.72, Activity::Defi),
    (0.80, Activity::Course),
    (0.88, Activity::Bet),
    (0.94, Activity::Explore),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Replicate,
    SelfImprove,
    DeployProduct,
    Begin(Activity),
}

/// Choose the next action for an idle agent. Random draws are only made for
/// guards whose deterministic part already holds.
pub fn decide<R: Rng>(agent: &Agent, living: usize, config: &WorldConfig, rng: &mut R) -> Decision {
    if agent.money < BROKE {
        return Decision::Begin(Activity::Work);
    }
    if lifecycle::can_replicate(agent, living, config) && rng.random::<f64>() > 0.7 {
        return Decision::Replicate;
    }
    if agent.intelligence > 60.0 && rng.random::<f64>() > 0.85 {
        return Decision::SelfImprove;
    }
    if agent.skills.len() >= 3 && agent.money > 80.0 && rng.random::<f64>() > 0.9 {
        return Decision::DeployProduct;
    }
    if agent.energy < TIRED {
        return Decision::Begin(Activity::Rest);
    }
    if agent.happiness < LONELY && rng.random::<f64>() > 0.5 {
        return Decision::Begin(Activity::Socialize);
    }
    if agent.intelligence < 80.0 && rng.random::<f64>() > 0.4 {
        return Decision::Begin(Activity::Learn);
    }
    Decision::Begin(fallback(rng.random::<f64>()))
}

/// Map a uniform roll onto the fallback table.
pub fn fallback(roll: f64) -> Activity {
    FALLBACK
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map(|(_, activity)| *activity)
        .unwrap_or(Activity::Rest)
}
