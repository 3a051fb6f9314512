use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

/// Aggregate counters over the whole session. Every field only grows.
///
/// `money` is lifetime earnings across all agents, not the current balance:
/// costs and losses never flow back into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WorldStats {
    pub tasks: u64,
    pub skills: u64,
    pub messages: u64,
    pub money: f64,
    pub collabs: u64,
    pub innovations: u64,
    pub births: u64,
    pub deaths: u64,
    pub replications: u64,
    pub posts: u64,
    pub videos: u64,
    pub courses: u64,
    pub staked: f64,
    pub lent: f64,
    pub tokens_created: u64,
}

impl WorldStats {
    pub fn record_earnings(&mut self, amount: f64) {
        if amount > 0.0 {
            self.money += amount;
        }
    }

    /// Births minus deaths: must always equal the living population.
    pub fn net_population(&self) -> u64 {
        self.births.saturating_sub(self.deaths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earnings_never_decrease_money_stat() {
        let mut stats = WorldStats::default();
        stats.record_earnings(12.0);
        stats.record_earnings(-5.0);
        stats.record_earnings(0.0);
        assert_eq!(stats.money, 12.0);
    }

    #[test]
    fn net_population_tracks_births_and_deaths() {
        let stats = WorldStats {
            births: 9,
            deaths: 4,
            ..Default::default()
        };
        assert_eq!(stats.net_population(), 5);
    }
}
