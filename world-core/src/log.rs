//! Bounded, newest-first activity feed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::clock::WorldClock;
use crate::types::{ActivityFilter, ActivityKind};

/// One narrated event. Name and emoji are copied at creation so the entry
/// outlives the agent's death unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub agent_name: String,
    pub agent_emoji: String,
    pub text: String,
    pub icon: String,
    pub time: String,
    pub tick: u64,
}

/// Feed payload handed to the host.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct ActivityFeed {
    pub entries: Vec<ActivityEntry>,
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    total_recorded: u64,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            total_recorded: 0,
        }
    }

    /// Prepend an entry, evicting the oldest one past capacity.
    pub fn record(
        &mut self,
        clock: WorldClock,
        kind: ActivityKind,
        actor: (&str, &str),
        icon: &str,
        text: impl Into<String>,
    ) {
        let (agent_name, agent_emoji) = actor;
        let entry = ActivityEntry {
            kind,
            agent_name: agent_name.to_string(),
            agent_emoji: agent_emoji.to_string(),
            text: text.into(),
            icon: icon.to_string(),
            time: clock.stamp(),
            tick: clock.time,
        };

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "activity",
            tick = clock.time,
            kind = kind.as_str(),
            agent = agent_name,
            icon = icon,
        );

        self.entries.push_front(entry);
        self.total_recorded += 1;
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries ever recorded, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    /// Newest entry, i.e. index 0.
    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&ActivityEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// Up to `limit` newest entries matching `filter`, newest first.
    pub fn filtered(&self, filter: ActivityFilter, limit: usize) -> Vec<ActivityEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry.kind))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn feed(&self, filter: ActivityFilter, limit: usize) -> ActivityFeed {
        ActivityFeed {
            entries: self.filtered(filter, limit),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
