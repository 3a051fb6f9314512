use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::error::WorldError;

// ============================================================================
// IDs - Registry indices, never reused
// ============================================================================

/// Position of an agent in the world registry. Agents are never removed, so the
/// index stays valid for the whole session.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index into the static location catalog.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct LocationId(pub usize);

impl LocationId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }
}

// ============================================================================
// Agent State - The closed set of behaviors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Idle,
    Working,
    Learning,
    Socializing,
    Traveling,
    Resting,
    Posting,
    Creating,
    Defi,
    Studying,
    Betting,
    Dead,
}

impl AgentState {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Idle => "idle",
            AgentState::Working => "working",
            AgentState::Learning => "learning",
            AgentState::Socializing => "socializing",
            AgentState::Traveling => "traveling",
            AgentState::Resting => "resting",
            AgentState::Posting => "posting",
            AgentState::Creating => "creating",
            AgentState::Defi => "defi",
            AgentState::Studying => "studying",
            AgentState::Betting => "betting",
            AgentState::Dead => "dead",
        }
    }

    /// States entered through a timed activity and left when the timer expires.
    pub fn is_timed(self) -> bool {
        !matches!(self, AgentState::Idle | AgentState::Dead)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Activity Kinds - Log taxonomy used for feed filtering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Work,
    Earn,
    Learn,
    Social,
    Think,
    Innovate,
    Content,
    Defi,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 8] = [
        ActivityKind::Work,
        ActivityKind::Earn,
        ActivityKind::Learn,
        ActivityKind::Social,
        ActivityKind::Think,
        ActivityKind::Innovate,
        ActivityKind::Content,
        ActivityKind::Defi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Work => "work",
            ActivityKind::Earn => "earn",
            ActivityKind::Learn => "learn",
            ActivityKind::Social => "social",
            ActivityKind::Think => "think",
            ActivityKind::Innovate => "innovate",
            ActivityKind::Content => "content",
            ActivityKind::Defi => "defi",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WorldError::UnknownFilter(s.to_string()))
    }
}

/// Feed filter: everything, or a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Only(ActivityKind),
}

impl ActivityFilter {
    pub fn matches(self, kind: ActivityKind) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Only(wanted) => wanted == kind,
        }
    }
}

impl FromStr for ActivityFilter {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "all" {
            Ok(ActivityFilter::All)
        } else {
            s.parse().map(ActivityFilter::Only)
        }
    }
}

// ============================================================================
// Speed - Frame multiplier
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    #[default]
    X1,
    X2,
    X4,
    X8,
}

impl Speed {
    pub fn multiplier(self) -> u32 {
        match self {
            Speed::X1 => 1,
            Speed::X2 => 2,
            Speed::X4 => 4,
            Speed::X8 => 8,
        }
    }

    /// 1 -> 2 -> 4 -> 8 -> 1
    pub fn next(self) -> Speed {
        match self {
            Speed::X1 => Speed::X2,
            Speed::X2 => Speed::X4,
            Speed::X4 => Speed::X8,
            Speed::X8 => Speed::X1,
        }
    }
}

impl TryFrom<u32> for Speed {
    type Error = WorldError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Speed::X1),
            2 => Ok(Speed::X2),
            4 => Ok(Speed::X4),
            8 => Ok(Speed::X8),
            other => Err(WorldError::InvalidSpeed(other)),
        }
    }
}
