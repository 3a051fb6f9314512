use rand::Rng;

use crate::catalog::{self, EMOJIS, LOCATIONS, NAMES, PLATFORMS, ROLES, SKILLS};
use crate::types::{AgentId, AgentState, LocationId};

// === CONSTANTS ===

pub const VITAL_MIN: f64 = 0.0;
pub const VITAL_MAX: f64 = 100.0;
/// Half-width of the jitter around a location anchor.
pub const LOCATION_JITTER: f64 = 0.03;
/// Fraction of the remaining distance covered per tick.
pub const EASE_RATE: f64 = 0.03;
/// Below this distance the agent stops easing.
pub const ARRIVAL_EPSILON: f64 = 0.005;
pub const BUBBLE_TICKS: u32 = 50;
pub const DEATH_FADE_RATE: f64 = 0.01;
/// XP needed per level: `level * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: u32 = 50;

// === AGENT ===

/// An autonomous simulated actor. Owned by the world registry; refers to
/// other agents only through ids and names.
#[derive(Debug, Clone)]
pub struct Agent {
    // Identity
    pub id: AgentId,
    pub uid: u64,
    pub name: String,
    pub emoji: &'static str,
    pub wallet: String,

    // Lineage
    pub generation: u32,
    pub parent: Option<String>,

    // Vitals, kept within [0, 100]
    pub energy: f64,
    pub intelligence: f64,
    pub happiness: f64,

    // Economy
    pub money: f64,
    pub total_earned: f64,
    pub total_spent: f64,

    // Progression
    pub level: u32,
    pub xp: u32,
    pub skills: Vec<String>,
    pub role: String,
    pub tasks_done: u32,
    pub self_improvements: u32,
    pub uptime: u64,

    // Spatial
    pub location: LocationId,
    pub position: (f64, f64),
    pub target: (f64, f64),

    // Behavior
    pub state: AgentState,
    pub state_timer: u32,
    pub decision_cooldown: u32,

    // Social
    pub friends: Vec<AgentId>,
    pub followers: u32,
    pub social_platform: &'static str,
    pub posts: Vec<String>,

    // Side ventures
    pub staked: f64,
    pub lent: f64,
    pub tokens: Vec<String>,
    pub products: Vec<String>,
    pub videos: Vec<String>,
    pub music: Vec<String>,
    pub courses: Vec<String>,

    // Lifecycle
    pub alive: bool,
    pub death_fade: f64,
    pub bubble: Option<String>,
    pub bubble_timer: u32,
}

impl Agent {
    /// A first-generation agent with randomized starting attributes.
    pub fn founder<R: Rng>(id: AgentId, uid: u64, rng: &mut R) -> Self {
        let role = catalog::pick_text(rng, &ROLES, ROLES[0]).to_string();
        let energy = 70.0 + rng.random::<f64>() * 30.0;
        let intelligence = 20.0 + rng.random::<f64>() * 30.0;
        let money = (rng.random::<f64>() * 80.0).floor() + 60.0;
        let skills = vec![catalog::pick_text(rng, &SKILLS, SKILLS[0]).to_string()];
        Self::build(id, uid, 1, None, role, skills, energy, intelligence, money, 1, rng)
    }

    /// A child of `parent`. The caller has already charged the replication
    /// cost, so `parent.money` is the post-deduction balance.
    pub fn offspring<R: Rng>(id: AgentId, uid: u64, parent: &Agent, rng: &mut R) -> Self {
        Self::build(
            id,
            uid,
            parent.generation + 1,
            Some(parent.name.clone()),
            parent.role.clone(),
            parent.skills.clone(),
            60.0,
            (parent.intelligence + 5.0).min(VITAL_MAX),
            (parent.money * 0.3).floor(),
            parent.level.saturating_sub(1).max(1),
            rng,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build<R: Rng>(
        id: AgentId,
        uid: u64,
        generation: u32,
        parent: Option<String>,
        role: String,
        skills: Vec<String>,
        energy: f64,
        intelligence: f64,
        money: f64,
        level: u32,
        rng: &mut R,
    ) -> Self {
        let happiness = 50.0 + rng.random::<f64>() * 30.0;
        let location = LocationId::new(rng.random_range(0..LOCATIONS.len()));
        let anchor = catalog::location(location);
        let position = (anchor.x + jitter(rng), anchor.y + jitter(rng));
        let wallet = wallet_address(rng);
        let followers = rng.random_range(0..50);
        let social_platform = catalog::pick_text(rng, &PLATFORMS, PLATFORMS[0]);

        Self {
            id,
            uid,
            name: display_name(uid, generation),
            emoji: EMOJIS[(uid % EMOJIS.len() as u64) as usize],
            wallet,
            generation,
            parent,
            energy,
            intelligence,
            happiness,
            money,
            total_earned: 0.0,
            total_spent: 0.0,
            level,
            xp: 0,
            skills,
            role,
            tasks_done: 0,
            self_improvements: 0,
            uptime: 0,
            location,
            position,
            target: position,
            state: AgentState::Idle,
            state_timer: 0,
            decision_cooldown: 0,
            friends: Vec::new(),
            followers,
            social_platform,
            posts: Vec::new(),
            staked: 0.0,
            lent: 0.0,
            tokens: Vec::new(),
            products: Vec::new(),
            videos: Vec::new(),
            music: Vec::new(),
            courses: Vec::new(),
            alive: true,
            death_fade: 1.0,
            bubble: None,
            bubble_timer: 0,
        }
    }

    /// Name/emoji pair copied into log entries.
    pub fn actor(&self) -> (&str, &str) {
        (&self.name, self.emoji)
    }

    pub fn location_name(&self) -> &'static str {
        catalog::location(self.location).name
    }

    // === ECONOMY ===

    /// Income: raises balance and lifetime earnings.
    pub fn earn(&mut self, amount: f64) {
        self.money += amount;
        self.total_earned += amount;
    }

    /// Expense: lowers balance and raises lifetime spending.
    pub fn spend(&mut self, amount: f64) {
        self.money -= amount;
        self.total_spent += amount;
    }

    // === PROGRESSION ===

    /// Add a skill unless already known. Returns whether it was new.
    pub fn learn_skill(&mut self, skill: &str) -> bool {
        if self.skills.iter().any(|s| s == skill) {
            false
        } else {
            self.skills.push(skill.to_string());
            true
        }
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// Level up once if enough xp has accumulated; xp resets to zero.
    pub fn settle_level(&mut self) -> bool {
        if self.xp >= self.xp_to_next_level() {
            self.xp = 0;
            self.level += 1;
            true
        } else {
            false
        }
    }

    /// Leaderboard score.
    pub fn score(&self) -> u64 {
        self.level as u64 * 1000
            + self.xp as u64
            + self.tasks_done as u64 * 10
            + self.skills.len() as u64 * 20
    }

    // === VITALS ===

    pub fn clamp_vitals(&mut self) {
        self.energy = self.energy.clamp(VITAL_MIN, VITAL_MAX);
        self.intelligence = self.intelligence.clamp(VITAL_MIN, VITAL_MAX);
        self.happiness = self.happiness.clamp(VITAL_MIN, VITAL_MAX);
    }

    // === MOVEMENT ===

    /// Set a new destination; the actual position eases there over time.
    pub fn move_to<R: Rng>(&mut self, location: LocationId, rng: &mut R) {
        let anchor = catalog::location(location);
        self.location = location;
        self.target = (anchor.x + jitter(rng), anchor.y + jitter(rng));
    }

    pub fn ease_position(&mut self) {
        let dx = self.target.0 - self.position.0;
        let dy = self.target.1 - self.position.1;
        if (dx * dx + dy * dy).sqrt() > ARRIVAL_EPSILON {
            self.position.0 += dx * EASE_RATE;
            self.position.1 += dy * EASE_RATE;
        }
    }

    // === PRESENTATION HINTS ===

    pub fn show_bubble(&mut self, text: &str) {
        self.bubble = Some(text.to_string());
        self.bubble_timer = BUBBLE_TICKS;
    }

    pub fn tick_bubble(&mut self) {
        if self.bubble_timer > 0 {
            self.bubble_timer -= 1;
            if self.bubble_timer == 0 {
                self.bubble = None;
            }
        }
    }

    /// Post-mortem fade; the only change a dead agent ever sees.
    pub fn fade(&mut self) {
        self.death_fade = (self.death_fade - DEATH_FADE_RATE).max(0.0);
    }
}

/// `Nova`, or `Nova-G3` past the first generation.
pub fn display_name(uid: u64, generation: u32) -> String {
    let base = NAMES[(uid % NAMES.len() as u64) as usize];
    if generation > 1 {
        format!("{base}-G{generation}")
    } else {
        base.to_string()
    }
}

/// Cosmetic wallet string such as `0x3fa9c1...07be`.
pub fn wallet_address<R: Rng>(rng: &mut R) -> String {
    let head: u32 = rng.random_range(0..0x100_0000);
    let tail: u32 = rng.random_range(0..0x1_0000);
    format!("0x{head:06x}...{tail:04x}")
}

fn jitter<R: Rng>(rng: &mut R) -> f64 {
    (rng.random::<f64>() - 0.5) * 2.0 * LOCATION_JITTER
}
