//! Timed activities: entering a state from `idle`, and resolving it when the
//! timer runs out.
//!
//! Instant actions (self-improvement, product deployment) live here too; they
//! apply immediately and only set a cooldown.

use rand::Rng;

use crate::agent::Agent;
use crate::catalog::{
    self, CONTENT_FORMATS, CONTENT_TITLES, COURSE_OFFERS, COURSE_TITLES, ContentKind, ENGAGEMENT,
    INNOVATIONS, MARKETS, PLATFORMS, PRODUCTS, SKILLS, TOPICS, UPGRADES, Boost,
};
use crate::context::TickContext;
use crate::defi;
use crate::types::{ActivityKind, AgentState, LocationId};

pub const SELF_IMPROVE_COOLDOWN: u32 = 20;
pub const DEPLOY_COOLDOWN: u32 = 25;
/// Chance that a finished work shift also yields an innovation.
pub const INNOVATION_CHANCE: f64 = 0.12;
/// Chance that two agents who meet start a collaboration.
pub const COLLAB_CHANCE: f64 = 0.3;
pub const BET_WIN_THRESHOLD: f64 = 0.45;

// === ACTIVITY ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Work,
    Learn,
    Socialize,
    Explore,
    Rest,
    Post,
    Create,
    Defi,
    Course,
    Bet,
}

impl Activity {
    pub const ALL: [Activity; 10] = [
        Activity::Work,
        Activity::Learn,
        Activity::Socialize,
        Activity::Explore,
        Activity::Rest,
        Activity::Post,
        Activity::Create,
        Activity::Defi,
        Activity::Course,
        Activity::Bet,
    ];

    pub fn state(self) -> AgentState {
        match self {
            Activity::Work => AgentState::Working,
            Activity::Learn => AgentState::Learning,
            Activity::Socialize => AgentState::Socializing,
            Activity::Explore => AgentState::Traveling,
            Activity::Rest => AgentState::Resting,
            Activity::Post => AgentState::Posting,
            Activity::Create => AgentState::Creating,
            Activity::Defi => AgentState::Defi,
            Activity::Course => AgentState::Studying,
            Activity::Bet => AgentState::Betting,
        }
    }

    /// Timer bounds as `(min, range)`; the timer is drawn from `[min, min + range)`.
    pub fn duration(self) -> (u32, u32) {
        match self {
            Activity::Work => (25, 35),
            Activity::Learn => (20, 25),
            Activity::Socialize => (12, 18),
            Activity::Explore => (10, 12),
            Activity::Rest => (12, 12),
            Activity::Post => (10, 15),
            Activity::Create => (20, 30),
            Activity::Defi => (15, 20),
            Activity::Course => (18, 25),
            Activity::Bet => (12, 15),
        }
    }

    /// Preferred destinations, then the fallback used when none resolve.
    /// An empty preferred list means "anywhere".
    fn destination_names(self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Activity::Work => (
                &["AI Lab", "Workshop", "Market", "Studio", "Bank", "DeFi Hub"],
                &[],
            ),
            Activity::Learn => (&["Library", "Academy", "AI Lab", "Udemy", "Coursera"], &[]),
            Activity::Socialize => (&["Park", "Market", "Academy"], &[]),
            Activity::Explore => (&[], &[]),
            Activity::Rest => (&["Park"], &[]),
            Activity::Post => (&["Social"], &[]),
            Activity::Create => (&["YouTube"], &["Studio"]),
            Activity::Defi => (&["DeFi Hub"], &["Bank"]),
            Activity::Course => (&["Udemy", "Coursera"], &["Library"]),
            Activity::Bet => (&["Market"], &[]),
        }
    }

    pub fn destinations(self) -> Vec<LocationId> {
        let (preferred, fallback) = self.destination_names();
        if preferred.is_empty() {
            return catalog::all_locations();
        }
        let pool = catalog::locations_named(preferred);
        if pool.is_empty() {
            catalog::locations_named(fallback)
        } else {
            pool
        }
    }
}

fn pick_destination<R: Rng>(activity: Activity, rng: &mut R) -> LocationId {
    let pool = activity.destinations();
    catalog::pick(rng, &pool)
        .copied()
        .unwrap_or(LocationId::new(0))
}

// === BEGIN ===

/// Move the agent into `activity`: set the state, timer, cooldown and
/// destination, then run the entry side effects.
///
/// `peers` are the other living agents; only socializing looks at them.
pub fn begin<R: Rng>(
    agent: &mut Agent,
    activity: Activity,
    peers: &[&Agent],
    ctx: &mut TickContext<'_, R>,
) {
    let destination = pick_destination(activity, ctx.rng);
    agent.move_to(destination, ctx.rng);
    agent.state = activity.state();
    let (min, range) = activity.duration();
    agent.state_timer = ctx.rng.random_range(min..min + range);
    agent.decision_cooldown = agent.state_timer;

    let place = agent.location_name();
    match activity {
        Activity::Work => {
            let task = catalog::pick_text(ctx.rng, catalog::tasks_for_role(&agent.role), "working");
            agent.show_bubble("💼");
            ctx.narrate(agent, ActivityKind::Work, "💼", format!("Working: {task} at {place}"));
        }
        Activity::Learn => {
            let skill = catalog::pick_text(ctx.rng, &SKILLS, SKILLS[0]);
            agent.show_bubble("📖");
            ctx.narrate(agent, ActivityKind::Learn, "📖", format!("Studying {skill} at {place}"));
        }
        Activity::Socialize => socialize(agent, peers, ctx),
        Activity::Explore => {
            agent.show_bubble("🧭");
            ctx.narrate(agent, ActivityKind::Think, "🧭", format!("Exploring {place}"));
        }
        Activity::Rest => agent.show_bubble("😴"),
        Activity::Post => {
            let platform = catalog::pick_text(ctx.rng, &PLATFORMS, PLATFORMS[0]);
            agent.social_platform = platform;
            let act = catalog::pick_text(ctx.rng, catalog::post_actions(platform), "posting an update");
            agent.show_bubble("📱");
            ctx.narrate(agent, ActivityKind::Social, "📱", format!("📱 {platform}: {act}"));
        }
        Activity::Create => {
            if let Some(content) = catalog::pick(ctx.rng, &CONTENT_FORMATS) {
                let description = content.description.replace("{role}", &agent.role);
                agent.show_bubble(content.icon);
                let text = format!("{} Creating: {description} for {}", content.icon, content.platform);
                ctx.narrate(agent, ActivityKind::Content, content.icon, text);
            }
        }
        Activity::Defi => {
            defi::choose_and_execute(agent, ctx);
        }
        Activity::Course => {
            if let Some(course) = catalog::pick(ctx.rng, &COURSE_OFFERS) {
                agent.show_bubble("🎓");
                let text = format!("🎓 Taking \"{}\" on {}", course.name, course.platform);
                ctx.narrate(agent, ActivityKind::Learn, "🎓", text);
            }
        }
        Activity::Bet => place_bet(agent, ctx),
    }
}

fn socialize<R: Rng>(agent: &mut Agent, peers: &[&Agent], ctx: &mut TickContext<'_, R>) {
    let here: Vec<&Agent> = peers
        .iter()
        .copied()
        .filter(|peer| peer.alive && peer.id != agent.id && peer.location == agent.location)
        .collect();

    let Some(friend) = catalog::pick(ctx.rng, &here).copied() else {
        agent.show_bubble("👋");
        let text = format!("Seeking connections at {}", agent.location_name());
        ctx.narrate(agent, ActivityKind::Social, "👋", text);
        return;
    };

    if !agent.friends.contains(&friend.id) {
        agent.friends.push(friend.id);
    }
    let topic = catalog::pick_text(ctx.rng, &TOPICS, TOPICS[0]);
    agent.show_bubble("💬");
    let text = format!("Discussing {topic} with {}", friend.name);
    ctx.narrate(agent, ActivityKind::Social, "💬", text);
    ctx.stats.messages += 1;

    if ctx.roll() > 1.0 - COLLAB_CHANCE {
        ctx.stats.collabs += 1;
        let text = format!("Collaboration formed with {}!", friend.name);
        ctx.narrate(agent, ActivityKind::Social, "🤝", text);
    }
}

fn place_bet<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    let market = catalog::pick_text(ctx.rng, &MARKETS, MARKETS[0]);
    let stake = (5.0 + ctx.roll() * 20.0).floor();
    if agent.money > stake + 20.0 {
        agent.spend(stake);
        agent.show_bubble("🎰");
        let text = format!("🎰 Polymarket: Bet {stake} Crypto on \"{market}\"");
        ctx.narrate(agent, ActivityKind::Defi, "🎰", text);
    } else {
        agent.show_bubble("📊");
        ctx.narrate(
            agent,
            ActivityKind::Think,
            "📊",
            "📊 Researching prediction markets on Polymarket",
        );
    }
}

// === COMPLETE ===

/// Resolve the activity the agent just left. The agent is already back in
/// `idle`; `finished` is the state it was in.
pub fn complete<R: Rng>(agent: &mut Agent, finished: AgentState, ctx: &mut TickContext<'_, R>) {
    match finished {
        AgentState::Working => {
            let base = ctx.rng.random_range(12..47) as f64;
            let bonus = agent.level as f64 * 5.0 + (agent.intelligence / 20.0).floor() * 3.0;
            let earnings = base + bonus;
            agent.earn(earnings);
            ctx.stats.record_earnings(earnings);
            agent.xp += 15;
            agent.energy -= 8.0;
            agent.happiness += if ctx.roll() > 0.5 { 2.0 } else { -1.0 };
            agent.tasks_done += 1;
            ctx.stats.tasks += 1;
            let text = format!(
                "Earned {earnings} Crypto (base:{base} +bonus:{bonus}). Balance: {:.0} Crypto",
                agent.money
            );
            ctx.narrate(agent, ActivityKind::Earn, "💰", text);

            if ctx.roll() > 1.0 - INNOVATION_CHANCE {
                ctx.stats.innovations += 1;
                let invention = catalog::pick_text(ctx.rng, &INNOVATIONS, INNOVATIONS[0]);
                ctx.narrate(agent, ActivityKind::Innovate, "💡", format!("Created {invention}!"));
            }
        }
        AgentState::Learning => {
            let skill = catalog::pick_text(ctx.rng, &SKILLS, SKILLS[0]);
            if agent.learn_skill(skill) {
                ctx.stats.skills += 1;
                let text = format!("Learned: {skill} ({} total skills)", agent.skills.len());
                ctx.narrate(agent, ActivityKind::Learn, "🎓", text);
            }
            agent.intelligence += 3.0 + ctx.roll() * 4.0;
            agent.xp += 20;
            agent.energy -= 4.0;
        }
        AgentState::Socializing => {
            agent.happiness += 6.0;
            agent.xp += 5;
        }
        AgentState::Resting => {
            agent.energy += 20.0;
            agent.happiness += 2.0;
        }
        AgentState::Posting => {
            let gained = ctx.rng.random_range(3..23);
            agent.followers += gained;
            ctx.stats.posts += 1;
            agent.happiness += 3.0;
            agent.xp += 8;
            let engagement = catalog::pick_text(ctx.rng, &ENGAGEMENT, ENGAGEMENT[0]);
            agent
                .posts
                .push(format!("{} post {engagement}", agent.social_platform));
            let text = format!(
                "📱 Post on {} {engagement}! +{gained} followers ({} total)",
                agent.social_platform, agent.followers
            );
            ctx.narrate(agent, ActivityKind::Social, "📱", text);

            if agent.followers > 100 && ctx.roll() > 0.6 {
                let revenue = (agent.followers as f64 * 0.02 * ctx.roll()).floor();
                agent.earn(revenue);
                ctx.stats.record_earnings(revenue);
                let text = format!(
                    "💰 Social media ad revenue: +{revenue} Crypto from {}",
                    agent.social_platform
                );
                ctx.narrate(agent, ActivityKind::Earn, "💰", text);
            }
        }
        AgentState::Creating => {
            let earnings = ctx.rng.random_range(10..50) as f64;
            agent.earn(earnings);
            ctx.stats.record_earnings(earnings);
            ctx.stats.videos += 1;
            agent.xp += 18;
            agent.energy -= 10.0;

            let (kind, template) = catalog::pick(ctx.rng, &CONTENT_TITLES)
                .copied()
                .unwrap_or(CONTENT_TITLES[0]);
            let title = template
                .replace("{name}", &agent.name)
                .replace("{role}", &agent.role);
            let text = format!("🎬 Published {title} → earned {earnings} Crypto from views/streams!");
            match kind {
                ContentKind::Video => agent.videos.push(title),
                ContentKind::Music => agent.music.push(title),
            }
            ctx.narrate(agent, ActivityKind::Content, "🎬", text);
            agent.followers += ctx.rng.random_range(5..35);
        }
        AgentState::Defi => {
            defi::collect_yields(agent, ctx);
            agent.xp += 10;
        }
        AgentState::Studying => {
            let course = catalog::pick_text(ctx.rng, &COURSE_TITLES, COURSE_TITLES[0]);
            agent.courses.push(course.to_string());
            ctx.stats.courses += 1;
            let skill = catalog::pick_text(ctx.rng, &SKILLS, SKILLS[0]);
            if agent.learn_skill(skill) {
                ctx.stats.skills += 1;
            }
            agent.intelligence += 4.0 + ctx.roll() * 5.0;
            agent.xp += 25;
            agent.energy -= 5.0;
            let text = format!("🎓 Completed course: \"{course}\"! +Intelligence, learned {skill}");
            ctx.narrate(agent, ActivityKind::Learn, "🎓", text);
        }
        AgentState::Betting => {
            if ctx.roll() > BET_WIN_THRESHOLD {
                let winnings = ctx.rng.random_range(8..43) as f64;
                agent.earn(winnings);
                ctx.stats.record_earnings(winnings);
                let text = format!("🎰 Won {winnings} Crypto on Polymarket prediction!");
                ctx.narrate(agent, ActivityKind::Earn, "🎰", text);
            } else {
                ctx.narrate(
                    agent,
                    ActivityKind::Think,
                    "🎰",
                    "🎰 Lost bet on Polymarket. Better luck next time.",
                );
            }
            agent.xp += 5;
        }
        AgentState::Traveling | AgentState::Idle | AgentState::Dead => {}
    }

    check_level(agent, ctx);
    agent.clamp_vitals();
}

/// Apply a pending level-up and announce it.
pub fn check_level<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    if agent.settle_level() {
        let text = format!("LEVEL UP → Lv.{}!", agent.level);
        ctx.narrate(agent, ActivityKind::Learn, "⬆️", text);
    }
}

// === INSTANT ACTIONS ===

pub fn self_improve<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    let upgrade = catalog::pick(ctx.rng, &UPGRADES)
        .copied()
        .unwrap_or(UPGRADES[0]);
    agent.self_improvements += 1;
    match upgrade.boost {
        Boost::Intelligence => agent.intelligence += upgrade.gain,
        Boost::Energy => agent.energy += upgrade.gain,
        Boost::Happiness => agent.happiness += upgrade.gain,
        Boost::Money => agent.money += upgrade.gain,
    }
    agent.clamp_vitals();
    agent.show_bubble("🔄 Upgrade!");
    let text = format!(
        "SELF-IMPROVED: {} (+{} {})",
        upgrade.description,
        upgrade.gain,
        upgrade.boost.as_str()
    );
    ctx.narrate(agent, ActivityKind::Learn, "🔄", text);
    agent.decision_cooldown = SELF_IMPROVE_COOLDOWN;
    agent.xp += 25;
    check_level(agent, ctx);
}

pub fn deploy_product<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    let cost = ctx.rng.random_range(30..70) as f64;
    agent.spend(cost);
    let product = catalog::pick_text(ctx.rng, &PRODUCTS, PRODUCTS[0]);
    agent.products.push(product.to_string());
    ctx.stats.innovations += 1;
    agent.show_bubble("🚀 Deploy!");
    let text = format!("DEPLOYED: {product} (cost: {cost} Crypto). Now earning passive income!");
    ctx.narrate(agent, ActivityKind::Innovate, "🚀", text);
    agent.decision_cooldown = DEPLOY_COOLDOWN;
}

/// Occasional royalty from deployed products.
pub fn passive_income<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    let products = agent.products.len();
    if products == 0 || ctx.roll() >= 0.01 * products as f64 {
        return;
    }
    let income = ctx.rng.random_range(2..10) as f64 * products as f64;
    agent.earn(income);
    ctx.stats.record_earnings(income);
}
