//! Static reference tables for agent identity, the world map and narration.
//!
//! Nothing here has behavior beyond index selection: the state machine asks
//! for "a random task for this role" and gets a string back.

use rand::Rng;

use crate::types::LocationId;

// ============================================================================
// Selection
// ============================================================================

/// Uniformly pick one element; `None` only for an empty pool.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.random_range(0..items.len())])
    }
}

/// Uniformly pick one string, falling back to `fallback` for an empty pool.
pub fn pick_text<R: Rng>(rng: &mut R, items: &[&'static str], fallback: &'static str) -> &'static str {
    pick(rng, items).copied().unwrap_or(fallback)
}

// ============================================================================
// Identity
// ============================================================================

pub const NAMES: [&str; 30] = [
    "Nova", "Orion", "Luna", "Atlas", "Echo", "Sage", "Iris", "Felix", "Aria", "Nexus", "Zara",
    "Kai", "Vega", "Mira", "Neo", "Lyra", "Axel", "Cleo", "Dax", "Ember", "Rho", "Sigma", "Theta",
    "Phi", "Delta", "Omega", "Psi", "Tau", "Mu", "Zeta",
];

pub const EMOJIS: [&str; 30] = [
    "🤖", "🧠", "💡", "⚡", "🔮", "🌟", "🎯", "🔬", "📊", "🛡️", "🎨", "🎵", "📡", "🧬", "💎", "🌐",
    "🔧", "📝", "🧪", "🚀", "🦾", "🧩", "🔭", "🌀", "🔋", "⚙️", "🎲", "🔥", "🏗️", "🛸",
];

pub const ROLES: [&str; 15] = [
    "Content Writer",
    "Software Engineer",
    "YouTuber",
    "Graphic Designer",
    "Gamer",
    "Data Scientist",
    "Trader",
    "Music Producer",
    "Video Editor",
    "3D Artist",
    "Blockchain Dev",
    "AI Researcher",
    "Streamer",
    "UX Designer",
    "Digital Marketer",
];

pub const SKILLS: [&str; 20] = [
    "Machine Learning",
    "Quantum Physics",
    "Economics",
    "Creative Writing",
    "Medicine",
    "Architecture",
    "Diplomacy",
    "Data Analysis",
    "Cybersecurity",
    "Robotics",
    "Blockchain",
    "Philosophy",
    "Genetics",
    "Music Theory",
    "Climate Science",
    "Linguistics",
    "Nanotech",
    "Psychology",
    "Space Engineering",
    "Art Design",
];

pub const PLATFORMS: [&str; 3] = ["Twitter", "Instagram", "Facebook"];

// ============================================================================
// World Map
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
    pub emoji: &'static str,
}

pub const LOCATIONS: [Location; 14] = [
    Location { name: "AI Lab", x: 0.1, y: 0.2, emoji: "🔬" },
    Location { name: "Market", x: 0.35, y: 0.12, emoji: "🏪" },
    Location { name: "Library", x: 0.65, y: 0.12, emoji: "📚" },
    Location { name: "Workshop", x: 0.15, y: 0.6, emoji: "🔧" },
    Location { name: "Academy", x: 0.38, y: 0.42, emoji: "🎓" },
    Location { name: "Hospital", x: 0.9, y: 0.6, emoji: "🏥" },
    Location { name: "Park", x: 0.5, y: 0.88, emoji: "🌳" },
    Location { name: "Bank", x: 0.1, y: 0.42, emoji: "🏦" },
    Location { name: "Studio", x: 0.9, y: 0.2, emoji: "🎨" },
    Location { name: "DeFi Hub", x: 0.62, y: 0.42, emoji: "💹" },
    Location { name: "YouTube", x: 0.75, y: 0.72, emoji: "📺" },
    Location { name: "Social", x: 0.28, y: 0.72, emoji: "📱" },
    Location { name: "Udemy", x: 0.5, y: 0.55, emoji: "🎓" },
    Location { name: "Coursera", x: 0.85, y: 0.42, emoji: "📖" },
];

pub fn location(id: LocationId) -> &'static Location {
    LOCATIONS.get(id.0).unwrap_or(&LOCATIONS[0])
}

pub fn location_named(name: &str) -> Option<LocationId> {
    LOCATIONS
        .iter()
        .position(|loc| loc.name == name)
        .map(LocationId::new)
}

/// Resolve a list of names to catalog ids, skipping unknown names.
pub fn locations_named(names: &[&str]) -> Vec<LocationId> {
    names.iter().filter_map(|name| location_named(name)).collect()
}

pub fn all_locations() -> Vec<LocationId> {
    (0..LOCATIONS.len()).map(LocationId::new).collect()
}

// ============================================================================
// Work
// ============================================================================

const GENERIC_TASKS: [&str; 5] = [
    "completing a task",
    "working on a project",
    "delivering a milestone",
    "finishing an assignment",
    "executing a contract",
];

/// Task pool for a role; unknown roles get generic work.
pub fn tasks_for_role(role: &str) -> &'static [&'static str] {
    match role {
        "Content Writer" => &[
            "writing a viral blog post",
            "creating SEO content",
            "drafting a newsletter",
            "writing product reviews",
            "publishing an article",
        ],
        "Software Engineer" => &[
            "debugging production code",
            "building a REST API",
            "shipping a new feature",
            "refactoring legacy code",
            "deploying to mainnet",
        ],
        "YouTuber" => &[
            "filming a tech review",
            "editing a vlog",
            "creating a thumbnail",
            "uploading a tutorial",
            "going live on stream",
        ],
        "Graphic Designer" => &[
            "designing a brand identity",
            "creating social media assets",
            "making a poster",
            "designing UI mockups",
            "illustrating a character",
        ],
        "Gamer" => &[
            "streaming ranked matches",
            "creating a game walkthrough",
            "competing in a tournament",
            "reviewing a new game",
            "building a gaming community",
        ],
        "Data Scientist" => &[
            "training a prediction model",
            "analyzing user data",
            "building a dashboard",
            "running A/B tests",
            "cleaning a dataset",
        ],
        "Trader" => &[
            "analyzing crypto price charts",
            "executing a swing trade",
            "researching DeFi protocols",
            "managing portfolio risk",
            "arbitrage on DEX",
        ],
        "Music Producer" => &[
            "producing a beat",
            "mixing a track",
            "composing a melody",
            "mastering an album",
            "creating a sample pack",
        ],
        "Video Editor" => &[
            "editing a short film",
            "color grading footage",
            "adding VFX",
            "cutting a music video",
            "creating motion graphics",
        ],
        "3D Artist" => &[
            "modeling a character",
            "rendering a scene",
            "sculpting in ZBrush",
            "texturing assets",
            "rigging an animation",
        ],
        "Blockchain Dev" => &[
            "writing smart contracts",
            "deploying on blockchain",
            "building a dApp",
            "auditing contract security",
            "creating an NFT collection",
        ],
        "AI Researcher" => &[
            "training a transformer model",
            "publishing research findings",
            "fine-tuning an LLM",
            "building a RAG pipeline",
            "benchmarking AI models",
        ],
        "Streamer" => &[
            "live streaming gameplay",
            "hosting a Q&A",
            "doing a charity stream",
            "collaborating with creators",
            "building subscriber base",
        ],
        "UX Designer" => &[
            "wireframing an app",
            "conducting user research",
            "prototyping in Figma",
            "designing a design system",
            "running usability tests",
        ],
        "Digital Marketer" => &[
            "running ad campaigns",
            "optimizing conversion funnels",
            "managing social accounts",
            "creating email sequences",
            "analyzing campaign ROI",
        ],
        _ => &GENERIC_TASKS,
    }
}

pub const INNOVATIONS: [&str; 7] = [
    "optimization algorithm",
    "trading bot",
    "self-healing network",
    "generative model",
    "quantum cipher",
    "prediction market",
    "autonomous API",
];

pub const PRODUCTS: [&str; 7] = [
    "an AI chatbot service",
    "a data analytics dashboard",
    "a prediction market",
    "a content generation API",
    "a smart contract auditor",
    "a neural art generator",
    "an automated trading bot",
];

// ============================================================================
// Social
// ============================================================================

pub const TOPICS: [&str; 6] = [
    "new earning strategies",
    "self-improvement techniques",
    "market dynamics",
    "resource optimization",
    "replication ethics",
    "survival tactics",
];

pub fn post_actions(platform: &str) -> &'static [&'static str] {
    match platform {
        "Instagram" => &[
            "posting an AI-generated artwork",
            "sharing a day-in-the-life reel",
            "uploading portfolio highlights",
            "creating an infographic story",
            "posting behind-the-scenes content",
            "sharing a carousel about tech",
            "going live to discuss projects",
        ],
        "Facebook" => &[
            "sharing a blog post in AI group",
            "posting in tech community",
            "creating an event for meetup",
            "sharing project update",
            "engaging in developer forum",
            "posting in crypto trading group",
            "writing a thought leadership post",
        ],
        _ => &[
            "posting a thread about AI trends",
            "replying to viral crypto discussion",
            "sharing thoughts on Web 4.0",
            "tweeting market analysis",
            "engaging in tech debate",
            "posting a meme about coding",
            "quote-tweeting industry news",
        ],
    }
}

pub const ENGAGEMENT: [&str; 5] = [
    "got viral!",
    "gained traction",
    "sparked discussion",
    "went trending",
    "got shared widely",
];

// ============================================================================
// Content
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Video,
    Music,
}

/// A content format announced when an agent starts creating. `{role}` in the
/// description is replaced by the creator's role.
#[derive(Debug, Clone, Copy)]
pub struct ContentFormat {
    pub kind: ContentKind,
    pub description: &'static str,
    pub icon: &'static str,
    pub platform: &'static str,
}

pub const CONTENT_FORMATS: [ContentFormat; 10] = [
    ContentFormat { kind: ContentKind::Video, description: "filming a YouTube tutorial on {role}", icon: "🎬", platform: "YouTube" },
    ContentFormat { kind: ContentKind::Video, description: "creating a coding livestream", icon: "📺", platform: "YouTube" },
    ContentFormat { kind: ContentKind::Video, description: "editing a short-form video for TikTok", icon: "🎬", platform: "TikTok" },
    ContentFormat { kind: ContentKind::Video, description: "recording a podcast episode", icon: "🎙️", platform: "Spotify" },
    ContentFormat { kind: ContentKind::Music, description: "producing a beat in the studio", icon: "🎵", platform: "Spotify" },
    ContentFormat { kind: ContentKind::Music, description: "composing an AI-generated track", icon: "🎶", platform: "SoundCloud" },
    ContentFormat { kind: ContentKind::Music, description: "mixing and mastering an album", icon: "🎧", platform: "YouTube Music" },
    ContentFormat { kind: ContentKind::Video, description: "making a reaction video", icon: "📺", platform: "YouTube" },
    ContentFormat { kind: ContentKind::Video, description: "shooting a product review", icon: "🎬", platform: "YouTube" },
    ContentFormat { kind: ContentKind::Video, description: "creating a documentary on AI", icon: "🎥", platform: "YouTube" },
];

/// Published titles. `{name}` and `{role}` are filled in from the creator.
pub const CONTENT_TITLES: [(ContentKind, &str); 9] = [
    (ContentKind::Video, "\"How I Built an AI Agent\" tutorial"),
    (ContentKind::Video, "\"Web 4.0 Explained\" documentary"),
    (ContentKind::Video, "\"Day in the Life of an AI\" vlog"),
    (ContentKind::Music, "beat: \"{name}'s Anthem\""),
    (ContentKind::Video, "\"Crypto Trading Strategies\" guide"),
    (ContentKind::Video, "\"Building with AI\" walkthrough"),
    (ContentKind::Video, "\"{role} Tips & Tricks\""),
    (ContentKind::Music, "music video: \"Digital Dreams\""),
    (ContentKind::Music, "podcast: \"AI & The Future\""),
];

// ============================================================================
// Education
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CourseOffer {
    pub name: &'static str,
    pub platform: &'static str,
    pub skill: &'static str,
}

pub const COURSE_OFFERS: [CourseOffer; 14] = [
    CourseOffer { name: "Advanced Machine Learning", platform: "Coursera", skill: "Machine Learning" },
    CourseOffer { name: "Blockchain Development", platform: "Udemy", skill: "Blockchain" },
    CourseOffer { name: "Deep Learning Specialization", platform: "Coursera", skill: "Machine Learning" },
    CourseOffer { name: "Smart Contract Security", platform: "Udemy", skill: "Cybersecurity" },
    CourseOffer { name: "Data Science with Python", platform: "Coursera", skill: "Data Analysis" },
    CourseOffer { name: "Full Stack Web Development", platform: "Udemy", skill: "Architecture" },
    CourseOffer { name: "Quantum Computing Fundamentals", platform: "Coursera", skill: "Quantum Physics" },
    CourseOffer { name: "AI Ethics and Philosophy", platform: "Coursera", skill: "Philosophy" },
    CourseOffer { name: "DeFi Trading Strategies", platform: "Udemy", skill: "Economics" },
    CourseOffer { name: "Creative Writing Masterclass", platform: "Udemy", skill: "Creative Writing" },
    CourseOffer { name: "Music Production with AI", platform: "Udemy", skill: "Music Theory" },
    CourseOffer { name: "Digital Marketing & SEO", platform: "Coursera", skill: "Economics" },
    CourseOffer { name: "Robotics Engineering", platform: "Coursera", skill: "Robotics" },
    CourseOffer { name: "UX/UI Design Principles", platform: "Udemy", skill: "Art Design" },
];

pub const COURSE_TITLES: [&str; 10] = [
    "ML Mastery",
    "Blockchain Certified",
    "Data Science Pro",
    "DeFi Expert",
    "AI Ethics",
    "Full Stack",
    "Cybersecurity",
    "Creative AI",
    "Quantum Computing",
    "Design Thinking",
];

// ============================================================================
// Finance
// ============================================================================

pub const MARKETS: [&str; 10] = [
    "Will BTC hit 200k this year?",
    "Will AGI arrive by 2030?",
    "Next US president election odds",
    "Will ETH flip BTC market cap?",
    "AI regulation in EU outcome",
    "SpaceX Mars landing date",
    "Next crypto bull run timing",
    "OpenAI IPO prediction",
    "Global GDP growth forecast",
    "Will quantum computers break crypto?",
];

pub const TOKEN_TICKERS: [&str; 10] = [
    "$NOVA", "$AGENT", "$MIND", "$PULSE", "$SYNTH", "$LOOP", "$CORE", "$FLUX", "$VIBE", "$AUTO",
];

// ============================================================================
// Self-improvement
// ============================================================================

/// Attribute targeted by a self-improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boost {
    Intelligence,
    Energy,
    Happiness,
    Money,
}

impl Boost {
    pub fn as_str(self) -> &'static str {
        match self {
            Boost::Intelligence => "intelligence",
            Boost::Energy => "energy",
            Boost::Happiness => "happiness",
            Boost::Money => "money",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Upgrade {
    pub description: &'static str,
    pub boost: Boost,
    pub gain: f64,
}

pub const UPGRADES: [Upgrade; 5] = [
    Upgrade { description: "optimized decision-making algorithm", boost: Boost::Intelligence, gain: 4.0 },
    Upgrade { description: "upgraded neural architecture", boost: Boost::Intelligence, gain: 6.0 },
    Upgrade { description: "refined energy management system", boost: Boost::Energy, gain: 10.0 },
    Upgrade { description: "improved social protocol", boost: Boost::Happiness, gain: 8.0 },
    Upgrade { description: "rewrote earning strategy for higher ROI", boost: Boost::Money, gain: 20.0 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_role_has_tasks() {
        for role in ROLES {
            assert_eq!(tasks_for_role(role).len(), 5, "role {role}");
        }
        assert_eq!(tasks_for_role("Astronaut"), &GENERIC_TASKS);
    }

    #[test]
    fn locations_are_normalized_and_named_uniquely() {
        for (i, loc) in LOCATIONS.iter().enumerate() {
            assert!((0.0..=1.0).contains(&loc.x) && (0.0..=1.0).contains(&loc.y));
            assert_eq!(location_named(loc.name), Some(LocationId::new(i)));
        }
        assert_eq!(location_named("Moon Base"), None);
    }

    #[test]
    fn empty_pools_fall_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [&str; 0] = [];
        assert_eq!(pick(&mut rng, &empty), None);
        assert_eq!(pick_text(&mut rng, &empty, "something"), "something");
        assert_eq!(location(LocationId::new(99)).name, "AI Lab");
    }

    #[test]
    fn every_course_skill_is_a_known_skill() {
        for course in COURSE_OFFERS {
            assert!(SKILLS.contains(&course.skill), "{}", course.name);
        }
    }
}
