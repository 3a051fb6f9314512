use world_core::{ActivityFilter, ActivityKind, AgentId, AgentState, World};

const FIRST: AgentId = AgentId(0);

fn started(seed: u64) -> World {
    let mut world = World::with_seed(seed).unwrap();
    world.start_world();
    world
}

/// Park the agent in a long activity so nothing but upkeep touches it.
fn occupy(world: &mut World, id: AgentId) {
    let agent = world.agent_mut(id).unwrap();
    agent.state = AgentState::Working;
    agent.state_timer = 1_000;
}

#[test]
fn one_simulated_day_at_normal_speed() {
    let mut world = started(1);
    assert_eq!(world.agents().len(), 6);

    let mut registry = 6;
    for _ in 0..1_440 {
        assert!(world.advance_frame());
        let stats = world.stats();
        assert_eq!(stats.deaths + world.living_count() as u64, stats.births);
        assert!(world.agents().len() >= registry);
        registry = world.agents().len();
    }

    assert_eq!(world.clock().time, 1_440);
    assert_eq!(world.clock().label(), "Day 2, 00:00");
    assert!(world.agents().len() >= 6);
    assert!(world.stats().tasks > 0, "a day without any finished work");
    assert!(world.automaton().generation() >= 12);
}

#[test]
fn heartbeat_charges_exactly_the_compute_cost() {
    let mut world = started(2);
    occupy(&mut world, FIRST);
    let agent = world.agent_mut(FIRST).unwrap();
    agent.money = 10.0;
    agent.energy = 50.0;
    let cost = world.config().heartbeat_cost(1);

    world.advance_frame();

    let agent = world.agent(FIRST).unwrap();
    assert!(agent.alive);
    assert!((agent.money - (10.0 - cost)).abs() < 1e-9);
    assert!((agent.total_spent - cost).abs() < 1e-9);
    assert_eq!(agent.uptime, 1);
}

#[test]
fn agent_that_cannot_pay_for_compute_dies() {
    let mut world = started(3);
    occupy(&mut world, FIRST);
    world.agent_mut(FIRST).unwrap().money = 0.01;

    world.advance_frame();

    let agent = world.agent(FIRST).unwrap();
    assert!(!agent.alive);
    assert_eq!(agent.state, AgentState::Dead);
    assert_eq!(agent.state_timer, 0);
    assert!(agent.money <= 0.0);
    assert_eq!(world.stats().deaths, 1);
    assert_eq!(world.living_count(), 5);

    let think = world.activity(ActivityFilter::Only(ActivityKind::Think), 200);
    assert!(
        think
            .entries
            .iter()
            .any(|e| e.agent_name == agent.name && e.text.contains("TERMINATED"))
    );

    // The corpse only fades from here on.
    let name = agent.name.clone();
    let spent = agent.total_spent;
    world.run_frames(10);
    let agent = world.agent(FIRST).unwrap();
    assert_eq!(agent.name, name);
    assert_eq!(agent.total_spent, spent);
    assert!((agent.death_fade - 0.9).abs() < 1e-9);
    assert_eq!(world.stats().deaths, 1);
}

#[test]
fn finished_work_pays_within_the_expected_band() {
    let mut world = started(4);
    let agent = world.agent_mut(FIRST).unwrap();
    agent.state = AgentState::Working;
    agent.state_timer = 1;
    agent.decision_cooldown = 5;
    agent.xp = 0;
    agent.energy = 50.0;
    agent.money = 100.0;
    let level = agent.level;
    let bonus = level as f64 * 5.0 + (agent.intelligence / 20.0).floor() * 3.0;
    let cost = world.config().heartbeat_cost(level);

    world.advance_frame();

    let agent = world.agent(FIRST).unwrap();
    let earned = agent.money - (100.0 - cost);
    assert!(
        (12.0 + bonus..=46.0 + bonus).contains(&earned),
        "earned {earned} outside 12..=46 + {bonus}"
    );
    assert!((agent.total_earned - earned).abs() < 1e-9);
    assert_eq!(agent.xp, 15);
    assert_eq!(agent.tasks_done, 1);
    assert_eq!(agent.state, AgentState::Idle);
    assert!((agent.energy - (50.0 - 8.0 - 0.015)).abs() < 1e-9);
    assert_eq!(world.stats().tasks, 1);
}

#[test]
fn rich_agent_replicates_into_a_child() {
    let mut world = started(5);
    world.agent_mut(FIRST).unwrap().money = 10_000.0;

    let mut born = None;
    for _ in 0..500 {
        // Keep the parent idle and ready so every frame is a fresh decision.
        let agent = world.agent_mut(FIRST).unwrap();
        agent.state = AgentState::Idle;
        agent.state_timer = 0;
        agent.decision_cooldown = 0;
        world.advance_frame();

        let parent = world.agent(FIRST).unwrap();
        born = world
            .agents()
            .iter()
            .find(|a| a.parent.as_deref() == Some(parent.name.as_str()))
            .map(|a| a.id);
        if born.is_some() {
            break;
        }
    }

    let child = world.agent(born.expect("no replication within 500 frames")).unwrap();
    let parent = world.agent(FIRST).unwrap();
    assert_eq!(child.generation, parent.generation + 1);
    assert!(child.name.ends_with("-G2"));
    assert_eq!(child.energy, 60.0);
    assert_eq!(child.skills, parent.skills);
    assert_eq!(child.role, parent.role);
    assert_eq!(child.money, (parent.money * 0.3).floor());
    assert!(parent.total_spent >= world.config().replicate_cost);
    assert!(world.stats().replications >= 1);
    assert_eq!(
        world.stats().births,
        world.stats().deaths + world.living_count() as u64
    );

    let innovate = world.activity(ActivityFilter::Only(ActivityKind::Innovate), 50);
    assert!(innovate.entries.iter().any(|e| e.text.starts_with("REPLICATED!")));
}

#[test]
fn replacements_arrive_when_the_world_empties() {
    let mut world = started(6);
    world.set_speed(8).unwrap();
    for i in 0..6 {
        let id = AgentId::new(i);
        occupy(&mut world, id);
        world.agent_mut(id).unwrap().money = 0.01;
    }
    world.advance_frame();
    assert_eq!(world.living_count(), 0);
    assert_eq!(world.stats().deaths, 6);

    // 6.4% per frame at 8x: a replacement within 300 frames is all but certain.
    world.run_frames(300);
    assert!(world.living_count() > 0);
    assert!(world.agents().len() > 6);
    assert!(world.agents()[6..].iter().all(|a| a.generation == 1));
}

#[test]
fn paused_world_is_frozen() {
    let mut world = started(7);
    world.run_frames(50);
    world.pause();
    let before: Vec<_> = world.agents().iter().map(|a| a.money.to_bits()).collect();
    let time = world.clock().time;

    assert_eq!(world.run_frames(100), 0);
    let after: Vec<_> = world.agents().iter().map(|a| a.money.to_bits()).collect();
    assert_eq!(before, after);
    assert_eq!(world.clock().time, time);

    world.resume();
    assert_eq!(world.run_frames(10), 10);
}
