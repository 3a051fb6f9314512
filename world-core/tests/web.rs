#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use world_core::{AgentWorld, WorldConfig};

wasm_bindgen_test_configure!(run_in_browser);

fn seeded(seed: u64) -> AgentWorld {
    let config = WorldConfig::default().with_seed(seed);
    AgentWorld::new(serde_wasm_bindgen::to_value(&config).unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn handle_starts_and_advances() {
    let mut world = AgentWorld::new(JsValue::UNDEFINED).unwrap();
    assert!(!world.advance_frame());
    assert!(world.start_world());
    assert!(world.is_running());
    assert!(world.advance_frame());
    assert_eq!(world.tick(), 1);
    assert_eq!(world.snapshot().agents.len(), 6);
    assert_eq!(world.automaton_cells().len(), world.automaton_cols() * world.automaton_rows());
}

#[wasm_bindgen_test]
fn seeded_handles_match() {
    let mut a = seeded(8102);
    let mut b = seeded(8102);
    for world in [&mut a, &mut b] {
        world.start_world();
        world.set_speed(8).unwrap();
        for _ in 0..200 {
            world.advance_frame();
        }
    }
    let names = |w: &AgentWorld| {
        w.leaderboard(20)
            .entries
            .into_iter()
            .map(|e| (e.name, e.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&a), names(&b));
    assert_eq!(a.clock_label(), b.clock_label());
}

#[wasm_bindgen_test]
fn controls_reject_bad_input() {
    let mut world = seeded(1);
    assert!(world.set_speed(3).is_err());
    assert!(world.activity(Some("gossip".into()), 10).is_err());
    assert_eq!(world.cycle_speed(), 2);
    assert!(world.toggle_pause());
    assert!(world.is_paused());
}
