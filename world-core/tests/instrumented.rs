#![cfg(feature = "instrument")]

use polars::prelude::*;
use world_core::World;
use world_core::instrument;

fn col_f64(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[test]
fn traced_events_agree_with_world_counters() {
    let mut world = World::with_seed(41).unwrap();
    let (ran, recorder) = instrument::capture(|| {
        world.start_world();
        world.set_speed(8).unwrap();
        world.run_frames(2_000)
    });

    assert_eq!(ran, 2_000);
    assert_eq!(recorder.count("frame"), 2_000);
    assert_eq!(recorder.count("birth") as u64, world.stats().births);
    assert_eq!(recorder.count("death") as u64, world.stats().deaths);
    assert_eq!(recorder.count("activity") as u64, world.log().total_recorded());

    let frames = recorder.table("frame").unwrap();
    let ticks = frames.u64s("tick").unwrap();
    assert!(ticks.windows(2).all(|w| w[1] == w[0] + 8));
    assert_eq!(
        frames.u64s("living").unwrap().last().copied(),
        Some(world.living_count() as u64)
    );

    // Founders are generation 1; every other birth is a replication.
    let births = recorder.table("birth").unwrap();
    let founders = births
        .u64s("generation")
        .unwrap()
        .iter()
        .filter(|&&g| g == 1)
        .count() as u64;
    assert_eq!(founders + world.stats().replications, births.rows() as u64);
}

#[test]
fn earnings_stat_matches_frame_series() {
    let mut world = World::with_seed(43).unwrap();
    let ((), recorder) = instrument::capture(|| {
        world.start_world();
        world.set_speed(4).unwrap();
        world.run_frames(1_500);
    });

    let frames = recorder.to_dataframes();
    let earned = col_f64(&frames["frame"], "earned");
    assert!(earned.windows(2).all(|w| w[1] >= w[0]), "lifetime earnings never fall");
    assert_eq!(earned.last().copied(), Some(world.stats().money));

    let peak = frames["frame"]
        .clone()
        .lazy()
        .select([col("living").max().alias("peak")])
        .collect()
        .unwrap();
    let peak = peak.column("peak").unwrap().u64().unwrap().get(0).unwrap();
    assert!(peak as usize <= world.config().max_population);
}

#[test]
fn activity_table_breaks_down_by_kind() {
    let mut world = World::with_seed(47).unwrap();
    let ((), recorder) = instrument::capture(|| {
        world.start_world();
        world.run_frames(1_000);
    });

    let frames = recorder.to_dataframes();
    let earn = frames["activity"]
        .clone()
        .lazy()
        .filter(col("kind").eq(lit("earn")))
        .collect()
        .unwrap();
    assert!(earn.height() > 0, "nobody earned anything in 1000 frames");

    let per_agent = frames["activity"]
        .clone()
        .lazy()
        .group_by([col("agent")])
        .agg([col("tick").count().alias("events")])
        .collect()
        .unwrap();
    assert!(per_agent.height() >= 6);
    assert!(per_agent.height() <= world.agents().len());
}
