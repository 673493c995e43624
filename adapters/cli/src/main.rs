#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Lawn Defence episodes.
//!
//! The binary wires a spawner strategy and a baseline policy to a fresh
//! scene, drives the decision-point loop until the defender runs out of
//! lives or the tick budget expires, and prints an analytics report.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use lawn_defence_core::{Command, GridConfig, ZombieKind, ZombieSpawner};
use lawn_defence_system_analytics::EpisodeMetrics;
use lawn_defence_system_spawning::{Config as SteadyConfig, SteadySpawner};
use lawn_defence_system_waves::{Config as WaveConfig, WaveSpawner};
use lawn_defence_world::{apply, query, Scene};

mod policy;

use policy::Policy;

#[derive(Debug, Parser)]
#[command(name = "lawn-defence", about = "Headless Lawn Defence episode runner")]
struct Args {
    /// Spawner strategy driving the attacker.
    #[arg(long, value_enum, default_value = "waves")]
    spawner: SpawnerChoice,

    /// Baseline policy playing the defender.
    #[arg(long, value_enum, default_value = "greedy")]
    policy: PolicyChoice,

    /// Seed shared by the spawner schedule and the random policy.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Tick budget before the episode is cut short.
    #[arg(long, default_value_t = 2_400)]
    max_ticks: u64,

    /// Steady spawner cadence in ticks.
    #[arg(long, default_value_t = 20)]
    spawn_interval: u32,

    /// Number of lanes on the lawn.
    #[arg(long, default_value_t = lawn_defence_core::DEFAULT_LANES)]
    lanes: u32,

    /// Number of cells along each lane.
    #[arg(long, default_value_t = lawn_defence_core::DEFAULT_LANE_LENGTH)]
    lane_length: u32,

    /// Ticks between printed status lines.
    #[arg(long, default_value_t = 120)]
    report_interval: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SpawnerChoice {
    /// Fixed-rate pressure for unbounded episodes.
    Steady,
    /// Escalating seed-derived waves with quiet gaps.
    Waves,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyChoice {
    /// Never act; watch the lawn fall.
    Idle,
    /// Explore uniformly over the legal action space.
    Random,
    /// Grow sunflowers, then shoot back.
    Greedy,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let grid = GridConfig::new(args.lanes, args.lane_length)?;

    let spawner: Box<dyn ZombieSpawner> = match args.spawner {
        SpawnerChoice::Steady => Box::new(SteadySpawner::new(SteadyConfig::new(
            args.spawn_interval,
            args.seed,
        ))),
        SpawnerChoice::Waves => Box::new(WaveSpawner::new(WaveConfig::new(args.seed))),
    };
    let mut policy = match args.policy {
        PolicyChoice::Idle => Policy::Idle,
        PolicyChoice::Random => policy::random_policy(args.seed),
        PolicyChoice::Greedy => Policy::Greedy,
    };

    let mut scene = Scene::new(grid, spawner);
    let mut metrics = EpisodeMetrics::new();
    let mut events = Vec::new();
    let mut total_reward = 0i64;

    println!(
        "lawn-defence: {:?} spawner vs {:?} policy, seed {}, {}x{} lawn",
        args.spawner,
        args.policy,
        args.seed,
        grid.lanes(),
        grid.lane_length()
    );

    while query::lives(&scene) > 0 && query::tick(&scene).get() < args.max_ticks {
        if query::move_available(&scene) {
            if let Some(chosen) = policy.choose(&scene) {
                chosen.apply(&mut scene, &mut events);
            }
        }

        apply(&mut scene, Command::Tick, &mut events);
        total_reward += query::score(&scene);
        metrics.record(&events);
        events.clear();

        let tick = query::tick(&scene).get();
        if args.report_interval > 0 && tick % args.report_interval == 0 {
            print_status(&scene, total_reward);
        }
    }

    print_report(&scene, &metrics, total_reward);
    Ok(())
}

fn print_status(scene: &Scene, total_reward: i64) {
    println!(
        "tick {:>5}  sun {:>5}  lives {}  plants {:>2}  zombies {:>3}  reward {:>6}",
        query::tick(scene).get(),
        query::sun(scene),
        query::lives(scene),
        query::plant_view(scene).into_vec().len(),
        query::zombie_view(scene).into_vec().len(),
        total_reward
    );
}

fn print_report(scene: &Scene, metrics: &EpisodeMetrics, total_reward: i64) {
    let outcome = if query::lives(scene) == 0 {
        "overrun"
    } else {
        "survived"
    };
    println!("episode {outcome} after {} ticks", metrics.ticks());
    println!(
        "  reward {total_reward}, sun harvested {}, lives lost {}",
        metrics.sun_harvested(),
        metrics.lives_lost()
    );
    println!(
        "  plants placed {} (rejected {}), lost {}, mines detonated {}",
        metrics.plants_placed(),
        metrics.placements_rejected(),
        metrics.plants_lost(),
        metrics.mines_detonated()
    );
    for kind in ZombieKind::ALL {
        println!(
            "  {:?}: spawned {}, killed {}",
            kind,
            metrics.spawned_of(kind),
            metrics.killed_of(kind)
        );
    }
}
