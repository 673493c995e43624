#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steady-rate zombie spawner strategy.
//!
//! Spawns on a fixed tick interval, uniformly across lanes, for an unbounded
//! episode. Lane and kind selection run off a deterministic linear
//! congruential generator so the same seed always replays the same pressure.

use lawn_defence_core::{SpawnContext, SpawnRequest, ZombieKind, ZombieSpawner};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Tick after which coneheads join the spawn mix.
const CONEHEAD_UNLOCK_TICK: u64 = 120;
/// Tick after which bucketheads join the spawn mix.
const BUCKETHEAD_UNLOCK_TICK: u64 = 360;

/// Configuration parameters required to construct the steady spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval_ticks: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval_ticks: u32, rng_seed: u64) -> Self {
        Self {
            spawn_interval_ticks,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_interval_ticks: 20,
            rng_seed: 0x5eed_0f1e_1d00_0001,
        }
    }
}

/// Spawner strategy that deterministically emits zombies at a fixed rate.
#[derive(Debug)]
pub struct SteadySpawner {
    spawn_interval: u32,
    accumulator: u32,
    rng_state: u64,
}

impl SteadySpawner {
    /// Creates a new steady spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval_ticks,
            accumulator: 0,
            rng_state: config.rng_seed,
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    fn select_kind(&mut self, tick: u64) -> ZombieKind {
        if tick < CONEHEAD_UNLOCK_TICK {
            return ZombieKind::Walker;
        }
        let roll = self.advance_rng() % 10;
        if tick >= BUCKETHEAD_UNLOCK_TICK && roll == 9 {
            ZombieKind::Buckethead
        } else if roll >= 7 {
            ZombieKind::Conehead
        } else {
            ZombieKind::Walker
        }
    }
}

impl ZombieSpawner for SteadySpawner {
    fn decide_spawns(&mut self, context: SpawnContext, out: &mut Vec<SpawnRequest>) {
        if self.spawn_interval == 0 || context.lanes() == 0 {
            return;
        }

        self.accumulator += 1;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            let lane = (self.advance_rng() % u64::from(context.lanes())) as u32;
            let kind = self.select_kind(context.tick().get());
            out.push(SpawnRequest { lane, kind });
        }
    }
}
