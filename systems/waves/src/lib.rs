#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave-scheduled zombie spawner strategy.
//!
//! Pressure arrives in predetermined waves separated by quiet intervals. Each
//! wave's lane assignments and composition are drawn from a SplitMix64 stream
//! seeded by hashing the global seed together with the wave index, so a seed
//! pins down the entire escalation curve while waves stay independent of how
//! many ticks the episode has already consumed.

use lawn_defence_core::{SpawnContext, SpawnRequest, ZombieKind, ZombieSpawner};
use sha2::{Digest, Sha256};

const RNG_STREAM_WAVE: &str = "wave";

/// Configuration parameters required to construct the wave spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    first_wave_tick: u64,
    wave_interval_ticks: u64,
    base_count: u32,
    growth_per_wave: u32,
    release_cadence_ticks: u64,
}

impl Config {
    /// Creates a configuration with the default schedule for the given seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            first_wave_tick: 60,
            wave_interval_ticks: 240,
            base_count: 3,
            growth_per_wave: 2,
            release_cadence_ticks: 6,
        }
    }

    /// Overrides the tick at which the first wave breaks.
    #[must_use]
    pub const fn with_first_wave_tick(mut self, tick: u64) -> Self {
        self.first_wave_tick = tick;
        self
    }

    /// Overrides the quiet interval between wave starts.
    #[must_use]
    pub const fn with_wave_interval(mut self, ticks: u64) -> Self {
        self.wave_interval_ticks = ticks;
        self
    }
}

/// Spawner strategy that follows a seed-derived schedule of escalating waves.
#[derive(Debug)]
pub struct WaveSpawner {
    config: Config,
    wave_index: u32,
    next_wave_tick: u64,
    pending: Vec<PendingSpawn>,
}

#[derive(Clone, Copy, Debug)]
struct PendingSpawn {
    due: u64,
    lane: u32,
    kind: ZombieKind,
}

impl WaveSpawner {
    /// Creates a new wave spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            next_wave_tick: config.first_wave_tick,
            config,
            wave_index: 0,
            pending: Vec::new(),
        }
    }

    /// Index of the next wave that has not yet broken.
    #[must_use]
    pub const fn wave_index(&self) -> u32 {
        self.wave_index
    }

    fn schedule_wave(&mut self, start: u64, lanes: u32) {
        let wave = self.wave_index;
        let count = self
            .config
            .base_count
            .saturating_add(wave.saturating_mul(self.config.growth_per_wave));
        let mut rng = SplitMix64::new(derive_wave_seed(self.config.rng_seed, wave));

        for index in 0..count {
            let lane = (rng.next_u64() % u64::from(lanes)) as u32;
            let kind = sample_kind(&mut rng, wave);
            let due = start + u64::from(index) * self.config.release_cadence_ticks;
            self.pending.push(PendingSpawn { due, lane, kind });
        }
    }

    fn release_due(&mut self, tick: u64, out: &mut Vec<SpawnRequest>) {
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= tick {
                let spawn = self.pending.remove(index);
                out.push(SpawnRequest {
                    lane: spawn.lane,
                    kind: spawn.kind,
                });
            } else {
                index += 1;
            }
        }
    }
}

impl ZombieSpawner for WaveSpawner {
    fn decide_spawns(&mut self, context: SpawnContext, out: &mut Vec<SpawnRequest>) {
        if context.lanes() == 0 {
            return;
        }

        let tick = context.tick().get();
        if tick >= self.next_wave_tick {
            self.schedule_wave(tick, context.lanes());
            self.wave_index = self.wave_index.saturating_add(1);
            self.next_wave_tick = tick.saturating_add(self.config.wave_interval_ticks);
        }

        self.release_due(tick, out);
    }
}

/// Picks a zombie kind with weights that shift toward tougher kinds as the
/// wave index rises.
fn sample_kind(rng: &mut SplitMix64, wave: u32) -> ZombieKind {
    let conehead_weight = wave.min(4);
    let buckethead_weight = wave.saturating_sub(2).min(3);
    let total = 6 + conehead_weight + buckethead_weight;
    let roll = (rng.next_u64() % u64::from(total)) as u32;
    if roll < 6 {
        ZombieKind::Walker
    } else if roll < 6 + conehead_weight {
        ZombieKind::Conehead
    } else {
        ZombieKind::Buckethead
    }
}

fn derive_wave_seed(global_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(RNG_STREAM_WAVE.as_bytes());
    hasher.update(wave.to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}
