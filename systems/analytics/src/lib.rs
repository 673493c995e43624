#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure episode metrics aggregated from the scene's event stream.

use lawn_defence_core::{Event, ZombieKind};

/// Running counters describing one episode, folded from events.
///
/// The aggregator never touches the scene: feed it the event batches that
/// `apply` produced and read the totals at any point. Recording is additive,
/// so one value can span a whole episode while the scene's own score stays a
/// per-tick delta.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpisodeMetrics {
    ticks: u64,
    zombies_spawned: [u64; ZombieKind::ALL.len()],
    zombies_killed: [u64; ZombieKind::ALL.len()],
    plants_placed: u64,
    plants_lost: u64,
    placements_rejected: u64,
    mines_detonated: u64,
    sun_harvested: u64,
    lives_lost: u64,
}

impl EpisodeMetrics {
    /// Creates an empty metrics aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a batch of events into the running counters.
    pub fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TickAdvanced { .. } => self.ticks += 1,
                Event::ZombieSpawned { kind, .. } => {
                    self.zombies_spawned[kind.index()] += 1;
                }
                Event::ZombieKilled { kind, .. } => {
                    self.zombies_killed[kind.index()] += 1;
                }
                Event::PlantPlaced { .. } => self.plants_placed += 1,
                Event::PlantDestroyed { .. } => self.plants_lost += 1,
                Event::PlacementRejected { .. } => self.placements_rejected += 1,
                Event::MineDetonated { .. } => self.mines_detonated += 1,
                Event::SunHarvested { amount, .. } => {
                    self.sun_harvested += u64::from(*amount);
                }
                Event::LifeLost { .. } => self.lives_lost += 1,
                Event::ZombieAdvanced { .. } => {}
            }
        }
    }

    /// Ticks the episode has consumed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Zombies of the provided kind that entered the lawn.
    #[must_use]
    pub const fn spawned_of(&self, kind: ZombieKind) -> u64 {
        self.zombies_spawned[kind.index()]
    }

    /// Zombies of the provided kind the defender destroyed.
    #[must_use]
    pub const fn killed_of(&self, kind: ZombieKind) -> u64 {
        self.zombies_killed[kind.index()]
    }

    /// Total zombies that entered the lawn.
    #[must_use]
    pub fn total_spawned(&self) -> u64 {
        self.zombies_spawned.iter().sum()
    }

    /// Total zombies the defender destroyed.
    #[must_use]
    pub fn total_killed(&self) -> u64 {
        self.zombies_killed.iter().sum()
    }

    /// Plants the defender successfully placed.
    #[must_use]
    pub const fn plants_placed(&self) -> u64 {
        self.plants_placed
    }

    /// Plants destroyed by zombies or detonation.
    #[must_use]
    pub const fn plants_lost(&self) -> u64 {
        self.plants_lost
    }

    /// Placement requests the scene rejected.
    #[must_use]
    pub const fn placements_rejected(&self) -> u64 {
        self.placements_rejected
    }

    /// Potato mines that detonated.
    #[must_use]
    pub const fn mines_detonated(&self) -> u64 {
        self.mines_detonated
    }

    /// Total sun credited to the defender, from all sources.
    #[must_use]
    pub const fn sun_harvested(&self) -> u64 {
        self.sun_harvested
    }

    /// Lives lost to boundary breaches.
    #[must_use]
    pub const fn lives_lost(&self) -> u64 {
        self.lives_lost
    }
}
