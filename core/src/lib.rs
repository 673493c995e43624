#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lawn Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative scene, and spawner strategies. Adapters submit [`Command`]
//! values describing desired mutations, the scene executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values describing
//! what actually happened during the tick. Spawner strategies implement the
//! [`ZombieSpawner`] capability and are injected wholesale at scene
//! construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of lanes on the lawn.
pub const DEFAULT_LANES: u32 = 5;
/// Default number of cells along each lane.
pub const DEFAULT_LANE_LENGTH: u32 = 9;

/// Static grid layout shared by every component of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    lanes: u32,
    lane_length: u32,
}

impl GridConfig {
    /// Creates a grid description, rejecting degenerate dimensions.
    pub fn new(lanes: u32, lane_length: u32) -> Result<Self, ConfigError> {
        if lanes == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        if lane_length == 0 {
            return Err(ConfigError::ZeroLaneLength);
        }
        Ok(Self { lanes, lane_length })
    }

    /// Number of horizontal lanes.
    #[must_use]
    pub const fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Number of cells along each lane.
    #[must_use]
    pub const fn lane_length(&self) -> u32 {
        self.lane_length
    }

    /// Total number of cells on the lawn.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.lanes as usize * self.lane_length as usize
    }

    /// Reports whether the coordinate falls inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.lane() < self.lanes && cell.position() < self.lane_length
    }

    /// Column where zombies enter their lane.
    #[must_use]
    pub const fn entry_position(&self) -> u32 {
        self.lane_length - 1
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            lane_length: DEFAULT_LANE_LENGTH,
        }
    }
}

/// Errors raised when constructing configuration values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid must contain at least one lane.
    #[error("grid must contain at least one lane")]
    ZeroLanes,
    /// Lanes must be at least one cell long.
    #[error("lanes must be at least one cell long")]
    ZeroLaneLength,
}

/// Location of a single lawn cell expressed as lane and position indices.
///
/// Position zero is the defender's edge of the lane; zombies enter at
/// `lane_length - 1` and walk toward zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    lane: u32,
    position: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(lane: u32, position: u32) -> Self {
        Self { lane, position }
    }

    /// Zero-based lane index of the cell.
    #[must_use]
    pub const fn lane(&self) -> u32 {
        self.lane
    }

    /// Zero-based position of the cell along its lane.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }
}

/// Discrete simulation clock advanced once per `Command::Tick`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tick(u64);

impl Tick {
    /// Wraps a raw tick count.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the raw tick count.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the tick that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Unique identifier assigned to a plant by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlantId(u32);

impl PlantId {
    /// Creates a new plant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a zombie by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Types of plants the defender may place.
///
/// The catalog is data, not control flow: each variant carries its stats via
/// `const fn` accessors, and behavior dispatch happens once in the scene's
/// tick driver over the [`PlantBehavior`] tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    /// Generates sun on a fixed interval.
    Sunflower,
    /// Shoots the nearest zombie in its lane.
    Peashooter,
    /// Absorbs a large amount of damage without acting.
    WallNut,
    /// Arms over time, then detonates under the first zombie to reach it.
    PotatoMine,
}

impl PlantKind {
    /// Every placeable plant kind in deck order.
    pub const ALL: [PlantKind; 4] = [
        PlantKind::Sunflower,
        PlantKind::Peashooter,
        PlantKind::WallNut,
        PlantKind::PotatoMine,
    ];

    /// Sun price deducted when the plant is placed.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Sunflower => 50,
            Self::Peashooter => 100,
            Self::WallNut => 50,
            Self::PotatoMine => 25,
        }
    }

    /// Ticks that must elapse before the kind may be placed again.
    #[must_use]
    pub const fn cooldown_ticks(self) -> u32 {
        match self {
            Self::Sunflower => 10,
            Self::Peashooter => 10,
            Self::WallNut => 40,
            Self::PotatoMine => 40,
        }
    }

    /// Hit points a freshly placed plant starts with.
    #[must_use]
    pub const fn initial_health(self) -> u32 {
        match self {
            Self::Sunflower => 300,
            Self::Peashooter => 300,
            Self::WallNut => 4000,
            Self::PotatoMine => 300,
        }
    }

    /// Behavior tag the tick driver dispatches on.
    #[must_use]
    pub const fn behavior(self) -> PlantBehavior {
        match self {
            Self::Sunflower => PlantBehavior::GenerateSun {
                interval: 24,
                amount: 25,
            },
            Self::Peashooter => PlantBehavior::Shoot {
                damage: 20,
                interval: 3,
            },
            Self::WallNut => PlantBehavior::Block,
            Self::PotatoMine => PlantBehavior::Detonate {
                damage: 1800,
                arm_ticks: 28,
            },
        }
    }

    /// Dense index of the kind within [`PlantKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Sunflower => 0,
            Self::Peashooter => 1,
            Self::WallNut => 2,
            Self::PotatoMine => 3,
        }
    }
}

/// Closed set of plant behaviors dispatched by the scene's tick driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlantBehavior {
    /// Produces `amount` sun every `interval` ticks.
    GenerateSun {
        /// Ticks between harvests.
        interval: u32,
        /// Sun credited per harvest.
        amount: u32,
    },
    /// Fires at the nearest zombie in the lane every `interval` ticks.
    Shoot {
        /// Damage dealt per shot.
        damage: u32,
        /// Ticks between shots.
        interval: u32,
    },
    /// Does nothing; soaks damage.
    Block,
    /// Explodes when a zombie steps onto the armed plant.
    Detonate {
        /// Damage dealt to every zombie in the cell.
        damage: u32,
        /// Ticks before the mine is live.
        arm_ticks: u32,
    },
}

/// Types of zombies a spawner strategy may introduce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZombieKind {
    /// Baseline attacker.
    Walker,
    /// Walker with a traffic-cone helmet.
    Conehead,
    /// Walker with a bucket helmet; slow but very durable.
    Buckethead,
}

impl ZombieKind {
    /// Every zombie kind in escalation order.
    pub const ALL: [ZombieKind; 3] = [
        ZombieKind::Walker,
        ZombieKind::Conehead,
        ZombieKind::Buckethead,
    ];

    /// Hit points a freshly spawned zombie starts with.
    #[must_use]
    pub const fn initial_health(self) -> u32 {
        match self {
            Self::Walker => 200,
            Self::Conehead => 560,
            Self::Buckethead => 1300,
        }
    }

    /// Ticks a zombie must accumulate before advancing one cell.
    #[must_use]
    pub const fn step_interval_ticks(self) -> u32 {
        match self {
            Self::Walker => 4,
            Self::Conehead => 4,
            Self::Buckethead => 6,
        }
    }

    /// Damage dealt to a plant per bite.
    #[must_use]
    pub const fn damage_per_bite(self) -> u32 {
        match self {
            Self::Walker => 100,
            Self::Conehead => 100,
            Self::Buckethead => 100,
        }
    }

    /// Ticks between bites while a plant blocks the zombie.
    #[must_use]
    pub const fn bite_interval_ticks(self) -> u32 {
        match self {
            Self::Walker => 2,
            Self::Conehead => 2,
            Self::Buckethead => 2,
        }
    }

    /// Score credited to the defender when the zombie dies.
    #[must_use]
    pub const fn score_reward(self) -> i64 {
        match self {
            Self::Walker => 10,
            Self::Conehead => 20,
            Self::Buckethead => 40,
        }
    }

    /// Dense index of the kind within [`ZombieKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Walker => 0,
            Self::Conehead => 1,
            Self::Buckethead => 2,
        }
    }
}

/// Commands that express all permissible scene mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// Requests placement of a plant at the provided cell.
    PlacePlant {
        /// Kind of plant to place.
        kind: PlantKind,
        /// Target cell for the placement.
        cell: CellCoord,
    },
}

/// Events broadcast by the scene after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TickAdvanced {
        /// Tick value after the advance.
        tick: Tick,
    },
    /// Confirms that a plant was placed.
    PlantPlaced {
        /// Identifier assigned to the plant by the scene.
        plant: PlantId,
        /// Kind of plant that was placed.
        kind: PlantKind,
        /// Cell the plant occupies.
        cell: CellCoord,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Kind of plant requested for placement.
        kind: PlantKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a spawner introduced a new zombie.
    ZombieSpawned {
        /// Identifier assigned to the zombie by the scene.
        zombie: ZombieId,
        /// Kind of zombie that entered the lawn.
        kind: ZombieKind,
        /// Entry cell of the zombie.
        cell: CellCoord,
    },
    /// Confirms that a zombie advanced one cell toward the defender.
    ZombieAdvanced {
        /// Identifier of the zombie that moved.
        zombie: ZombieId,
        /// Cell the zombie occupied before moving.
        from: CellCoord,
        /// Cell the zombie occupies after moving.
        to: CellCoord,
    },
    /// Reports that a zombie was destroyed.
    ZombieKilled {
        /// Identifier of the destroyed zombie.
        zombie: ZombieId,
        /// Kind of the destroyed zombie.
        kind: ZombieKind,
        /// Cell the zombie occupied when it died.
        cell: CellCoord,
    },
    /// Reports that a plant was destroyed.
    PlantDestroyed {
        /// Identifier of the destroyed plant.
        plant: PlantId,
        /// Kind of the destroyed plant.
        kind: PlantKind,
        /// Cell the plant occupied.
        cell: CellCoord,
    },
    /// Reports that an armed mine detonated under a zombie.
    MineDetonated {
        /// Identifier of the mine that exploded.
        plant: PlantId,
        /// Cell where the detonation happened.
        cell: CellCoord,
    },
    /// Reports that sun was credited to the defender.
    SunHarvested {
        /// Where the sun came from.
        source: SunSource,
        /// Amount credited after capping.
        amount: u32,
    },
    /// Reports that a zombie breached the defender's boundary.
    LifeLost {
        /// Identifier of the breaching zombie.
        zombie: ZombieId,
        /// Lane the breach happened in.
        lane: u32,
    },
}

/// Origin of a sun credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunSource {
    /// Passive income dripping from the sky.
    Sky,
    /// Harvested from a sunflower.
    Sunflower,
}

/// Reasons a placement request may be rejected by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the configured grid.
    OutOfBounds,
    /// The requested cell already holds a plant.
    Occupied,
    /// The defender cannot afford the plant's cost.
    InsufficientSun,
    /// The plant kind is still cooling down from a previous placement.
    CoolingDown,
}

/// Read-only slice of scene state handed to spawner strategies each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnContext {
    tick: Tick,
    lanes: u32,
    zombies_alive: u32,
}

impl SpawnContext {
    /// Creates a new spawn context for the current tick.
    #[must_use]
    pub const fn new(tick: Tick, lanes: u32, zombies_alive: u32) -> Self {
        Self {
            tick,
            lanes,
            zombies_alive,
        }
    }

    /// Tick being resolved.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    /// Number of lanes available for spawning.
    #[must_use]
    pub const fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Number of zombies currently on the lawn.
    #[must_use]
    pub const fn zombies_alive(&self) -> u32 {
        self.zombies_alive
    }
}

/// Request emitted by a spawner strategy to introduce one zombie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Lane the zombie should enter.
    pub lane: u32,
    /// Kind of zombie to spawn.
    pub kind: ZombieKind,
}

/// Strategy capability that decides which zombies enter the lawn each tick.
///
/// Implementations hold all schedule state internally and are mutated only by
/// the scene's tick driver. Swapping strategies happens wholesale at scene
/// construction; there is no runtime switching mid-episode.
pub trait ZombieSpawner: fmt::Debug {
    /// Appends zero or more spawn requests for the given tick.
    fn decide_spawns(&mut self, context: SpawnContext, out: &mut Vec<SpawnRequest>);
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, ConfigError, GridConfig, PlacementError, PlantBehavior, PlantId, PlantKind,
        ZombieId, ZombieKind,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn grid_config_rejects_degenerate_dimensions() {
        assert_eq!(GridConfig::new(0, 9), Err(ConfigError::ZeroLanes));
        assert_eq!(GridConfig::new(5, 0), Err(ConfigError::ZeroLaneLength));
    }

    #[test]
    fn grid_config_bounds_checks_cells() {
        let grid = GridConfig::new(5, 9).expect("valid grid");
        assert!(grid.contains(CellCoord::new(0, 0)));
        assert!(grid.contains(CellCoord::new(4, 8)));
        assert!(!grid.contains(CellCoord::new(5, 0)));
        assert!(!grid.contains(CellCoord::new(0, 9)));
        assert_eq!(grid.entry_position(), 8);
        assert_eq!(grid.cell_count(), 45);
    }

    #[test]
    fn plant_kind_indices_match_deck_order() {
        for (expected, kind) in PlantKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), expected);
        }
    }

    #[test]
    fn plant_behaviors_carry_positive_stats() {
        for kind in PlantKind::ALL {
            assert!(kind.cost() > 0);
            assert!(kind.cooldown_ticks() > 0);
            assert!(kind.initial_health() > 0);
            match kind.behavior() {
                PlantBehavior::GenerateSun { interval, amount } => {
                    assert!(interval > 0);
                    assert!(amount > 0);
                }
                PlantBehavior::Shoot { damage, interval } => {
                    assert!(damage > 0);
                    assert!(interval > 0);
                }
                PlantBehavior::Block => {}
                PlantBehavior::Detonate { damage, arm_ticks } => {
                    assert!(damage > 0);
                    assert!(arm_ticks > 0);
                }
            }
        }
    }

    #[test]
    fn zombie_kinds_escalate_in_durability() {
        let healths: Vec<u32> = ZombieKind::ALL
            .into_iter()
            .map(ZombieKind::initial_health)
            .collect();
        assert!(healths.windows(2).all(|pair| pair[0] < pair[1]));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&PlantId::new(7));
        assert_round_trip(&ZombieId::new(42));
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(3, 8));
    }

    #[test]
    fn catalog_kinds_round_trip_through_bincode() {
        assert_round_trip(&PlantKind::PotatoMine);
        assert_round_trip(&ZombieKind::Buckethead);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::CoolingDown);
    }
}
