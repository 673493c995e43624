#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative scene state management for Lawn Defence.
//!
//! The [`Scene`] is the sole mutable owner of simulation state: plants,
//! zombies, the economy, per-kind cooldowns, lives, and the per-tick score
//! accumulator. Adapters mutate it exclusively through [`apply`] and observe
//! it through the [`query`] module and the [`Event`] values emitted while
//! commands execute.
//!
//! A tick resolves its phases in a fixed order so that identical command
//! sequences replay identically: cooldowns, spawning, plant actions, zombie
//! actions, passive income, cleanup, boundary breaches. Within the combat
//! phases plants act before zombies, and each class resolves in identifier
//! order.

use lawn_defence_core::{
    CellCoord, Command, Event, GridConfig, PlacementError, PlantBehavior, PlantId, PlantKind,
    SpawnContext, SpawnRequest, SunSource, Tick, ZombieId, ZombieKind, ZombieSpawner,
};

/// Sun balance a fresh scene starts with.
pub const STARTING_SUN: u32 = 50;
/// Lives a fresh scene starts with.
pub const STARTING_LIVES: u32 = 3;
/// Hard cap applied to the sun balance.
pub const SUN_CAP: u32 = 10_000;
/// Ticks between decision points at which a controller may submit a move.
pub const DECISION_INTERVAL: u64 = 2;

const SKY_SUN_INTERVAL: u32 = 12;
const SKY_SUN_AMOUNT: u32 = 25;
const SUN_HARVEST_SCORE: i64 = 1;
const LIFE_LOST_PENALTY: i64 = 20;

/// Represents the authoritative Lawn Defence scene state.
#[derive(Debug)]
pub struct Scene {
    grid: GridConfig,
    spawner: Box<dyn ZombieSpawner>,
    plants: Vec<Plant>,
    zombies: Vec<Zombie>,
    occupancy: PlantGrid,
    cooldowns: [u32; PlantKind::ALL.len()],
    sun: u32,
    lives: u32,
    score: i64,
    tick: u64,
    next_plant_id: u32,
    next_zombie_id: u32,
    sky_accumulator: u32,
    spawn_scratch: Vec<SpawnRequest>,
}

impl Scene {
    /// Creates a fresh scene: empty lawn, full lives, starting sun, no
    /// cooldowns, and the provided spawner strategy installed for the whole
    /// episode.
    #[must_use]
    pub fn new(grid: GridConfig, spawner: Box<dyn ZombieSpawner>) -> Self {
        Self {
            occupancy: PlantGrid::new(&grid),
            grid,
            spawner,
            plants: Vec::new(),
            zombies: Vec::new(),
            cooldowns: [0; PlantKind::ALL.len()],
            sun: STARTING_SUN,
            lives: STARTING_LIVES,
            score: 0,
            tick: 0,
            next_plant_id: 0,
            next_zombie_id: 0,
            sky_accumulator: 0,
            spawn_scratch: Vec::new(),
        }
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.score = 0;
        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TickAdvanced {
            tick: Tick::new(self.tick),
        });

        for slot in self.cooldowns.iter_mut() {
            *slot = slot.saturating_sub(1);
        }

        // Zombies introduced this tick start acting on the next one.
        let preexisting = self.zombies.len();
        self.resolve_spawning(out_events);
        self.resolve_plant_actions(out_events);
        self.resolve_zombie_actions(preexisting, out_events);

        self.sky_accumulator += 1;
        if self.sky_accumulator >= SKY_SUN_INTERVAL {
            self.sky_accumulator = 0;
            self.credit_sun(SKY_SUN_AMOUNT, SunSource::Sky, out_events);
        }

        self.remove_dead(out_events);
        self.resolve_breaches(out_events);
    }

    fn resolve_spawning(&mut self, out_events: &mut Vec<Event>) {
        let alive = u32::try_from(self.zombies.len()).unwrap_or(u32::MAX);
        let context = SpawnContext::new(Tick::new(self.tick), self.grid.lanes(), alive);
        let mut requests = std::mem::take(&mut self.spawn_scratch);
        requests.clear();
        self.spawner.decide_spawns(context, &mut requests);

        for request in &requests {
            if request.lane >= self.grid.lanes() {
                continue;
            }
            let cell = CellCoord::new(request.lane, self.grid.entry_position());
            let zombie = ZombieId::new(self.next_zombie_id);
            self.next_zombie_id = self.next_zombie_id.saturating_add(1);
            self.zombies.push(Zombie::spawned(zombie, request.kind, cell));
            out_events.push(Event::ZombieSpawned {
                zombie,
                kind: request.kind,
                cell,
            });
        }

        self.spawn_scratch = requests;
    }

    fn resolve_plant_actions(&mut self, out_events: &mut Vec<Event>) {
        for index in 0..self.plants.len() {
            let (kind, cell) = {
                let plant = &self.plants[index];
                (plant.kind, plant.cell)
            };
            match kind.behavior() {
                PlantBehavior::GenerateSun { interval, amount } => {
                    let harvest = {
                        let plant = &mut self.plants[index];
                        plant.action_accumulator += 1;
                        if plant.action_accumulator >= interval {
                            plant.action_accumulator = 0;
                            true
                        } else {
                            false
                        }
                    };
                    if harvest {
                        self.credit_sun(amount, SunSource::Sunflower, out_events);
                    }
                }
                PlantBehavior::Shoot { damage, interval } => {
                    {
                        let plant = &mut self.plants[index];
                        if plant.action_accumulator < interval {
                            plant.action_accumulator += 1;
                        }
                    }
                    if self.plants[index].action_accumulator >= interval {
                        if let Some(target) = self.target_zombie(cell) {
                            let zombie = &mut self.zombies[target];
                            zombie.health = zombie.health.saturating_sub(damage);
                            self.plants[index].action_accumulator = 0;
                        }
                    }
                }
                PlantBehavior::Block => {}
                PlantBehavior::Detonate { damage, arm_ticks } => {
                    let armed = {
                        let plant = &mut self.plants[index];
                        if plant.action_accumulator < arm_ticks {
                            plant.action_accumulator += 1;
                        }
                        plant.action_accumulator >= arm_ticks
                    };
                    if armed && self.zombie_on_cell(cell) {
                        self.detonate_mine(index, cell, damage, out_events);
                    }
                }
            }
        }
    }

    fn resolve_zombie_actions(&mut self, limit: usize, out_events: &mut Vec<Event>) {
        for index in 0..limit {
            if self.zombies[index].health == 0 {
                continue;
            }
            let (id, kind, cell) = {
                let zombie = &self.zombies[index];
                (zombie.id, zombie.kind, zombie.cell)
            };

            if let Some(plant_index) = self.plant_index_at(cell) {
                // Blocked by a plant: bite on the bite cadence, hold position.
                let bite = {
                    let zombie = &mut self.zombies[index];
                    zombie.step_accumulator = 0;
                    zombie.bite_accumulator += 1;
                    zombie.bite_accumulator >= kind.bite_interval_ticks()
                };
                if bite {
                    self.zombies[index].bite_accumulator = 0;
                    let plant = &mut self.plants[plant_index];
                    plant.health = plant.health.saturating_sub(kind.damage_per_bite());
                }
                continue;
            }

            let zombie = &mut self.zombies[index];
            zombie.bite_accumulator = 0;
            zombie.step_accumulator += 1;
            if zombie.step_accumulator < kind.step_interval_ticks() {
                continue;
            }
            zombie.step_accumulator = 0;

            if cell.position() == 0 {
                zombie.breached = true;
                continue;
            }

            let to = CellCoord::new(cell.lane(), cell.position() - 1);
            zombie.cell = to;
            out_events.push(Event::ZombieAdvanced {
                zombie: id,
                from: cell,
                to,
            });
        }
    }

    fn detonate_mine(
        &mut self,
        plant_index: usize,
        cell: CellCoord,
        damage: u32,
        out_events: &mut Vec<Event>,
    ) {
        let plant = &mut self.plants[plant_index];
        plant.health = 0;
        out_events.push(Event::MineDetonated {
            plant: plant.id,
            cell,
        });
        for zombie in self.zombies.iter_mut().filter(|zombie| zombie.cell == cell) {
            zombie.health = zombie.health.saturating_sub(damage);
        }
    }

    fn credit_sun(&mut self, amount: u32, source: SunSource, out_events: &mut Vec<Event>) {
        let credited = amount.min(SUN_CAP.saturating_sub(self.sun));
        if credited == 0 {
            return;
        }
        self.sun += credited;
        self.score += SUN_HARVEST_SCORE;
        out_events.push(Event::SunHarvested {
            source,
            amount: credited,
        });
    }

    fn remove_dead(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.plants.len() {
            if self.plants[index].health == 0 {
                let plant = self.plants.remove(index);
                self.occupancy.vacate(plant.cell);
                out_events.push(Event::PlantDestroyed {
                    plant: plant.id,
                    kind: plant.kind,
                    cell: plant.cell,
                });
            } else {
                index += 1;
            }
        }

        let mut index = 0;
        while index < self.zombies.len() {
            if self.zombies[index].health == 0 {
                let zombie = self.zombies.remove(index);
                self.score += zombie.kind.score_reward();
                out_events.push(Event::ZombieKilled {
                    zombie: zombie.id,
                    kind: zombie.kind,
                    cell: zombie.cell,
                });
            } else {
                index += 1;
            }
        }
    }

    fn resolve_breaches(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.zombies.len() {
            if self.zombies[index].breached {
                let zombie = self.zombies.remove(index);
                self.lives = self.lives.saturating_sub(1);
                self.score -= LIFE_LOST_PENALTY;
                out_events.push(Event::LifeLost {
                    zombie: zombie.id,
                    lane: zombie.cell.lane(),
                });
            } else {
                index += 1;
            }
        }
    }

    fn place_plant(&mut self, kind: PlantKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.validate_placement(kind, cell) {
            out_events.push(Event::PlacementRejected { kind, cell, reason });
            return;
        }

        self.sun -= kind.cost();
        self.cooldowns[kind.index()] = kind.cooldown_ticks();
        let plant = PlantId::new(self.next_plant_id);
        self.next_plant_id = self.next_plant_id.saturating_add(1);
        self.plants.push(Plant::placed(plant, kind, cell));
        self.occupancy.occupy(plant, cell);
        out_events.push(Event::PlantPlaced { plant, kind, cell });
    }

    fn validate_placement(&self, kind: PlantKind, cell: CellCoord) -> Result<(), PlacementError> {
        if !self.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.occupancy.plant_at(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        if self.sun < kind.cost() {
            return Err(PlacementError::InsufficientSun);
        }
        if self.cooldowns[kind.index()] > 0 {
            return Err(PlacementError::CoolingDown);
        }
        Ok(())
    }

    fn plant_index_at(&self, cell: CellCoord) -> Option<usize> {
        let id = self.occupancy.plant_at(cell)?;
        self.plants
            .binary_search_by_key(&id, |plant| plant.id)
            .ok()
    }

    fn target_zombie(&self, from: CellCoord) -> Option<usize> {
        self.zombies
            .iter()
            .enumerate()
            .filter(|(_, zombie)| {
                zombie.health > 0
                    && zombie.cell.lane() == from.lane()
                    && zombie.cell.position() >= from.position()
            })
            .min_by_key(|(_, zombie)| (zombie.cell.position(), zombie.id))
            .map(|(index, _)| index)
    }

    fn zombie_on_cell(&self, cell: CellCoord) -> bool {
        self.zombies
            .iter()
            .any(|zombie| zombie.health > 0 && zombie.cell == cell)
    }
}

/// Applies the provided command to the scene, mutating state deterministically.
pub fn apply(scene: &mut Scene, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => scene.advance_tick(out_events),
        Command::PlacePlant { kind, cell } => scene.place_plant(kind, cell, out_events),
    }
}

/// A single placement action, constructed without validation so controllers
/// can probe legality speculatively.
///
/// `is_valid` is pure; `apply` routes through the same placement path as
/// [`Command::PlacePlant`], so an invalid move leaves the scene untouched and
/// records a [`Event::PlacementRejected`]. The silent no-op on illegal moves
/// is deliberate: an exploring controller must never corrupt state or crash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    kind: PlantKind,
    cell: CellCoord,
}

impl Move {
    /// Creates a move placing `kind` at the given lane and position.
    #[must_use]
    pub const fn new(kind: PlantKind, lane: u32, position: u32) -> Self {
        Self {
            kind,
            cell: CellCoord::new(lane, position),
        }
    }

    /// Kind of plant the move would place.
    #[must_use]
    pub const fn kind(&self) -> PlantKind {
        self.kind
    }

    /// Cell the move targets.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Reports whether the move is currently legal against the scene.
    #[must_use]
    pub fn is_valid(&self, scene: &Scene) -> bool {
        scene.validate_placement(self.kind, self.cell).is_ok()
    }

    /// Applies the move to the scene; a no-op (plus rejection event) when the
    /// move is not legal at this instant.
    pub fn apply(&self, scene: &mut Scene, out_events: &mut Vec<Event>) {
        scene.place_plant(self.kind, self.cell, out_events);
    }
}

/// Query functions that provide read-only access to the scene state.
pub mod query {
    use super::{Scene, DECISION_INTERVAL};
    use lawn_defence_core::{CellCoord, GridConfig, PlantId, PlantKind, Tick, ZombieId, ZombieKind};

    /// Provides read-only access to the scene's grid definition.
    #[must_use]
    pub fn grid(scene: &Scene) -> GridConfig {
        scene.grid
    }

    /// Current simulation tick.
    #[must_use]
    pub fn tick(scene: &Scene) -> Tick {
        Tick::new(scene.tick)
    }

    /// Current sun balance.
    #[must_use]
    pub fn sun(scene: &Scene) -> u32 {
        scene.sun
    }

    /// Remaining defender lives; zero is the terminal condition.
    #[must_use]
    pub fn lives(scene: &Scene) -> u32 {
        scene.lives
    }

    /// Signed reward earned during the most recent tick only.
    #[must_use]
    pub fn score(scene: &Scene) -> i64 {
        scene.score
    }

    /// True exactly when the controller may submit a move before the next
    /// tick; the cadence is fixed and independent of board contents.
    #[must_use]
    pub fn move_available(scene: &Scene) -> bool {
        scene.tick % DECISION_INTERVAL == 0
    }

    /// Returns the plant occupying the provided cell, if any.
    #[must_use]
    pub fn plant_at(scene: &Scene, cell: CellCoord) -> Option<PlantId> {
        scene.occupancy.plant_at(cell)
    }

    /// Captures a read-only view of the plants on the lawn.
    #[must_use]
    pub fn plant_view(scene: &Scene) -> PlantView {
        let mut snapshots: Vec<PlantSnapshot> = scene
            .plants
            .iter()
            .map(|plant| PlantSnapshot {
                id: plant.id,
                kind: plant.kind,
                cell: plant.cell,
                health: plant.health,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        PlantView { snapshots }
    }

    /// Captures a read-only view of the zombies on the lawn.
    #[must_use]
    pub fn zombie_view(scene: &Scene) -> ZombieView {
        let mut snapshots: Vec<ZombieSnapshot> = scene
            .zombies
            .iter()
            .map(|zombie| ZombieSnapshot {
                id: zombie.id,
                kind: zombie.kind,
                cell: zombie.cell,
                health: zombie.health,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        ZombieView { snapshots }
    }

    /// Captures the remaining cooldown of every plant kind in deck order.
    #[must_use]
    pub fn cooldown_view(scene: &Scene) -> CooldownView {
        let snapshots = PlantKind::ALL
            .into_iter()
            .map(|kind| CooldownSnapshot {
                kind,
                ready_in: scene.cooldowns[kind.index()],
            })
            .collect();
        CooldownView { snapshots }
    }

    /// Read-only snapshot describing all plants on the lawn.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PlantView {
        snapshots: Vec<PlantSnapshot>,
    }

    impl PlantView {
        /// Iterator over the captured plant snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &PlantSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<PlantSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single plant's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlantSnapshot {
        /// Unique identifier assigned to the plant.
        pub id: PlantId,
        /// Kind of the plant.
        pub kind: PlantKind,
        /// Cell the plant occupies.
        pub cell: CellCoord,
        /// Remaining hit points.
        pub health: u32,
    }

    /// Read-only snapshot describing all zombies on the lawn.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ZombieView {
        snapshots: Vec<ZombieSnapshot>,
    }

    impl ZombieView {
        /// Iterator over the captured zombie snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ZombieSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single zombie's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ZombieSnapshot {
        /// Unique identifier assigned to the zombie.
        pub id: ZombieId,
        /// Kind of the zombie.
        pub kind: ZombieKind,
        /// Cell the zombie currently occupies.
        pub cell: CellCoord,
        /// Remaining hit points.
        pub health: u32,
    }

    /// Remaining cooldowns for every placeable plant kind.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CooldownView {
        snapshots: Vec<CooldownSnapshot>,
    }

    impl CooldownView {
        /// Iterator over the cooldown snapshots in deck order.
        pub fn iter(&self) -> impl Iterator<Item = &CooldownSnapshot> {
            self.snapshots.iter()
        }

        /// Remaining cooldown for the provided kind.
        #[must_use]
        pub fn ready_in(&self, kind: PlantKind) -> u32 {
            self.snapshots
                .iter()
                .find(|snapshot| snapshot.kind == kind)
                .map_or(0, |snapshot| snapshot.ready_in)
        }
    }

    /// Remaining cooldown of a single plant kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CooldownSnapshot {
        /// Plant kind the cooldown applies to.
        pub kind: PlantKind,
        /// Ticks before the kind may be placed again; zero means ready.
        pub ready_in: u32,
    }
}

#[derive(Clone, Copy, Debug)]
struct Plant {
    id: PlantId,
    kind: PlantKind,
    cell: CellCoord,
    health: u32,
    action_accumulator: u32,
}

impl Plant {
    fn placed(id: PlantId, kind: PlantKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            health: kind.initial_health(),
            action_accumulator: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Zombie {
    id: ZombieId,
    kind: ZombieKind,
    cell: CellCoord,
    health: u32,
    step_accumulator: u32,
    bite_accumulator: u32,
    breached: bool,
}

impl Zombie {
    fn spawned(id: ZombieId, kind: ZombieKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            health: kind.initial_health(),
            step_accumulator: 0,
            bite_accumulator: 0,
            breached: false,
        }
    }
}

#[derive(Clone, Debug)]
struct PlantGrid {
    lanes: u32,
    lane_length: u32,
    cells: Vec<Option<PlantId>>,
}

impl PlantGrid {
    fn new(grid: &GridConfig) -> Self {
        Self {
            lanes: grid.lanes(),
            lane_length: grid.lane_length(),
            cells: vec![None; grid.cell_count()],
        }
    }

    fn plant_at(&self, cell: CellCoord) -> Option<PlantId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn occupy(&mut self, plant: PlantId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(plant);
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.lane() < self.lanes && cell.position() < self.lane_length {
            let lane = usize::try_from(cell.lane()).ok()?;
            let position = usize::try_from(cell.position()).ok()?;
            let length = usize::try_from(self.lane_length).ok()?;
            Some(lane * length + position)
        } else {
            None
        }
    }
}
