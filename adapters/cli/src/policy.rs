use lawn_defence_core::PlantKind;
use lawn_defence_world::{query, Move, Scene};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Baseline controllers used to exercise episodes from the command line.
///
/// Policies observe the scene exclusively through queries and probe legality
/// with `Move::is_valid`, exactly as an external controller would.
#[derive(Debug)]
pub(crate) enum Policy {
    /// Never submits a move.
    Idle,
    /// Samples uniformly from the currently legal moves plus "do nothing".
    Random(ChaCha8Rng),
    /// Builds an economy, then answers lane pressure with peashooters.
    Greedy,
}

impl Policy {
    pub(crate) fn choose(&mut self, scene: &Scene) -> Option<Move> {
        match self {
            Self::Idle => None,
            Self::Random(rng) => random_move(rng, scene),
            Self::Greedy => greedy_move(scene),
        }
    }
}

fn random_move(rng: &mut ChaCha8Rng, scene: &Scene) -> Option<Move> {
    let grid = query::grid(scene);
    let mut legal = Vec::new();
    for kind in PlantKind::ALL {
        for lane in 0..grid.lanes() {
            for position in 0..grid.lane_length() {
                let candidate = Move::new(kind, lane, position);
                if candidate.is_valid(scene) {
                    legal.push(candidate);
                }
            }
        }
    }
    // Index len() stands in for the "do nothing" action.
    let choice = rng.gen_range(0..=legal.len());
    legal.get(choice).copied()
}

fn greedy_move(scene: &Scene) -> Option<Move> {
    let grid = query::grid(scene);

    // Answer pressure first: a peashooter near the house covers its lane.
    let mut pressured: Vec<u32> = query::zombie_view(scene)
        .iter()
        .map(|zombie| zombie.cell.lane())
        .collect();
    pressured.sort_unstable();
    pressured.dedup();
    for lane in pressured {
        for position in 0..3.min(grid.lane_length()) {
            let candidate = Move::new(PlantKind::Peashooter, lane, position);
            if candidate.is_valid(scene) {
                return Some(candidate);
            }
        }
    }

    // Otherwise grow the economy up to one sunflower per lane.
    let sunflowers = query::plant_view(scene)
        .iter()
        .filter(|plant| plant.kind == PlantKind::Sunflower)
        .count();
    if sunflowers < grid.lanes() as usize {
        for lane in 0..grid.lanes() {
            for position in 0..2.min(grid.lane_length()) {
                let candidate = Move::new(PlantKind::Sunflower, lane, position);
                if candidate.is_valid(scene) {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

pub(crate) fn random_policy(seed: u64) -> Policy {
    Policy::Random(ChaCha8Rng::seed_from_u64(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawn_defence_core::{GridConfig, SpawnContext, SpawnRequest, ZombieSpawner};

    #[derive(Debug, Default)]
    struct SilentSpawner;

    impl ZombieSpawner for SilentSpawner {
        fn decide_spawns(&mut self, _context: SpawnContext, _out: &mut Vec<SpawnRequest>) {}
    }

    fn scene() -> Scene {
        Scene::new(GridConfig::default(), Box::new(SilentSpawner))
    }

    #[test]
    fn idle_policy_never_moves() {
        let scene = scene();
        assert_eq!(Policy::Idle.choose(&scene), None);
    }

    #[test]
    fn random_policy_only_proposes_legal_moves() {
        let scene = scene();
        let mut policy = random_policy(17);
        for _ in 0..50 {
            if let Some(chosen) = policy.choose(&scene) {
                assert!(chosen.is_valid(&scene));
            }
        }
    }

    #[test]
    fn greedy_policy_starts_with_a_sunflower() {
        let scene = scene();
        let chosen = Policy::Greedy.choose(&scene).expect("opening move");
        assert_eq!(chosen.kind(), PlantKind::Sunflower);
        assert!(chosen.is_valid(&scene));
    }
}
