//! Tick engine: one row-major pass applying plant, herbivore and carnivore
//! rules to every cell.
//!
//! The pass mutates the grid in place. An animal that moves keeps acting
//! from its new cell for the rest of its turn (feeding, reproduction and the
//! death check all happen there), and if that cell comes later in row-major
//! order the animal is visited again before the pass ends. Offspring placed
//! ahead of the cursor are likewise processed in the tick they are born.

use crate::grid::Grid;
use crate::random::RandomSource;
use ecosim_core::{AnimalRules, EcosystemConfig, Entity, EntityKind, Position};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What happened during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub births: u32,
    pub deaths: u32,
    pub kills: u32,
    pub moves: u32,
}

/// An animal kind together with what it eats and the rules it follows
#[derive(Clone, Copy)]
struct Species<'a> {
    kind: EntityKind,
    prey: EntityKind,
    rules: &'a AnimalRules,
}

pub struct TickEngine {
    config: EcosystemConfig,
}

impl TickEngine {
    pub fn new(config: EcosystemConfig) -> Self {
        Self { config }
    }

    /// Advance `grid` by one tick
    pub fn step(&self, grid: &mut Grid, rng: &mut dyn RandomSource) -> TickReport {
        let mut report = TickReport::default();
        let size = grid.size();

        for row in 0..size {
            for col in 0..size {
                let pos = Position::new(row, col);
                let kind = grid.get(pos).kind;
                match kind {
                    EntityKind::Empty => {}
                    EntityKind::Plant => self.step_plant(grid, pos, rng, &mut report),
                    EntityKind::Herbivore => {
                        let species = Species {
                            kind,
                            prey: EntityKind::Plant,
                            rules: &self.config.herbivore,
                        };
                        self.step_animal(grid, pos, &species, rng, &mut report)
                    }
                    EntityKind::Carnivore => {
                        let species = Species {
                            kind,
                            prey: EntityKind::Herbivore,
                            rules: &self.config.carnivore,
                        };
                        self.step_animal(grid, pos, &species, rng, &mut report)
                    }
                }
            }
        }

        report
    }

    fn step_plant(
        &self,
        grid: &mut Grid,
        pos: Position,
        rng: &mut dyn RandomSource,
        report: &mut TickReport,
    ) {
        let rules = &self.config.plant;

        let plant = grid.get_mut(pos);
        plant.age += 1;
        if plant.age >= rules.max_age {
            *plant = Entity::empty();
            report.deaths += 1;
        }

        // A plant seeds even on the tick it withers.
        if rng.chance(rules.reproduction_probability) {
            if let Some(target) = random_empty_neighbor(grid, pos, rng) {
                grid.set(target, Entity::plant());
                report.births += 1;
            }
        }
    }

    fn step_animal(
        &self,
        grid: &mut Grid,
        origin: Position,
        species: &Species<'_>,
        rng: &mut dyn RandomSource,
        report: &mut TickReport,
    ) {
        let Species { kind, prey, rules } = *species;
        let mut pos = origin;
        grid.get_mut(pos).age += 1;

        if rng.chance(rules.move_probability) {
            if let Some(target) = random_empty_neighbor(grid, pos, rng) {
                let animal = grid.take(pos);
                grid.set(target, animal);
                pos = target;
                report.moves += 1;
            }
        }

        if rng.chance(rules.eat_probability) {
            let mut gained = 0;
            for neighbor in grid.moore_neighbors(pos) {
                if grid.get(neighbor).kind == prey {
                    grid.set(neighbor, Entity::empty());
                    gained += rules.energy_per_kill;
                    report.kills += 1;
                }
            }
            grid.get_mut(pos).energy += gained;
        }

        if grid.get(pos).energy >= self.config.reproduction_energy_threshold
            && rng.chance(rules.reproduction_probability)
        {
            if let Some(target) = random_empty_neighbor(grid, pos, rng) {
                grid.set(target, Entity::newborn(kind, self.config.max_energy));
                grid.get_mut(pos).energy -= rules.reproduction_cost;
                report.births += 1;
            }
        }

        let animal = grid.get(pos);
        if animal.age >= rules.max_age || animal.energy <= 0 {
            trace!(
                ?kind,
                row = pos.row,
                col = pos.col,
                age = animal.age,
                energy = animal.energy,
                "Animal died"
            );
            grid.set(pos, Entity::empty());
            report.deaths += 1;
        }
    }
}

/// Pick uniformly among the empty in-bounds cardinal neighbors of `pos`.
///
/// Returns `None` without drawing from `rng` when every neighbor is taken.
pub fn random_empty_neighbor(
    grid: &Grid,
    pos: Position,
    rng: &mut dyn RandomSource,
) -> Option<Position> {
    let candidates = grid.empty_cardinal_neighbors(pos);
    if candidates.is_empty() {
        return None;
    }

    let last = candidates.len() as i32 - 1;
    let index = rng.uniform_int(0, last) as usize;
    Some(candidates[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ChaChaRandom, ScriptedRandom};
    use crate::spawner::Spawner;
    use ecosim_core::SpawnRequest;
    use proptest::prelude::*;

    fn engine() -> TickEngine {
        TickEngine::new(EcosystemConfig::default())
    }

    fn assert_no_overdue_entities(grid: &Grid, config: &EcosystemConfig) {
        for (pos, entity) in grid.iter() {
            match entity.kind {
                EntityKind::Empty => {}
                EntityKind::Plant => {
                    assert!(entity.age < config.plant.max_age, "stale plant at {pos:?}")
                }
                EntityKind::Herbivore | EntityKind::Carnivore => {
                    let rules = config.animal_rules(entity.kind).unwrap();
                    assert!(entity.age < rules.max_age, "old animal at {pos:?}");
                    assert!(entity.energy > 0, "starved animal at {pos:?}");
                }
            }
        }
    }

    #[test]
    fn test_empty_grid_is_unchanged() {
        let mut grid = Grid::new(15);
        let mut rng = ChaChaRandom::from_seed(1);

        let report = engine().step(&mut grid, &mut rng);

        assert_eq!(grid, Grid::new(15));
        assert_eq!(report, TickReport::default());
    }

    #[test]
    fn test_old_plant_dies() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(0, 0), Entity::plant().with_age(9));
        let mut rng = ScriptedRandom::new().with_chances([false]);

        let report = engine().step(&mut grid, &mut rng);

        assert!(grid.is_empty_at(Position::new(0, 0)));
        assert_eq!(grid.population().total(), 0);
        assert_eq!(report.deaths, 1);
    }

    #[test]
    fn test_dying_plant_still_seeds() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(0, 0), Entity::plant().with_age(9));
        // Candidates at the corner are [down, right]; pick down.
        let mut rng = ScriptedRandom::new().with_chances([true]).with_ints([0]);

        let report = engine().step(&mut grid, &mut rng);

        assert!(grid.is_empty_at(Position::new(0, 0)));
        // The seedling lies ahead of the cursor and ages within the same tick.
        assert_eq!(*grid.get(Position::new(1, 0)), Entity::plant().with_age(1));
        assert_eq!(report.births, 1);
        assert_eq!(report.deaths, 1);
    }

    #[test]
    fn test_plant_seeds_behind_cursor() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(5, 5), Entity::plant());
        // Candidates are [up, down, left, right]; pick up.
        let mut rng = ScriptedRandom::new().with_chances([true]).with_ints([0]);

        engine().step(&mut grid, &mut rng);

        assert_eq!(*grid.get(Position::new(5, 5)), Entity::plant().with_age(1));
        assert_eq!(*grid.get(Position::new(4, 5)), Entity::plant());
    }

    #[test]
    fn test_herbivore_eats_adjacent_plant() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(5, 5), Entity::herbivore(200));
        grid.set(Position::new(5, 6), Entity::plant());
        // move fails, eat succeeds, reproduction fails
        let mut rng = ScriptedRandom::new().with_chances([false, true, false]);

        let report = engine().step(&mut grid, &mut rng);

        let herbivore = grid.get(Position::new(5, 5));
        assert_eq!(herbivore.kind, EntityKind::Herbivore);
        assert_eq!(herbivore.energy, 230);
        assert_eq!(herbivore.age, 1);
        assert!(grid.is_empty_at(Position::new(5, 6)));
        assert_eq!(report.kills, 1);
    }

    #[test]
    fn test_herbivore_eats_every_adjacent_plant_unclamped() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(5, 5), Entity::herbivore(200));
        for pos in [
            Position::new(4, 4),
            Position::new(4, 6),
            Position::new(6, 5),
        ] {
            grid.set(pos, Entity::plant());
        }
        // Out of reach
        grid.set(Position::new(5, 7), Entity::plant());
        // The plants on row 4 roll first, then the herbivore eats.
        let mut rng = ScriptedRandom::new().with_chances([false, false, false, true, false]);

        engine().step(&mut grid, &mut rng);

        assert_eq!(grid.get(Position::new(5, 5)).energy, 290);
        assert_eq!(grid.count(EntityKind::Plant), 1);
        assert_eq!(grid.get(Position::new(5, 7)).kind, EntityKind::Plant);
    }

    #[test]
    fn test_carnivore_eats_adjacent_herbivores() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(2, 2), Entity::carnivore(50));
        grid.set(Position::new(1, 1), Entity::herbivore(200));
        grid.set(Position::new(2, 3), Entity::herbivore(200));
        grid.set(Position::new(3, 3), Entity::herbivore(200));
        // (1, 1) is visited first: no move, no eat, no reproduction.
        // Then the carnivore: no move, eat, no reproduction.
        let mut rng = ScriptedRandom::new().with_chances([false, false, false, false, true, false]);

        let report = engine().step(&mut grid, &mut rng);

        assert_eq!(grid.get(Position::new(2, 2)).energy, 110);
        assert_eq!(grid.count(EntityKind::Herbivore), 0);
        assert_eq!(report.kills, 3);
    }

    #[test]
    fn test_herbivore_moves_and_vacates_origin() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(5, 5), Entity::herbivore(100));
        // Move succeeds, pick left (index 2 of [up, down, left, right]).
        let mut rng = ScriptedRandom::new()
            .with_chances([true, false, false])
            .with_ints([2]);

        let report = engine().step(&mut grid, &mut rng);

        assert!(grid.is_empty_at(Position::new(5, 5)));
        // Moved behind the cursor: processed once.
        assert_eq!(*grid.get(Position::new(5, 4)), Entity::herbivore(100).with_age(1));
        assert_eq!(report.moves, 1);
    }

    #[test]
    fn test_animal_moving_ahead_gets_second_turn() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(5, 5), Entity::herbivore(100));
        // Move right, then on the second visit stay put.
        let mut rng = ScriptedRandom::new()
            .with_chances([true, false, false, false, false, false])
            .with_ints([3]);

        engine().step(&mut grid, &mut rng);

        assert!(grid.is_empty_at(Position::new(5, 5)));
        assert_eq!(grid.get(Position::new(5, 6)).age, 2);
    }

    #[test]
    fn test_moved_animal_feeds_from_new_cell() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(5, 5), Entity::herbivore(100));
        // Two cells left of the origin: only reachable after moving left.
        grid.set(Position::new(5, 3), Entity::plant());
        // The plant rolls first, then the herbivore moves left and eats.
        let mut rng = ScriptedRandom::new()
            .with_chances([false, true, true, false])
            .with_ints([2]);

        engine().step(&mut grid, &mut rng);

        assert_eq!(grid.get(Position::new(5, 4)).energy, 130);
        assert!(grid.is_empty_at(Position::new(5, 3)));
    }

    #[test]
    fn test_surrounded_animal_stays_put() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(0, 0), Entity::herbivore(100));
        grid.set(Position::new(0, 1), Entity::carnivore(100));
        grid.set(Position::new(1, 0), Entity::carnivore(100));
        // Herbivore: move succeeds but has nowhere to go.
        let mut rng = ScriptedRandom::new()
            .with_chances([true, false, false])
            .with_ints([1]);

        let report = engine().step(&mut grid, &mut rng);

        assert_eq!(*grid.get(Position::new(0, 0)), Entity::herbivore(100).with_age(1));
        assert_eq!(report.moves, 0);
        // No direction was drawn for the blocked move.
        assert_eq!(rng.remaining().1, 1);
    }

    #[test]
    fn test_herbivore_reproduces() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(7, 7), Entity::herbivore(25));
        // No move, no eat, reproduce upward.
        let mut rng = ScriptedRandom::new()
            .with_chances([false, false, true])
            .with_ints([0]);

        let report = engine().step(&mut grid, &mut rng);

        assert_eq!(*grid.get(Position::new(6, 7)), Entity::herbivore(200));
        assert_eq!(grid.get(Position::new(7, 7)).energy, 15);
        assert_eq!(report.births, 1);
    }

    #[test]
    fn test_reproduction_needs_threshold_energy() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(7, 7), Entity::carnivore(19));
        // No move, no eat. The reproduction roll must not be drawn.
        let mut rng = ScriptedRandom::new().with_chances([false, false, true]);

        engine().step(&mut grid, &mut rng);

        assert_eq!(grid.count(EntityKind::Carnivore), 1);
        assert_eq!(rng.remaining().0, 1);
    }

    #[test]
    fn test_blocked_reproduction_costs_nothing() {
        let mut grid = Grid::new(3);
        grid.set(Position::new(1, 1), Entity::carnivore(100));
        for pos in grid.cardinal_neighbors(Position::new(1, 1)) {
            grid.set(pos, Entity::plant());
        }
        // Plants at (0, 1) and (1, 0) roll first; the carnivore then wins
        // its reproduction roll with nowhere to put the offspring.
        let mut rng = ScriptedRandom::new().with_chances([false, false, false, false, true]);

        engine().step(&mut grid, &mut rng);

        assert_eq!(grid.get(Position::new(1, 1)).energy, 100);
        assert_eq!(grid.count(EntityKind::Carnivore), 1);
        assert_eq!(grid.count(EntityKind::Plant), 4);
    }

    #[test]
    fn test_herbivore_dies_of_age() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(4, 4), Entity::herbivore(100).with_age(49));
        let mut rng = ScriptedRandom::new();

        let report = engine().step(&mut grid, &mut rng);

        assert!(grid.is_empty_at(Position::new(4, 4)));
        assert_eq!(report.deaths, 1);
    }

    #[test]
    fn test_carnivore_outlives_herbivore_age() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(4, 4), Entity::carnivore(100).with_age(49));
        let mut rng = ScriptedRandom::new();

        engine().step(&mut grid, &mut rng);
        assert_eq!(grid.get(Position::new(4, 4)).age, 50);

        grid.get_mut(Position::new(4, 4)).age = 79;
        engine().step(&mut grid, &mut rng);
        assert!(grid.is_empty_at(Position::new(4, 4)));
    }

    #[test]
    fn test_starved_animal_dies() {
        let mut grid = Grid::new(15);
        grid.set(Position::new(3, 3), Entity::herbivore(0));
        let mut rng = ScriptedRandom::new();

        engine().step(&mut grid, &mut rng);

        assert!(grid.is_empty_at(Position::new(3, 3)));
    }

    #[test]
    fn test_random_empty_neighbor_none_when_blocked() {
        let mut grid = Grid::new(1);
        grid.set(Position::new(0, 0), Entity::plant());
        let mut rng = ScriptedRandom::new().with_ints([0]);

        assert_eq!(random_empty_neighbor(&grid, Position::new(0, 0), &mut rng), None);
        assert_eq!(rng.remaining().1, 1);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let run = |seed: u64| {
            let mut grid = Grid::new(15);
            let mut rng = ChaChaRandom::from_seed(seed);
            Spawner::new(200)
                .initialize(&mut grid, SpawnRequest::new(60, 25, 10), &mut rng)
                .unwrap();

            let engine = engine();
            (0..50)
                .map(|_| {
                    engine.step(&mut grid, &mut rng);
                    grid.snapshot()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(run(11), run(11));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_no_overdue_entities_after_step(
            seed in any::<u64>(),
            plants in 0u32..120,
            herbivores in 0u32..60,
            carnivores in 0u32..40,
        ) {
            let config = EcosystemConfig::default();
            let engine = TickEngine::new(config.clone());
            let mut grid = Grid::new(config.grid_size);
            let mut rng = ChaChaRandom::from_seed(seed);
            Spawner::new(config.max_energy)
                .initialize(&mut grid, SpawnRequest::new(plants, herbivores, carnivores), &mut rng)
                .unwrap();

            for _ in 0..30 {
                engine.step(&mut grid, &mut rng);
                prop_assert_eq!(grid.size(), config.grid_size);
                prop_assert!(grid.population().total() <= grid.capacity());
                assert_no_overdue_entities(&grid, &config);
            }
        }
    }
}
