//! Simulation engine: the per-step update rule.

use crate::dirty::DirtySet;
use crate::grid::Grid;
use crate::rng::{EcoRng, RandomSource};
use eco_core::{Cell, CellKind, Color, EcosystemConfig, Result, RuleConfig, Step, WorldConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};

/// Cell counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub empty: usize,
    pub plants: usize,
    pub animals: usize,
}

/// The grid together with everything needed to advance it.
///
/// Cells are updated in place, in ascending index order, so a cell sees every
/// change made earlier in the same sweep.
pub struct Simulation<R = EcoRng> {
    grid: Grid,
    dirty: DirtySet,
    rules: RuleConfig,
    rng: R,
    clock: Step,
}

impl Simulation<EcoRng> {
    /// Build a seeded world from a validated configuration
    pub fn from_config(config: &EcosystemConfig) -> Result<Self> {
        config.validate()?;
        let rng = EcoRng::new(config.driver.seed);
        Self::new(&config.world, config.rules.clone(), rng)
    }
}

impl<R: RandomSource> Simulation<R> {
    /// An empty world with one gray plant at the seed index
    #[instrument(skip(rules, rng))]
    pub fn new(world: &WorldConfig, rules: RuleConfig, rng: R) -> Result<Self> {
        let mut grid = Grid::new(world.width, world.height)?;
        let seed = grid.seed_index();
        grid.set(seed, Cell::plant(Color::GRAY, 0));

        let clock = rules.animal_die_threshold;
        info!(seed, clock, "World created");

        Ok(Self::from_parts(grid, rules, rng, clock))
    }

    /// Assemble a simulation around an existing grid without seeding it
    pub fn from_parts(grid: Grid, rules: RuleConfig, rng: R, clock: Step) -> Self {
        let dirty = DirtySet::new(grid.len());
        Self {
            grid,
            dirty,
            rules,
            rng,
            clock,
        }
    }

    /// Apply the update rule to every cell once, then advance the clock
    pub fn step(&mut self) {
        let step = self.clock;
        for index in 0..self.grid.len() {
            self.update_cell(index, step);
        }
        self.clock += 1;
    }

    /// Advance the clock without touching the grid
    pub fn idle(&mut self) {
        self.clock += 1;
    }

    fn update_cell(&mut self, index: usize, step: Step) {
        let kind = self.grid.get(index).kind;
        if kind == CellKind::Empty {
            return;
        }

        self.try_reproduce(index, kind, step);

        if kind == CellKind::Animal {
            self.animal_turn(index, step);
        }
    }

    fn try_reproduce(&mut self, index: usize, kind: CellKind, step: Step) {
        let parent = *self.grid.get(index);
        if parent.ledger() + self.rules.cooldown(kind) >= step {
            return;
        }

        let target = self.grid.neighbor_candidate(index, &mut self.rng);
        self.grid.get_mut(index).reset_cooldown(step);

        if self.grid.get(target).is_empty() {
            let dr = self.rng.color_mutation();
            let dg = self.rng.color_mutation();
            let db = self.rng.color_mutation();
            let child = Cell::born(kind, parent.color.mutated(dr, dg, db), step);

            self.grid.set(target, child);
            self.dirty.mark(target);
        }
    }

    fn animal_turn(&mut self, index: usize, step: Step) {
        let animal = self.grid.get_mut(index);
        animal.hunger += self.rules.metabolic_cost;

        if animal.ledger() - self.rules.animal_die_threshold > step {
            animal.kind = CellKind::Empty;
            self.dirty.mark(index);
            trace!(index, step, "Animal starved");
            return;
        }

        let target = self.grid.neighbor_candidate(index, &mut self.rng);
        let prey = *self.grid.get(target);
        if prey.kind == CellKind::Animal {
            return;
        }

        if prey.kind == CellKind::Plant {
            let reward = self.predation_reward(&self.grid.get(index).color, &prey.color);
            self.grid.get_mut(target).kind = CellKind::Empty;
            self.grid.get_mut(index).hunger -= reward;
        }

        self.dirty.mark(index);
        self.dirty.mark(target);
        self.grid.swap(index, target);
    }

    /// Energy an animal of color `animal` gains from eating a plant of color
    /// `plant`. 20 for identical colors, shrinking (down to 0) with distance.
    pub fn predation_reward(&self, animal: &Color, plant: &Color) -> i64 {
        let distance =
            animal.manhattan_distance(plant) as f32 / self.rules.color_distance_scale + 1.0;
        (self.rules.predation_reward / f64::from(distance)) as i64
    }

    /// Turn the seed cell into a gray animal, keeping its timing fields
    pub fn release_animal(&mut self) -> usize {
        let index = self.grid.seed_index();
        let cell = self.grid.get_mut(index);
        cell.kind = CellKind::Animal;
        cell.color = Color::GRAY;
        self.dirty.mark(index);

        info!(index, clock = self.clock, "First animal released");
        index
    }

    pub fn census(&self) -> Census {
        self.grid
            .iter()
            .fold(Census::default(), |mut census, (_, cell)| {
                match cell.kind {
                    CellKind::Empty => census.empty += 1,
                    CellKind::Plant => census.plants += 1,
                    CellKind::Animal => census.animals += 1,
                }
                census
            })
    }

    pub fn clock(&self) -> Step {
        self.clock
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtySet {
        &mut self.dirty
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
