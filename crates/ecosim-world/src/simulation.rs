//! Simulation context owning the grid between requests.

use crate::engine::{TickEngine, TickReport};
use crate::grid::Grid;
use crate::random::{ChaChaRandom, RandomSource};
use crate::spawner::{SpawnReport, Spawner};
use chrono::{DateTime, Utc};
use ecosim_core::{
    EcosystemConfig, GridSnapshot, PopulationCounts, Result, SimulationId, SpawnRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, Level};

/// Ticks between population gauge events
const METRICS_INTERVAL: u64 = 100;

pub struct Simulation {
    id: SimulationId,
    grid: Grid,
    spawner: Spawner,
    engine: TickEngine,
    rng: Box<dyn RandomSource + Send>,
    tick: u64,
    started_at: DateTime<Utc>,
    last_report: TickReport,
}

impl Simulation {
    /// Create a simulation over an all-empty grid
    pub fn new(config: EcosystemConfig, rng: Box<dyn RandomSource + Send>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            id: SimulationId::new(),
            grid: Grid::new(config.grid_size),
            spawner: Spawner::new(config.max_energy),
            engine: TickEngine::new(config),
            rng,
            tick: 0,
            started_at: Utc::now(),
            last_report: TickReport::default(),
        })
    }

    pub fn with_seed(config: EcosystemConfig, seed: u64) -> Result<Self> {
        Self::new(config, Box::new(ChaChaRandom::from_seed(seed)))
    }

    /// Start a fresh run with the requested population.
    ///
    /// Placement is best effort: see [`Spawner::initialize`]. On
    /// `CapacityExceeded` the current run is left as it was.
    #[instrument(skip(self), fields(simulation_id = %self.id))]
    pub fn initialize(&mut self, request: SpawnRequest) -> Result<GridSnapshot> {
        let report = self.spawn(request)?;

        self.id = SimulationId::new();
        self.tick = 0;
        self.started_at = Utc::now();
        self.last_report = TickReport::default();

        info!(
            new_simulation_id = %self.id,
            requested = report.requested.total(),
            plants = report.placed.plants,
            herbivores = report.placed.herbivores,
            carnivores = report.placed.carnivores,
            skipped = report.skipped(),
            "Simulation initialized"
        );

        Ok(self.grid.snapshot())
    }

    fn spawn(&mut self, request: SpawnRequest) -> Result<SpawnReport> {
        self.spawner
            .initialize(&mut self.grid, request, self.rng.as_mut())
    }

    /// Advance one tick and return the resulting grid
    #[instrument(skip(self), fields(simulation_id = %self.id, tick = self.tick + 1))]
    pub fn step(&mut self) -> GridSnapshot {
        let report = self.engine.step(&mut self.grid, self.rng.as_mut());
        self.tick += 1;
        self.last_report = report;

        debug!(
            births = report.births,
            deaths = report.deaths,
            kills = report.kills,
            moves = report.moves,
            "Tick complete"
        );

        if self.tick % METRICS_INTERVAL == 0 {
            self.emit_population_metrics();
        }

        self.grid.snapshot()
    }

    fn emit_population_metrics(&self) {
        let population = self.grid.population();

        for (name, value) in [
            ("population_plants", population.plants),
            ("population_herbivores", population.herbivores),
            ("population_carnivores", population.carnivores),
        ] {
            event!(
                Level::INFO,
                gauge_name = name,
                gauge_value = value,
                tick = self.tick,
                "Population gauge"
            );
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn id(&self) -> SimulationId {
        self.id
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            simulation_id: self.id,
            tick: self.tick,
            started_at: self.started_at,
            capacity: self.grid.capacity(),
            population: self.grid.population(),
            last_tick: self.last_report,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStats {
    pub simulation_id: SimulationId,
    pub tick: u64,
    pub started_at: DateTime<Utc>,
    pub capacity: u64,
    pub population: PopulationCounts,
    pub last_tick: TickReport,
}
