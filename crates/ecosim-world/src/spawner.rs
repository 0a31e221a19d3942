//! Initial population placement.

use crate::grid::Grid;
use crate::random::RandomSource;
use ecosim_core::{Entity, Error, PopulationCounts, Position, Result, SpawnRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Outcome of populating a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnReport {
    pub requested: SpawnRequest,
    pub placed: PopulationCounts,
}

impl SpawnReport {
    /// Attempts dropped because the drawn cell was already taken
    pub fn skipped(&self) -> u64 {
        self.requested.total() - self.placed.total()
    }
}

pub struct Spawner {
    max_energy: i32,
}

impl Spawner {
    pub fn new(max_energy: i32) -> Self {
        Self { max_energy }
    }

    /// Clear `grid` and scatter the requested entities on it.
    ///
    /// Each entity gets exactly one random cell. If that cell is already
    /// taken the entity is dropped, so the placed counts may be lower than
    /// requested. Check the returned report rather than assuming the
    /// request was honored in full.
    ///
    /// Fails with [`Error::CapacityExceeded`] without touching the grid when
    /// the request holds more entities than the grid has cells.
    pub fn initialize(
        &self,
        grid: &mut Grid,
        request: SpawnRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<SpawnReport> {
        let capacity = grid.capacity();
        if request.total() > capacity {
            return Err(Error::CapacityExceeded {
                requested: request.total(),
                capacity,
            });
        }

        grid.clear();

        let mut placed = PopulationCounts::new();
        let last = grid.size() - 1;

        for (kind, count) in request.per_kind() {
            for _ in 0..count {
                let row = rng.uniform_int(0, last);
                let col = rng.uniform_int(0, last);
                let pos = Position::new(row, col);

                if grid.is_empty_at(pos) {
                    grid.set(pos, Entity::newborn(kind, self.max_energy));
                    placed.record(kind);
                } else {
                    trace!(?kind, row, col, "Spawn cell occupied, skipping");
                }
            }
        }

        let report = SpawnReport { requested: request, placed };
        debug!(
            requested = request.total(),
            placed = placed.total(),
            skipped = report.skipped(),
            "Grid populated"
        );

        Ok(report)
    }
}
