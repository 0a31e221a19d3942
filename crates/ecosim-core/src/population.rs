//! Population counts gathered from a grid.

use crate::EntityKind;
use serde::{Deserialize, Serialize};

/// Number of living entities per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub plants: u32,
    pub herbivores: u32,
    pub carnivores: u32,
}

impl PopulationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one entity of the given kind; empty cells are ignored.
    pub fn record(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Plant => self.plants += 1,
            EntityKind::Herbivore => self.herbivores += 1,
            EntityKind::Carnivore => self.carnivores += 1,
            EntityKind::Empty => {}
        }
    }

    pub fn total(&self) -> u64 {
        self.plants as u64 + self.herbivores as u64 + self.carnivores as u64
    }
}

impl FromIterator<EntityKind> for PopulationCounts {
    fn from_iter<I: IntoIterator<Item = EntityKind>>(iter: I) -> Self {
        let mut counts = Self::new();
        for kind in iter {
            counts.record(kind);
        }
        counts
    }
}

/// Initial population asked of the spawner. Field names match the
/// `/start-simulation` request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub plants: u32,
    pub herbivores: u32,
    pub carnivores: u32,
}

impl SpawnRequest {
    pub fn new(plants: u32, herbivores: u32, carnivores: u32) -> Self {
        Self {
            plants,
            herbivores,
            carnivores,
        }
    }

    pub fn total(&self) -> u64 {
        self.plants as u64 + self.herbivores as u64 + self.carnivores as u64
    }

    /// Requested count for each spawnable kind, in placement order
    pub fn per_kind(&self) -> [(EntityKind, u32); 3] {
        [
            (EntityKind::Plant, self.plants),
            (EntityKind::Herbivore, self.herbivores),
            (EntityKind::Carnivore, self.carnivores),
        ]
    }
}
