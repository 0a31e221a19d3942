//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one initialized simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(pub Uuid);

impl SimulationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cell coordinate on the grid, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (drow, dcol) = direction.to_delta();
        self.offset(drow, dcol)
    }
}

/// Cardinal direction used for movement and offspring placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) delta
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}

/// What occupies a cell. Serialized as the single-character symbol the
/// grid viewer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = " ")]
    Empty,
    #[serde(rename = "P")]
    Plant,
    #[serde(rename = "H")]
    Herbivore,
    #[serde(rename = "C")]
    Carnivore,
}

impl EntityKind {
    pub fn symbol(&self) -> char {
        match self {
            EntityKind::Empty => ' ',
            EntityKind::Plant => 'P',
            EntityKind::Herbivore => 'H',
            EntityKind::Carnivore => 'C',
        }
    }
}

/// Cell record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub energy: i32,
    pub age: i32,
}

impl Entity {
    pub fn empty() -> Self {
        Self {
            kind: EntityKind::Empty,
            energy: 0,
            age: 0,
        }
    }

    pub fn plant() -> Self {
        Self {
            kind: EntityKind::Plant,
            energy: 0,
            age: 0,
        }
    }

    pub fn herbivore(energy: i32) -> Self {
        Self {
            kind: EntityKind::Herbivore,
            energy,
            age: 0,
        }
    }

    pub fn carnivore(energy: i32) -> Self {
        Self {
            kind: EntityKind::Carnivore,
            energy,
            age: 0,
        }
    }

    /// Fresh entity of `kind`; animals start at `max_energy`, plants carry none.
    pub fn newborn(kind: EntityKind, max_energy: i32) -> Self {
        match kind {
            EntityKind::Empty => Self::empty(),
            EntityKind::Plant => Self::plant(),
            EntityKind::Herbivore => Self::herbivore(max_energy),
            EntityKind::Carnivore => Self::carnivore(max_energy),
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = age;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind == EntityKind::Empty
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::empty()
    }
}

/// Row-major copy of the grid handed to callers after each operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridSnapshot(pub Vec<Vec<Entity>>);

impl GridSnapshot {
    pub fn rows(&self) -> &[Vec<Entity>] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, pos: Position) -> Option<&Entity> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        self.0.get(row)?.get(col)
    }
}
