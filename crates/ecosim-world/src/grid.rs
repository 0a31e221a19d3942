//! Square grid of cells for the world.

use ecosim_core::{Direction, Entity, EntityKind, GridSnapshot, PopulationCounts, Position};
use serde::{Deserialize, Serialize};

/// A bounded N×N grid, row-major. Edges are hard limits, nothing wraps.
///
/// Positions outside the grid are a caller bug: the accessors panic on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
    cells: Vec<Entity>,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        assert!(size > 0, "grid size must be positive, got {size}");
        let len = size
            .checked_mul(size)
            .unwrap_or_else(|| panic!("grid size {size} overflows the cell count")) as usize;
        Self {
            size,
            cells: vec![Entity::empty(); len],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Number of cells
    pub fn capacity(&self) -> u64 {
        self.cells.len() as u64
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.size).contains(&pos.row) && (0..self.size).contains(&pos.col)
    }

    pub fn get(&self, pos: Position) -> &Entity {
        let index = self.pos_to_index(pos);
        &self.cells[index]
    }

    pub fn get_mut(&mut self, pos: Position) -> &mut Entity {
        let index = self.pos_to_index(pos);
        &mut self.cells[index]
    }

    pub fn set(&mut self, pos: Position, entity: Entity) {
        let index = self.pos_to_index(pos);
        self.cells[index] = entity;
    }

    /// Remove and return the entity at `pos`, leaving the cell empty
    pub fn take(&mut self, pos: Position) -> Entity {
        std::mem::take(self.get_mut(pos))
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(Entity::empty());
    }

    /// In-bounds cardinal neighbors, in `Direction::all()` order
    pub fn cardinal_neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|direction| pos.step(direction))
            .filter(|&neighbor| self.contains(neighbor))
            .collect()
    }

    /// In-bounds cardinal neighbors that currently hold nothing
    pub fn empty_cardinal_neighbors(&self, pos: Position) -> Vec<Position> {
        self.cardinal_neighbors(pos)
            .into_iter()
            .filter(|&neighbor| self.is_empty_at(neighbor))
            .collect()
    }

    /// The up-to-8 surrounding cells, clipped at the edges, row-major
    pub fn moore_neighbors(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);

        for drow in -1..=1 {
            for dcol in -1..=1 {
                if drow == 0 && dcol == 0 {
                    continue;
                }

                let neighbor = pos.offset(drow, dcol);
                if self.contains(neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }

        neighbors
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position ({}, {}) outside {}x{} grid",
            pos.row,
            pos.col,
            self.size,
            self.size
        );
        (pos.row * self.size + pos.col) as usize
    }

    /// Get position from index
    ///
    /// Both parts are below `size`, so they always fit back into `i32`.
    pub fn index_to_pos(&self, index: usize) -> Position {
        let size = self.size as usize;
        Position::new((index / size) as i32, (index % size) as i32)
    }

    /// Iterator over all positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Entity)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, entity)| (self.index_to_pos(i), entity))
    }

    pub fn population(&self) -> PopulationCounts {
        self.cells.iter().map(|entity| entity.kind).collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.cells.iter().filter(|entity| entity.kind == kind).count()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot(
            self.cells
                .chunks(self.size as usize)
                .map(|row| row.to_vec())
                .collect(),
        )
    }
}
