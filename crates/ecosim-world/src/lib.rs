//! World simulation engine.
//!
//! This module implements the bounded grid where plants, herbivores and
//! carnivores live, feed, breed and die.

pub mod engine;
pub mod grid;
pub mod random;
pub mod simulation;
pub mod spawner;

pub use engine::{TickEngine, TickReport};
pub use grid::Grid;
pub use random::{ChaChaRandom, RandomSource, ScriptedRandom};
pub use simulation::{Simulation, SimulationStats};
pub use spawner::{SpawnReport, Spawner};
