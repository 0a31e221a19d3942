//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested initial population does not fit on the grid.
    #[error("Capacity exceeded: requested {requested} entities but the grid holds {capacity}")]
    CapacityExceeded { requested: u64, capacity: u64 },

    #[error("Validation error: {0}")]
    Validation(String),
}
