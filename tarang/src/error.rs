//! Error types for tarang

use thiserror::Error;

use crate::core::GridCoord;

/// tarang error type
#[derive(Error, Debug)]
pub enum TarangError {
    /// Invalid parameters, detected before any search starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// The coarse search exhausted without reaching the goal cell
    #[error("No coarse route from {from} to {to}; try a different seed")]
    NoCoarseRoute {
        /// Coarse origin cell
        from: GridCoord,
        /// Coarse goal cell
        to: GridCoord,
    },

    /// A single fine-grid front exhausted without reaching its goal
    #[error("No path from {from} to {to}")]
    NoPath {
        /// Search origin
        from: GridCoord,
        /// Search goal
        to: GridCoord,
    },

    /// Too few coarse cells to give every worker a distinct start
    #[error("Coarse route has {route_len} cells, too short to seed {workers} workers")]
    RouteTooShort {
        /// Cells in the coarse route
        route_len: usize,
        /// Workers that needed a start point
        workers: usize,
    },

    /// One or more ripples ran out of nodes before meeting all neighbours
    #[error("Workers {0:?} exhausted their frontier before reaching every neighbour")]
    WorkersFailed(Vec<usize>),

    /// The stitched path contains a non-adjacent step
    #[error("Path integrity check failed at index {index}: {prev} -> {next} is not a unit step")]
    Integrity {
        /// Index of `next` in the path
        index: usize,
        /// Coordinate before the break
        prev: GridCoord,
        /// Coordinate after the break
        next: GridCoord,
    },

    /// A worker thread could not be spawned or panicked
    #[error("Thread error: {0}")]
    Thread(String),

    /// File I/O failure (map persistence, config loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TarangError {
    fn from(e: toml::de::Error) -> Self {
        TarangError::Config(e.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TarangError>;
