//! Grid storage, hierarchical decomposition and map generation.
//!
//! - [`Grid`]: Dense row-major array of [`Node`](crate::core::Node)s
//! - [`HierarchicalMap`]: Fine grid, coarse grid and per-coarse-cell locks
//! - [`MapGenerator`]: Seeded clustered-obstacle fill
//! - [`io`]: Line-oriented text rendering and persistence

mod generator;
mod hierarchy;
pub mod io;
mod storage;

pub use generator::{MapGenerator, build_map, downsample, generate_grid, probability_draw};
pub use hierarchy::{HierarchicalMap, Level};
pub use storage::Grid;
