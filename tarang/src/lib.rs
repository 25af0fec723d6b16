//! # Tarang
//!
//! Parallel hierarchical "ripple" search on 2D occupancy grids.
//!
//! ## Overview
//!
//! A route is found in two resolutions:
//!
//! - **Coarse route** - one fringe search over a downsampled grid
//! - **Ripples** - one fine-grid fringe search per worker thread, seeded
//!   along the coarse route, each racing to meet its neighbours
//! - **Stitching** - the per-worker paths are joined through the cells where
//!   neighbouring ripples met, then checked for unit steps
//!
//! Every node on a grid carries its search state (cost, parent, owner) in
//! atomics. Claims are made under the lock of the coarse cell a node falls
//! into, so the coarse grid doubles as the lock table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tarang::{MapParams, RippleSearch, SearchParams, GridCoord, build_map};
//!
//! let mut map = build_map(&MapParams::new(256, 0.3, 32, 7))?;
//! let search = RippleSearch::new(SearchParams { threads: 5, ..Default::default() });
//! let outcome = search.run(&mut map, GridCoord::new(1, 1), GridCoord::new(254, 254))?;
//!
//! println!("{} steps in {:?}", outcome.steps(), outcome.elapsed);
//! ```
//!
//! ## Coordinate System
//!
//! Grid coordinates are `(x, y)` = `(column, row)`, row-major storage,
//! origin at the top-left cell. Paths are unit steps in the 4-neighbourhood.

#![warn(missing_docs)]

// Coordinates and nodes
pub mod core;

// Grid storage, hierarchy, generation and text I/O
pub mod grid;

// Fringe search fronts
pub mod search;

// Parallel hierarchical orchestration
pub mod ripple;

// Run configuration
pub mod config;

// Error types
pub mod error;

// Re-export commonly used types
pub use core::{GridCoord, INFINITE_COST, Node, NodeIndex};

pub use grid::{Grid, HierarchicalMap, Level, MapGenerator, build_map, downsample, generate_grid};

pub use search::{FringeSearch, SearchResult, SearchStatus, find_path};

pub use ripple::{
    RippleOutcome, RippleSearch, WorkerReport, WorkerVerdict, sequential_search, validate_path,
};

pub use config::{Endpoints, MapParams, SearchParams, TarangConfig, check_parallelism};

pub use error::{Result, TarangError};
