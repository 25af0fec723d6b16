//! Fringe search over one level of a hierarchical map.
//!
//! [`FringeSearch`] is a single front. It is shared by the coarse routing
//! step, the parallel workers and the sequential baseline in
//! [`find_path`].

mod fringe;

pub use fringe::{FringeSearch, SearchStatus};

use std::time::{Duration, Instant};

use crate::core::GridCoord;
use crate::error::Result;
use crate::grid::{HierarchicalMap, Level};

/// Result of a single-front search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Path from start to goal, both inclusive
    pub path: Option<Vec<GridCoord>>,
    /// Node visits
    pub iterations: u64,
    /// Threshold increases
    pub threshold_passes: u32,
    /// Wall-clock time of the search loop
    pub elapsed: Duration,
}

impl SearchResult {
    /// Path length in steps.
    pub fn steps(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }
}

/// Search one level with a single front from `start` to `goal`.
///
/// Search state on that level is cleared first. The goal cell is seeded as
/// its own owner so the front recognises it on contact. The state is left
/// in place afterwards so callers can inspect ownership.
pub fn find_path(
    map: &HierarchicalMap,
    level: Level,
    start: GridCoord,
    goal: GridCoord,
    increment: u32,
    burst: usize,
) -> Result<SearchResult> {
    map.reset_search_state(level);
    map.seed_owner(level, goal);

    let mut front = FringeSearch::new(map, level, increment, start, vec![goal])?;
    let started = Instant::now();
    let status = loop {
        match front.advance(burst) {
            SearchStatus::Continue => continue,
            status => break status,
        }
    };
    let elapsed = started.elapsed();

    tracing::debug!(
        "{:?} search {} -> {} finished {:?} after {} iterations",
        level,
        start,
        goal,
        status,
        front.iterations()
    );

    Ok(SearchResult {
        path: front.path_to(goal).map(<[GridCoord]>::to_vec),
        iterations: front.iterations(),
        threshold_passes: front.threshold_passes(),
        elapsed,
    })
}
