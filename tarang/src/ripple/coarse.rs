//! Phase 1: route over the coarse grid.

use crate::core::GridCoord;
use crate::error::{Result, TarangError};
use crate::grid::{HierarchicalMap, Level};
use crate::search::find_path;

/// Find the coarse cell sequence from the cell containing `origin` to the
/// cell containing `goal`.
///
/// Both endpoint cells are forced free on the coarse grid first. Coarse
/// search bookkeeping is cleared before returning so it does not leak into
/// the fine-level ripples.
pub fn coarse_route(
    map: &mut HierarchicalMap,
    origin: GridCoord,
    goal: GridCoord,
    increment: u32,
    burst: usize,
) -> Result<Vec<GridCoord>> {
    let from = map.to_coarse(origin);
    let to = map.to_coarse(goal);
    map.coarse_mut().set_blocked(from, false);
    map.coarse_mut().set_blocked(to, false);

    if from == to {
        tracing::debug!("Origin and goal share coarse cell {}", from);
        return Ok(vec![from]);
    }

    let result = find_path(map, Level::Coarse, from, to, increment, burst)?;
    map.reset_search_state(Level::Coarse);

    let route = result.path.ok_or(TarangError::NoCoarseRoute { from, to })?;
    tracing::info!(
        "Coarse route {} -> {}: {} cells ({} iterations, {} threshold passes)",
        from,
        to,
        route.len(),
        result.iterations,
        result.threshold_passes
    );
    Ok(route)
}
