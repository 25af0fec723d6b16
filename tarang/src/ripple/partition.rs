//! Phase 2: split the coarse route into worker start points.

use crate::core::GridCoord;
use crate::error::{Result, TarangError};
use crate::grid::HierarchicalMap;

/// Fine-grid start point for each of `workers` ripples.
///
/// The first worker starts at `origin` and the last at `goal`. Interior
/// worker `i` starts at the fine corner of coarse route cell
/// `i * (len - 1) / (workers - 1)`, which spreads the starts evenly along
/// the route and keeps them distinct.
pub fn worker_starts(
    map: &HierarchicalMap,
    route: &[GridCoord],
    origin: GridCoord,
    goal: GridCoord,
    workers: usize,
) -> Result<Vec<GridCoord>> {
    if workers < 2 {
        return Err(TarangError::Config(format!(
            "at least two workers are required, got {}",
            workers
        )));
    }
    if route.len() < workers {
        return Err(TarangError::RouteTooShort {
            route_len: route.len(),
            workers,
        });
    }

    let last = workers - 1;
    let span = route.len() - 1;
    let starts = (0..workers)
        .map(|i| match i {
            0 => origin,
            i if i == last => goal,
            i => map.to_fine(route[i * span / last]),
        })
        .collect();
    Ok(starts)
}

/// Goals of each worker: its neighbours in the chain of starts.
pub fn worker_goals(starts: &[GridCoord]) -> Vec<Vec<GridCoord>> {
    (0..starts.len())
        .map(|i| {
            let mut goals = Vec::with_capacity(2);
            if i > 0 {
                goals.push(starts[i - 1]);
            }
            if i + 1 < starts.len() {
                goals.push(starts[i + 1]);
            }
            goals
        })
        .collect()
}
