//! Parallel hierarchical "ripple" search.
//!
//! A run has four phases:
//!
//! 1. **Coarse route**: one fringe search over the coarse grid from the
//!    origin's cell to the goal's cell ([`coarse_route`]).
//! 2. **Partition**: the route is cut into one start point per worker
//!    ([`worker_starts`]); every worker's goals are its neighbours' starts.
//! 3. **Ripples**: each worker advances a fine-level front on its own thread
//!    while a master thread polls their status flags.
//! 4. **Stitch**: per-worker paths are joined through the parent chains
//!    of the cells where neighbouring fronts met ([`stitch`]), then checked
//!    for unit steps ([`validate_path`]).
//!
//! ```ignore
//! let mut map = build_map(&config.map)?;
//! let outcome = RippleSearch::new(config.search.clone())
//!     .run(&mut map, config.origin(), config.goal())?;
//! println!("{} steps in {:?}", outcome.steps(), outcome.elapsed);
//! ```

mod coarse;
mod partition;
mod stitch;
mod workers;

pub use coarse::coarse_route;
pub use partition::{worker_goals, worker_starts};
pub use stitch::{stitch, validate_path};
pub use workers::WorkerVerdict;

use std::time::{Duration, Instant};

use crate::config::SearchParams;
use crate::core::GridCoord;
use crate::error::{Result, TarangError};
use crate::grid::{HierarchicalMap, Level};
use crate::search::{FringeSearch, SearchResult, find_path};

/// Per-worker summary of a ripple run.
#[derive(Clone, Debug)]
pub struct WorkerReport {
    /// Fine-grid start point
    pub start: GridCoord,
    /// Neighbouring starts this worker had to meet
    pub goals: Vec<GridCoord>,
    /// Goals met
    pub goals_found: usize,
    /// Node visits
    pub iterations: u64,
    /// Threshold increases
    pub threshold_passes: u32,
    /// How the worker finished
    pub verdict: WorkerVerdict,
}

/// Result of a successful ripple run.
#[derive(Clone, Debug)]
pub struct RippleOutcome {
    /// Final path, origin to goal inclusive
    pub path: Vec<GridCoord>,
    /// Wall time of the parallel phase and stitching
    pub elapsed: Duration,
    /// Coarse cells the workers were spread along
    pub coarse_route: Vec<GridCoord>,
    /// Fine start point of each worker
    pub worker_starts: Vec<GridCoord>,
    /// Per-worker statistics
    pub workers: Vec<WorkerReport>,
}

impl RippleOutcome {
    /// Path length in steps.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Parallel hierarchical search driver.
#[derive(Clone, Debug, Default)]
pub struct RippleSearch {
    params: SearchParams,
}

impl RippleSearch {
    /// Create a driver with the given search parameters.
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }

    /// Search parameters in use.
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Find a path from `origin` to `goal`.
    ///
    /// The endpoints and every worker start are forced free on the fine
    /// grid. Any worker that runs out of nodes before meeting all of its
    /// neighbours fails the whole run; there is no retry.
    pub fn run(
        &self,
        map: &mut HierarchicalMap,
        origin: GridCoord,
        goal: GridCoord,
    ) -> Result<RippleOutcome> {
        self.params.validate()?;
        for endpoint in [origin, goal] {
            if !map.fine().is_valid_coord(endpoint) {
                return Err(TarangError::Config(format!("endpoint {} is off the map", endpoint)));
            }
        }
        if origin == goal {
            return Err(TarangError::Config(format!("origin and goal are both {}", origin)));
        }

        map.fine_mut().set_blocked(origin, false);
        map.fine_mut().set_blocked(goal, false);

        let route = coarse_route(
            map,
            origin,
            goal,
            self.params.coarse_increment,
            self.params.coarse_burst_iterations,
        )?;

        let workers = self.params.workers();
        let starts = worker_starts(map, &route, origin, goal, workers)?;
        for &start in &starts {
            map.fine_mut().set_blocked(start, false);
        }
        map.reset_search_state(Level::Fine);
        tracing::info!("Seeding {} ripples at {:?}", workers, starts);

        let map: &HierarchicalMap = map;
        let mut fronts = starts
            .iter()
            .zip(worker_goals(&starts))
            .map(|(&start, goals)| {
                FringeSearch::new(map, Level::Fine, self.params.fine_increment, start, goals)
            })
            .collect::<Result<Vec<_>>>()?;

        let started = Instant::now();
        let verdicts = workers::run_workers(&mut fronts, self.params.burst_iterations)?;

        let failed: Vec<usize> = verdicts
            .iter()
            .enumerate()
            .filter_map(|(i, v)| (*v != WorkerVerdict::Complete).then_some(i))
            .collect();
        if !failed.is_empty() {
            tracing::warn!("Ripple run failed: workers {:?} did not complete", failed);
            return Err(TarangError::WorkersFailed(failed));
        }

        let path = stitch(map.fine(), &fronts)?;
        validate_path(&path)?;
        let elapsed = started.elapsed();

        tracing::info!(
            "Ripple path of {} steps found in {:.3}s by {} workers",
            path.len().saturating_sub(1),
            elapsed.as_secs_f64(),
            workers
        );

        let reports = fronts
            .iter()
            .zip(verdicts)
            .map(|(front, verdict)| WorkerReport {
                start: front.start(),
                goals: front.goals().to_vec(),
                goals_found: front.goals_found(),
                iterations: front.iterations(),
                threshold_passes: front.threshold_passes(),
                verdict,
            })
            .collect();

        Ok(RippleOutcome {
            path,
            elapsed,
            coarse_route: route,
            worker_starts: starts,
            workers: reports,
        })
    }
}

/// Single-front fine-grid search from `origin` to `goal`, the sequential
/// baseline for a ripple run.
pub fn sequential_search(
    map: &mut HierarchicalMap,
    origin: GridCoord,
    goal: GridCoord,
    increment: u32,
    burst: usize,
) -> Result<SearchResult> {
    if origin == goal {
        return Err(TarangError::Config(format!("origin and goal are both {}", origin)));
    }
    map.fine_mut().set_blocked(origin, false);
    map.fine_mut().set_blocked(goal, false);

    let result = find_path(map, Level::Fine, origin, goal, increment, burst)?;
    match result.steps() {
        Some(steps) => tracing::info!(
            "Fringe path of {} steps in {} iterations ({} threshold passes)",
            steps,
            result.iterations,
            result.threshold_passes
        ),
        None => tracing::warn!("Fringe search from {} to {} exhausted", origin, goal),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn params(threads: usize) -> SearchParams {
        SearchParams {
            threads,
            burst_iterations: 64,
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_open_grid_run() {
        let mut map = HierarchicalMap::new(Grid::square(32, 0.0), Grid::square(8, 0.0)).unwrap();
        let origin = GridCoord::new(1, 1);
        let goal = GridCoord::new(30, 30);

        let outcome = RippleSearch::new(params(3)).run(&mut map, origin, goal).unwrap();
        assert_eq!(outcome.path.first(), Some(&origin));
        assert_eq!(outcome.path.last(), Some(&goal));
        validate_path(&outcome.path).unwrap();
        assert!(outcome.steps() >= 58);
        assert_eq!(outcome.workers.len(), 2);
        assert_eq!(outcome.coarse_route.len(), 15);
        assert!(outcome.workers.iter().all(|w| w.verdict == WorkerVerdict::Complete));
    }

    #[test]
    fn test_rejects_two_threads() {
        let mut map = HierarchicalMap::new(Grid::square(16, 0.0), Grid::square(4, 0.0)).unwrap();
        let err = RippleSearch::new(params(2))
            .run(&mut map, GridCoord::new(0, 0), GridCoord::new(15, 15))
            .unwrap_err();
        assert!(matches!(err, TarangError::Config(_)));
        // Nothing was searched
        assert!(map.coarse().iter().all(|n| n.owner().is_none()));
    }

    #[test]
    fn test_too_many_workers_for_route() {
        let mut map = HierarchicalMap::new(Grid::square(16, 0.0), Grid::square(4, 0.0)).unwrap();
        let err = RippleSearch::new(params(12))
            .run(&mut map, GridCoord::new(0, 0), GridCoord::new(15, 15))
            .unwrap_err();
        assert!(matches!(err, TarangError::RouteTooShort { route_len: 7, workers: 11 }));
    }

    #[test]
    fn test_blocked_endpoints_are_freed() {
        let mut fine = Grid::square(16, 0.0);
        fine.set_blocked(GridCoord::new(0, 0), true);
        fine.set_blocked(GridCoord::new(15, 15), true);
        let mut map = HierarchicalMap::new(fine, Grid::square(4, 0.0)).unwrap();

        let outcome = RippleSearch::new(params(3))
            .run(&mut map, GridCoord::new(0, 0), GridCoord::new(15, 15))
            .unwrap();
        assert!(!map.fine().is_blocked(GridCoord::new(0, 0)));
        assert_eq!(outcome.path.last(), Some(&GridCoord::new(15, 15)));
    }

    #[test]
    fn test_sequential_baseline() {
        let mut map = HierarchicalMap::new(Grid::square(16, 0.0), Grid::square(4, 0.0)).unwrap();
        let result =
            sequential_search(&mut map, GridCoord::new(0, 0), GridCoord::new(15, 15), 3, 100)
                .unwrap();
        assert_eq!(result.steps(), Some(30));
        assert!(result.threshold_passes <= 11);
    }
}
