//! Fringe search front.
//!
//! Fringe search is iterative deepening without restarts: nodes whose
//! `f = g + h` exceeds the current threshold are deferred to a second list
//! instead of being discarded, and become the working list once the
//! threshold grows. One [`FringeSearch`] is one front advancing over a
//! level of a [`HierarchicalMap`], claiming nodes under the coarse-cell
//! locks and noticing when it runs into cells claimed by other fronts.

use std::collections::VecDeque;

use crate::core::{GridCoord, NodeIndex};
use crate::error::{Result, TarangError};
use crate::grid::{HierarchicalMap, Level};

/// Outcome of one [`FringeSearch::advance`] burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// Work remains and not all goals have been found
    Continue,
    /// A whole threshold pass produced nothing to expand
    Exhausted,
    /// Every goal has a discovered path
    Complete,
}

/// One running fringe search front.
pub struct FringeSearch<'a> {
    map: &'a HierarchicalMap,
    level: Level,
    threshold: u32,
    increment: u32,
    start: GridCoord,
    start_index: NodeIndex,
    goals: Vec<GridCoord>,
    /// One slot per goal, filled at most once
    paths: Vec<Option<Vec<GridCoord>>>,
    goals_found: usize,
    now: VecDeque<NodeIndex>,
    later: VecDeque<NodeIndex>,
    iterations: u64,
    threshold_passes: u32,
}

impl<'a> FringeSearch<'a> {
    /// Create a front at `start` and claim the start cell.
    ///
    /// A goal is only recognised when the front touches a cell owned by a
    /// front whose start is that goal, so every goal must itself be claimed
    /// (by another front or by [`HierarchicalMap::seed_owner`]).
    pub fn new(
        map: &'a HierarchicalMap,
        level: Level,
        increment: u32,
        start: GridCoord,
        goals: Vec<GridCoord>,
    ) -> Result<Self> {
        if goals.is_empty() {
            return Err(TarangError::Config("a front needs at least one goal".into()));
        }
        if goals.contains(&start) {
            return Err(TarangError::Config(format!("front start {} is also its goal", start)));
        }
        let start_index = map
            .seed_owner(level, start)
            .ok_or_else(|| TarangError::Config(format!("front start {} is off the grid", start)))?;

        let threshold = goals
            .iter()
            .map(|g| start.manhattan_distance(g))
            .min()
            .unwrap_or(0);

        let mut now = VecDeque::new();
        now.push_back(start_index);
        let paths = vec![None; goals.len()];

        Ok(Self {
            map,
            level,
            threshold,
            increment,
            start,
            start_index,
            goals,
            paths,
            goals_found: 0,
            now,
            later: VecDeque::new(),
            iterations: 0,
            threshold_passes: 0,
        })
    }

    /// Run up to `max_iterations` node visits.
    ///
    /// Swapping the lists at the end of a threshold pass does not count as
    /// an iteration. Returns [`SearchStatus::Exhausted`] when a pass ends
    /// with nothing deferred.
    pub fn advance(&mut self, max_iterations: usize) -> SearchStatus {
        let mut last_swap: Option<usize> = None;
        let mut i = 0;

        while i < max_iterations {
            if self.is_complete() {
                return SearchStatus::Complete;
            }

            let Some(current) = self.now.pop_front() else {
                if last_swap == Some(i) {
                    return SearchStatus::Exhausted;
                }
                last_swap = Some(i);
                self.threshold = self.threshold.saturating_add(self.increment);
                self.threshold_passes += 1;
                std::mem::swap(&mut self.now, &mut self.later);
                self.later.clear();
                continue;
            };

            i += 1;
            self.iterations += 1;
            self.visit(current);
        }

        if self.is_complete() {
            SearchStatus::Complete
        } else {
            SearchStatus::Continue
        }
    }

    /// Expand a node or defer it to the next pass.
    fn visit(&mut self, current: NodeIndex) {
        let map = self.map;
        let level = self.level;
        let grid = map.grid(level);
        let node = grid.node(current);
        let cost = node.cost();
        let coord = node.coord();

        let f = self
            .goals
            .iter()
            .zip(&self.paths)
            .filter(|(_, path)| path.is_none())
            .map(|(goal, _)| cost.saturating_add(coord.manhattan_distance(goal)))
            .min()
            .unwrap_or(u32::MAX);

        if f > self.threshold {
            self.later.push_back(current);
            return;
        }

        let candidate = cost.saturating_add(1);
        for next in coord.neighbors_4() {
            let Some(next_index) = grid.index_of(next) else {
                continue;
            };
            let neighbor = grid.node(next_index);
            if neighbor.is_blocked() {
                continue;
            }
            let Some(lock) = map.lock_for(level, next) else {
                continue;
            };

            let guard = lock.lock();
            match neighbor.owner() {
                Some(owner) if owner != self.start_index => {
                    drop(guard);
                    self.record_meeting(current, next, owner);
                }
                _ => {
                    if neighbor.cost() > candidate {
                        neighbor.set_owner(Some(self.start_index));
                        drop(guard);
                        neighbor.set_parent(Some(current));
                        neighbor.set_cost(candidate);
                        self.now.push_back(next_index);
                    }
                }
            }
        }
    }

    /// Fill the goal slot for the front that owns `contact`, if it is one
    /// of our unfound goals.
    fn record_meeting(&mut self, current: NodeIndex, contact: GridCoord, owner: NodeIndex) {
        let grid = self.map.grid(self.level);
        let owner_start = grid.node(owner).coord();

        for (goal, slot) in self.goals.iter().zip(self.paths.iter_mut()) {
            if *goal != owner_start || slot.is_some() {
                continue;
            }
            let mut path = grid.parent_chain(current);
            path.push(contact);
            tracing::debug!(
                "Front {} met front {} at {} after {} iterations ({} steps)",
                self.start,
                owner_start,
                contact,
                self.iterations,
                path.len() - 1
            );
            *slot = Some(path);
            self.goals_found += 1;
        }
    }

    /// Grid level this front searches.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Start coordinate (also the front's identity).
    pub fn start(&self) -> GridCoord {
        self.start
    }

    /// Goals in the order given at construction.
    pub fn goals(&self) -> &[GridCoord] {
        &self.goals
    }

    /// Number of goals.
    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    /// Number of goals with a discovered path.
    pub fn goals_found(&self) -> usize {
        self.goals_found
    }

    /// True once every goal has a path.
    pub fn is_complete(&self) -> bool {
        self.goals_found == self.goals.len()
    }

    /// Discovered path to a goal: from this front's start to the first cell
    /// of the goal's front.
    pub fn path_to(&self, goal: GridCoord) -> Option<&[GridCoord]> {
        self.goals
            .iter()
            .position(|g| *g == goal)
            .and_then(|i| self.paths[i].as_deref())
    }

    /// All goal slots in goal order.
    pub fn paths(&self) -> &[Option<Vec<GridCoord>>] {
        &self.paths
    }

    /// Current f-value threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Node visits so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Number of times the threshold has grown.
    pub fn threshold_passes(&self) -> u32 {
        self.threshold_passes
    }
}

impl std::fmt::Debug for FringeSearch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FringeSearch")
            .field("level", &self.level)
            .field("start", &self.start)
            .field("goals", &self.goals)
            .field("goals_found", &self.goals_found)
            .field("threshold", &self.threshold)
            .field("iterations", &self.iterations)
            .finish()
    }
}
