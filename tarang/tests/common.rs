//! Test utilities for tarang integration tests.
//!
//! Helpers for building small maps and checking path laws.

#![allow(dead_code)]

use tarang::{Grid, GridCoord, HierarchicalMap, Level, SearchParams};

/// Obstacle-free map with the given fine and coarse sides.
pub fn open_map(side: usize, coarse: usize) -> HierarchicalMap {
    HierarchicalMap::new(Grid::square(side, 0.0), Grid::square(coarse, 0.0))
        .expect("open map dimensions must divide")
}

/// Map with a vertical wall at column `x`, open only at the listed rows.
pub fn wall_map(side: usize, coarse: usize, x: i32, gaps: &[i32]) -> HierarchicalMap {
    let mut fine = Grid::square(side, 0.0);
    for y in 0..side as i32 {
        if !gaps.contains(&y) {
            fine.set_blocked(GridCoord::new(x, y), true);
        }
    }
    HierarchicalMap::new(fine, Grid::square(coarse, 0.0)).expect("wall map dimensions must divide")
}

/// Search parameters for a run with `threads` threads.
pub fn search_params(threads: usize, burst: usize) -> SearchParams {
    SearchParams {
        threads,
        burst_iterations: burst,
        ..SearchParams::default()
    }
}

/// Blocked coordinates of a grid, in row-major order.
pub fn blocked_cells(grid: &Grid) -> Vec<GridCoord> {
    grid.iter()
        .filter(|n| n.is_blocked())
        .map(|n| n.coord())
        .collect()
}

/// Assert every consecutive pair of a path is one step apart.
pub fn assert_unit_steps(path: &[GridCoord]) {
    for (i, pair) in path.windows(2).enumerate() {
        assert_eq!(
            pair[0].manhattan_distance(&pair[1]),
            1,
            "step {} jumps from {} to {}",
            i + 1,
            pair[0],
            pair[1]
        );
    }
}

/// Assert no cell of a path is blocked on the fine grid.
pub fn assert_free(map: &HierarchicalMap, path: &[GridCoord]) {
    for coord in path {
        assert!(!map.fine().is_blocked(*coord), "{} is blocked", coord);
    }
}

/// Assert every owned node's parent chain stays inside its owner's
/// territory and ends at the owner's start.
pub fn assert_owner_chains(map: &HierarchicalMap, level: Level) {
    let grid = map.grid(level);
    for node in grid.iter() {
        let Some(owner) = node.owner() else {
            continue;
        };
        let owner_start = grid.node(owner).coord();
        let index = grid.index_of(node.coord()).unwrap();
        let chain = grid.parent_chain(index);

        assert_eq!(chain.first(), Some(&owner_start), "chain of {}", node.coord());
        for coord in &chain {
            assert_eq!(grid.get(*coord).unwrap().owner(), Some(owner));
        }
        assert_unit_steps(&chain);
    }
}
