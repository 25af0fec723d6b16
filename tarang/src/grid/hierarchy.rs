//! Fine/coarse grid pair with per-coarse-cell locks.

use parking_lot::Mutex;

use crate::core::{GridCoord, NodeIndex};
use crate::error::{Result, TarangError};

use super::storage::Grid;

/// Which grid of a [`HierarchicalMap`] a search runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// The full-resolution grid
    Fine,
    /// The downsampled route-planning grid
    Coarse,
}

/// A fine grid, its coarse abstraction and one lock per coarse cell.
///
/// The lock covering a fine coordinate is the lock of the coarse cell it
/// maps into, so all claims inside one coarse tile serialize on the same
/// mutex. Coarse-level searches use the coarse cell's own lock.
#[derive(Debug)]
pub struct HierarchicalMap {
    fine: Grid,
    coarse: Grid,
    locks: Vec<Mutex<()>>,
    factor: i32,
}

impl HierarchicalMap {
    /// Pair a fine and coarse grid.
    ///
    /// Fails unless the coarse dimensions divide the fine dimensions exactly
    /// with the same integer factor on both axes.
    pub fn new(fine: Grid, coarse: Grid) -> Result<Self> {
        if coarse.is_empty() || fine.is_empty() {
            return Err(TarangError::Config("grids must not be empty".into()));
        }
        if fine.cols() % coarse.cols() != 0 || fine.rows() % coarse.rows() != 0 {
            return Err(TarangError::Config(format!(
                "coarse grid {}x{} does not evenly divide fine grid {}x{}",
                coarse.cols(),
                coarse.rows(),
                fine.cols(),
                fine.rows()
            )));
        }
        let factor = fine.cols() / coarse.cols();
        if fine.rows() / coarse.rows() != factor {
            return Err(TarangError::Config(format!(
                "fine/coarse scale differs between axes ({} vs {})",
                factor,
                fine.rows() / coarse.rows()
            )));
        }

        let locks = (0..coarse.len()).map(|_| Mutex::new(())).collect();

        Ok(Self {
            fine,
            coarse,
            locks,
            factor: factor as i32,
        })
    }

    /// Full-resolution grid.
    pub fn fine(&self) -> &Grid {
        &self.fine
    }

    /// Coarse grid.
    pub fn coarse(&self) -> &Grid {
        &self.coarse
    }

    /// Mutable fine grid (setup only, before searches share the map).
    pub fn fine_mut(&mut self) -> &mut Grid {
        &mut self.fine
    }

    /// Mutable coarse grid (setup only, before searches share the map).
    pub fn coarse_mut(&mut self) -> &mut Grid {
        &mut self.coarse
    }

    /// Grid for a level.
    #[inline]
    pub fn grid(&self, level: Level) -> &Grid {
        match level {
            Level::Fine => &self.fine,
            Level::Coarse => &self.coarse,
        }
    }

    /// Downscale factor: `fine.cols() == factor * coarse.cols()`.
    #[inline]
    pub fn factor(&self) -> i32 {
        self.factor
    }

    /// Number of locks (one per coarse cell).
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Coarse cell containing a fine coordinate.
    #[inline]
    pub fn to_coarse(&self, fine: GridCoord) -> GridCoord {
        fine.scale_down(self.factor)
    }

    /// Fine coordinate of a coarse cell's first corner.
    #[inline]
    pub fn to_fine(&self, coarse: GridCoord) -> GridCoord {
        coarse.scale_up(self.factor)
    }

    /// Index of the lock guarding a coordinate on a level.
    #[inline]
    pub fn lock_index(&self, level: Level, coord: GridCoord) -> Option<usize> {
        let coarse = match level {
            Level::Fine => {
                if !self.fine.is_valid_coord(coord) {
                    return None;
                }
                self.to_coarse(coord)
            }
            Level::Coarse => coord,
        };
        self.coarse.index_of(coarse).map(NodeIndex::get)
    }

    /// Lock guarding a coordinate's search state on a level.
    #[inline]
    pub fn lock_for(&self, level: Level, coord: GridCoord) -> Option<&Mutex<()>> {
        self.lock_index(level, coord).map(|i| &self.locks[i])
    }

    /// Claim a cell as the start of a front without running a search.
    ///
    /// The cell becomes its own owner with cost 0, so a front that reaches
    /// it registers a meeting with whichever front is identified by this
    /// start. Returns the claimed node, or `None` if out of bounds.
    pub fn seed_owner(&self, level: Level, coord: GridCoord) -> Option<NodeIndex> {
        let grid = self.grid(level);
        let index = grid.index_of(coord)?;
        let lock = self.lock_for(level, coord)?;

        let _guard = lock.lock();
        let node = grid.node(index);
        node.set_owner(Some(index));
        node.set_parent(None);
        node.set_cost(0);
        Some(index)
    }

    /// Clear search bookkeeping on one level.
    pub fn reset_search_state(&self, level: Level) {
        self.grid(level).reset_search_state();
    }
}
