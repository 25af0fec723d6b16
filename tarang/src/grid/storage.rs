//! Dense row-major node storage.

use crate::core::{GridCoord, Node, NodeIndex};

/// A dense row-major array of [`Node`]s.
///
/// Cell (x, y) lives at index `y * cols + x`. The blocked flags are fixed
/// once the grid is shared between threads; the per-node search state is
/// mutated through shared references under the hierarchical map's locks.
#[derive(Debug)]
pub struct Grid {
    nodes: Vec<Node>,
    rows: usize,
    cols: usize,
    /// Density perturbation used by the generator (0.0 for derived grids)
    volatility: f64,
}

impl Grid {
    /// Create a free grid with the given dimensions.
    pub fn new(rows: usize, cols: usize, volatility: f64) -> Self {
        let mut nodes = Vec::with_capacity(rows * cols);
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                nodes.push(Node::new(GridCoord::new(x, y)));
            }
        }

        Self {
            nodes,
            rows,
            cols,
            volatility,
        }
    }

    /// Create a free square grid.
    pub fn square(side: usize, volatility: f64) -> Self {
        Self::new(side, side, volatility)
    }

    /// Number of rows (height).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (width).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a zero-sized grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Density perturbation parameter used during generation.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Check if a coordinate is inside the grid.
    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as usize) < self.cols && (coord.y as usize) < self.rows
    }

    /// Node index for a coordinate, `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, coord: GridCoord) -> Option<NodeIndex> {
        if self.is_valid_coord(coord) {
            Some(NodeIndex((coord.y as usize * self.cols + coord.x as usize) as u32))
        } else {
            None
        }
    }

    /// Node at an index.
    ///
    /// # Panics
    /// Panics if the index did not come from this grid.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.get()]
    }

    /// Node at a coordinate.
    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<&Node> {
        self.index_of(coord).map(|i| self.node(i))
    }

    /// Mutable node at a coordinate.
    #[inline]
    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut Node> {
        let index = self.index_of(coord)?;
        Some(&mut self.nodes[index.get()])
    }

    /// Is the cell blocked? Out-of-bounds cells count as blocked.
    #[inline]
    pub fn is_blocked(&self, coord: GridCoord) -> bool {
        self.get(coord).is_none_or(Node::is_blocked)
    }

    /// Set a cell's occupancy. Returns false if out of bounds.
    pub fn set_blocked(&mut self, coord: GridCoord, blocked: bool) -> bool {
        match self.get_mut(coord) {
            Some(node) => {
                node.set_blocked(blocked);
                true
            }
            None => false,
        }
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_blocked()).count()
    }

    /// Fraction of cells that are blocked (0.0 for an empty grid).
    pub fn blocked_fraction(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.blocked_count() as f64 / self.nodes.len() as f64
    }

    /// Iterate over all nodes in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Clear cost, parent and owner of every node.
    pub fn reset_search_state(&self) {
        for node in &self.nodes {
            node.reset();
        }
    }

    /// Walk parent links from `end` back to the root of its tree.
    ///
    /// Returns the chain ordered root first, `end` last.
    pub fn parent_chain(&self, end: NodeIndex) -> Vec<GridCoord> {
        let mut chain = Vec::new();
        let mut current = Some(end);
        while let Some(index) = current {
            let node = self.node(index);
            chain.push(node.coord());
            current = node.parent();
            // A chain can never be longer than the grid
            if chain.len() > self.nodes.len() {
                break;
            }
        }
        chain.reverse();
        chain
    }
}
