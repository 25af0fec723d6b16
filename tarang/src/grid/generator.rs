//! Clustered obstacle map generation and coarse downsampling.
//!
//! The fine grid is filled by recursive quadrant subdivision: every region
//! inherits its parent's block probability plus a random signed nudge
//! scaled by the grid's volatility, and each single cell draws one
//! Bernoulli sample against its region's probability. Neighbouring cells
//! share most of their ancestry, so obstacles come out clustered instead
//! of as independent noise.
//!
//! The coarse grid marks a tile blocked when its blocked fraction exceeds
//! a cutoff set a margin above the fine grid's overall blocked fraction.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MapParams;
use crate::core::GridCoord;
use crate::error::Result;

use super::hierarchy::HierarchicalMap;
use super::storage::Grid;

/// Draw a probability from a 0-99 percentage roll.
///
/// A roll of exactly 0 yields 1.0 rather than 0.0. Generated maps depend on
/// this mapping, so it is kept as is.
pub fn probability_draw<R: Rng>(rng: &mut R) -> f64 {
    let percent = rng.random_range(0..100u32);
    if percent == 0 {
        1.0
    } else {
        f64::from(percent) / 100.0
    }
}

/// Draw +1.0 or -1.0 with equal odds.
fn sign_draw<R: Rng>(rng: &mut R) -> f64 {
    if rng.random_range(0..100u32) >= 50 {
        1.0
    } else {
        -1.0
    }
}

/// A rectangular block of cells awaiting subdivision.
#[derive(Clone, Copy, Debug)]
struct Region {
    x: usize,
    y: usize,
    cols: usize,
    rows: usize,
    /// Block probability inherited from the parent region
    probability: f64,
    /// Root region keeps the configured ratio unperturbed
    perturb: bool,
}

impl Region {
    /// Split into up to four quadrants in fill order: upper-left,
    /// upper-right, lower-right, lower-left.
    fn quadrants(&self, probability: f64) -> impl Iterator<Item = Region> {
        let top = if self.rows > 1 { self.rows / 2 } else { self.rows };
        let left = if self.cols > 1 { self.cols / 2 } else { self.cols };
        let bottom = self.rows - top;
        let right = self.cols - left;

        let child = |x, y, cols, rows| Region {
            x,
            y,
            cols,
            rows,
            probability,
            perturb: true,
        };

        [
            child(self.x, self.y, left, top),
            child(self.x + left, self.y, right, top),
            child(self.x + left, self.y + top, right, bottom),
            child(self.x, self.y + top, left, bottom),
        ]
        .into_iter()
        .filter(|r| r.cols > 0 && r.rows > 0)
    }
}

/// Seeded obstacle generator.
pub struct MapGenerator {
    rng: StdRng,
    volatility: f64,
}

impl MapGenerator {
    /// Create a generator; the same seed always produces the same grid.
    pub fn new(seed: u64, volatility: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            volatility,
        }
    }

    /// Fill every cell of `grid` with a clustered obstacle field.
    pub fn fill(&mut self, grid: &mut Grid, obstacle_ratio: f64) {
        let mut stack = vec![Region {
            x: 0,
            y: 0,
            cols: grid.cols(),
            rows: grid.rows(),
            probability: obstacle_ratio,
            perturb: false,
        }];

        while let Some(region) = stack.pop() {
            if region.cols == 0 || region.rows == 0 {
                continue;
            }

            let probability = if region.perturb {
                let delta = probability_draw(&mut self.rng) * sign_draw(&mut self.rng);
                region.probability + self.volatility * delta
            } else {
                region.probability
            };

            if region.cols == 1 && region.rows == 1 {
                let blocked = probability_draw(&mut self.rng) < probability;
                grid.set_blocked(GridCoord::new(region.x as i32, region.y as i32), blocked);
                continue;
            }

            // Reverse so the upper-left quadrant is processed first
            let children: Vec<Region> = region.quadrants(probability).collect();
            stack.extend(children.into_iter().rev());
        }
    }
}

/// Generate a square fine grid.
pub fn generate_grid(params: &MapParams) -> Grid {
    let volatility = params.volatility();
    let mut grid = Grid::square(params.side_length, volatility);
    MapGenerator::new(params.seed, volatility).fill(&mut grid, params.obstacle_ratio);
    grid
}

/// Pixelate a fine grid into a `coarse_side` x `coarse_side` grid.
///
/// A coarse cell is blocked iff the blocked fraction of its
/// `step x step` tile is strictly greater than `cutoff`.
pub fn downsample(fine: &Grid, coarse_side: usize, cutoff: f64) -> Grid {
    let mut coarse = Grid::square(coarse_side, 0.0);
    if coarse_side == 0 {
        return coarse;
    }
    let step = fine.cols() / coarse_side;
    let tile_cells = (step * step) as f64;

    for cy in 0..coarse_side {
        for cx in 0..coarse_side {
            let mut sum = 0usize;
            for y in cy * step..(cy + 1) * step {
                for x in cx * step..(cx + 1) * step {
                    if fine.is_blocked(GridCoord::new(x as i32, y as i32)) {
                        sum += 1;
                    }
                }
            }
            let fraction = if tile_cells > 0.0 { sum as f64 / tile_cells } else { 0.0 };
            coarse.set_blocked(GridCoord::new(cx as i32, cy as i32), fraction > cutoff);
        }
    }

    coarse
}

/// Generate the fine grid, its coarse abstraction and the lock table.
pub fn build_map(params: &MapParams) -> Result<HierarchicalMap> {
    params.validate()?;

    let fine = generate_grid(params);
    let average = fine.blocked_fraction();
    let cutoff = average * params.coarse_margin;
    let coarse_side = params.effective_coarse_side();
    let coarse = downsample(&fine, coarse_side, cutoff);

    tracing::info!(
        "Generated {}x{} map (seed {}): {:.1}% blocked, coarse {}x{} at cutoff {:.3} ({:.1}% blocked)",
        params.side_length,
        params.side_length,
        params.seed,
        average * 100.0,
        coarse_side,
        coarse_side,
        cutoff,
        coarse.blocked_fraction() * 100.0
    );

    HierarchicalMap::new(fine, coarse)
}
