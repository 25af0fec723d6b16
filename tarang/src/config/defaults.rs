//! Default values for [`TarangConfig`](super::TarangConfig).

pub(super) const SIDE_LENGTH: usize = 256;
pub(super) const OBSTACLE_RATIO: f64 = 0.3;
pub(super) const COARSE_SIDE_LENGTH: usize = 32;
pub(super) const SEED: u64 = 1;

/// Coarse cells block only when clearly denser than the whole map
pub(super) const COARSE_MARGIN: f64 = 1.2;

pub(super) const MIN_THREADS: usize = 3;
pub(super) const THREADS: usize = 4;
pub(super) const BURST_ITERATIONS: usize = 2000;
pub(super) const COARSE_BURST_ITERATIONS: usize = 10;
pub(super) const INCREMENT: u32 = 1;
