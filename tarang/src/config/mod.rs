//! Run configuration for the ripple search.
//!
//! Loads from a TOML file where every field has a default:
//!
//! ```toml
//! [map]
//! side_length = 256
//! obstacle_ratio = 0.3
//! coarse_side_length = 32
//! seed = 7
//!
//! [search]
//! threads = 5
//! burst_iterations = 2000
//!
//! [endpoints]
//! origin = { x = 1, y = 1 }
//! goal = { x = 254, y = 254 }
//! ```

mod defaults;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;
use crate::error::{Result, TarangError};

/// Map generation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParams {
    /// Fine grid side length in cells
    pub side_length: usize,
    /// Target obstacle ratio in [0, 1]
    pub obstacle_ratio: f64,
    /// Requested coarse grid side length (clamped to `side_length`)
    pub coarse_side_length: usize,
    /// Random seed; the same seed always yields the same map
    pub seed: u64,
    /// Coarse cutoff as a multiple of the fine grid's blocked fraction
    pub coarse_margin: f64,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            side_length: defaults::SIDE_LENGTH,
            obstacle_ratio: defaults::OBSTACLE_RATIO,
            coarse_side_length: defaults::COARSE_SIDE_LENGTH,
            seed: defaults::SEED,
            coarse_margin: defaults::COARSE_MARGIN,
        }
    }
}

impl MapParams {
    /// Create parameters with the default coarse margin.
    pub fn new(side_length: usize, obstacle_ratio: f64, coarse_side_length: usize, seed: u64) -> Self {
        Self {
            side_length,
            obstacle_ratio,
            coarse_side_length,
            seed,
            ..Self::default()
        }
    }

    /// Coarse side length after clamping to the fine side length.
    pub fn effective_coarse_side(&self) -> usize {
        self.coarse_side_length.min(self.side_length)
    }

    /// Perturbation scale for the generator.
    ///
    /// Shrinks with map size so deeper (smaller) regions drift less.
    pub fn volatility(&self) -> f64 {
        if self.side_length <= 1 {
            return 0.0;
        }
        self.obstacle_ratio / (self.side_length as f64).log2()
    }

    /// Check map parameters.
    pub fn validate(&self) -> Result<()> {
        if self.side_length == 0 {
            return Err(TarangError::Config("map side length must be > 0".into()));
        }
        if self.side_length > u32::MAX as usize / self.side_length {
            return Err(TarangError::Config(format!(
                "map side length {} is too large",
                self.side_length
            )));
        }
        if !(0.0..=1.0).contains(&self.obstacle_ratio) {
            return Err(TarangError::Config(format!(
                "obstacle ratio {} is outside [0, 1]",
                self.obstacle_ratio
            )));
        }
        if self.coarse_side_length == 0 {
            return Err(TarangError::Config("coarse side length must be > 0".into()));
        }
        if !self.coarse_margin.is_finite() || self.coarse_margin <= 0.0 {
            return Err(TarangError::Config(format!(
                "coarse margin {} must be a positive number",
                self.coarse_margin
            )));
        }
        if self.coarse_side_length > self.side_length {
            tracing::warn!(
                "Coarse side length {} exceeds map side {}, clamping",
                self.coarse_side_length,
                self.side_length
            );
        }
        let coarse = self.effective_coarse_side();
        if self.side_length % coarse != 0 {
            return Err(TarangError::Config(format!(
                "coarse side length {} must divide map side length {}",
                coarse, self.side_length
            )));
        }
        Ok(())
    }
}

/// Search and worker-pool parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Total threads: one master plus `threads - 1` searching workers
    pub threads: usize,
    /// Fringe search steps per worker burst
    pub burst_iterations: usize,
    /// Fringe search steps per burst of the coarse route search
    pub coarse_burst_iterations: usize,
    /// Threshold growth per pass for fine-level fronts
    pub fine_increment: u32,
    /// Threshold growth per pass for the coarse route search
    pub coarse_increment: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            threads: defaults::THREADS,
            burst_iterations: defaults::BURST_ITERATIONS,
            coarse_burst_iterations: defaults::COARSE_BURST_ITERATIONS,
            fine_increment: defaults::INCREMENT,
            coarse_increment: defaults::INCREMENT,
        }
    }
}

impl SearchParams {
    /// Number of searching workers (excludes the master).
    pub fn workers(&self) -> usize {
        self.threads.saturating_sub(1)
    }

    /// Check search parameters.
    pub fn validate(&self) -> Result<()> {
        if self.threads < defaults::MIN_THREADS {
            return Err(TarangError::Config(format!(
                "at least {} threads are required (one master and two workers), got {}",
                defaults::MIN_THREADS,
                self.threads
            )));
        }
        if self.burst_iterations == 0 || self.coarse_burst_iterations == 0 {
            return Err(TarangError::Config("burst sizes must be > 0".into()));
        }
        if self.fine_increment == 0 || self.coarse_increment == 0 {
            return Err(TarangError::Config("threshold increments must be > 0".into()));
        }
        Ok(())
    }
}

/// Route endpoints on the fine grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Route origin (default: (1, 1))
    pub origin: Option<GridCoord>,
    /// Route goal (default: (side - 2, side - 2))
    pub goal: Option<GridCoord>,
}

impl Endpoints {
    /// Explicit origin and goal.
    pub fn new(origin: GridCoord, goal: GridCoord) -> Self {
        Self {
            origin: Some(origin),
            goal: Some(goal),
        }
    }

    /// Configured origin, or (1, 1).
    pub fn origin_or_default(&self) -> GridCoord {
        self.origin.unwrap_or(GridCoord::new(1, 1))
    }

    /// Goal for a map of the given side length.
    pub fn goal_for(&self, side_length: usize) -> GridCoord {
        let far = side_length as i32 - 2;
        self.goal.unwrap_or(GridCoord::new(far, far))
    }
}

/// Complete run configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TarangConfig {
    /// Map generation
    #[serde(default)]
    pub map: MapParams,
    /// Search and worker pool
    #[serde(default)]
    pub search: SearchParams,
    /// Route endpoints
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl TarangConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TarangError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolved route origin.
    pub fn origin(&self) -> GridCoord {
        self.endpoints.origin_or_default()
    }

    /// Resolved route goal.
    pub fn goal(&self) -> GridCoord {
        self.endpoints.goal_for(self.map.side_length)
    }

    /// Validate everything that can be checked before generating a map.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.map.validate()?;

        let side = self.map.side_length as i32;
        let in_bounds = |c: GridCoord| c.x >= 0 && c.y >= 0 && c.x < side && c.y < side;
        let (origin, goal) = (self.origin(), self.goal());
        if !in_bounds(origin) || !in_bounds(goal) {
            return Err(TarangError::Config(format!(
                "endpoints {} -> {} must lie inside a {}x{} map",
                origin, goal, side, side
            )));
        }
        if origin == goal {
            return Err(TarangError::Config(format!("origin and goal are both {}", origin)));
        }
        Ok(())
    }
}

/// Reject thread counts the host cannot run in parallel.
pub fn check_parallelism(threads: usize, available: usize) -> Result<()> {
    if available < threads {
        return Err(TarangError::Config(format!(
            "only {} threads available, {} requested",
            available, threads
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = TarangConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.origin(), GridCoord::new(1, 1));
        assert_eq!(config.goal(), GridCoord::new(254, 254));
    }

    #[test]
    fn test_rejects_two_threads() {
        let mut config = TarangConfig::default();
        config.search.threads = 2;
        assert!(matches!(config.validate(), Err(TarangError::Config(_))));
    }

    #[test]
    fn test_coarse_side_clamped() {
        let params = MapParams::new(16, 0.2, 64, 1);
        assert_eq!(params.effective_coarse_side(), 16);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_coarse_side_must_divide() {
        let params = MapParams::new(100, 0.2, 30, 1);
        assert!(matches!(params.validate(), Err(TarangError::Config(_))));
        assert!(MapParams::new(100, 0.2, 25, 1).validate().is_ok());
    }

    #[test]
    fn test_ratio_range() {
        assert!(MapParams::new(16, -0.1, 4, 1).validate().is_err());
        assert!(MapParams::new(16, 1.5, 4, 1).validate().is_err());
        assert!(MapParams::new(16, 1.0, 4, 1).validate().is_ok());
    }

    #[test]
    fn test_volatility() {
        let params = MapParams::new(256, 0.4, 32, 1);
        assert_relative_eq!(params.volatility(), 0.05, epsilon = 1e-12);
        assert_eq!(MapParams::new(1, 0.4, 1, 1).volatility(), 0.0);
    }

    #[test]
    fn test_parallelism_check() {
        assert!(check_parallelism(4, 8).is_ok());
        assert!(check_parallelism(4, 4).is_ok());
        assert!(check_parallelism(5, 4).is_err());
    }

    #[test]
    fn test_endpoints_validation() {
        let mut config = TarangConfig::default();
        config.endpoints = Endpoints::new(GridCoord::new(0, 0), GridCoord::new(0, 0));
        assert!(config.validate().is_err());

        config.endpoints = Endpoints::new(GridCoord::new(0, 0), GridCoord::new(300, 0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_overrides() {
        let toml = r#"
            [map]
            side_length = 64
            coarse_side_length = 8

            [search]
            threads = 6

            [endpoints]
            origin = { x = 0, y = 0 }
        "#;
        let config = TarangConfig::from_toml(toml).unwrap();
        assert_eq!(config.map.side_length, 64);
        assert_eq!(config.map.coarse_side_length, 8);
        assert_eq!(config.map.seed, defaults::SEED);
        assert_eq!(config.search.threads, 6);
        assert_eq!(config.search.burst_iterations, defaults::BURST_ITERATIONS);
        assert_eq!(config.origin(), GridCoord::new(0, 0));
        assert_eq!(config.goal(), GridCoord::new(62, 62));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TarangConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = TarangConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.map.side_length, config.map.side_length);
        assert_eq!(parsed.search.threads, config.search.threads);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = TarangConfig::from_toml("[map]\nside_length = \"big\"").unwrap_err();
        assert!(matches!(err, TarangError::Config(_)));
    }
}
