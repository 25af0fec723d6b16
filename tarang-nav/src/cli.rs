//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tarang::{Result, TarangConfig};

/// Search strategy to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Coarse route plus parallel ripples
    Ripple,
    /// Single fine-grid front, no threads
    Fringe,
}

/// Parallel ripple search over a generated obstacle map.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Map side length in cells
    pub side: usize,

    /// Target obstacle ratio in [0, 1]
    pub ratio: f64,

    /// Coarse map side length (clamped to the map side)
    pub coarse_side: usize,

    /// Random seed for map generation
    pub seed: u64,

    /// Threads: one master plus at least two searchers
    pub threads: usize,

    /// TOML file with search and endpoint settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Search strategy
    #[arg(short, long, value_enum, default_value_t = Mode::Ripple)]
    pub mode: Mode,

    /// Print the fine and coarse maps before searching
    #[arg(long)]
    pub print_map: bool,

    /// Save the fine map to a file
    #[arg(long)]
    pub save_map: Option<PathBuf>,

    /// Save the coarse map to a file
    #[arg(long)]
    pub save_coarse_map: Option<PathBuf>,

    /// Print every coordinate of the final path
    #[arg(long)]
    pub print_path: bool,
}

impl Cli {
    /// Build the run configuration: file (or defaults) overridden by the
    /// positional values.
    pub fn to_config(&self) -> Result<TarangConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {:?}", path);
                TarangConfig::load(path)?
            }
            None => TarangConfig::default(),
        };

        config.map.side_length = self.side;
        config.map.obstacle_ratio = self.ratio;
        config.map.coarse_side_length = self.coarse_side;
        config.map.seed = self.seed;
        config.search.threads = self.threads;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarang::GridCoord;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["tarang-nav", "256", "0.3", "32", "7", "5"]).unwrap();
        assert_eq!(cli.side, 256);
        assert_eq!(cli.ratio, 0.3);
        assert_eq!(cli.coarse_side, 32);
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.threads, 5);
        assert_eq!(cli.mode, Mode::Ripple);
        assert!(!cli.print_map);

        let config = cli.to_config().unwrap();
        assert_eq!(config.map.side_length, 256);
        assert_eq!(config.search.threads, 5);
        assert_eq!(config.goal(), GridCoord::new(254, 254));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "tarang-nav",
            "64",
            "0.2",
            "8",
            "1",
            "3",
            "--mode",
            "fringe",
            "--print-map",
            "--save-map",
            "fine.txt",
            "--print-path",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Fringe);
        assert!(cli.print_map);
        assert!(cli.print_path);
        assert_eq!(cli.save_map, Some(PathBuf::from("fine.txt")));
        assert_eq!(cli.save_coarse_map, None);
    }

    #[test]
    fn test_missing_positional_rejected() {
        assert!(Cli::try_parse_from(["tarang-nav", "64", "0.2", "8", "1"]).is_err());
        assert!(Cli::try_parse_from(["tarang-nav", "x", "0.2", "8", "1", "4"]).is_err());
    }

    #[test]
    fn test_two_threads_rejected_before_generation() {
        let cli = Cli::try_parse_from(["tarang-nav", "64", "0.2", "8", "1", "2"]).unwrap();
        let config = cli.to_config().unwrap();
        assert!(config.validate().is_err());
    }
}
