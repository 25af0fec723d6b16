//! TarangNav - command-line driver for the Tarang ripple search
//!
//! Generates a seeded obstacle map, then finds a route across it:
//!
//! - **ripple** (default): coarse route, one fine-grid front per worker
//!   thread, master thread polling for completion, stitched result
//! - **fringe**: a single fine-grid front as a sequential baseline
//!
//! ```text
//! tarang-nav <SIDE> <RATIO> <COARSE_SIDE> <SEED> <THREADS> [OPTIONS]
//! ```

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use cli::{Cli, Mode};
use tarang::grid::io::{render_grid, save_grid};
use tarang::{
    GridCoord, HierarchicalMap, Result, RippleSearch, TarangError, build_map, check_parallelism,
    sequential_search,
};

fn main() -> ExitCode {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tarang=info,tarang_nav=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;
    config.validate()?;
    if cli.mode == Mode::Ripple {
        let available = std::thread::available_parallelism().map_or(1, |n| n.get());
        check_parallelism(config.search.threads, available)?;
    }

    let mut map = build_map(&config.map)?;

    if let Some(path) = &cli.save_map {
        save_grid(map.fine(), path)?;
        info!("Saved map to {:?}", path);
    }
    if let Some(path) = &cli.save_coarse_map {
        save_grid(map.coarse(), path)?;
        info!("Saved coarse map to {:?}", path);
    }
    if cli.print_map {
        print_maps(&map);
    }

    let (origin, goal) = (config.origin(), config.goal());
    info!("Searching {} -> {} ({:?} mode)", origin, goal, cli.mode);

    match cli.mode {
        Mode::Ripple => {
            let search = RippleSearch::new(config.search.clone());
            let outcome = match search.run(&mut map, origin, goal) {
                Ok(outcome) => outcome,
                Err(e @ TarangError::NoCoarseRoute { .. }) => {
                    if !cli.print_map {
                        print_maps(&map);
                    }
                    return Err(e);
                }
                Err(e) => return Err(e),
            };

            println!("Path length: {} steps", outcome.steps());
            println!("Parallel phase: {:.6}s", outcome.elapsed.as_secs_f64());
            println!("Workers: {}", outcome.workers.len());
            for (index, worker) in outcome.workers.iter().enumerate() {
                println!(
                    "  worker {} at {}: {} iterations, {} threshold passes",
                    index, worker.start, worker.iterations, worker.threshold_passes
                );
            }
            if cli.print_path {
                print_path(&outcome.path);
            }
        }
        Mode::Fringe => {
            let result = sequential_search(
                &mut map,
                origin,
                goal,
                config.search.fine_increment,
                config.search.burst_iterations,
            )?;
            let Some(path) = result.path else {
                return Err(TarangError::NoPath {
                    from: origin,
                    to: goal,
                });
            };

            println!("Path length: {} steps", path.len().saturating_sub(1));
            println!("Search time: {:.6}s", result.elapsed.as_secs_f64());
            println!(
                "Iterations: {} ({} threshold passes)",
                result.iterations, result.threshold_passes
            );
            if cli.print_path {
                print_path(&path);
            }
        }
    }

    Ok(())
}

fn print_maps(map: &HierarchicalMap) {
    println!("Map ({}x{}):", map.fine().cols(), map.fine().rows());
    print!("{}", render_grid(map.fine()));
    println!("Coarse map ({}x{}):", map.coarse().cols(), map.coarse().rows());
    print!("{}", render_grid(map.coarse()));
}

fn print_path(path: &[GridCoord]) {
    for coord in path {
        println!("{}", coord);
    }
}
