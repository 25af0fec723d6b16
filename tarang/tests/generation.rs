//! Map generation and hierarchy tests.

mod common;

use common::blocked_cells;
use tarang::grid::io::{load_grid, save_grid};
use tarang::{GridCoord, MapParams, build_map, downsample, generate_grid};

#[test]
fn test_same_seed_same_map() {
    for seed in [1, 7, 99] {
        let params = MapParams::new(128, 0.3, 16, seed);
        let a = build_map(&params).unwrap();
        let b = build_map(&params).unwrap();
        assert_eq!(blocked_cells(a.fine()), blocked_cells(b.fine()));
        assert_eq!(blocked_cells(a.coarse()), blocked_cells(b.coarse()));
    }
}

#[test]
fn test_hierarchical_consistency() {
    for (side, coarse) in [(64, 8), (64, 16), (96, 12), (32, 32), (20, 5)] {
        let params = MapParams::new(side, 0.35, coarse, 11);
        let map = build_map(&params).unwrap();
        let factor = map.factor() as usize;
        assert_eq!(factor * map.coarse().cols(), map.fine().cols());

        let cutoff = map.fine().blocked_fraction() * params.coarse_margin;
        for cy in 0..coarse {
            for cx in 0..coarse {
                let mut blocked = 0;
                for y in cy * factor..(cy + 1) * factor {
                    for x in cx * factor..(cx + 1) * factor {
                        if map.fine().is_blocked(GridCoord::new(x as i32, y as i32)) {
                            blocked += 1;
                        }
                    }
                }
                let fraction = blocked as f64 / (factor * factor) as f64;
                let coarse_cell = GridCoord::new(cx as i32, cy as i32);
                assert_eq!(map.coarse().is_blocked(coarse_cell), fraction > cutoff);
            }
        }
    }
}

#[test]
fn test_raw_average_cutoff_blocks_more() {
    let fine = generate_grid(&MapParams::new(64, 0.3, 8, 4));
    let average = fine.blocked_fraction();
    let raw = downsample(&fine, 16, average);
    let margin = downsample(&fine, 16, average * 1.2);
    assert!(raw.blocked_count() >= margin.blocked_count());
}

#[test]
fn test_saved_map_loads_back() {
    let map = build_map(&MapParams::new(32, 0.3, 8, 5)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fine.txt");

    save_grid(map.fine(), &path).unwrap();
    let loaded = load_grid(&path).unwrap();
    assert_eq!(loaded.cols(), 32);
    assert_eq!(blocked_cells(&loaded), blocked_cells(map.fine()));
}
