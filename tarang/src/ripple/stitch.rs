//! Phase 4: join per-worker paths into one route.

use crate::core::GridCoord;
use crate::error::{Result, TarangError};
use crate::grid::Grid;
use crate::search::FringeSearch;

/// Join the discovered paths of a finished chain of fronts.
///
/// Front `i` found a path from its start to the first cell owned by front
/// `i + 1` (the bridge). The bridge's parent chain leads back to front
/// `i + 1`'s start, where that front's own path continues. The last bridge
/// is walked back to the final start, which is the goal.
pub fn stitch(grid: &Grid, fronts: &[FringeSearch<'_>]) -> Result<Vec<GridCoord>> {
    let Some(first) = fronts.first() else {
        return Ok(Vec::new());
    };
    if fronts.len() == 1 {
        return Ok(vec![first.start()]);
    }

    let mut path = vec![first.start()];
    for (index, pair) in fronts.windows(2).enumerate() {
        let (front, next) = (&pair[0], &pair[1]);
        let segment = front
            .path_to(next.start())
            .ok_or_else(|| TarangError::WorkersFailed(vec![index]))?;

        // Segment starts where the previous walk ended
        path.extend_from_slice(&segment[1..]);
        walk_back(grid, &mut path)?;
    }

    Ok(path)
}

/// Append the parent chain of the path's last cell, down to its root.
fn walk_back(grid: &Grid, path: &mut Vec<GridCoord>) -> Result<()> {
    let Some(&bridge) = path.last() else {
        return Ok(());
    };
    let index = grid.index_of(bridge).ok_or(TarangError::Integrity {
        index: path.len() - 1,
        prev: bridge,
        next: bridge,
    })?;
    let chain = grid.parent_chain(index);
    path.extend(chain.iter().rev().skip(1));
    Ok(())
}

/// Check that consecutive cells are exactly one step apart.
pub fn validate_path(path: &[GridCoord]) -> Result<()> {
    for (index, pair) in path.windows(2).enumerate() {
        if pair[0].manhattan_distance(&pair[1]) != 1 {
            tracing::error!(
                "Path integrity failure at {}: {} -> {}",
                index + 1,
                pair[0],
                pair[1]
            );
            return Err(TarangError::Integrity {
                index: index + 1,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{HierarchicalMap, Level};
    use crate::search::SearchStatus;

    #[test]
    fn test_validate_path() {
        let good = [GridCoord::new(0, 0), GridCoord::new(1, 0), GridCoord::new(1, 1)];
        assert!(validate_path(&good).is_ok());
        assert!(validate_path(&[]).is_ok());

        let gap = [GridCoord::new(0, 0), GridCoord::new(1, 0), GridCoord::new(3, 0)];
        assert!(matches!(
            validate_path(&gap),
            Err(TarangError::Integrity { index: 2, .. })
        ));

        let repeat = [GridCoord::new(0, 0), GridCoord::new(0, 0)];
        assert!(validate_path(&repeat).is_err());
    }

    #[test]
    fn test_stitch_three_fronts_sequentially() {
        let map = HierarchicalMap::new(Grid::square(12, 0.0), Grid::square(3, 0.0)).unwrap();
        let starts = [GridCoord::new(0, 0), GridCoord::new(5, 6), GridCoord::new(11, 11)];
        let mut fronts = vec![
            FringeSearch::new(&map, Level::Fine, 1, starts[0], vec![starts[1]]).unwrap(),
            FringeSearch::new(&map, Level::Fine, 1, starts[1], vec![starts[0], starts[2]]).unwrap(),
            FringeSearch::new(&map, Level::Fine, 1, starts[2], vec![starts[1]]).unwrap(),
        ];

        // Round-robin bursts stand in for the threads
        for _ in 0..1000 {
            let statuses: Vec<_> = fronts.iter_mut().map(|f| f.advance(4)).collect();
            if statuses.iter().all(|s| *s == SearchStatus::Complete) {
                break;
            }
        }
        assert!(fronts.iter().all(FringeSearch::is_complete));

        let path = stitch(map.fine(), &fronts).unwrap();
        validate_path(&path).unwrap();
        assert_eq!(path.first(), Some(&starts[0]));
        assert_eq!(path.last(), Some(&starts[2]));
        assert!(path.contains(&starts[1]));
        assert!(path.len() - 1 >= starts[0].manhattan_distance(&starts[2]) as usize);
    }

    #[test]
    fn test_stitch_missing_segment() {
        let map = HierarchicalMap::new(Grid::square(8, 0.0), Grid::square(2, 0.0)).unwrap();
        let a = GridCoord::new(0, 0);
        let b = GridCoord::new(7, 7);
        let fronts = vec![
            FringeSearch::new(&map, Level::Fine, 1, a, vec![b]).unwrap(),
            FringeSearch::new(&map, Level::Fine, 1, b, vec![a]).unwrap(),
        ];
        assert!(matches!(
            stitch(map.fine(), &fronts),
            Err(TarangError::WorkersFailed(_))
        ));
    }
}
