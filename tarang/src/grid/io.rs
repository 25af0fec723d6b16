//! Line-oriented grid text format.
//!
//! One grid row per line, cells as `0` (free) or `1` (blocked) separated by
//! single spaces. Only occupancy is stored; search state is not persisted.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::GridCoord;

use super::storage::Grid;

/// Render a grid's occupancy as text.
pub fn render_grid(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.len() * 2 + grid.rows());
    for y in 0..grid.rows() as i32 {
        for x in 0..grid.cols() as i32 {
            if x > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", u8::from(grid.is_blocked(GridCoord::new(x, y))));
        }
        out.push('\n');
    }
    out
}

/// Write a grid to a file in the line-oriented format.
pub fn save_grid(grid: &Grid, path: &Path) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(render_grid(grid).as_bytes())?;
    writer.flush()
}

/// Read a grid written by [`save_grid`].
///
/// The result has zero volatility and fresh search state.
pub fn load_grid(path: &Path) -> std::io::Result<Grid> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows: Vec<Vec<bool>> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| match token {
                "0" => Ok(false),
                "1" => Ok(true),
                other => Err(invalid(format!("line {}: bad cell {:?}", line_no + 1, other))),
            })
            .collect::<std::io::Result<Vec<bool>>>()?;

        if let Some(first) = rows.first()
            && first.len() != row.len()
        {
            return Err(invalid(format!(
                "line {}: expected {} cells, found {}",
                line_no + 1,
                first.len(),
                row.len()
            )));
        }
        rows.push(row);
    }

    let cols = rows.first().map_or(0, Vec::len);
    let mut grid = Grid::new(rows.len(), cols, 0.0);
    for (y, row) in rows.iter().enumerate() {
        for (x, &blocked) in row.iter().enumerate() {
            grid.set_blocked(GridCoord::new(x as i32, y as i32), blocked);
        }
    }
    Ok(grid)
}

fn invalid(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut grid = Grid::new(2, 3, 0.0);
        grid.set_blocked(GridCoord::new(1, 0), true);
        grid.set_blocked(GridCoord::new(2, 1), true);
        assert_eq!(render_grid(&grid), "0 1 0\n0 0 1\n");
    }

    #[test]
    fn test_save_and_load() {
        let mut grid = Grid::square(5, 0.0);
        grid.set_blocked(GridCoord::new(0, 4), true);
        grid.set_blocked(GridCoord::new(3, 2), true);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        save_grid(&grid, &path).unwrap();

        let loaded = load_grid(&path).unwrap();
        assert_eq!(loaded.rows(), 5);
        assert_eq!(loaded.cols(), 5);
        assert_eq!(render_grid(&loaded), render_grid(&grid));
    }

    #[test]
    fn test_load_rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "0 1 0\n0 1\n").unwrap();
        let err = load_grid(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_rejects_bad_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "0 2\n").unwrap();
        assert!(load_grid(&path).is_err());
    }
}
