//! Reachability clamp.

use hillscape_core::{Cell, Grid};
use log::debug;

/// Clears every solid cell that would rise more than `max_jump_height` above
/// the open space of the column to its left, returning how many were cleared.
///
/// Columns are processed left to right in a single pass, so a cell cleared
/// in one column is already air when the next column is scanned.
pub fn clamp_cliffs(grid: &mut Grid, ground_thickness: u32, max_jump_height: u32) -> usize {
    let mut cleared = 0;

    for column in 1..grid.columns() {
        let mut cliff_height: Option<u32> = None;
        for row in ground_thickness..grid.rows() {
            if cliff_height.is_none() && grid.is_air(column - 1, row) {
                cliff_height = Some(0);
            }
            let Some(height) = cliff_height.as_mut() else {
                continue;
            };
            let solid = grid.get(column, row).is_some_and(Cell::is_solid);
            if solid {
                *height += 1;
                if *height > max_jump_height {
                    grid.set(column, row, Cell::Air);
                    cleared += 1;
                }
            }
        }
    }

    debug!("cleared {cleared} cells above the jump limit");
    cleared
}
