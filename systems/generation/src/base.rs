//! Guaranteed floor strip.

use hillscape_core::{Cell, Grid};

/// Resets the grid to air and fills the bottom `ground_thickness` rows with mud.
pub fn lay_floor(grid: &mut Grid, ground_thickness: u32) {
    let floor = ground_thickness.min(grid.rows());
    for column in 0..grid.columns() {
        for row in 0..grid.rows() {
            let cell = if row < floor { Cell::Mud } else { Cell::Air };
            grid.set(column, row, cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_rows_become_mud_and_the_rest_air() {
        let mut grid = Grid::from_rows(&["%%%", "~~~", "..."]);
        lay_floor(&mut grid, 2);

        assert_eq!(grid.count(Cell::Mud), 6);
        assert_eq!(grid.count(Cell::Air), 3);
        for column in 0..3 {
            assert!(grid.is_air(column, 2));
        }
    }

    #[test]
    fn floor_thicker_than_grid_is_clipped() {
        let mut grid = Grid::new(2, 2);
        lay_floor(&mut grid, 5);
        assert_eq!(grid.count(Cell::Mud), 4);
    }
}
