//! Surface dressing: grass on exposed mud, ice beside water.

use hillscape_core::{Cell, DressingShaping, Grid};
use log::debug;

use crate::Sampler;

/// Tally of cells converted by [`dress_surface`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DressingReport {
    /// Cells turned into grass.
    pub grass: usize,
    /// Cells turned into ice.
    pub ice: usize,
}

/// Converts every mud cell with air directly above it into grass, or into
/// ice with `ice_chance` when water lies within `ice_window` columns on the
/// same row.
///
/// Columns closer than `ice_window` to either edge always become grass.
pub fn dress_surface<S: Sampler + ?Sized>(
    grid: &mut Grid,
    shaping: &DressingShaping,
    sampler: &mut S,
) -> DressingReport {
    let columns = grid.columns();
    let window = shaping.ice_window;
    let mut report = DressingReport::default();

    for column in 0..columns {
        for row in 0..grid.rows().saturating_sub(1) {
            if grid.get(column, row) != Some(Cell::Mud) || !grid.is_air(column, row + 1) {
                continue;
            }

            let inside = column >= window && column + window < columns;
            let dressed = if inside
                && water_within(grid, column, row, window)
                && sampler.chance(shaping.ice_chance)
            {
                report.ice += 1;
                Cell::Ice
            } else {
                report.grass += 1;
                Cell::Grass
            };
            grid.set(column, row, dressed);
        }
    }

    debug!("dressed {} grass and {} ice cells", report.grass, report.ice);
    report
}

fn water_within(grid: &Grid, column: u32, row: u32, window: u32) -> bool {
    (column - window..=column + window)
        .any(|candidate| grid.get(candidate, row) == Some(Cell::Water))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedSampler;

    fn shaping(ice_chance: f32) -> DressingShaping {
        DressingShaping {
            ice_chance,
            ice_window: 4,
        }
    }

    #[test]
    fn exposed_mud_becomes_grass_away_from_water() {
        let mut grid = Grid::from_rows(&[
            "..........", //
            "....#.....", //
            "##########", //
        ]);
        let mut sampler = ScriptedSampler::new([], []);

        let report = dress_surface(&mut grid, &shaping(1.0), &mut sampler);

        assert_eq!(report, DressingReport { grass: 10, ice: 0 });
        assert_eq!(grid.get(4, 1), Some(Cell::Grass));
        assert_eq!(grid.get(4, 0), Some(Cell::Mud), "buried mud stays mud");
        assert_eq!(grid.get(3, 0), Some(Cell::Grass));
    }

    #[test]
    fn mud_beside_water_freezes_with_ice_chance() {
        let mut grid = Grid::from_rows(&[
            "...........", //
            "#####~#####", //
            "###########", //
        ]);
        // Columns 4 and 6 see the water; the first draw freezes, the second does not.
        let mut sampler = ScriptedSampler::new([], [0.1, 0.9]);

        let report = dress_surface(&mut grid, &shaping(0.5), &mut sampler);

        assert_eq!(report.ice, 1);
        assert_eq!(grid.get(4, 1), Some(Cell::Ice));
        assert_eq!(grid.get(6, 1), Some(Cell::Grass));
        assert_eq!(grid.get(5, 1), Some(Cell::Water));
        assert_eq!(sampler.remaining_units(), 0);
    }

    #[test]
    fn edge_margin_always_gets_grass() {
        let mut grid = Grid::from_rows(&[
            ".........", //
            "#~#######", //
            "#########", //
        ]);
        let mut sampler = ScriptedSampler::new([], []);

        let report = dress_surface(&mut grid, &shaping(1.0), &mut sampler);

        // Only column 4 is outside the margin and within reach of the water.
        assert_eq!(report.ice, 1);
        assert_eq!(grid.get(0, 1), Some(Cell::Grass));
        assert_eq!(grid.get(2, 1), Some(Cell::Grass));
        assert_eq!(grid.get(4, 1), Some(Cell::Ice));
        assert_eq!(grid.get(5, 1), Some(Cell::Grass));
    }

    #[test]
    fn stone_and_covered_cells_are_untouched() {
        let rows = [
            "%%", //
            "#%", //
        ];
        let mut grid = Grid::from_rows(&rows);
        let report = dress_surface(&mut grid, &shaping(1.0), &mut ScriptedSampler::default());

        assert_eq!(report, DressingReport::default());
        assert_eq!(grid, Grid::from_rows(&rows));
    }
}
