//! Lake carving over low horizontal air gaps.

use hillscape_core::{Cell, Grid, LakeShaping};
use log::debug;

use crate::Sampler;

/// Scans every row from the floor up to the water level and floods bounded
/// air runs, returning the number of cells turned into water.
///
/// Runs never span rows. A column whose cell below is air, or which already
/// sits on `stack_depth` rows of water, breaks the run it would belong to.
pub fn carve_lakes<S: Sampler + ?Sized>(
    grid: &mut Grid,
    ground_thickness: u32,
    shaping: &LakeShaping,
    sampler: &mut S,
) -> usize {
    let ceiling = shaping.water_level.min(grid.rows());
    let mut flooded = 0;

    for row in ground_thickness..ceiling {
        let mut solid_seen = false;
        let mut run_start: Option<u32> = None;

        for column in 0..grid.columns() {
            if is_disqualified(grid, column, row, shaping.stack_depth) {
                run_start = None;
                solid_seen = false;
                continue;
            }

            let solid = grid.get(column, row).is_some_and(Cell::is_solid);
            if solid_seen && !solid && run_start.is_none() {
                run_start = Some(column);
            } else if solid {
                if let Some(start) = run_start.take() {
                    let run = LakeRun {
                        row,
                        start,
                        end: column,
                    };
                    if run.len() <= shaping.max_water_length
                        && sampler.chance(shaping.water_chance)
                    {
                        flooded += run.flood(grid);
                    }
                    solid_seen = false;
                }
            }

            if solid {
                solid_seen = true;
            }
        }
    }

    debug!("flooded {flooded} cells below row {ceiling}");
    flooded
}

/// Contiguous air run at a fixed row, `start` inclusive and `end` exclusive.
#[derive(Clone, Copy, Debug)]
struct LakeRun {
    row: u32,
    start: u32,
    end: u32,
}

impl LakeRun {
    fn len(self) -> u32 {
        self.end - self.start
    }

    fn flood(self, grid: &mut Grid) -> usize {
        for column in self.start..self.end {
            grid.set(column, self.row, Cell::Water);
        }
        self.len() as usize
    }
}

fn is_disqualified(grid: &Grid, column: u32, row: u32, stack_depth: u32) -> bool {
    let Some(below) = row.checked_sub(1) else {
        return false;
    };
    if grid.is_air(column, below) {
        return true;
    }
    stack_depth > 0
        && (1..=stack_depth).all(|depth| {
            row.checked_sub(depth)
                .and_then(|candidate| grid.get(column, candidate))
                == Some(Cell::Water)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedSampler;

    fn shaping(max_water_length: u32, water_chance: f32) -> LakeShaping {
        LakeShaping {
            water_level: 4,
            max_water_length,
            water_chance,
            stack_depth: 2,
        }
    }

    fn basin() -> Grid {
        Grid::from_rows(&[
            "......", //
            "##..##", //
            "######", //
            "######", //
        ])
    }

    #[test]
    fn short_gap_is_flooded_when_chance_is_certain() {
        let mut grid = basin();
        let mut sampler = ScriptedSampler::new([], [0.5]);

        let flooded = carve_lakes(&mut grid, 2, &shaping(3, 1.0), &mut sampler);

        assert_eq!(flooded, 2);
        assert_eq!(grid.get(2, 2), Some(Cell::Water));
        assert_eq!(grid.get(3, 2), Some(Cell::Water));
        assert_eq!(grid.count(Cell::Water), 2);
        assert!(grid.is_air(2, 3), "runs never climb into the next row");
    }

    #[test]
    fn gap_longer_than_limit_stays_air() {
        let mut grid = basin();
        let mut sampler = ScriptedSampler::new([], [0.0]);

        let flooded = carve_lakes(&mut grid, 2, &shaping(1, 1.0), &mut sampler);

        assert_eq!(flooded, 0);
        assert_eq!(grid, basin());
        assert_eq!(sampler.remaining_units(), 1, "no draw for ineligible runs");
    }

    #[test]
    fn failed_chance_leaves_gap_dry() {
        let mut grid = basin();
        let mut sampler = ScriptedSampler::new([], [0.8]);

        let flooded = carve_lakes(&mut grid, 2, &shaping(3, 0.7), &mut sampler);

        assert_eq!(flooded, 0);
        assert_eq!(sampler.remaining_units(), 0);
    }

    #[test]
    fn unsupported_column_breaks_the_run() {
        let mut grid = Grid::from_rows(&[
            "......", //
            "##..##", //
            "###.##", //
            "######", //
        ]);
        let mut sampler = ScriptedSampler::new([], []);

        let flooded = carve_lakes(&mut grid, 2, &shaping(8, 1.0), &mut sampler);

        assert_eq!(flooded, 0);
    }

    #[test]
    fn open_ended_run_is_never_flooded() {
        let mut grid = Grid::from_rows(&[
            "......", //
            "##....", //
            "######", //
            "######", //
        ]);
        let mut sampler = ScriptedSampler::new([], []);

        assert_eq!(carve_lakes(&mut grid, 2, &shaping(8, 1.0), &mut sampler), 0);
    }

    #[test]
    fn water_does_not_stack_deeper_than_limit() {
        let rows = [
            "#..#", //
            "#~~#", //
            "#~~#", //
            "####", //
        ];
        let mut shaping = shaping(8, 1.0);
        shaping.water_level = 5;

        let mut grid = Grid::from_rows(&rows);
        assert_eq!(carve_lakes(&mut grid, 1, &shaping, &mut ScriptedSampler::default()), 0);

        shaping.stack_depth = 3;
        let mut grid = Grid::from_rows(&rows);
        assert_eq!(carve_lakes(&mut grid, 1, &shaping, &mut ScriptedSampler::default()), 2);
        assert_eq!(grid.get(1, 3), Some(Cell::Water));
    }

    #[test]
    fn several_lakes_share_a_row() {
        let mut grid = Grid::from_rows(&[
            "..........", //
            "#..#...#.#", //
            "##########", //
        ]);
        let mut sampler = ScriptedSampler::new([], [0.0, 0.0, 0.0]);
        let shaping = LakeShaping {
            water_level: 3,
            max_water_length: 3,
            water_chance: 1.0,
            stack_depth: 2,
        };

        let flooded = carve_lakes(&mut grid, 1, &shaping, &mut sampler);

        assert_eq!(flooded, 6);
        assert_eq!(sampler.remaining_units(), 0);
        for column in [1, 2, 4, 5, 6, 8] {
            assert_eq!(grid.get(column, 1), Some(Cell::Water));
        }
    }
}
