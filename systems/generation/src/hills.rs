//! Stochastic hill formation above the floor strip.
//!
//! Hills are placed left to right. Each one is filled row by row from the
//! floor upwards; after every row the left edge may step right and the width
//! may shrink, which produces terraced silhouettes and overhangs rather than
//! rectangular blocks.

use hillscape_core::{Cell, Grid, HillShaping};
use log::debug;

use crate::Sampler;

/// Raises hills across the whole grid and returns how many were placed.
pub fn raise_hills<S: Sampler + ?Sized>(
    grid: &mut Grid,
    ground_thickness: u32,
    shaping: &HillShaping,
    sampler: &mut S,
) -> usize {
    let columns = grid.columns();
    let mut cursor = shaping.start_column;
    let mut placed = 0;

    while cursor < columns {
        let gap = sampler.uniform_int(shaping.gap.min, shaping.gap.max);
        cursor = cursor.saturating_add(gap);
        let mut length = sampler
            .uniform_int(shaping.length.min, shaping.length.max)
            .max(1);
        let top = sampler.uniform_int(shaping.height.min, shaping.height.max);

        if cursor >= columns {
            break;
        }
        let last = cursor.saturating_add(length) >= columns;
        if last {
            length = columns - cursor;
        }

        let hill = HillRegion {
            origin: cursor,
            length,
            top: top.min(grid.rows()),
        };
        hill.fill(grid, ground_thickness, shaping, sampler);
        placed += 1;

        if last {
            break;
        }
        cursor += length;
    }

    debug!("raised {placed} hills across {columns} columns");
    placed
}

/// Transient description of a single hill while it is being filled.
#[derive(Clone, Copy, Debug)]
struct HillRegion {
    origin: u32,
    length: u32,
    top: u32,
}

impl HillRegion {
    fn fill<S: Sampler + ?Sized>(
        self,
        grid: &mut Grid,
        ground_thickness: u32,
        shaping: &HillShaping,
        sampler: &mut S,
    ) {
        let columns = grid.columns();
        let mut indent = 0_u32;
        let mut length = self.length;

        for row in ground_thickness..self.top {
            let start = self.origin.saturating_add(indent).min(columns);
            let end = start.saturating_add(length).min(columns);
            for column in start..end {
                let cell = if sampler.chance(shaping.mud_chance) {
                    Cell::Mud
                } else {
                    Cell::Stone
                };
                grid.set(column, row, cell);
            }

            if sampler.chance(shaping.indent_chance) {
                let step = sampler.uniform_int(shaping.indent_step.min, shaping.indent_step.max);
                indent = indent.saturating_add(step);
            }
            if sampler.chance(shaping.shrink_chance) {
                let step = sampler.uniform_int(shaping.shrink_step.min, shaping.shrink_step.max);
                length = length.saturating_sub(step).max(1);
            }
        }
    }
}
