#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hillscape level generator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure generation system. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. The generation system consumes
//! event streams and responds exclusively with new command batches, handing
//! finished [`Level`] values over by ownership.

mod params;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use params::{
    DressingShaping, GenerationParams, HillShaping, IntRange, LakeShaping, ParamsError,
};

/// Default time between two scheduled generation cycles.
pub const DEFAULT_REGENERATION_INTERVAL: Duration = Duration::from_secs(2);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the regeneration clock by the provided delta time.
    Tick {
        /// Duration of wall time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a generation cycle be started immediately.
    RequestRegeneration,
    /// Pauses or resumes periodic regeneration without touching the published level.
    SetRegenerationEnabled {
        /// Whether the regeneration clock should run.
        enabled: bool,
    },
    /// Hands a finished level to the world, replacing the published one wholesale.
    PublishLevel {
        /// Cycle the level was generated for.
        cycle: CycleId,
        /// Fully constructed level.
        level: Level,
    },
    /// Reports that a cycle failed before allocation and produced no level.
    RejectCycle {
        /// Cycle that failed.
        cycle: CycleId,
        /// Configuration problem that stopped generation.
        error: ParamsError,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the regeneration clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new generation cycle should run now.
    RegenerationDue {
        /// Identifier allocated to the cycle.
        cycle: CycleId,
        /// Time the cycle may take before it would overlap the next one.
        budget: Duration,
    },
    /// Announces that periodic regeneration was paused or resumed.
    RegenerationToggled {
        /// Whether the regeneration clock is now running.
        enabled: bool,
    },
    /// Confirms that a new level replaced the previously published one.
    LevelPublished {
        /// Cycle that produced the level.
        cycle: CycleId,
        /// Number of columns in the published grid.
        columns: u32,
        /// Number of rows in the published grid.
        rows: u32,
    },
    /// Reports that a cycle was rejected and the previous level was retained.
    GenerationRejected {
        /// Cycle that failed.
        cycle: CycleId,
        /// Configuration problem that stopped generation.
        error: ParamsError,
    },
}

/// Monotonic identifier assigned to each generation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CycleId(u64);

impl CycleId {
    /// Creates a new cycle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Identifier of the cycle that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Terrain type occupying a single grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty, traversable space.
    #[default]
    Air,
    /// Default ground material.
    Mud,
    /// Harder ground mixed into hills.
    Stone,
    /// Dressed top of exposed mud.
    Grass,
    /// Dressed top of exposed mud next to water.
    Ice,
    /// Carved lake surface.
    Water,
}

impl Cell {
    /// Every cell code in declaration order.
    pub const ALL: [Cell; 6] = [
        Cell::Air,
        Cell::Mud,
        Cell::Stone,
        Cell::Grass,
        Cell::Ice,
        Cell::Water,
    ];

    /// Returns `true` for every cell other than [`Cell::Air`].
    ///
    /// Water counts as solid here: the scanning passes treat any filled cell
    /// as a boundary.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Cell::Air)
    }

    /// Returns `true` for ground a player can stand on.
    #[must_use]
    pub const fn is_terrain(self) -> bool {
        matches!(self, Cell::Mud | Cell::Stone | Cell::Grass | Cell::Ice)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the bottom of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell, counted upwards from the bottom.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dense two dimensional array of cell codes indexed `[column, row]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a grid of the provided dimensions filled with air.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cells: vec![Cell::Air; capacity],
        }
    }

    /// Builds a grid from textual rows listed top row first.
    ///
    /// `.` is air, `#` mud, `%` stone, `"` grass, `*` ice and `~` water. Rows
    /// shorter than the widest one are padded with air.
    #[must_use]
    pub fn from_rows(lines: &[&str]) -> Self {
        let columns = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as u32;
        let rows = lines.len() as u32;
        let mut grid = Self::new(columns, rows);
        for (offset, line) in lines.iter().enumerate() {
            let row = rows - 1 - offset as u32;
            for (column, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    '#' => Cell::Mud,
                    '%' => Cell::Stone,
                    '"' => Cell::Grass,
                    '*' => Cell::Ice,
                    '~' => Cell::Water,
                    _ => Cell::Air,
                };
                grid.set(column as u32, row, cell);
            }
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Retrieves the cell stored at the provided location.
    ///
    /// Returns `None` when the location lies outside the grid.
    #[must_use]
    pub fn get(&self, column: u32, row: u32) -> Option<Cell> {
        self.index(column, row).map(|index| self.cells[index])
    }

    /// Returns `true` when the location holds air. Locations outside the grid are not air.
    #[must_use]
    pub fn is_air(&self, column: u32, row: u32) -> bool {
        self.get(column, row) == Some(Cell::Air)
    }

    /// Stores a cell at the provided location.
    ///
    /// Passes clip their ranges before writing, so an out of range location is
    /// a logic fault; it is ignored in release builds.
    pub fn set(&mut self, column: u32, row: u32, cell: Cell) {
        debug_assert!(
            column < self.columns && row < self.rows,
            "write outside grid at ({column}, {row})"
        );
        if let Some(index) = self.index(column, row) {
            self.cells[index] = cell;
        }
    }

    /// Cells of a single column ordered bottom to top.
    #[must_use]
    pub fn column(&self, column: u32) -> &[Cell] {
        if column >= self.columns {
            return &[];
        }
        let start = column as usize * self.rows as usize;
        &self.cells[start..start + self.rows as usize]
    }

    /// Iterates over every cell in column-major order, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let rows = self.rows.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let column = index as u32 / rows;
            let row = index as u32 % rows;
            (CellCoord::new(column, row), *cell)
        })
    }

    /// Counts the cells holding the provided code.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|candidate| **candidate == cell).count()
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column < self.columns && row < self.rows {
            Some(column as usize * self.rows as usize + row as usize)
        } else {
            None
        }
    }
}

/// Finished output of one generation cycle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    grid: Grid,
    ground_thickness: u32,
}

impl Level {
    /// Wraps a finished grid together with the floor thickness it was built with.
    #[must_use]
    pub fn new(grid: Grid, ground_thickness: u32) -> Self {
        Self {
            grid,
            ground_thickness,
        }
    }

    /// Finished cell grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of guaranteed solid rows at the bottom of the grid.
    #[must_use]
    pub const fn ground_thickness(&self) -> u32 {
        self.ground_thickness
    }

    /// Consumes the level and returns its grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
