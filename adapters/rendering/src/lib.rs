#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hillscape adapters.
//!
//! Generation hands finished grids over by ownership; adapters translate cell
//! codes into visual tiles through [`tile_for`] and paint them onto a
//! [`TileSink`]. Painting always clears the sink first so a regenerated level
//! never shows tiles left over from the previous one.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use hillscape_core::{Cell, CellCoord, Grid};

/// Visual tile painted for a non-empty cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileKey {
    /// Grass covered ground.
    Grass,
    /// Bare mud.
    Mud,
    /// Stone block.
    Stone,
    /// Frozen ground.
    Ice,
    /// Lake surface.
    Water,
}

impl TileKey {
    /// Every tile key in declaration order.
    pub const ALL: [TileKey; 5] = [
        TileKey::Grass,
        TileKey::Mud,
        TileKey::Stone,
        TileKey::Ice,
        TileKey::Water,
    ];

    /// Stable name used by manifests and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TileKey::Grass => "Grass",
            TileKey::Mud => "Mud",
            TileKey::Stone => "Stone",
            TileKey::Ice => "Ice",
            TileKey::Water => "Water",
        }
    }

    /// Single character used by text renderers.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            TileKey::Grass => '"',
            TileKey::Mud => '#',
            TileKey::Stone => '%',
            TileKey::Ice => '*',
            TileKey::Water => '~',
        }
    }
}

/// Maps a cell code to the tile that represents it. Air has no tile.
#[must_use]
pub const fn tile_for(cell: Cell) -> Option<TileKey> {
    match cell {
        Cell::Air => None,
        Cell::Mud => Some(TileKey::Mud),
        Cell::Stone => Some(TileKey::Stone),
        Cell::Grass => Some(TileKey::Grass),
        Cell::Ice => Some(TileKey::Ice),
        Cell::Water => Some(TileKey::Water),
    }
}

/// Display surface that finished grids are painted onto.
pub trait TileSink {
    /// Removes every tile painted so far.
    fn clear(&mut self);

    /// Paints `tile` at `coord`, or erases the position when `tile` is `None`.
    fn set_cell(&mut self, coord: CellCoord, tile: Option<TileKey>);
}

/// Clears `sink` and paints every cell of `grid` onto it.
pub fn paint<S: TileSink + ?Sized>(grid: &Grid, sink: &mut S) {
    sink.clear();
    for (coord, cell) in grid.iter() {
        sink.set_cell(coord, tile_for(cell));
    }
}

/// In-memory [`TileSink`] that remembers painted tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileCanvas {
    columns: u32,
    rows: u32,
    tiles: BTreeMap<CellCoord, TileKey>,
}

impl TileCanvas {
    /// Creates an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns touched since the last clear.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows touched since the last clear.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile painted at `coord`, if any.
    #[must_use]
    pub fn tile(&self, coord: CellCoord) -> Option<TileKey> {
        self.tiles.get(&coord).copied()
    }

    /// Iterates over painted tiles ordered by column, then row.
    pub fn tiles(&self) -> impl Iterator<Item = (CellCoord, TileKey)> + '_ {
        self.tiles.iter().map(|(coord, tile)| (*coord, *tile))
    }

    /// Returns `true` when nothing is painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Renders the canvas as text, top row first, with `.` for empty positions.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        let mut output = String::with_capacity((self.columns as usize + 1) * self.rows as usize);
        for row in (0..self.rows).rev() {
            for column in 0..self.columns {
                let glyph = self
                    .tile(CellCoord::new(column, row))
                    .map_or('.', TileKey::glyph);
                output.push(glyph);
            }
            output.push('\n');
        }
        output
    }
}

impl TileSink for TileCanvas {
    fn clear(&mut self) {
        self.tiles.clear();
        self.columns = 0;
        self.rows = 0;
    }

    fn set_cell(&mut self, coord: CellCoord, tile: Option<TileKey>) {
        self.columns = self.columns.max(coord.column() + 1);
        self.rows = self.rows.max(coord.row() + 1);
        match tile {
            Some(tile) => {
                let _ = self.tiles.insert(coord, tile);
            }
            None => {
                let _ = self.tiles.remove(&coord);
            }
        }
    }
}

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors used to fill each tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePalette {
    colors: [Color; 5],
}

impl TilePalette {
    /// Color assigned to `tile`.
    #[must_use]
    pub fn color(&self, tile: TileKey) -> Color {
        self.colors[tile as usize]
    }

    /// Replaces the color assigned to `tile`.
    pub fn set_color(&mut self, tile: TileKey, color: Color) {
        self.colors[tile as usize] = color;
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            colors: [
                Color::from_rgb_u8(92, 168, 64),
                Color::from_rgb_u8(112, 78, 52),
                Color::from_rgb_u8(128, 128, 136),
                Color::from_rgb_u8(176, 224, 240),
                Color::from_rgb_u8(48, 112, 200),
            ],
        }
    }
}

/// Screen-space placement of a grid scaled to fit a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileLayout {
    /// Top-left corner of the grid in screen space.
    pub origin: Vec2,
    /// Side length of one square tile in pixels.
    pub tile_size: f32,
    /// Number of rows laid out, used to flip row zero to the bottom.
    pub rows: u32,
}

impl TileLayout {
    /// Scales a `columns` x `rows` grid to fit `screen`, centred, with square tiles.
    ///
    /// Returns `None` when either the grid or the screen has no area.
    #[must_use]
    pub fn fit(columns: u32, rows: u32, screen: Vec2) -> Option<Self> {
        if columns == 0 || rows == 0 || screen.x <= 0.0 || screen.y <= 0.0 {
            return None;
        }

        let tile_size = (screen.x / columns as f32).min(screen.y / rows as f32);
        let extent = Vec2::new(columns as f32, rows as f32) * tile_size;
        Some(Self {
            origin: (screen - extent) * 0.5,
            tile_size,
            rows,
        })
    }

    /// Top-left corner of the tile at `coord` in screen space.
    #[must_use]
    pub fn tile_origin(&self, coord: CellCoord) -> Vec2 {
        let flipped_row = self.rows.saturating_sub(coord.row() + 1);
        self.origin + Vec2::new(coord.column() as f32, flipped_row as f32) * self.tile_size
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the adapter detected a pause/resume toggle on this frame.
    pub toggle_regeneration: bool,
    /// Whether the adapter detected a request to regenerate immediately.
    pub regenerate_now: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame; air shows through as this color.
    pub clear_color: Color,
    /// Colors used to fill tiles.
    pub palette: TilePalette,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, palette: TilePalette) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            palette,
        }
    }
}

/// Rendering backend capable of presenting Hillscape levels.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_canvas` closure receives the frame delta and the
    /// input captured by the adapter, and may repaint the canvas before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_canvas: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut TileCanvas) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Option<(CellCoord, Option<TileKey>)>>,
    }

    impl TileSink for RecordingSink {
        fn clear(&mut self) {
            self.calls.push(None);
        }

        fn set_cell(&mut self, coord: CellCoord, tile: Option<TileKey>) {
            self.calls.push(Some((coord, tile)));
        }
    }

    #[test]
    fn tile_mapping_is_total_and_air_is_empty() {
        assert_eq!(tile_for(Cell::Air), None);
        for cell in Cell::ALL.into_iter().filter(|cell| *cell != Cell::Air) {
            assert!(tile_for(cell).is_some(), "{cell:?} must map to a tile");
        }
    }

    #[test]
    fn paint_clears_before_setting_every_cell() {
        let grid = Grid::from_rows(&["~.", "#%"]);
        let mut sink = RecordingSink::default();

        paint(&grid, &mut sink);

        assert_eq!(
            sink.calls,
            vec![
                None,
                Some((CellCoord::new(0, 0), Some(TileKey::Mud))),
                Some((CellCoord::new(0, 1), Some(TileKey::Water))),
                Some((CellCoord::new(1, 0), Some(TileKey::Stone))),
                Some((CellCoord::new(1, 1), None)),
            ]
        );
    }

    #[test]
    fn repainting_leaves_no_stale_tiles() {
        let mut canvas = TileCanvas::new();
        paint(&Grid::from_rows(&["###", "###"]), &mut canvas);
        paint(&Grid::from_rows(&["~"]), &mut canvas);

        assert_eq!(canvas.columns(), 1);
        assert_eq!(canvas.rows(), 1);
        assert_eq!(
            canvas.tiles().collect::<Vec<_>>(),
            vec![(CellCoord::new(0, 0), TileKey::Water)]
        );
    }

    #[test]
    fn ascii_rendering_matches_grid_notation() {
        let rows = ["..*..", "\"~~%.", "#####"];
        let mut canvas = TileCanvas::new();
        paint(&Grid::from_rows(&rows), &mut canvas);

        assert_eq!(canvas.render_ascii(), "..*..\n\"~~%.\n#####\n");
    }

    #[test]
    fn layout_fits_and_flips_rows() {
        let layout = TileLayout::fit(4, 2, Vec2::new(400.0, 400.0)).expect("non-empty");

        assert_eq!(layout.tile_size, 100.0);
        assert_eq!(layout.origin, Vec2::new(0.0, 100.0));
        assert_eq!(
            layout.tile_origin(CellCoord::new(0, 0)),
            Vec2::new(0.0, 200.0)
        );
        assert_eq!(
            layout.tile_origin(CellCoord::new(3, 1)),
            Vec2::new(300.0, 100.0)
        );
    }

    #[test]
    fn layout_rejects_empty_areas() {
        assert!(TileLayout::fit(0, 3, Vec2::splat(100.0)).is_none());
        assert!(TileLayout::fit(3, 3, Vec2::ZERO).is_none());
    }

    #[test]
    fn palette_overrides_single_tiles() {
        let mut palette = TilePalette::default();
        let red = Color::from_rgb_u8(255, 0, 0);
        palette.set_color(TileKey::Ice, red);

        assert_eq!(palette.color(TileKey::Ice), red);
        assert_ne!(palette.color(TileKey::Water), red);
    }
}
