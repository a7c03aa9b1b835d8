#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Window adapter for Hillscape built on macroquad.
//!
//! Macroquad is used without its `audio` feature, so the crate builds on
//! hosts that lack ALSA headers.

mod palette;

use std::{collections::VecDeque, time::Duration};

use anyhow::Result;
use glam::Vec2;
use hillscape_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, TileCanvas, TileLayout, TilePalette,
};
use macroquad::input::{is_key_pressed, KeyCode};

pub use palette::load_palette;

/// Keyboard shortcuts polled once per frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `Space` pauses or resumes scheduled regeneration.
    toggle_regeneration: bool,
    /// `R` requests a new level immediately.
    regenerate_now: bool,
    /// `G` toggles the tile outline overlay.
    toggle_outlines: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_regeneration: is_key_pressed(KeyCode::Space),
            regenerate_now: is_key_pressed(KeyCode::R),
            toggle_outlines: is_key_pressed(KeyCode::G),
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            toggle_regeneration: self.toggle_regeneration,
            regenerate_now: self.regenerate_now,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

const REPORT_PERIOD: Duration = Duration::from_secs(1);
const TRAILING_WINDOW: Duration = Duration::from_secs(10);

/// Frames per second since the previous report and over the trailing window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameRate {
    recent: f32,
    trailing: f32,
}

/// Accumulates frame durations on a virtual clock and reports once per period.
#[derive(Debug, Default)]
struct FrameRateMeter {
    clock: Duration,
    last_report: Duration,
    frames_since_report: u32,
    frame_ends: VecDeque<Duration>,
}

impl FrameRateMeter {
    fn tick(&mut self, frame: Duration) -> Option<FrameRate> {
        self.clock += frame;
        self.frames_since_report = self.frames_since_report.saturating_add(1);
        self.frame_ends.push_back(self.clock);

        let window_start = self.clock.saturating_sub(TRAILING_WINDOW);
        while self
            .frame_ends
            .front()
            .is_some_and(|end| *end <= window_start)
        {
            let _ = self.frame_ends.pop_front();
        }

        let period = self.clock - self.last_report;
        if period < REPORT_PERIOD {
            return None;
        }

        // period >= REPORT_PERIOD, so neither span is zero.
        let recent = self.frames_since_report as f32 / period.as_secs_f32();
        let span = self.clock.min(TRAILING_WINDOW);
        let trailing = self.frame_ends.len() as f32 / span.as_secs_f32();
        self.last_report = self.clock;
        self.frames_since_report = 0;
        Some(FrameRate { recent, trailing })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_canvas: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut TileCanvas) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            palette,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 480,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut canvas = TileCanvas::new();
            let mut frame_rate = FrameRateMeter::default();
            let mut show_outlines = false;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }
                if keyboard.toggle_outlines {
                    show_outlines = !show_outlines;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_canvas(frame_dt, keyboard.frame_input(), &mut canvas);

                macroquad::window::clear_background(background);
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_canvas(&canvas, &palette, screen, show_outlines);

                if let Some(rate) = frame_rate.tick(frame_dt).filter(|_| show_fps) {
                    log::info!(
                        "{:.1} frames/s, {:.1} over the last 10 s",
                        rate.recent,
                        rate.trailing
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_canvas(canvas: &TileCanvas, palette: &TilePalette, screen: Vec2, show_outlines: bool) {
    let Some(layout) = TileLayout::fit(canvas.columns(), canvas.rows(), screen) else {
        return;
    };

    for (coord, tile) in canvas.tiles() {
        let origin = layout.tile_origin(coord);
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            layout.tile_size,
            layout.tile_size,
            to_macroquad_color(palette.color(tile)),
        );
    }

    if show_outlines {
        let outline = to_macroquad_color(Color::new(1.0, 1.0, 1.0, 0.15));
        let extent = Vec2::new(canvas.columns() as f32, canvas.rows() as f32) * layout.tile_size;
        for column in 0..=canvas.columns() {
            let x = layout.origin.x + column as f32 * layout.tile_size;
            macroquad::shapes::draw_line(
                x,
                layout.origin.y,
                x,
                layout.origin.y + extent.y,
                1.0,
                outline,
            );
        }
        for row in 0..=canvas.rows() {
            let y = layout.origin.y + row as f32 * layout.tile_size;
            macroquad::shapes::draw_line(
                layout.origin.x,
                y,
                layout.origin.x + extent.x,
                y,
                1.0,
                outline,
            );
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
