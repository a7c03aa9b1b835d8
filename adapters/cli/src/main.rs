#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and presents Hillscape levels.

mod config;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use clap::Parser;
use hillscape_rendering::{paint, Color, Presentation, RenderingBackend, TileCanvas, TilePalette};
use hillscape_rendering_macroquad::{load_palette, MacroquadBackend};
use hillscape_system_generation::{seed_from_phrase, LevelGenerator};
use hillscape_world::{query, World};
use log::info;

use self::simulation::Simulation;

/// Generates 2D platformer terrain and redraws it on a fixed cadence.
#[derive(Debug, Parser)]
#[command(name = "hillscape", version, about)]
struct Args {
    /// Seed for the random stream; a random seed is chosen and logged when omitted.
    #[arg(long, conflicts_with = "seed_phrase")]
    seed: Option<u64>,

    /// Phrase hashed into the seed, for memorable replays.
    #[arg(long)]
    seed_phrase: Option<String>,

    /// TOML file overriding the default generation parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds between scheduled regenerations.
    #[arg(long, default_value_t = 2_000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Print levels to stdout instead of opening a window.
    #[arg(long)]
    ascii: bool,

    /// Number of levels printed in ASCII mode.
    #[arg(long, default_value_t = 1, requires = "ascii")]
    cycles: u32,

    /// TOML palette manifest for the window renderer.
    #[arg(long, conflicts_with = "ascii")]
    palette: Option<PathBuf>,

    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,

    /// Render as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,
}

impl Args {
    fn seed(&self) -> u64 {
        match (&self.seed_phrase, self.seed) {
            (Some(phrase), _) => seed_from_phrase(phrase),
            (None, Some(seed)) => seed,
            (None, None) => rand::random(),
        }
    }
}

/// Entry point for the Hillscape command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = config::load_params(args.config.as_deref())?;
    let seed = args.seed();
    info!("generating with seed {seed}");

    let mut simulation = Simulation::new(
        World::with_interval(Duration::from_millis(args.interval_ms)),
        LevelGenerator::from_seed(seed),
        params,
    );

    if args.ascii {
        print_levels(&mut simulation, args.cycles)
    } else {
        present(simulation, &args)
    }
}

fn print_levels(simulation: &mut Simulation, cycles: u32) -> Result<()> {
    let mut canvas = TileCanvas::new();
    for _ in 0..cycles {
        if !simulation.regenerate() {
            bail!("level generation was rejected");
        }
        let Some(level) = simulation.level() else {
            bail!("no level was published");
        };
        paint(level.grid(), &mut canvas);

        let world = simulation.world();
        let cycle = query::published_cycle(world).map_or(0, |cycle| cycle.get());
        println!(
            "cycle {cycle}: {}x{}, floor {}",
            canvas.columns(),
            canvas.rows(),
            level.ground_thickness()
        );
        if let Some(spawn) = query::spawn_cell(world) {
            println!("spawn at column {}, row {}", spawn.column(), spawn.row());
        }
        println!("{}", canvas.render_ascii());
    }
    Ok(())
}

fn present(mut simulation: Simulation, args: &Args) -> Result<()> {
    let palette = match &args.palette {
        Some(path) => load_palette(path)?,
        None => TilePalette::default(),
    };
    let presentation = Presentation::new(
        "Hillscape",
        Color::from_rgb_u8(134, 196, 236),
        palette,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps);

    let mut dirty = simulation.regenerate();
    backend.run(presentation, move |dt, input, canvas| {
        dirty |= simulation.advance(dt, input);
        if !dirty {
            return;
        }
        if let Some(level) = simulation.level() {
            paint(level.grid(), canvas);
        }
        dirty = false;
    })
}
