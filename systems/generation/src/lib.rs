#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure level generation system.
//!
//! A cycle allocates a fresh grid and runs the passes in a fixed order:
//! floor, hills, reachability clamp, lakes, dressing. Every stochastic choice
//! goes through the injected [`Sampler`], so a fixed seed and parameter set
//! always reproduce the same level.

pub mod base;
pub mod cliffs;
pub mod dressing;
pub mod hills;
pub mod lakes;
mod sampler;

use std::time::Instant;

use hillscape_core::{Command, Event, GenerationParams, Grid, Level, ParamsError};
use log::{info, warn};

pub use sampler::{seed_from_phrase, Sampler, ScriptedSampler, SeededSampler, StreamState};

/// Generation system that owns the random stream across cycles.
#[derive(Debug)]
pub struct LevelGenerator<S = SeededSampler> {
    sampler: S,
}

impl LevelGenerator<SeededSampler> {
    /// Creates a generator backed by a ChaCha stream seeded with `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SeededSampler::from_seed(seed))
    }
}

impl<S: Sampler> LevelGenerator<S> {
    /// Creates a generator drawing from the provided sampler.
    #[must_use]
    pub fn new(sampler: S) -> Self {
        Self { sampler }
    }

    /// Runs one complete generation cycle.
    ///
    /// The parameter set is validated before anything is allocated or drawn;
    /// on error the sampler state is left untouched.
    pub fn generate(&mut self, params: &GenerationParams) -> Result<Level, ParamsError> {
        params.validate()?;
        let sampler = &mut self.sampler;

        let columns = sampler.uniform_int(params.length.min, params.length.max);
        let rows = sampler.uniform_int(params.height.min, params.height.max);
        let ground_thickness =
            sampler.uniform_int(params.ground_thickness.min, params.ground_thickness.max);

        let mut grid = Grid::new(columns, rows);
        base::lay_floor(&mut grid, ground_thickness);
        let _ = hills::raise_hills(&mut grid, ground_thickness, &params.hills, sampler);
        let _ = cliffs::clamp_cliffs(&mut grid, ground_thickness, params.max_jump_height);
        let _ = lakes::carve_lakes(&mut grid, ground_thickness, &params.lakes, sampler);
        let _ = dressing::dress_surface(&mut grid, &params.dressing, sampler);

        Ok(Level::new(grid, ground_thickness))
    }

    /// Consumes `RegenerationDue` events and emits one publish or reject command per cycle.
    ///
    /// Each published cycle is logged with the stream state it started from,
    /// which [`SeededSampler::from_state`] accepts to replay that cycle.
    ///
    /// A cycle that takes longer than its budget is still published, but the
    /// overrun is logged because it would let two cycles overlap.
    pub fn handle(
        &mut self,
        events: &[Event],
        params: &GenerationParams,
        out_commands: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::RegenerationDue { cycle, budget } = event else {
                continue;
            };

            let stream = self
                .sampler
                .stream_state()
                .map_or_else(|| String::from("scripted stream"), |state| state.to_string());
            let started = Instant::now();
            let outcome = self.generate(params);
            let elapsed = started.elapsed();
            if elapsed > *budget {
                warn!(
                    "cycle {} took {elapsed:?}, exceeding its {budget:?} budget",
                    cycle.get()
                );
            }

            match outcome {
                Ok(level) => {
                    info!(
                        "cycle {} generated a {}x{} level in {elapsed:?} from {stream}",
                        cycle.get(),
                        level.grid().columns(),
                        level.grid().rows()
                    );
                    out_commands.push(Command::PublishLevel {
                        cycle: *cycle,
                        level,
                    });
                }
                Err(error) => {
                    warn!("cycle {} rejected: {error}", cycle.get());
                    out_commands.push(Command::RejectCycle {
                        cycle: *cycle,
                        error,
                    });
                }
            }
        }
    }
}
