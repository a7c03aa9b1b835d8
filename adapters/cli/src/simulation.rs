//! Drives the world and the generation system from frame input.

use std::{collections::VecDeque, time::Duration};

use hillscape_core::{Command, Event, GenerationParams, Level};
use hillscape_rendering::FrameInput;
use hillscape_system_generation::LevelGenerator;
use hillscape_world::{self as world, query, World};
use log::warn;

/// Owns the world and the generator, routing commands and events between them.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    generator: LevelGenerator,
    params: GenerationParams,
}

impl Simulation {
    pub(crate) fn new(world: World, generator: LevelGenerator, params: GenerationParams) -> Self {
        Self {
            world,
            generator,
            params,
        }
    }

    /// Requests a cycle right away. Returns whether a new level was published.
    pub(crate) fn regenerate(&mut self) -> bool {
        self.submit(Command::RequestRegeneration)
    }

    /// Applies one frame of input and elapsed time.
    ///
    /// Returns whether a new level was published during the frame.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput) -> bool {
        let mut published = false;
        if input.toggle_regeneration {
            let enabled = !query::is_regeneration_enabled(&self.world);
            published |= self.submit(Command::SetRegenerationEnabled { enabled });
        }
        if input.regenerate_now {
            published |= self.regenerate();
        }
        published |= self.submit(Command::Tick { dt });
        published
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn level(&self) -> Option<&Level> {
        query::level(&self.world)
    }

    fn submit(&mut self, command: Command) -> bool {
        let mut pending = VecDeque::from([command]);
        let mut published = false;

        while let Some(command) = pending.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);

            for event in &events {
                match event {
                    Event::LevelPublished { .. } => published = true,
                    Event::GenerationRejected { cycle, error } => {
                        warn!("keeping previous level, cycle {} failed: {error}", cycle.get());
                    }
                    _ => {}
                }
            }

            let mut commands = Vec::new();
            self.generator.handle(&events, &self.params, &mut commands);
            pending.extend(commands);
        }

        published
    }
}
