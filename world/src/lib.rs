#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Hillscape.
//!
//! The world owns the published level and the regeneration clock. It never
//! builds levels itself: it announces when a cycle is due and accepts the
//! finished level back by ownership, replacing the previous one wholesale.

use std::time::Duration;

use hillscape_core::{Command, CycleId, Event, Level, DEFAULT_REGENERATION_INTERVAL};
use log::{debug, info};

/// Represents the authoritative Hillscape world state.
#[derive(Debug)]
pub struct World {
    interval: Duration,
    accumulator: Duration,
    enabled: bool,
    next_cycle: CycleId,
    in_flight: Option<CycleId>,
    published: Option<Published>,
}

#[derive(Debug)]
struct Published {
    cycle: CycleId,
    level: Level,
}

impl World {
    /// Creates a world that regenerates every [`DEFAULT_REGENERATION_INTERVAL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_REGENERATION_INTERVAL)
    }

    /// Creates a world that regenerates after every `interval` of ticked time.
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
            enabled: true,
            next_cycle: CycleId::new(0),
            in_flight: None,
            published: None,
        }
    }

    fn begin_cycle(&mut self, out_events: &mut Vec<Event>) {
        if let Some(cycle) = self.in_flight {
            debug!("cycle {} still in flight, not starting another", cycle.get());
            return;
        }

        let cycle = self.next_cycle;
        self.next_cycle = cycle.next();
        self.in_flight = Some(cycle);
        out_events.push(Event::RegenerationDue {
            cycle,
            budget: self.interval,
        });
    }

    fn finish_cycle(&mut self, cycle: CycleId) -> bool {
        if self.in_flight != Some(cycle) {
            debug!("ignoring stale result for cycle {}", cycle.get());
            return false;
        }
        self.in_flight = None;
        true
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if !world.enabled {
                return;
            }

            world.accumulator = world.accumulator.saturating_add(dt);
            if world.accumulator < world.interval {
                return;
            }
            if world.in_flight.is_some() {
                world.accumulator = world.interval;
                return;
            }
            world.accumulator -= world.interval;
            world.begin_cycle(out_events);
        }
        Command::RequestRegeneration => world.begin_cycle(out_events),
        Command::SetRegenerationEnabled { enabled } => {
            if world.enabled != enabled {
                world.enabled = enabled;
                info!(
                    "periodic regeneration {}",
                    if enabled { "resumed" } else { "paused" }
                );
                out_events.push(Event::RegenerationToggled { enabled });
            }
        }
        Command::PublishLevel { cycle, level } => {
            if !world.finish_cycle(cycle) {
                return;
            }
            let columns = level.grid().columns();
            let rows = level.grid().rows();
            world.published = Some(Published { cycle, level });
            out_events.push(Event::LevelPublished {
                cycle,
                columns,
                rows,
            });
        }
        Command::RejectCycle { cycle, error } => {
            if world.finish_cycle(cycle) {
                out_events.push(Event::GenerationRejected { cycle, error });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use hillscape_core::{CellCoord, CycleId, Level};

    /// Provides read-only access to the most recently published level.
    #[must_use]
    pub fn level(world: &World) -> Option<&Level> {
        world.published.as_ref().map(|published| &published.level)
    }

    /// Cycle that produced the published level, if any.
    #[must_use]
    pub fn published_cycle(world: &World) -> Option<CycleId> {
        world.published.as_ref().map(|published| published.cycle)
    }

    /// Reports whether the regeneration clock is running.
    #[must_use]
    pub fn is_regeneration_enabled(world: &World) -> bool {
        world.enabled
    }

    /// Cycle currently being generated, if any.
    #[must_use]
    pub fn cycle_in_flight(world: &World) -> Option<CycleId> {
        world.in_flight
    }

    /// Time left before the clock announces the next cycle.
    #[must_use]
    pub fn time_until_regeneration(world: &World) -> Duration {
        world.interval.saturating_sub(world.accumulator)
    }

    /// Row a player standing in `column` would occupy: the first open row
    /// above the column's topmost terrain cell.
    ///
    /// Returns `None` without a published level, outside the grid, or when
    /// the terrain reaches the top row.
    #[must_use]
    pub fn surface_row(world: &World, column: u32) -> Option<u32> {
        let grid = level(world)?.grid();
        let cells = grid.column(column);
        let top = cells.iter().rposition(|cell| cell.is_terrain())?;
        let row = top as u32 + 1;
        (row < grid.rows()).then_some(row)
    }

    /// Leftmost cell a player can be placed on in the published level.
    #[must_use]
    pub fn spawn_cell(world: &World) -> Option<CellCoord> {
        let columns = level(world)?.grid().columns();
        (0..columns).find_map(|column| {
            surface_row(world, column).map(|row| CellCoord::new(column, row))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hillscape_core::{CellCoord, Grid, ParamsError};

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn due_cycles(events: &[Event]) -> Vec<CycleId> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::RegenerationDue { cycle, .. } => Some(*cycle),
                _ => None,
            })
            .collect()
    }

    fn publish(world: &mut World, cycle: CycleId, rows: &[&str]) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PublishLevel {
                cycle,
                level: Level::new(Grid::from_rows(rows), 1),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn cycle_becomes_due_once_interval_elapses() {
        let mut world = World::with_interval(Duration::from_millis(100));

        assert!(due_cycles(&tick(&mut world, 60)).is_empty());
        assert_eq!(due_cycles(&tick(&mut world, 60)), vec![CycleId::new(0)]);
        assert_eq!(
            query::time_until_regeneration(&world),
            Duration::from_millis(80)
        );
    }

    #[test]
    fn cycles_never_overlap() {
        let mut world = World::with_interval(Duration::from_millis(100));

        assert_eq!(due_cycles(&tick(&mut world, 100)).len(), 1);
        assert!(due_cycles(&tick(&mut world, 500)).is_empty());

        let mut events = Vec::new();
        apply(&mut world, Command::RequestRegeneration, &mut events);
        assert!(events.is_empty(), "manual request waits for the running cycle");

        let _ = publish(&mut world, CycleId::new(0), &["#"]);
        assert_eq!(due_cycles(&tick(&mut world, 1)), vec![CycleId::new(1)]);
    }

    #[test]
    fn paused_clock_does_not_accumulate() {
        let mut world = World::with_interval(Duration::from_millis(100));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetRegenerationEnabled { enabled: false },
            &mut events,
        );

        assert_eq!(events, vec![Event::RegenerationToggled { enabled: false }]);
        assert!(due_cycles(&tick(&mut world, 1_000)).is_empty());
        assert!(!query::is_regeneration_enabled(&world));

        events.clear();
        apply(
            &mut world,
            Command::SetRegenerationEnabled { enabled: true },
            &mut events,
        );
        assert_eq!(due_cycles(&tick(&mut world, 100)), vec![CycleId::new(0)]);
    }

    #[test]
    fn publish_replaces_level_wholesale() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::RequestRegeneration, &mut events);

        let events = publish(&mut world, CycleId::new(0), &["..", "##"]);

        assert_eq!(
            events,
            vec![Event::LevelPublished {
                cycle: CycleId::new(0),
                columns: 2,
                rows: 2,
            }]
        );
        assert_eq!(query::published_cycle(&world), Some(CycleId::new(0)));
        assert_eq!(
            query::level(&world).map(|level| level.grid().columns()),
            Some(2)
        );
    }

    #[test]
    fn rejected_cycle_keeps_previous_level() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::RequestRegeneration, &mut events);
        let _ = publish(&mut world, CycleId::new(0), &["..", "##"]);

        events.clear();
        apply(&mut world, Command::RequestRegeneration, &mut events);
        events.clear();
        apply(
            &mut world,
            Command::RejectCycle {
                cycle: CycleId::new(1),
                error: ParamsError::MissingFloor,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::GenerationRejected {
                cycle: CycleId::new(1),
                error: ParamsError::MissingFloor,
            }]
        );
        assert_eq!(query::published_cycle(&world), Some(CycleId::new(0)));
        assert_eq!(query::cycle_in_flight(&world), None);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut world = World::new();
        let events = publish(&mut world, CycleId::new(9), &["#"]);

        assert!(events.is_empty());
        assert!(query::level(&world).is_none());
    }

    #[test]
    fn surface_queries_find_standing_room() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::RequestRegeneration, &mut events);
        let _ = publish(
            &mut world,
            CycleId::new(0),
            &[
                "\"...", //
                "#.~.", //
                "#\"#\"", //
            ],
        );

        assert_eq!(query::surface_row(&world, 0), None, "terrain reaches the top");
        assert_eq!(query::surface_row(&world, 1), Some(1));
        assert_eq!(query::surface_row(&world, 2), Some(1), "water is not standable");
        assert_eq!(query::surface_row(&world, 9), None);
        assert_eq!(query::spawn_cell(&world), Some(CellCoord::new(1, 1)));
    }
}
