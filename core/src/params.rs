//! Tunable parameter set read by every generation pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive integer range sampled uniformly by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    /// Smallest value that may be drawn.
    pub min: u32,
    /// Largest value that may be drawn.
    pub max: u32,
}

impl IntRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Creates a range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: u32) -> Self {
        Self::new(value, value)
    }

    fn check(self, field: &'static str) -> Result<(), ParamsError> {
        if self.min > self.max {
            return Err(ParamsError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Complete parameter set consumed by a single generation cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationParams {
    /// Number of columns drawn per cycle.
    pub length: IntRange,
    /// Number of rows drawn per cycle.
    pub height: IntRange,
    /// Number of guaranteed solid rows at the bottom of the grid.
    pub ground_thickness: IntRange,
    /// Tallest cliff a player can climb from the column to its left.
    pub max_jump_height: u32,
    /// Controls hill placement and silhouettes.
    pub hills: HillShaping,
    /// Controls lake detection and filling.
    pub lakes: LakeShaping,
    /// Controls grass and ice dressing.
    pub dressing: DressingShaping,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            length: IntRange::new(60, 90),
            height: IntRange::new(14, 20),
            ground_thickness: IntRange::fixed(2),
            max_jump_height: 2,
            hills: HillShaping::default(),
            lakes: LakeShaping::default(),
            dressing: DressingShaping::default(),
        }
    }
}

/// Hill formation tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HillShaping {
    /// Column the hill cursor starts from before the first gap is drawn.
    pub start_column: u32,
    /// Columns left empty between the end of one hill and the start of the next.
    pub gap: IntRange,
    /// Base width of a hill.
    pub length: IntRange,
    /// Absolute row (exclusive) a hill rises to.
    pub height: IntRange,
    /// Probability that a hill cell is mud rather than stone.
    pub mud_chance: f32,
    /// Probability that a hill's left edge steps right after a row.
    pub indent_chance: f32,
    /// Columns the left edge moves by when it steps.
    pub indent_step: IntRange,
    /// Probability that a hill's width shrinks after a row.
    pub shrink_chance: f32,
    /// Columns removed from the width when it shrinks.
    pub shrink_step: IntRange,
}

impl Default for HillShaping {
    fn default() -> Self {
        Self {
            start_column: 5,
            gap: IntRange::new(1, 10),
            length: IntRange::new(5, 19),
            height: IntRange::new(3, 9),
            mud_chance: 0.75,
            indent_chance: 0.8,
            indent_step: IntRange::new(1, 3),
            shrink_chance: 0.7,
            shrink_step: IntRange::new(1, 2),
        }
    }
}

/// Lake carving tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LakeShaping {
    /// Rows below this one (and above the floor) are scanned for lakes.
    pub water_level: u32,
    /// Longest air run that may be turned into water.
    pub max_water_length: u32,
    /// Probability that an eligible run is filled.
    pub water_chance: f32,
    /// Number of water rows directly below a column that disqualify it.
    pub stack_depth: u32,
}

impl Default for LakeShaping {
    fn default() -> Self {
        Self {
            water_level: 4,
            max_water_length: 8,
            water_chance: 0.7,
            stack_depth: 2,
        }
    }
}

/// Surface dressing tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DressingShaping {
    /// Probability that exposed mud near water freezes into ice.
    pub ice_chance: f32,
    /// Columns inspected on each side when looking for water.
    pub ice_window: u32,
}

impl Default for DressingShaping {
    fn default() -> Self {
        Self {
            ice_chance: 0.7,
            ice_window: 4,
        }
    }
}

impl GenerationParams {
    /// Checks every range and threshold before any allocation takes place.
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.length.check("length")?;
        self.height.check("height")?;
        self.ground_thickness.check("ground_thickness")?;
        self.hills.gap.check("hills.gap")?;
        self.hills.length.check("hills.length")?;
        self.hills.height.check("hills.height")?;
        self.hills.indent_step.check("hills.indent_step")?;
        self.hills.shrink_step.check("hills.shrink_step")?;

        if self.length.min == 0 {
            return Err(ParamsError::EmptyDimension { field: "length" });
        }
        if self.height.min == 0 {
            return Err(ParamsError::EmptyDimension { field: "height" });
        }
        if self.ground_thickness.min == 0 {
            return Err(ParamsError::MissingFloor);
        }
        if self.ground_thickness.max >= self.height.min {
            return Err(ParamsError::FloorExceedsHeight {
                ground_thickness: self.ground_thickness.max,
                height: self.height.min,
            });
        }
        if self.ground_thickness.max >= self.lakes.water_level {
            return Err(ParamsError::FloorAboveWaterLevel {
                ground_thickness: self.ground_thickness.max,
                water_level: self.lakes.water_level,
            });
        }

        check_probability("hills.mud_chance", self.hills.mud_chance)?;
        check_probability("hills.indent_chance", self.hills.indent_chance)?;
        check_probability("hills.shrink_chance", self.hills.shrink_chance)?;
        check_probability("lakes.water_chance", self.lakes.water_chance)?;
        check_probability("dressing.ice_chance", self.dressing.ice_chance)?;
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f32) -> Result<(), ParamsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamsError::ProbabilityOutOfRange { field, value })
    }
}

/// Configuration errors surfaced before a grid is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ParamsError {
    /// A range's lower bound exceeds its upper bound.
    #[error("{field} range is inverted (min {min} > max {max})")]
    InvertedRange {
        /// Name of the offending parameter.
        field: &'static str,
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// A grid dimension could resolve to zero cells.
    #[error("{field} may resolve to zero cells")]
    EmptyDimension {
        /// Name of the offending parameter.
        field: &'static str,
    },
    /// The guaranteed floor may be zero rows thick.
    #[error("ground thickness must be at least one row")]
    MissingFloor,
    /// The floor may fill the whole grid.
    #[error("ground thickness {ground_thickness} leaves no open row in a grid {height} rows tall")]
    FloorExceedsHeight {
        /// Largest configured floor thickness.
        ground_thickness: u32,
        /// Smallest configured grid height.
        height: u32,
    },
    /// The floor reaches the lake scan ceiling, leaving no rows to carve.
    #[error("ground thickness {ground_thickness} reaches water level {water_level}")]
    FloorAboveWaterLevel {
        /// Largest configured floor thickness.
        ground_thickness: u32,
        /// Configured lake scan ceiling.
        water_level: u32,
    },
    /// A probability lies outside `[0, 1]`.
    #[error("{field} must lie within [0, 1] (received {value})")]
    ProbabilityOutOfRange {
        /// Name of the offending parameter.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(GenerationParams::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_range_is_rejected_with_field_name() {
        let mut params = GenerationParams::default();
        params.hills.gap = IntRange::new(9, 3);

        assert_eq!(
            params.validate(),
            Err(ParamsError::InvertedRange {
                field: "hills.gap",
                min: 9,
                max: 3,
            })
        );
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut params = GenerationParams::default();
        params.length = IntRange::new(0, 10);

        assert_eq!(
            params.validate(),
            Err(ParamsError::EmptyDimension { field: "length" })
        );
    }

    #[test]
    fn floor_reaching_water_level_is_rejected() {
        let mut params = GenerationParams::default();
        params.ground_thickness = IntRange::new(2, 4);
        params.lakes.water_level = 4;

        assert_eq!(
            params.validate(),
            Err(ParamsError::FloorAboveWaterLevel {
                ground_thickness: 4,
                water_level: 4,
            })
        );
    }

    #[test]
    fn floor_filling_grid_is_rejected() {
        let mut params = GenerationParams::default();
        params.height = IntRange::new(3, 20);
        params.ground_thickness = IntRange::fixed(3);
        params.lakes.water_level = 6;

        assert!(matches!(
            params.validate(),
            Err(ParamsError::FloorExceedsHeight { .. })
        ));
    }

    #[test]
    fn probabilities_outside_unit_interval_are_rejected() {
        let mut params = GenerationParams::default();
        params.dressing.ice_chance = 1.5;
        assert!(matches!(
            params.validate(),
            Err(ParamsError::ProbabilityOutOfRange {
                field: "dressing.ice_chance",
                ..
            })
        ));

        params.dressing.ice_chance = f32::NAN;
        assert!(params.validate().is_err(), "NaN must not pass validation");
    }

    #[test]
    fn errors_render_human_readable_messages() {
        let error = ParamsError::InvertedRange {
            field: "height",
            min: 5,
            max: 2,
        };
        assert_eq!(error.to_string(), "height range is inverted (min 5 > max 2)");
    }
}
