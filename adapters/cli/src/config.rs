//! Loads generation parameters from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use hillscape_core::GenerationParams;

/// Reads the parameter set at `path`, or the defaults when no path is given.
///
/// Keys missing from the file keep their default values; unknown keys are
/// rejected. The resulting set is validated so a bad file fails at startup
/// rather than on the first cycle.
pub(crate) fn load_params(path: Option<&Path>) -> Result<GenerationParams> {
    let Some(path) = path else {
        return Ok(GenerationParams::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    parse_params(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

fn parse_params(contents: &str) -> Result<GenerationParams> {
    let params: GenerationParams =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hillscape_core::IntRange;

    #[test]
    fn missing_path_yields_defaults() {
        let params = load_params(None).expect("defaults load");

        assert_eq!(params, GenerationParams::default());
    }

    #[test]
    fn partial_files_override_only_named_keys() {
        let params = parse_params(
            r#"
                max_jump_height = 3
                length = { min = 40, max = 40 }

                [lakes]
                water_chance = 1.0
            "#,
        )
        .expect("config should parse");

        assert_eq!(params.max_jump_height, 3);
        assert_eq!(params.length, IntRange::fixed(40));
        assert_eq!(params.lakes.water_chance, 1.0);
        assert_eq!(params.lakes.water_level, 4);
        assert_eq!(params.hills, GenerationParams::default().hills);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_params("max_jump = 3");

        assert!(result.is_err(), "typos must not be silently ignored");
    }

    #[test]
    fn invalid_parameter_sets_are_rejected() {
        let result = parse_params(
            r#"
                [dressing]
                ice_chance = 1.5
            "#,
        );

        let error = result.expect_err("probability above one must fail");
        assert!(format!("{error:#}").contains("dressing.ice_chance"));
    }
}
