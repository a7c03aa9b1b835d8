use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use hillscape_rendering::{Color, TileKey, TilePalette};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Loads a tile palette from the TOML manifest at `path`.
///
/// The manifest must name every tile exactly once:
///
/// ```toml
/// version = 1
///
/// [tiles]
/// Grass = "#5ca840"
/// Mud = "#704e34"
/// Stone = "#808088"
/// Ice = "#b0e0f0"
/// Water = "#3070c8"
/// ```
pub fn load_palette(path: impl AsRef<Path>) -> Result<TilePalette> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read palette manifest at {}", path.display()))?;
    parse_palette(&contents)
        .with_context(|| format!("invalid palette manifest at {}", path.display()))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    tiles: HashMap<String, String>,
}

fn parse_palette(contents: &str) -> Result<TilePalette> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse palette manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported palette manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, value) in manifest.tiles {
        let key = parse_tile_key(&name)
            .with_context(|| format!("unknown tile key `{name}` in manifest"))?;
        let color = parse_hex_color(&value)
            .with_context(|| format!("invalid color `{value}` for {key:?}"))?;
        if resolved.insert(key, color).is_some() {
            bail!("palette manifest contains duplicate entry for {key:?}");
        }
    }

    let mut palette = TilePalette::default();
    for key in TileKey::ALL {
        let Some(color) = resolved.remove(&key) else {
            bail!("palette manifest missing entry for {key:?}");
        };
        palette.set_color(key, color);
    }

    Ok(palette)
}

fn parse_tile_key(name: &str) -> Result<TileKey> {
    TileKey::ALL
        .into_iter()
        .find(|key| key.name() == name)
        .with_context(|| format!("unknown tile key `{name}`"))
}

fn parse_hex_color(value: &str) -> Result<Color> {
    let Some(digits) = value.strip_prefix('#') else {
        bail!("color must start with `#`");
    };
    if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("color must be #rrggbb or #rrggbbaa");
    }

    let channel = |index: usize| -> Result<u8> {
        u8::from_str_radix(&digits[index..index + 2], 16)
            .with_context(|| format!("bad channel in `{value}`"))
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
    let mut color = Color::from_rgb_u8(channel(0)?, channel(2)?, channel(4)?);
    color.alpha = f32::from(alpha) / 255.0;
    Ok(color)
}
