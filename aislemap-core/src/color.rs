use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::structure::{AisleStructureEntry, Subaisle, SubaisleId};
use crate::tile::{MapTile, MapTileDto, TileType};

/// Error type for color lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The map has no entry for [`ColorKey::Unknown`], so it was not built by
    /// [`build_color_map`].
    #[error("invalid color map: no entry for the unknown color key")]
    InvalidColorMap,
}

/// Special coloring categories that are not tied to a subaisle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorKey {
    Unknown,
    Entrance,
    Exit,
    EntranceExit,
    Register,
    Product,
    Subaisle,
    Block,
    Space,
}

impl ColorKey {
    pub const ALL: [ColorKey; 9] = [
        ColorKey::Unknown,
        ColorKey::Entrance,
        ColorKey::Exit,
        ColorKey::EntranceExit,
        ColorKey::Register,
        ColorKey::Product,
        ColorKey::Subaisle,
        ColorKey::Block,
        ColorKey::Space,
    ];

    /// Legacy numeric sentinel used by older clients that key colors by number.
    pub fn sentinel(self) -> i64 {
        match self {
            ColorKey::Unknown => -1,
            ColorKey::Entrance => -2,
            ColorKey::Exit => -3,
            ColorKey::EntranceExit => -4,
            ColorKey::Register => -5,
            ColorKey::Product => -6,
            ColorKey::Subaisle => -7,
            ColorKey::Block => -8,
            ColorKey::Space => 0,
        }
    }
}

/// Key of a [`ColorMap`] entry: either a special category or a subaisle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorMapKey {
    Special(ColorKey),
    Subaisle(SubaisleId),
}

impl From<ColorKey> for ColorMapKey {
    fn from(key: ColorKey) -> Self {
        ColorMapKey::Special(key)
    }
}

impl From<SubaisleId> for ColorMapKey {
    fn from(id: SubaisleId) -> Self {
        ColorMapKey::Subaisle(id)
    }
}

/// A display color and whether it needs a dark foreground.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSpec {
    pub color: String,
    pub is_light: bool,
}

impl ColorSpec {
    pub fn new(color: impl Into<String>, is_light: bool) -> Self {
        Self {
            color: color.into(),
            is_light,
        }
    }

    /// Foreground color readable on top of this color.
    pub fn foreground(&self) -> &'static str {
        if self.is_light { "black" } else { "white" }
    }
}

const PLACEHOLDER_COLOR: &str = "#ff0000";

/// Color given to tiles before the store structure is known.
pub fn fallback_color_spec() -> ColorSpec {
    ColorSpec::new(PLACEHOLDER_COLOR, true)
}

/// The fixed palette for special categories.
pub fn basic_color_specs() -> [(ColorKey, ColorSpec); 9] {
    [
        (ColorKey::Entrance, ColorSpec::new("#3BF5C0", true)),
        (ColorKey::Exit, ColorSpec::new("#68DE2A", true)),
        (ColorKey::EntranceExit, ColorSpec::new("#74F52F", true)),
        (ColorKey::Register, ColorSpec::new("#2A66DE", true)),
        (ColorKey::Product, ColorSpec::new("#AF30FF", true)),
        (ColorKey::Space, ColorSpec::new("#E9ECEF", true)),
        // Subaisle tiles are normally colored per subaisle.
        (ColorKey::Subaisle, ColorSpec::new("#495057", false)),
        (ColorKey::Block, ColorSpec::new("#000000", false)),
        (ColorKey::Unknown, ColorSpec::new("#495057", false)),
    ]
}

/// Colors for special categories and subaisles.
///
/// Immutable once built; share it freely between readers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    entries: IndexMap<ColorMapKey, ColorSpec>,
}

impl ColorMap {
    /// Creates an empty map. Prefer [`build_color_map`] for real use.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<ColorMapKey>, spec: ColorSpec) -> Option<ColorSpec> {
        self.entries.insert(key.into(), spec)
    }

    pub fn get(&self, key: impl Into<ColorMapKey>) -> Option<&ColorSpec> {
        self.entries.get(&key.into())
    }

    pub fn contains(&self, key: impl Into<ColorMapKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Looks up `key`, falling back to the unknown color.
    pub fn get_or_unknown(&self, key: impl Into<ColorMapKey>) -> Option<&ColorSpec> {
        self.get(key).or_else(|| self.get(ColorKey::Unknown))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColorMapKey, &ColorSpec)> {
        self.entries.iter()
    }
}

/// Maps a tile type to its special color category.
pub fn tile_type_to_color(tile_type: TileType) -> ColorKey {
    match tile_type {
        TileType::Entrance => ColorKey::Entrance,
        TileType::Exit => ColorKey::Exit,
        TileType::EntranceExit => ColorKey::EntranceExit,
        TileType::Register => ColorKey::Register,
        TileType::Product => ColorKey::Product,
        TileType::Subaisle => ColorKey::Subaisle,
        TileType::Space => ColorKey::Space,
        TileType::Block => ColorKey::Block,
        TileType::Unrecognized => ColorKey::Unknown,
    }
}

/// Builds the color map for a store structure.
///
/// Subaisle colors are derived from `id + name`, so they are stable across
/// runs. Two subaisles may still end up with near-identical colors, and a
/// generated color may resemble one from the fixed palette; nothing checks
/// for that.
pub fn build_color_map(aisles: &[AisleStructureEntry]) -> ColorMap {
    let mut colors = ColorMap::new();
    for (key, spec) in basic_color_specs() {
        colors.insert(key, spec);
    }
    for aisle in aisles {
        for sa in &aisle.subaisles {
            colors.insert(sa.id, subaisle_color(sa));
        }
    }
    debug!(entries = colors.len(), "built color map");
    colors
}

/// Deterministic color for a subaisle.
pub fn subaisle_color(subaisle: &Subaisle) -> ColorSpec {
    unique_color(&format!("{}{}", subaisle.id, subaisle.name))
}

const SATURATION: (u64, u64) = (50, 55);
const LIGHTNESS: (u64, u64) = (50, 60);
const LIGHT_BRIGHTNESS_THRESHOLD: u32 = 130;

/// Derives a pleasant, stable color from arbitrary text.
pub fn unique_color(value: &str) -> ColorSpec {
    let digest = blake3::hash(value.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    let hash = u64::from_le_bytes(head);

    let hue = (hash % 360) as f64;
    let saturation = bounded(hash, SATURATION) as f64 / 100.0;
    let lightness = bounded(hash, LIGHTNESS) as f64 / 100.0;
    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);

    let brightness = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    ColorSpec::new(
        format!("#{r:02x}{g:02x}{b:02x}"),
        brightness >= LIGHT_BRIGHTNESS_THRESHOLD,
    )
}

fn bounded(hash: u64, (min, max): (u64, u64)) -> u64 {
    min + hash % (max - min)
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// Resolves the display color of a tile.
///
/// Subaisle tiles are looked up by subaisle, others by tile type. Misses fall
/// back to the unknown color; a map without one is rejected.
pub fn get_color_for_tile<'a>(
    colors: &'a ColorMap,
    tile: &MapTile,
) -> Result<&'a ColorSpec, ColorError> {
    let key = match tile.subaisle_id() {
        Some(id) => ColorMapKey::Subaisle(id),
        None => ColorMapKey::Special(tile_type_to_color(tile.tile_type)),
    };
    colors.get_or_unknown(key).ok_or_else(|| {
        warn!(?key, "color map has no unknown color entry");
        ColorError::InvalidColorMap
    })
}

/// Inline CSS for an element painted with `spec`.
pub fn color_css(spec: &ColorSpec) -> String {
    format!(
        "background-color:{};color:{}",
        spec.color,
        spec.foreground()
    )
}

pub fn color_css_for_tile(colors: &ColorMap, tile: &MapTile) -> Result<String, ColorError> {
    get_color_for_tile(colors, tile).map(color_css)
}

/// Converts a tile to its wire form, painted from `colors`.
///
/// Without a color map the placeholder color is used.
pub fn tile_to_map_tile_dto_with_color(
    tile: &MapTile,
    colors: Option<&ColorMap>,
) -> Result<MapTileDto, ColorError> {
    match colors {
        None => Ok(MapTileDto::from_map_tile(tile)),
        Some(colors) => {
            let color = get_color_for_tile(colors, tile)?;
            Ok(MapTileDto::with_color(tile, color))
        }
    }
}

/// Repaints server tiles from the current store structure.
pub fn recolor_tiles(
    tiles: &[MapTileDto],
    colors: &ColorMap,
) -> Result<Vec<MapTileDto>, ColorError> {
    tiles
        .iter()
        .map(|dto| {
            let tile = MapTile::from(dto.clone());
            tile_to_map_tile_dto_with_color(&tile, Some(colors))
        })
        .collect()
}
