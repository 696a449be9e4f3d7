use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::{ColorSpec, fallback_color_spec};
use crate::structure::{Subaisle, SubaisleId, TileId};

/// Kind of a store map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Entrance,
    Exit,
    #[serde(rename = "ee")]
    EntranceExit,
    Register,
    Product,
    Subaisle,
    Space,
    Block,
    /// A tile type this client does not know about.
    #[serde(rename = "unknown", other)]
    Unrecognized,
}

impl TileType {
    /// Every known tile type, in declaration order.
    pub const ALL: [TileType; 8] = [
        TileType::Entrance,
        TileType::Exit,
        TileType::EntranceExit,
        TileType::Register,
        TileType::Product,
        TileType::Subaisle,
        TileType::Space,
        TileType::Block,
    ];

    /// Human-readable name, as shown in the map legend.
    pub fn name(self) -> &'static str {
        match self {
            TileType::Entrance => "entrance",
            TileType::Exit => "exit",
            TileType::EntranceExit => "entrance + exit",
            TileType::Register => "register",
            TileType::Product => "product",
            TileType::Subaisle => "subaisle",
            TileType::Space => "space",
            TileType::Block => "block",
            TileType::Unrecognized => "unknown",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A map tile in its editable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTile {
    pub id: Option<TileId>,
    pub x: i32,
    pub y: i32,
    pub tile_type: TileType,
    pub subaisle: Option<Subaisle>,
}

impl MapTile {
    pub fn subaisle_id(&self) -> Option<SubaisleId> {
        self.subaisle.as_ref().map(|sa| sa.id)
    }
}

impl From<MapTileDto> for MapTile {
    fn from(dto: MapTileDto) -> Self {
        Self {
            id: dto.id,
            x: dto.x,
            y: dto.y,
            tile_type: dto.tile_type,
            subaisle: dto.subaisle,
        }
    }
}

/// A map tile as exchanged with the server, including its rendered color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTileDto {
    pub id: Option<TileId>,
    pub x: i32,
    pub y: i32,
    pub tile_type: TileType,
    pub subaisle: Option<Subaisle>,
    pub color: Option<String>,
    #[serde(default)]
    pub color_is_light: bool,
}

impl MapTileDto {
    /// Converts an editable tile, painting it with `color`.
    pub fn with_color(tile: &MapTile, color: &ColorSpec) -> Self {
        Self {
            id: tile.id,
            x: tile.x,
            y: tile.y,
            tile_type: tile.tile_type,
            subaisle: tile.subaisle.clone(),
            color: Some(color.color.clone()),
            color_is_light: color.is_light,
        }
    }

    /// Converts an editable tile using the placeholder color.
    pub fn from_map_tile(tile: &MapTile) -> Self {
        Self::with_color(tile, &fallback_color_spec())
    }

    pub fn subaisle_id(&self) -> Option<SubaisleId> {
        self.subaisle.as_ref().map(|sa| sa.id)
    }
}

/// Store map header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDto {
    pub id: Option<i64>,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub date_started: Option<String>,
    #[serde(default)]
    pub date_ended: Option<String>,
}
