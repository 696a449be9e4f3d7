use serde::Serialize;

use crate::color::{ColorMap, ColorSpec, tile_type_to_color};
use crate::structure::{AisleId, AisleStructureEntry, Subaisle, SubaisleId};
use crate::tile::TileType;

pub const AISLES_HEADER: &str = "Aisles";
pub const SPECIAL_TILES_HEADER: &str = "Special tiles";

/// Special tile types listed in the legend, in display order.
pub const LEGEND_SPECIAL_TILES: [TileType; 7] = [
    TileType::Entrance,
    TileType::Exit,
    TileType::EntranceExit,
    TileType::Register,
    TileType::Product,
    TileType::Space,
    TileType::Block,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegendEntryType {
    SectionHeader,
    Aisle,
    Subaisle,
    SpecialTile,
}

/// What a legend entry refers back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LegendRef {
    Aisle(AisleId),
    Subaisle(SubaisleId),
}

/// A row of the map legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub title: String,
    /// Stable identity for the presentation layer.
    pub key: String,
    pub color: Option<ColorSpec>,
    pub id: Option<LegendRef>,
    #[serde(rename = "type")]
    pub entry_type: LegendEntryType,
    pub tile_type: Option<TileType>,
    pub subaisle: Option<Subaisle>,
    pub can_activate: bool,
}

impl LegendEntry {
    fn header(title: &str, key: &str) -> Self {
        Self {
            title: title.to_string(),
            key: key.to_string(),
            color: None,
            id: None,
            entry_type: LegendEntryType::SectionHeader,
            tile_type: None,
            subaisle: None,
            can_activate: true,
        }
    }

    fn aisle(aisle: &AisleStructureEntry) -> Self {
        Self {
            title: aisle.name.clone(),
            key: format!("a{}", aisle.id),
            color: None,
            id: Some(LegendRef::Aisle(aisle.id)),
            entry_type: LegendEntryType::Aisle,
            tile_type: None,
            subaisle: None,
            can_activate: true,
        }
    }

    fn subaisle(sa: &Subaisle, colors: &ColorMap) -> Self {
        Self {
            title: sa.name.clone(),
            key: format!("sa{}", sa.id),
            color: colors.get_or_unknown(sa.id).cloned(),
            id: Some(LegendRef::Subaisle(sa.id)),
            entry_type: LegendEntryType::Subaisle,
            tile_type: Some(TileType::Subaisle),
            subaisle: Some(sa.clone()),
            can_activate: true,
        }
    }

    fn special_tile(tile_type: TileType, colors: &ColorMap) -> Self {
        let text = tile_type.name();
        let key = tile_type_to_color(tile_type);
        Self {
            title: text.to_string(),
            key: text.to_string(),
            color: colors.get_or_unknown(key).cloned(),
            id: None,
            entry_type: LegendEntryType::SpecialTile,
            tile_type: Some(tile_type),
            subaisle: None,
            can_activate: true,
        }
    }
}

/// Builds the map legend: aisles with their subaisles, then special tiles.
///
/// `colors` must come from [`crate::build_color_map`] for the same aisles.
pub fn build_legend(aisles: &[AisleStructureEntry], colors: &ColorMap) -> Vec<LegendEntry> {
    let subaisle_count: usize = aisles.iter().map(|a| a.subaisles.len()).sum();
    let capacity = aisles.len() + subaisle_count + LEGEND_SPECIAL_TILES.len() + 2;
    let mut legend = Vec::with_capacity(capacity);

    if !aisles.is_empty() {
        legend.push(LegendEntry::header(AISLES_HEADER, "h1"));
    }
    for aisle in aisles {
        legend.push(LegendEntry::aisle(aisle));
        for sa in &aisle.subaisles {
            legend.push(LegendEntry::subaisle(sa, colors));
        }
    }

    legend.push(LegendEntry::header(SPECIAL_TILES_HEADER, "h2"));
    legend.extend(
        LEGEND_SPECIAL_TILES
            .iter()
            .map(|&tile_type| LegendEntry::special_tile(tile_type, colors)),
    );

    legend
}
