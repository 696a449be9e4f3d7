use std::fmt::Write;

use aislemap_core::{
    ColorMap, ColorSpec, LegendEntry, LegendEntryType, LocatedTile, MapTile, MapTileDto,
    ProductToLocate, get_color_for_tile,
};

use crate::error::ToolError;

/// Two-cell terminal swatch in `spec`'s color, or blanks if it is not `#rrggbb`.
pub fn swatch(spec: &ColorSpec) -> String {
    match parse_hex(&spec.color) {
        Some((r, g, b)) => format!("\x1b[48;2;{r};{g};{b}m  \x1b[0m"),
        None => "  ".to_string(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn legend(entries: &[LegendEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = match entry.entry_type {
            LegendEntryType::SectionHeader => writeln!(out, "{}", entry.title),
            LegendEntryType::Aisle => writeln!(out, "  {}", entry.title),
            LegendEntryType::Subaisle | LegendEntryType::SpecialTile => {
                let indent = match entry.entry_type {
                    LegendEntryType::Subaisle => "    ",
                    _ => "  ",
                };
                match &entry.color {
                    Some(color) => {
                        let title = &entry.title;
                        writeln!(out, "{indent}{} {title} {}", swatch(color), color.color)
                    }
                    None => writeln!(out, "{indent}   {}", entry.title),
                }
            }
        };
    }
    out
}

pub fn tiles<'a>(
    tiles: impl Iterator<Item = &'a MapTileDto>,
    colors: &ColorMap,
) -> Result<String, ToolError> {
    let mut out = String::new();
    for dto in tiles {
        let tile = MapTile::from(dto.clone());
        let color = get_color_for_tile(colors, &tile)?;
        let id = match dto.id {
            Some(id) => id.to_string(),
            None => "-".to_string(),
        };
        let subaisle = dto.subaisle.as_ref().map_or("", |sa| sa.name.as_str());
        let fresh = dto.color.as_deref() == Some(color.color.as_str());
        let stale = if fresh { "" } else { " (stale)" };
        let _ = writeln!(
            out,
            "{id:>6} ({:>3},{:>3}) {} {:<16} {:<20} {}{stale}",
            tile.x,
            tile.y,
            swatch(color),
            tile.tile_type.name(),
            subaisle,
            color.color,
        );
    }
    Ok(out)
}

fn located_tile(tile: &LocatedTile) -> String {
    let id = match tile.id() {
        Some(id) => id.to_string(),
        None => "new".to_string(),
    };
    let (x, y) = match tile {
        LocatedTile::Wire(dto) => (dto.x, dto.y),
        LocatedTile::Live(tile) => (tile.x, tile.y),
    };
    format!("tile {id} at ({x},{y})")
}

pub fn products(products: &[ProductToLocate]) -> String {
    let mut out = String::new();
    for product in products {
        let location = match &product.location {
            None => "no location".to_string(),
            Some(loc) => {
                let mut parts = Vec::new();
                if let Some(sa) = &loc.subaisle {
                    parts.push(format!("{} / {}", sa.parent.name, sa.name));
                }
                if let Some(tile) = &loc.tile {
                    parts.push(located_tile(tile));
                }
                if loc.is_auto {
                    parts.push("auto".to_string());
                }
                if parts.is_empty() {
                    "empty location".to_string()
                } else {
                    parts.join(", ")
                }
            }
        };
        let _ = writeln!(
            out,
            "{:>6}  {:<32} {:<20} {}",
            product.id, product.name, product.vendor, location
        );
    }
    out
}
