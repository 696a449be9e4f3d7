use indexmap::IndexMap;

use crate::api::{MapSaveRequest, ProductGroupsGetResponse};
use crate::color::{ColorError, ColorMap, build_color_map, recolor_tiles};
use crate::legend::{LegendEntry, build_legend};
use crate::structure::{AisleStructureEntry, Subaisle, SubaisleId, TileId};
use crate::tile::{MapDto, MapTileDto};

/// Store structure and map for one point in time, indexed by id.
///
/// Owns the data fetched from the server; everything else refers into it by
/// id.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    map: Option<MapDto>,
    tiles: IndexMap<TileId, MapTileDto>,
    unsaved_tiles: Vec<MapTileDto>,
    subaisles: IndexMap<SubaisleId, Subaisle>,
    aisles: Vec<AisleStructureEntry>,
    colors: ColorMap,
}

impl StoreLayout {
    pub fn new(
        map: Option<MapDto>,
        tiles: Vec<MapTileDto>,
        aisles: Vec<AisleStructureEntry>,
    ) -> Self {
        let mut indexed = IndexMap::new();
        let mut unsaved_tiles = Vec::new();
        for tile in tiles {
            match tile.id {
                Some(id) => {
                    indexed.insert(id, tile);
                }
                None => unsaved_tiles.push(tile),
            }
        }

        let subaisles = aisles
            .iter()
            .flat_map(|a| a.subaisles.iter())
            .map(|sa| (sa.id, sa.clone()))
            .collect();
        let colors = build_color_map(&aisles);

        Self {
            map,
            tiles: indexed,
            unsaved_tiles,
            subaisles,
            aisles,
            colors,
        }
    }

    pub fn from_groups(groups: ProductGroupsGetResponse) -> Self {
        let mut layout = Self::new(groups.map, groups.tiles, groups.aisle_structure);
        // Hidden subaisles are missing from the structure but may still be referenced.
        for sa in groups.subaisles {
            layout.subaisles.entry(sa.id).or_insert(sa);
        }
        layout
    }

    pub fn map(&self) -> Option<&MapDto> {
        self.map.as_ref()
    }

    pub fn aisles(&self) -> &[AisleStructureEntry] {
        &self.aisles
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        build_legend(&self.aisles, &self.colors)
    }

    pub fn tile(&self, id: TileId) -> Option<&MapTileDto> {
        self.tiles.get(&id)
    }

    pub fn subaisle(&self, id: SubaisleId) -> Option<&Subaisle> {
        self.subaisles.get(&id)
    }

    /// All tiles, saved ones first.
    pub fn tiles(&self) -> impl Iterator<Item = &MapTileDto> {
        self.tiles.values().chain(self.unsaved_tiles.iter())
    }

    /// Builds a map save request with every tile repainted from the current
    /// structure. Returns `None` when the store has no map.
    pub fn recolored_map(&self, date: String) -> Result<Option<MapSaveRequest>, ColorError> {
        let Some(map) = &self.map else {
            return Ok(None);
        };
        let tiles: Vec<MapTileDto> = self.tiles().cloned().collect();
        Ok(Some(MapSaveRequest {
            map: map.clone(),
            tiles: recolor_tiles(&tiles, &self.colors)?,
            date,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Aisle;
    use crate::tile::TileType;

    fn tile(id: Option<i64>, tile_type: TileType, subaisle: Option<Subaisle>) -> MapTileDto {
        MapTileDto {
            id: id.map(TileId),
            x: 0,
            y: 0,
            tile_type,
            subaisle,
            color: None,
            color_is_light: false,
        }
    }

    fn groups() -> ProductGroupsGetResponse {
        let aisle = Aisle::new(1, "Cold");
        let milk = Subaisle::new(10, "Milk", aisle.clone());
        let mut hidden = Subaisle::new(11, "Old stock", aisle.clone());
        hidden.visible = false;
        ProductGroupsGetResponse {
            map: Some(MapDto {
                id: Some(1),
                width: 4,
                height: 4,
                date_started: None,
                date_ended: None,
            }),
            tiles: vec![
                tile(Some(1), TileType::Subaisle, Some(milk.clone())),
                tile(Some(2), TileType::Register, None),
                tile(None, TileType::Block, None),
            ],
            category_structure: vec![],
            aisle_structure: vec![AisleStructureEntry::from_aisle(&aisle, vec![milk])],
            subaisles: vec![hidden],
        }
    }

    #[test]
    fn indexes_tiles_and_subaisles() {
        let layout = StoreLayout::from_groups(groups());
        let register = layout.tile(TileId(2)).map(|t| t.tile_type);
        assert_eq!(register, Some(TileType::Register));
        assert!(layout.tile(TileId(3)).is_none());
        assert_eq!(layout.tiles().count(), 3);
        assert!(layout.subaisle(SubaisleId(10)).is_some());
        assert!(layout.subaisle(SubaisleId(11)).is_some());
        assert_eq!(layout.legend().len(), 1 + 1 + 1 + 1 + 7);
    }

    #[test]
    fn recolored_map_paints_every_tile() {
        let layout = StoreLayout::from_groups(groups());
        let request = layout.recolored_map("d".to_string()).unwrap().unwrap();
        assert_eq!(request.tiles.len(), 3);
        assert!(request.tiles.iter().all(|t| t.color.is_some()));
        assert_eq!(
            request.tiles[0].color.as_ref(),
            layout.colors().get(SubaisleId(10)).map(|c| &c.color)
        );
    }

    #[test]
    fn no_map_means_nothing_to_save() {
        let mut g = groups();
        g.map = None;
        let layout = StoreLayout::from_groups(g);
        assert!(layout.recolored_map("d".to_string()).unwrap().is_none());
    }
}
