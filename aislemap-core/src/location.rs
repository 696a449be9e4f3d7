use serde::{Deserialize, Serialize};

use crate::structure::{ProductId, Subaisle, SubaisleId, Subcategory, TileId};
use crate::tile::{MapTile, MapTileDto};

/// Which products a product list request should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductLocationFilter {
    #[default]
    All,
    Auto,
    Manual,
    Missing,
}

impl ProductLocationFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductLocationFilter::All => "all",
            ProductLocationFilter::Auto => "auto",
            ProductLocationFilter::Manual => "manual",
            ProductLocationFilter::Missing => "missing",
        }
    }
}

impl std::str::FromStr for ProductLocationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ProductLocationFilter::All),
            "auto" => Ok(ProductLocationFilter::Auto),
            "manual" => Ok(ProductLocationFilter::Manual),
            "missing" => Ok(ProductLocationFilter::Missing),
            _ => Err(format!("unknown location filter: {}", s)),
        }
    }
}

impl std::fmt::Display for ProductLocationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters with their display labels, in menu order.
pub const FILTER_OPTIONS: [(ProductLocationFilter, &str); 4] = [
    (ProductLocationFilter::All, "Show all"),
    (ProductLocationFilter::Auto, "Auto-assigned"),
    (ProductLocationFilter::Manual, "Manually assigned"),
    (ProductLocationFilter::Missing, "Missing location"),
];

/// A tile attached to a location, either as received or as edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocatedTile {
    Wire(MapTileDto),
    Live(MapTile),
}

impl LocatedTile {
    pub fn id(&self) -> Option<TileId> {
        match self {
            LocatedTile::Wire(dto) => dto.id,
            LocatedTile::Live(tile) => tile.id,
        }
    }

    /// Returns the wire form, converting an edited tile if needed.
    pub fn to_wire(&self) -> LocatedTile {
        match self {
            LocatedTile::Wire(_) => self.clone(),
            LocatedTile::Live(tile) => LocatedTile::Wire(MapTileDto::from_map_tile(tile)),
        }
    }
}

impl From<MapTileDto> for LocatedTile {
    fn from(dto: MapTileDto) -> Self {
        LocatedTile::Wire(dto)
    }
}

impl From<MapTile> for LocatedTile {
    fn from(tile: MapTile) -> Self {
        LocatedTile::Live(tile)
    }
}

/// The current location of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLocation {
    pub id: Option<i64>,
    pub tile: Option<LocatedTile>,
    pub subaisle: Option<Subaisle>,
    pub is_auto: bool,
    #[serde(default)]
    pub date_started: Option<String>,
    #[serde(default)]
    pub date_ended: Option<String>,
}

/// A product row in the location assignment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductToLocate {
    pub id: ProductId,
    pub name: String,
    pub vendor: String,
    #[serde(default)]
    pub vendor_details_url: String,
    #[serde(default)]
    pub date_started: Option<String>,
    #[serde(default)]
    pub date_ended: Option<String>,
    #[serde(default)]
    pub details_url: String,
    pub subcategory: Subcategory,
    pub location: Option<ProductLocation>,
}

/// A pending edit of a product's location.
///
/// `tile` and `subaisle` hold the tentative assignment, `start_tile` and
/// `start_subaisle` the assignment the product had when it was snapshotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLocationChange {
    pub product: ProductToLocate,
    pub tile: Option<LocatedTile>,
    pub subaisle: Option<Subaisle>,
    #[serde(default)]
    pub start_tile: Option<LocatedTile>,
    #[serde(default)]
    pub start_subaisle: Option<Subaisle>,
    #[serde(default)]
    pub revert_auto: bool,
    #[serde(default)]
    pub delete_location: bool,
}

impl ProductLocationChange {
    /// Snapshots the product's current location. The result reports no changes.
    pub fn from_product(product: &ProductToLocate) -> Self {
        let tile = product.location.as_ref().and_then(|l| l.tile.clone());
        let subaisle = product.location.as_ref().and_then(|l| l.subaisle.clone());
        Self {
            product: product.clone(),
            start_tile: tile.clone(),
            start_subaisle: subaisle.clone(),
            tile,
            subaisle,
            revert_auto: false,
            delete_location: false,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    pub fn tile_id(&self) -> Option<TileId> {
        self.tile.as_ref().and_then(LocatedTile::id)
    }

    pub fn subaisle_id(&self) -> Option<SubaisleId> {
        self.subaisle.as_ref().map(|sa| sa.id)
    }

    pub fn start_tile_id(&self) -> Option<TileId> {
        self.start_tile.as_ref().and_then(LocatedTile::id)
    }

    pub fn start_subaisle_id(&self) -> Option<SubaisleId> {
        self.start_subaisle.as_ref().map(|sa| sa.id)
    }

    /// True if there is anything to submit for this product.
    pub fn has_changes(&self) -> bool {
        self.has_value_changes() || self.has_extras_changes()
    }

    pub fn has_value_changes(&self) -> bool {
        self.tile_id() != self.start_tile_id() || self.subaisle_id() != self.start_subaisle_id()
    }

    pub fn has_extras_changes(&self) -> bool {
        self.revert_auto || self.delete_location
    }

    /// Sets the tentative tile and subaisle.
    pub fn assign(&mut self, tile: Option<LocatedTile>, subaisle: Option<Subaisle>) {
        self.tile = tile;
        self.subaisle = subaisle;
    }

    /// Restores the snapshotted state, dropping any edits.
    pub fn reset(&mut self) {
        self.tile = self.start_tile.clone();
        self.subaisle = self.start_subaisle.clone();
        self.revert_auto = false;
        self.delete_location = false;
    }

    /// Copy suitable for sending to the server.
    ///
    /// The embedded product loses its location, an edited tile is converted
    /// to wire form and the starting state is dropped.
    pub fn prepare_for_upload(&self) -> ProductLocationChange {
        let product = ProductToLocate {
            location: None,
            ..self.product.clone()
        };
        ProductLocationChange {
            product,
            tile: self.tile.as_ref().map(LocatedTile::to_wire),
            subaisle: self.subaisle.clone(),
            start_tile: None,
            start_subaisle: None,
            revert_auto: self.revert_auto,
            delete_location: self.delete_location,
        }
    }
}

/// A product together with its pending change.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLocationsTableItem {
    pub product: ProductToLocate,
    pub change: ProductLocationChange,
}

impl ProductLocationsTableItem {
    pub fn from_product(product: ProductToLocate) -> Self {
        let change = ProductLocationChange::from_product(&product);
        Self { product, change }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Aisle, Category};
    use crate::tile::TileType;

    fn subcategory() -> Subcategory {
        Subcategory {
            id: 1,
            name: "Milk".to_string(),
            description: String::new(),
            visible: true,
            parent: Category {
                id: 1,
                name: "Dairy".to_string(),
                description: String::new(),
                visible: true,
            },
        }
    }

    fn wire_tile(id: i64) -> LocatedTile {
        LocatedTile::Wire(MapTileDto {
            id: Some(TileId(id)),
            x: id as i32,
            y: 0,
            tile_type: TileType::Product,
            subaisle: None,
            color: Some("#AF30FF".to_string()),
            color_is_light: true,
        })
    }

    fn product(location: Option<ProductLocation>) -> ProductToLocate {
        ProductToLocate {
            id: ProductId(7),
            name: "Whole milk".to_string(),
            vendor: "Acme".to_string(),
            vendor_details_url: "/vendors/1/".to_string(),
            date_started: None,
            date_ended: None,
            details_url: "/products/7/".to_string(),
            subcategory: subcategory(),
            location,
        }
    }

    fn located() -> ProductToLocate {
        product(Some(ProductLocation {
            id: Some(3),
            tile: Some(wire_tile(1)),
            subaisle: Some(Subaisle::new(10, "Milk", Aisle::new(1, "Cold"))),
            is_auto: true,
            date_started: None,
            date_ended: None,
        }))
    }

    #[test]
    fn fresh_snapshot_has_no_changes() {
        for p in [located(), product(None)] {
            let change = ProductLocationChange::from_product(&p);
            assert!(!change.has_changes());
            assert!(!change.has_value_changes());
            assert!(!change.has_extras_changes());
        }
    }

    #[test]
    fn unlocated_product_snapshot_is_empty() {
        let change = ProductLocationChange::from_product(&product(None));
        assert!(change.tile.is_none());
        assert!(change.subaisle.is_none());
        assert!(change.start_tile.is_none());
        assert!(change.start_subaisle.is_none());
    }

    #[test]
    fn revert_auto_is_an_extras_change() {
        let mut change = ProductLocationChange::from_product(&located());
        change.revert_auto = true;
        assert!(change.has_changes());
        assert!(!change.has_value_changes());
    }

    #[test]
    fn different_tile_is_a_value_change() {
        let mut change = ProductLocationChange::from_product(&located());
        change.tile = Some(wire_tile(2));
        assert!(change.has_value_changes());
        assert!(change.has_changes());
    }

    #[test]
    fn same_tile_in_live_form_is_not_a_change() {
        let mut change = ProductLocationChange::from_product(&located());
        if let Some(LocatedTile::Wire(dto)) = change.tile.clone() {
            change.tile = Some(LocatedTile::Live(MapTile::from(dto)));
        }
        assert!(!change.has_value_changes());
    }

    #[test]
    fn clearing_subaisle_is_a_value_change() {
        let mut change = ProductLocationChange::from_product(&located());
        change.subaisle = None;
        assert!(change.has_value_changes());
    }

    #[test]
    fn reset_discards_edits() {
        let mut change = ProductLocationChange::from_product(&located());
        change.assign(Some(wire_tile(5)), None);
        change.delete_location = true;
        change.reset();
        assert!(!change.has_changes());
    }

    #[test]
    fn prepare_for_upload_leaves_receiver_alone() {
        let mut change = ProductLocationChange::from_product(&located());
        let live = MapTile {
            id: Some(TileId(4)),
            x: 4,
            y: 4,
            tile_type: TileType::Product,
            subaisle: None,
        };
        change.assign(Some(LocatedTile::Live(live)), None);
        let before = change.clone();

        let upload = change.prepare_for_upload();

        assert_eq!(change, before);
        assert!(change.has_changes());
        assert!(upload.product.location.is_none());
        assert!(upload.start_tile.is_none());
        assert!(upload.start_subaisle.is_none());
        assert!(matches!(upload.tile, Some(LocatedTile::Wire(_))));
        assert_eq!(upload.tile_id(), Some(TileId(4)));
    }

    #[test]
    fn upload_serializes_null_location() {
        let change = ProductLocationChange::from_product(&located());
        let value = serde_json::to_value(change.prepare_for_upload()).unwrap();
        assert!(value["product"]["location"].is_null());
        assert_eq!(value["tile"]["tile_type"], "product");
    }

    #[test]
    fn located_tile_decodes_wire_form() {
        let json = r##"{"id": 2, "x": 1, "y": 1, "tile_type": "product", "subaisle": null,
                        "color": "#AF30FF", "color_is_light": true}"##;
        let tile: LocatedTile = serde_json::from_str(json).unwrap();
        assert!(matches!(tile, LocatedTile::Wire(_)));
        assert_eq!(tile.id(), Some(TileId(2)));
    }

    #[test]
    fn filter_parsing() {
        let parsed = "Missing".parse::<ProductLocationFilter>();
        assert_eq!(parsed, Ok(ProductLocationFilter::Missing));
        assert!("nope".parse::<ProductLocationFilter>().is_err());
        assert_eq!(FILTER_OPTIONS[1].1, "Auto-assigned");
    }
}
