//! Request and response bodies of the store map endpoints.

use serde::{Deserialize, Serialize};

use crate::location::{ProductLocationChange, ProductLocationFilter, ProductToLocate};
use crate::structure::{AisleStructureEntry, CategoryStructureEntry, Subaisle};
use crate::tile::{MapDto, MapTileDto};

/// One page of the product list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLocationGetResponse {
    pub products: Vec<ProductToLocate>,
    pub page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    /// The filter the server applied; `missing` may come back as `all`.
    pub filter: ProductLocationFilter,
}

/// Everything needed to pick a location: map, tiles and store structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroupsGetResponse {
    pub map: Option<MapDto>,
    pub tiles: Vec<MapTileDto>,
    #[serde(rename = "categoryStructure")]
    pub category_structure: Vec<CategoryStructureEntry>,
    #[serde(rename = "aisleStructure")]
    pub aisle_structure: Vec<AisleStructureEntry>,
    pub subaisles: Vec<Subaisle>,
}

/// Body of a location save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLocationChangeDescription {
    pub date: String,
    pub changes: Vec<ProductLocationChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLocationChangeResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub warning: bool,
}

/// Body of a map save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSaveRequest {
    pub map: MapDto,
    pub tiles: Vec<MapTileDto>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSaveResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub warning: bool,
    #[serde(default)]
    pub map: Option<MapDto>,
    #[serde(default)]
    pub tiles: Vec<MapTileDto>,
}
