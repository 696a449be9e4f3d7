//! Store map coloring and product location tracking.
//!
//! Core concepts:
//! - **Color map**: display colors for special tile categories and for every
//!   subaisle, keyed by [`ColorMapKey`]
//! - **Legend**: ordered, labelled rows describing the color map
//! - **Location change**: a product's tentative location next to the one it
//!   had when it was snapshotted
//! - **Change set**: pending changes for many products plus the state of their
//!   submission
//!
//! # Example
//!
//! ```
//! use aislemap_core::{build_color_map, build_legend, Aisle, AisleStructureEntry, Subaisle};
//!
//! let aisle = Aisle::new(1, "A");
//! let aisles = vec![AisleStructureEntry::from_aisle(
//!     &aisle,
//!     vec![Subaisle::new(10, "x", aisle.clone())],
//! )];
//!
//! let colors = build_color_map(&aisles);
//! let legend = build_legend(&aisles, &colors);
//! assert_eq!(legend.len(), 11);
//! ```

pub mod api;
mod changes;
mod color;
mod date;
mod layout;
mod legend;
mod location;
mod structure;
mod tile;

pub use changes::{ChangeSet, SubmissionError, SubmissionState};
pub use color::{
    ColorError, ColorKey, ColorMap, ColorMapKey, ColorSpec, basic_color_specs, build_color_map,
    color_css, color_css_for_tile, fallback_color_spec, get_color_for_tile, recolor_tiles,
    subaisle_color, tile_to_map_tile_dto_with_color, tile_type_to_color, unique_color,
};
pub use date::{DateError, iso_date, iso_date_from_str, parse_local_date};
pub use layout::StoreLayout;
pub use legend::{
    AISLES_HEADER, LEGEND_SPECIAL_TILES, LegendEntry, LegendEntryType, LegendRef,
    SPECIAL_TILES_HEADER, build_legend,
};
pub use location::{
    FILTER_OPTIONS, LocatedTile, ProductLocation, ProductLocationChange, ProductLocationFilter,
    ProductLocationsTableItem, ProductToLocate,
};
pub use structure::{
    Aisle, AisleId, AisleStructureEntry, Category, CategoryStructureEntry, ProductId, Subaisle,
    SubaisleId, Subcategory, SubcategoryStructureEntry, TileId,
};
pub use tile::{MapDto, MapTile, MapTileDto, TileType};
