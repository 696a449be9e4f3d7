use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

id_type!(
    /// Server id of an aisle.
    AisleId
);
id_type!(
    /// Server id of a subaisle. Always non-negative on the wire.
    SubaisleId
);
id_type!(
    /// Server id of a map tile.
    TileId
);
id_type!(
    /// Server id of a product.
    ProductId
);

/// An aisle as the server sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aisle {
    pub id: AisleId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Aisle {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: AisleId(id),
            name: name.into(),
            code: String::new(),
            description: String::new(),
            visible: true,
        }
    }
}

/// A subaisle, carrying a copy of its parent aisle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subaisle {
    pub id: SubaisleId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub display_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub parent: Aisle,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

impl Subaisle {
    pub fn new(id: i64, name: impl Into<String>, parent: Aisle) -> Self {
        Self {
            id: SubaisleId(id),
            name: name.into(),
            code: String::new(),
            display_code: String::new(),
            description: String::new(),
            visible: true,
            parent,
            subcategories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub parent: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryStructureEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStructureEntry {
    pub id: i64,
    pub name: String,
    pub subcategories: Vec<SubcategoryStructureEntry>,
}

/// One aisle of the store structure with its subaisles in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AisleStructureEntry {
    pub id: AisleId,
    #[serde(default)]
    pub display_code: String,
    pub name: String,
    pub subaisles: Vec<Subaisle>,
}

impl AisleStructureEntry {
    /// Builds an entry from an aisle and its subaisles.
    pub fn from_aisle(aisle: &Aisle, subaisles: Vec<Subaisle>) -> Self {
        Self {
            id: aisle.id,
            display_code: aisle.code.clone(),
            name: aisle.name.clone(),
            subaisles,
        }
    }
}

fn default_visible() -> bool {
    true
}
