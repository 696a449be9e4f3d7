mod config;
mod error;
mod render;

use aislemap_client::{ProductQuery, StoreMapClient};
use aislemap_core::{
    ChangeSet, LocatedTile, ProductId, ProductLocationFilter, ProductToLocate, StoreLayout,
    SubaisleId, TileId, build_color_map, build_legend, iso_date, parse_local_date, recolor_tiles,
};
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Settings, resolve_settings};
use crate::error::ToolError;

#[derive(Parser)]
#[command(name = "amap")]
#[command(about = "Store map legend and product location tools", long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Date the data should be valid at (default: now, local time if no offset)
    #[arg(long, global = true)]
    valid_at: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the map legend for the current aisle structure
    Legend,

    /// List map tiles with their legend colors
    Tiles,

    /// List products and their locations
    Locations {
        /// Location filter: all, auto, manual, missing
        #[arg(short, long, default_value = "all")]
        filter: ProductLocationFilter,

        /// Product name contains
        #[arg(short, long, default_value = "")]
        query: String,

        /// Vendor name contains
        #[arg(long, default_value = "")]
        vendor: String,

        /// Subcategory id
        #[arg(long, default_value_t = 0)]
        subcategory: i64,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Change the location of a product
    #[command(group(
        ArgGroup::new("target")
            .required(true)
            .multiple(true)
            .args(["tile", "subaisle", "revert_auto", "delete"])
    ))]
    Relocate {
        /// Product id
        product: i64,

        /// Product name to narrow the search for the product
        #[arg(short, long, default_value = "")]
        query: String,

        /// Target tile id
        #[arg(long, conflicts_with_all = ["revert_auto", "delete"])]
        tile: Option<i64>,

        /// Target subaisle id (defaults to the tile's subaisle)
        #[arg(long, conflicts_with_all = ["revert_auto", "delete"])]
        subaisle: Option<i64>,

        /// Replace the location with an automatically computed one
        #[arg(long, conflicts_with = "delete")]
        revert_auto: bool,

        /// Remove the product's location
        #[arg(long)]
        delete: bool,
    },

    /// Repaint every map tile from the current structure and save the map
    Recolor {
        /// Show what would be saved without saving
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = resolve_settings(cli.base_url)?;
    let valid_at = match &cli.valid_at {
        Some(date) => parse_local_date(date)?,
        None => Utc::now(),
    };
    let client = StoreMapClient::new(&settings.base_url)?
        .with_session(settings.session.clone())
        .with_endpoints(settings.endpoints.clone());
    debug!(base_url = %client.base_url(), valid_at = %iso_date(&valid_at), "client ready");

    match cli.command {
        Command::Legend => {
            let aisles = client.get_aisle_structure().await?;
            let colors = build_color_map(&aisles);
            let legend = build_legend(&aisles, &colors);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&legend)?);
            } else {
                print!("{}", render::legend(&legend));
            }
        }
        Command::Tiles => {
            let groups = client.get_product_groups(&valid_at).await?;
            let layout = StoreLayout::from_groups(groups);
            if cli.json {
                let tiles: Vec<_> = layout.tiles().cloned().collect();
                let tiles = recolor_tiles(&tiles, layout.colors())?;
                println!("{}", serde_json::to_string_pretty(&tiles)?);
            } else {
                print!("{}", render::tiles(layout.tiles(), layout.colors())?);
            }
        }
        Command::Locations {
            filter,
            query,
            vendor,
            subcategory,
            page,
            page_size,
        } => {
            let query = ProductQuery {
                filter,
                name: query,
                vendor,
                subcategory,
                page,
                page_size: page_size.unwrap_or(settings.page_size),
            };
            let response = client.get_products(&query, &valid_at).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let shown = response.filter;
                if shown != filter {
                    println!("(no products match '{filter}', showing '{shown}')");
                }
                print!("{}", render::products(&response.products));
                println!("page {} of {}", response.page, response.total_pages);
            }
        }
        Command::Relocate {
            product,
            query,
            tile,
            subaisle,
            revert_auto,
            delete,
        } => {
            let target = Target {
                tile: tile.map(TileId),
                subaisle: subaisle.map(SubaisleId),
                revert_auto,
                delete,
            };
            let product = ProductId(product);
            relocate(&client, &settings, &valid_at, product, &query, target).await?;
        }
        Command::Recolor { dry_run } => {
            let groups = client.get_product_groups(&valid_at).await?;
            let layout = StoreLayout::from_groups(groups);
            let date = iso_date(&valid_at);
            let request = layout.recolored_map(date)?.ok_or(ToolError::NoMap)?;
            if dry_run {
                println!("{}", serde_json::to_string_pretty(&request)?);
            } else {
                let response = client.save_map(&request).await?;
                println!("{}", response.message);
                if !response.success {
                    anyhow::bail!("map was not saved");
                }
            }
        }
    }

    Ok(())
}

struct Target {
    tile: Option<TileId>,
    subaisle: Option<SubaisleId>,
    revert_auto: bool,
    delete: bool,
}

async fn find_product(
    client: &StoreMapClient,
    settings: &Settings,
    valid_at: &DateTime<Utc>,
    id: ProductId,
    name: &str,
) -> Result<ProductToLocate, ToolError> {
    let mut query = ProductQuery {
        name: name.to_string(),
        page_size: settings.page_size,
        ..ProductQuery::default()
    };
    loop {
        let response = client.get_products(&query, valid_at).await?;
        if let Some(product) = response.products.into_iter().find(|p| p.id == id) {
            return Ok(product);
        }
        if response.page >= response.total_pages {
            return Err(ToolError::ProductNotFound(id));
        }
        query.page = response.page + 1;
    }
}

async fn relocate(
    client: &StoreMapClient,
    settings: &Settings,
    valid_at: &DateTime<Utc>,
    product_id: ProductId,
    name: &str,
    target: Target,
) -> Result<(), ToolError> {
    let groups = client.get_product_groups(valid_at).await?;
    let layout = StoreLayout::from_groups(groups);
    let product = find_product(client, settings, valid_at, product_id, name).await?;

    let mut changes = ChangeSet::new();
    let change = changes.track(&product)?;
    if target.revert_auto {
        change.revert_auto = true;
    } else if target.delete {
        change.delete_location = true;
    } else {
        let tile = match target.tile {
            Some(id) => Some(layout.tile(id).cloned().ok_or(ToolError::TileNotFound(id))?),
            None => None,
        };
        let subaisle = match target.subaisle {
            Some(id) => {
                let subaisle = layout.subaisle(id).cloned();
                Some(subaisle.ok_or(ToolError::SubaisleNotFound(id))?)
            }
            None => tile.as_ref().and_then(|t| t.subaisle.clone()),
        };
        change.assign(tile.map(LocatedTile::Wire), subaisle);
    }

    if !changes.is_dirty() {
        println!("Nothing to change for {}", product.name);
        return Ok(());
    }

    info!(product = %product_id, "submitting relocation");
    let response = client.submit_change_set(&mut changes, valid_at).await?;
    println!("{}", response.message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_requires_a_target() {
        let args = ["amap", "relocate", "7"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["amap", "relocate", "7", "-q", "rye"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_relocate_targets() {
        let args = ["amap", "relocate", "7", "--tile", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Relocate {
                product,
                tile,
                subaisle,
                revert_auto,
                delete,
                ..
            } => {
                assert_eq!(product, 7);
                assert_eq!(tile, Some(3));
                assert_eq!(subaisle, None);
                assert!(!revert_auto && !delete);
            }
            _ => panic!("expected relocate"),
        }

        let args = ["amap", "relocate", "7", "--subaisle", "4"];
        assert!(Cli::try_parse_from(args).is_ok());
        let args = ["amap", "relocate", "7", "--delete"];
        assert!(Cli::try_parse_from(args).is_ok());
        let args = ["amap", "relocate", "7", "--revert-auto"];
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_relocate_targets_conflict() {
        let args = ["amap", "relocate", "7", "--tile", "3", "--delete"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["amap", "relocate", "7", "--revert-auto", "--delete"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
