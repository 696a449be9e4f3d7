use aislemap_core::{ColorError, DateError, ProductId, SubaisleId, SubmissionError, TileId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Server URL not found. Pass --base-url, set AISLEMAP_BASE_URL or configure ~/.config/aislemap/config.toml")]
    BaseUrlNotFound,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Client error: {0}")]
    Client(#[from] aislemap_client::ClientError),

    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    #[error("Invalid date: {0}")]
    Date(#[from] DateError),

    #[error("Cannot submit: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Tile not found on the current map: {0}")]
    TileNotFound(TileId),

    #[error("Subaisle not found: {0}")]
    SubaisleNotFound(SubaisleId),

    #[error("The store has no map in effect at that date")]
    NoMap,
}
