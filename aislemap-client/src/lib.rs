//! REST client for the store map endpoints.
//!
//! Fetches products, map tiles and the store structure that feed
//! `aislemap-core`, and submits location changes and map edits back.
//!
//! # Example
//!
//! ```ignore
//! use aislemap_client::{ProductQuery, Session, StoreMapClient};
//! use aislemap_core::{ChangeSet, ProductLocationFilter, StoreLayout};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = StoreMapClient::new("https://shop.example.com/")
//!         .unwrap()
//!         .with_session(Session {
//!             session_id: Some("session".to_string()),
//!             csrf_token: Some("token".to_string()),
//!         });
//!     let now = chrono::Utc::now();
//!
//!     let layout = StoreLayout::from_groups(client.get_product_groups(&now).await.unwrap());
//!     let query = ProductQuery {
//!         filter: ProductLocationFilter::Missing,
//!         ..ProductQuery::default()
//!     };
//!     let page = client.get_products(&query, &now).await.unwrap();
//!
//!     let mut changes = ChangeSet::new();
//!     changes.track(&page.products[0]).unwrap().revert_auto = true;
//!     let response = client.submit_change_set(&mut changes, &now).await.unwrap();
//!     println!("{} ({} legend rows)", response.message, layout.legend().len());
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::StoreMapClient;
pub use error::ClientError;
pub use types::{DEFAULT_PAGE_SIZE, Endpoints, ProductQuery, Session};
