// Perfume Catalog - Core Library
// Filter/sort pipeline shared by the TUI and the API server

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod fixture;
pub mod grid;
pub mod logging;
pub mod product;
pub mod sort;
pub mod store;

// Re-export commonly used types
pub use catalog::{derive, Catalog, CatalogView};
pub use config::{Config, Fallback, SourceKind};
pub use db::{get_all_products, insert_products, load_csv, setup_database, verify_count, Batch};
pub use error::{CatalogError, Result};
pub use filter::{
    apply_filters, matches, Facet, FilterState, PriceRange, PRICE_MAX, PRICE_MIN, PRICE_STEP,
};
pub use fixture::sample_products;
pub use grid::{EmptyState, GridView, ProductCard};
pub use product::{PerfumeType, Product, ProductRow, PLACEHOLDER_IMAGE};
pub use sort::{order, order_by_name, SortKey};
pub use store::{
    load_with_fallback, provider_from_config, CsvProvider, FixtureProvider, LoadOrigin, LoadReport,
    RecordProvider, RecordStore, SqliteProvider,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
