//! Error types for the catalog library.
//!
//! Binaries wrap these in `anyhow` at the edges; inside the library every
//! fallible operation returns [`Result`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV source could not be read or a row could not be deserialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite provider or import failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is unreadable or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Price bound that is not a number at all.
    #[error("Invalid price '{0}'")]
    InvalidPrice(String),

    /// Price range with `lower > upper`, a non-finite bound, or a bound outside the slider domain.
    #[error("Invalid price range [{lower}, {upper}]")]
    InvalidPriceRange { lower: f64, upper: f64 },

    /// Value outside a facet's closed enumeration (only the type facet is closed).
    #[error("Invalid value '{value}' for facet '{facet}'")]
    InvalidFacetValue { facet: String, value: String },

    #[error("Unknown sort key '{0}'")]
    InvalidSortKey(String),

    #[error("Unknown facet '{0}'")]
    UnknownFacet(String),

    /// The record provider returned an error or was unreachable.
    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
