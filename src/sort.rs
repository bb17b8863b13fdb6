// Sort engine
// Every comparator runs through a stable sort, so equal keys keep the order
// they had after filtering and the grid does not jitter between renders.

use crate::error::{CatalogError, Result};
use crate::product::Product;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "nombrePerfume")]
    NameAsc,
    #[serde(rename = "precio-asc")]
    PriceAsc,
    #[serde(rename = "precio-desc")]
    PriceDesc,
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::NameAsc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Newest,
        SortKey::Oldest,
    ];

    /// Canonical wire name. The sort control emits exactly these.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "nombrePerfume",
            SortKey::PriceAsc => "precio-asc",
            SortKey::PriceDesc => "precio-desc",
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "Alfabético (A-Z)",
            SortKey::PriceAsc => "Precio (Menor a Mayor)",
            SortKey::PriceDesc => "Precio (Mayor a Menor)",
            SortKey::Newest => "Más Recientes",
            SortKey::Oldest => "Más Antiguos",
        }
    }

    /// Next key in selector order, wrapping around.
    pub fn next(&self) -> SortKey {
        let idx = SortKey::ALL.iter().position(|k| k == self).unwrap_or(0);
        SortKey::ALL[(idx + 1) % SortKey::ALL.len()]
    }

    pub fn previous(&self) -> SortKey {
        let len = SortKey::ALL.len();
        let idx = SortKey::ALL.iter().position(|k| k == self).unwrap_or(0);
        SortKey::ALL[(idx + len - 1) % len]
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::NameAsc => collate(&a.name, &b.name),
            // Prices are finite after validation; -0.0 and 0.0 compare equal
            SortKey::PriceAsc => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortKey::PriceDesc => b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal),
            // Undated records sort after dated ones for "newest", before them for "oldest"
            SortKey::Newest => b.added_timestamp().cmp(&a.added_timestamp()),
            SortKey::Oldest => a.added_timestamp().cmp(&b.added_timestamp()),
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns a new, stably sorted sequence. The input is never touched.
pub fn order(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Sort by a key that arrived as text. Unrecognized keys leave the order
/// unchanged instead of failing the render.
pub fn order_by_name(products: &[Product], key: &str) -> Vec<Product> {
    match key.parse::<SortKey>() {
        Ok(key) => order(products, key),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring sort request");
            products.to_vec()
        }
    }
}

// ============================================================================
// COLLATION
// ============================================================================

/// Primary collation key: decomposed, combining marks stripped, lowercased.
fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style comparison: base letters first, then accents and case, then
/// raw code points so the result is a total order.
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}
