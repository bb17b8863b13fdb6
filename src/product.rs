// Product records
// Read-only values sourced from the fixture or a provider. Rows arrive as an
// open superset of fields; only the catalog attributes below are kept.

use crate::error::{CatalogError, Result};
use crate::filter::Facet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substituted whenever a product has no usable image reference.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

// ============================================================================
// PERFUME TYPE
// ============================================================================

/// Perfume family. Closed set: anything else coming from a provider is a data error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfumeType {
    Arabe,
    Disenador,
    Nicho,
}

impl PerfumeType {
    pub const ALL: [PerfumeType; 3] = [
        PerfumeType::Arabe,
        PerfumeType::Disenador,
        PerfumeType::Nicho,
    ];

    /// Wire value, also the value stored in the type facet selection.
    pub fn as_str(&self) -> &'static str {
        match self {
            PerfumeType::Arabe => "arabe",
            PerfumeType::Disenador => "disenador",
            PerfumeType::Nicho => "nicho",
        }
    }

    /// Badge label shown on product cards.
    pub fn label(&self) -> &'static str {
        match self {
            PerfumeType::Arabe => "Árabe",
            PerfumeType::Disenador => "Diseñador",
            PerfumeType::Nicho => "Nicho",
        }
    }
}

impl FromStr for PerfumeType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        PerfumeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidFacetValue {
                facet: Facet::Type.key().to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for PerfumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RAW ROW
// ============================================================================

/// Provider row before validation. Unknown columns are ignored and missing
/// text columns default to blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductRow {
    pub id: String,
    #[serde(rename = "nombrePerfume")]
    pub name: String,
    #[serde(rename = "marcaPerfume")]
    pub brand: String,
    #[serde(rename = "precioPerfume")]
    pub price: Option<f64>,
    #[serde(rename = "presentacionPerfume")]
    pub presentation: String,
    #[serde(rename = "ocasionPerfume")]
    pub occasion: String,
    #[serde(rename = "climaPerfume")]
    pub climate: String,
    #[serde(rename = "horaDiaPerfume")]
    pub time_of_day: String,
    #[serde(rename = "generoPerfume")]
    pub gender: String,
    #[serde(rename = "tipoPerfume")]
    pub perfume_type: String,
    #[serde(rename = "imageUrl", alias = "cloudinary_url")]
    pub image_url: String,
    #[serde(rename = "addedDate")]
    pub added_date: String,
}

// ============================================================================
// PRODUCT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRow")]
pub struct Product {
    pub id: String,
    #[serde(rename = "nombrePerfume")]
    pub name: String,
    #[serde(rename = "marcaPerfume")]
    pub brand: String,
    #[serde(rename = "precioPerfume")]
    pub price: f64,
    #[serde(rename = "presentacionPerfume")]
    pub presentation: String,
    #[serde(rename = "ocasionPerfume")]
    pub occasion: String,
    #[serde(rename = "climaPerfume")]
    pub climate: String,
    #[serde(rename = "horaDiaPerfume")]
    pub time_of_day: String,
    #[serde(rename = "generoPerfume")]
    pub gender: String,
    #[serde(rename = "tipoPerfume")]
    pub perfume_type: PerfumeType,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "addedDate")]
    pub added_date: String,

    /// Parsed `added_date`; `None` when the provider sent something unparseable.
    #[serde(skip)]
    pub added_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self> {
        let perfume_type: PerfumeType = row.perfume_type.trim().parse()?;

        // Adding +0.0 turns -0.0 into 0.0
        let price = row.price.unwrap_or(0.0) + 0.0;
        if !price.is_finite() || price < 0.0 {
            return Err(CatalogError::Provider {
                provider: "row".to_string(),
                message: format!("product '{}' has invalid price {}", row.id, price),
            });
        }

        let id = if row.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            row.id
        };

        let added_at = parse_added_date(&row.added_date);

        Ok(Product {
            id,
            name: row.name,
            brand: row.brand,
            price,
            presentation: row.presentation,
            occasion: row.occasion,
            climate: row.climate,
            time_of_day: row.time_of_day,
            gender: row.gender,
            perfume_type,
            image_url: row.image_url,
            added_date: row.added_date,
            added_at,
        })
    }
}

impl Product {
    /// Categorical attribute read by the given facet.
    pub fn facet_value(&self, facet: Facet) -> &str {
        match facet {
            Facet::Presentation => &self.presentation,
            Facet::Occasion => &self.occasion,
            Facet::Climate => &self.climate,
            Facet::TimeOfDay => &self.time_of_day,
            Facet::Gender => &self.gender,
            Facet::Type => self.perfume_type.as_str(),
        }
    }

    /// Image to render: the reference itself, or the placeholder when blank.
    pub fn image_src(&self) -> &str {
        if self.image_url.trim().is_empty() {
            PLACEHOLDER_IMAGE
        } else {
            &self.image_url
        }
    }

    /// Milliseconds since the epoch, used by the recency comparators.
    pub fn added_timestamp(&self) -> Option<i64> {
        self.added_at.map(|dt| dt.timestamp_millis())
    }
}

/// Accepts a plain `YYYY-MM-DD` date (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_added_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
