// Filter state and predicate engine
//
// FilterState is a value: every toggle, range change or clear returns a new
// FilterState and leaves the receiver untouched. An empty facet selection
// places no restriction on that facet.

use crate::error::{CatalogError, Result};
use crate::product::{PerfumeType, Product};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Price slider domain and step.
pub const PRICE_MIN: f64 = 0.0;
pub const PRICE_MAX: f64 = 500.0;
pub const PRICE_STEP: f64 = 10.0;

// ============================================================================
// FACETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Presentation,
    Occasion,
    Climate,
    TimeOfDay,
    Gender,
    Type,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Presentation,
        Facet::Occasion,
        Facet::Climate,
        Facet::TimeOfDay,
        Facet::Gender,
        Facet::Type,
    ];

    /// Stable key used in query strings and serialized filter state.
    pub fn key(&self) -> &'static str {
        match self {
            Facet::Presentation => "presentation",
            Facet::Occasion => "occasion",
            Facet::Climate => "climate",
            Facet::TimeOfDay => "timeOfDay",
            Facet::Gender => "gender",
            Facet::Type => "type",
        }
    }

    /// Section title in the filter panel.
    pub fn title(&self) -> &'static str {
        match self {
            Facet::Presentation => "Presentación",
            Facet::Occasion => "Ocasión",
            Facet::Climate => "Clima",
            Facet::TimeOfDay => "Hora del Día",
            Facet::Gender => "Género",
            Facet::Type => "Tipo",
        }
    }

    /// Checkbox options offered by the filter panel, as `(value, label)`.
    pub fn options(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Facet::Presentation => &[
                ("50ml", "50ml"),
                ("75ml", "75ml"),
                ("100ml", "100ml"),
                ("125ml", "125ml"),
                ("200ml", "200ml"),
            ],
            Facet::Occasion => &[
                ("casual", "Casual"),
                ("formal", "Formal"),
                ("informal", "Informal"),
                ("ocasion especial", "Ocasión especial"),
            ],
            Facet::Climate => &[
                ("calido", "Cálido"),
                ("templado", "Templado"),
                ("frio", "Frío"),
            ],
            Facet::TimeOfDay => &[("dia", "Día"), ("tarde", "Tarde"), ("noche", "Noche")],
            Facet::Gender => &[
                ("hombre", "Hombre"),
                ("mujer", "Mujer"),
                ("unisex", "Unisex"),
            ],
            Facet::Type => &[
                ("arabe", "Árabe"),
                ("disenador", "Diseñador"),
                ("nicho", "Nicho"),
            ],
        }
    }

    /// Only the type facet has a closed value set; the others accept whatever
    /// the provider's data contains.
    pub fn validate_value(&self, value: &str) -> Result<()> {
        match self {
            Facet::Type => value.parse::<PerfumeType>().map(|_| ()),
            _ => Ok(()),
        }
    }
}

impl FromStr for Facet {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Facet::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| CatalogError::UnknownFacet(s.to_string()))
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// PRICE RANGE
// ============================================================================

/// Inclusive price interval. Always finite, inside the slider domain, and
/// `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    lower: f64,
    upper: f64,
}

impl PriceRange {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let valid = lower.is_finite()
            && upper.is_finite()
            && lower >= PRICE_MIN
            && upper <= PRICE_MAX
            && lower <= upper;

        if !valid {
            return Err(CatalogError::InvalidPriceRange { lower, upper });
        }

        Ok(PriceRange { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower && price <= self.upper
    }

    pub fn is_default(&self) -> bool {
        *self == PriceRange::default()
    }

    /// Moves the lower bound by `delta`, clamped to `[PRICE_MIN, upper]`.
    pub fn with_lower_nudged(&self, delta: f64) -> Self {
        let lower = (self.lower + delta).clamp(PRICE_MIN, self.upper);
        PriceRange { lower, upper: self.upper }
    }

    /// Moves the upper bound by `delta`, clamped to `[lower, PRICE_MAX]`.
    pub fn with_upper_nudged(&self, delta: f64) -> Self {
        let upper = (self.upper + delta).clamp(self.lower, PRICE_MAX);
        PriceRange { lower: self.lower, upper }
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange {
            lower: PRICE_MIN,
            upper: PRICE_MAX,
        }
    }
}

// ============================================================================
// FILTER STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    presentation: BTreeSet<String>,
    occasion: BTreeSet<String>,
    climate: BTreeSet<String>,
    time_of_day: BTreeSet<String>,
    gender: BTreeSet<String>,
    #[serde(rename = "type")]
    perfume_type: BTreeSet<String>,
    price_range: PriceRange,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Presentation => &self.presentation,
            Facet::Occasion => &self.occasion,
            Facet::Climate => &self.climate,
            Facet::TimeOfDay => &self.time_of_day,
            Facet::Gender => &self.gender,
            Facet::Type => &self.perfume_type,
        }
    }

    fn selection_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Presentation => &mut self.presentation,
            Facet::Occasion => &mut self.occasion,
            Facet::Climate => &mut self.climate,
            Facet::TimeOfDay => &mut self.time_of_day,
            Facet::Gender => &mut self.gender,
            Facet::Type => &mut self.perfume_type,
        }
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.selection(facet).contains(value)
    }

    /// New state with `value` removed from `facet` if present, added otherwise.
    #[must_use]
    pub fn toggled(&self, facet: Facet, value: &str) -> FilterState {
        let mut next = self.clone();
        let set = next.selection_mut(facet);
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        next
    }

    #[must_use]
    pub fn with_price_range(&self, range: PriceRange) -> FilterState {
        FilterState {
            price_range: range,
            ..self.clone()
        }
    }

    /// The "clear all" result: every facet empty, full price range.
    #[must_use]
    pub fn cleared(&self) -> FilterState {
        FilterState::default()
    }

    /// True iff any facet has a selection or the price range was narrowed.
    pub fn has_active_filters(&self) -> bool {
        Facet::ALL.iter().any(|f| !self.selection(*f).is_empty()) || !self.price_range.is_default()
    }

    /// Number of selected facet values, for the panel header.
    pub fn active_value_count(&self) -> usize {
        Facet::ALL.iter().map(|f| self.selection(*f).len()).sum()
    }
}

// ============================================================================
// PREDICATE ENGINE
// ============================================================================

/// Facets are AND-ed together; values within one facet are OR-ed.
pub fn matches(product: &Product, filters: &FilterState) -> bool {
    let facets_ok = Facet::ALL.iter().all(|facet| {
        let selected = filters.selection(*facet);
        selected.is_empty() || selected.contains(product.facet_value(*facet))
    });

    facets_ok && filters.price_range.contains(product.price)
}

/// Stable filter: survivors keep their relative order.
pub fn apply_filters(products: &[Product], filters: &FilterState) -> Vec<Product> {
    products
        .iter()
        .filter(|p| matches(p, filters))
        .cloned()
        .collect()
}
