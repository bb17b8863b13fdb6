// Result grid view model
// Display-ready data only; the grid never filters or reorders what it is given.

use crate::product::Product;
use serde::Serialize;

pub const EMPTY_ICON: &str = "🔍";
pub const EMPTY_HEADLINE: &str = "No se encontraron perfumes";
pub const EMPTY_GUIDANCE: &str = "Intenta ajustar los filtros para ver más resultados";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub presentation: String,
    pub price: f64,
    pub price_label: String,
    pub type_label: String,
    pub image: String,
}

impl From<&Product> for ProductCard {
    fn from(p: &Product) -> Self {
        ProductCard {
            id: p.id.clone(),
            name: p.name.clone(),
            brand: p.brand.clone(),
            presentation: p.presentation.clone(),
            price: p.price,
            price_label: format_price(p.price),
            type_label: p.perfume_type.label().to_string(),
            image: p.image_src().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyState {
    pub icon: String,
    pub headline: String,
    pub guidance: String,
}

impl Default for EmptyState {
    fn default() -> Self {
        EmptyState {
            icon: EMPTY_ICON.to_string(),
            headline: EMPTY_HEADLINE.to_string(),
            guidance: EMPTY_GUIDANCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "camelCase")]
pub enum GridView {
    /// The one-time load is still in flight.
    Loading,
    Empty(EmptyState),
    Cards(Vec<ProductCard>),
}

impl GridView {
    pub fn is_empty_state(&self) -> bool {
        matches!(self, GridView::Empty(_))
    }
}

/// Cards in the given order, or the empty state when there is nothing to show.
pub fn render(products: &[Product]) -> GridView {
    if products.is_empty() {
        return GridView::Empty(EmptyState::default());
    }

    GridView::Cards(products.iter().map(ProductCard::from).collect())
}

/// "$95", "$99.50"
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// Result header line, singular for exactly one match.
pub fn count_label(count: usize) -> String {
    let noun = if count == 1 { "perfume" } else { "perfumes" };
    format!("{} {} encontrados", count, noun)
}
