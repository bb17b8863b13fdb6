//! Catalog coordinator.
//!
//! Owns the record store, the current [`FilterState`] and [`SortKey`], and
//! derives `order(filter(base, filters), sort)` from them. The filter panel
//! and sort control only ever hand it new values.

use crate::error::Result;
use crate::filter::{apply_filters, Facet, FilterState, PriceRange};
use crate::grid::{self, GridView};
use crate::product::Product;
use crate::sort::{order, SortKey};
use crate::store::{LoadReport, RecordStore};

/// What the result grid and header consume after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub products: Vec<Product>,
    pub count: usize,
    pub loading: bool,
    pub has_active_filters: bool,
}

impl CatalogView {
    /// Loading wins over the empty state so "still loading" and "no results"
    /// never look the same.
    pub fn grid(&self) -> GridView {
        if self.loading {
            GridView::Loading
        } else {
            grid::render(&self.products)
        }
    }

    pub fn count_label(&self) -> String {
        grid::count_label(self.count)
    }
}

/// Filtered sequence cached against the exact inputs that produced it.
#[derive(Debug, Clone)]
struct FilterMemo {
    revision: u64,
    filters: FilterState,
    filtered: Vec<Product>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    store: RecordStore,
    filters: FilterState,
    sort_key: SortKey,
    memo: Option<FilterMemo>,
    view: CatalogView,
}

impl Catalog {
    pub fn new(store: RecordStore) -> Self {
        let mut catalog = Catalog {
            store,
            filters: FilterState::default(),
            sort_key: SortKey::default(),
            memo: None,
            view: CatalogView {
                products: Vec::new(),
                count: 0,
                loading: false,
                has_active_filters: false,
            },
        };
        catalog.recompute();
        catalog
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    // ========================================================================
    // STATE CHANGES
    // ========================================================================

    /// Replaces the filter state wholesale.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    /// Toggles one facet value. Values outside a closed facet are rejected and
    /// leave the state untouched.
    pub fn toggle_facet(&mut self, facet: Facet, value: &str) -> Result<()> {
        facet.validate_value(value)?;
        let next = self.filters.toggled(facet, value);
        self.set_filters(next);
        Ok(())
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        let next = self.filters.with_price_range(range);
        self.set_filters(next);
    }

    pub fn clear_filters(&mut self) {
        let next = self.filters.cleared();
        self.set_filters(next);
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.recompute();
    }

    /// Completes the one-time load of the base sequence.
    pub fn finish_load(&mut self, products: Vec<Product>, report: LoadReport) {
        self.store.finish_load(products, report);
        self.recompute();
    }

    // ========================================================================
    // DERIVATION
    // ========================================================================

    fn filtered(&mut self) -> &[Product] {
        let revision = self.store.revision();
        let fresh = matches!(
            &self.memo,
            Some(m) if m.revision == revision && m.filters == self.filters
        );

        if !fresh {
            let filtered = apply_filters(self.store.products(), &self.filters);
            tracing::debug!(
                base = self.store.products().len(),
                matched = filtered.len(),
                "recomputed filtered sequence"
            );
            self.memo = Some(FilterMemo {
                revision,
                filters: self.filters.clone(),
                filtered,
            });
        }

        match &self.memo {
            Some(memo) => &memo.filtered,
            None => &[],
        }
    }

    fn recompute(&mut self) {
        let sort_key = self.sort_key;
        let products = order(self.filtered(), sort_key);

        self.view = CatalogView {
            count: products.len(),
            products,
            loading: self.store.is_loading(),
            has_active_filters: self.filters.has_active_filters(),
        };
    }
}

/// Pure form of the pipeline, for callers that hold their own state.
pub fn derive(base: &[Product], filters: &FilterState, sort_key: SortKey) -> Vec<Product> {
    order(&apply_filters(base, filters), sort_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Fallback;
    use crate::fixture::sample_products;
    use crate::store::{load_with_fallback, FixtureProvider};

    fn ids(view: &CatalogView) -> Vec<&str> {
        view.products.iter().map(|p| p.id.as_str()).collect()
    }

    fn ready_catalog() -> Catalog {
        Catalog::new(RecordStore::with_products(sample_products()))
    }

    #[test]
    fn test_initial_view_is_sorted_by_name() {
        let catalog = ready_catalog();
        let names: Vec<&str> = catalog.view().products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Amber Noir",
                "Aqua Marine",
                "Citrus Breeze",
                "Fleur de Printemps",
                "Jasmine Dreams",
                "Leather & Spice",
                "Oud Royale",
                "Rose Mystique",
            ]
        );
        assert_eq!(catalog.view().count, 8);
        assert!(!catalog.view().has_active_filters);
    }

    #[test]
    fn test_filters_and_sort_compose() {
        let mut catalog = ready_catalog();
        catalog.toggle_facet(Facet::Gender, "hombre").unwrap();
        catalog.set_sort_key(SortKey::PriceDesc);

        // hombre: Amber Noir 320, Leather & Spice 210, Aqua Marine 120
        assert_eq!(ids(catalog.view()), vec!["3", "6", "8"]);
        assert_eq!(catalog.view().count_label(), "3 perfumes encontrados");
        assert!(catalog.view().has_active_filters);
    }

    #[test]
    fn test_clear_filters_restores_everything() {
        let mut catalog = ready_catalog();
        catalog.toggle_facet(Facet::Type, "nicho").unwrap();
        catalog.set_price_range(PriceRange::new(300.0, 400.0).unwrap());
        assert_eq!(ids(catalog.view()), vec!["3"]);

        catalog.clear_filters();
        assert_eq!(catalog.view().count, 8);
        assert!(!catalog.view().has_active_filters);
    }

    #[test]
    fn test_invalid_type_toggle_is_rejected() {
        let mut catalog = ready_catalog();
        assert!(catalog.toggle_facet(Facet::Type, "celebrity").is_err());
        assert_eq!(catalog.filters(), &FilterState::default());
    }

    #[test]
    fn test_no_matches_renders_empty_state() {
        let mut catalog = ready_catalog();
        catalog.toggle_facet(Facet::Occasion, "ocasion especial").unwrap();
        assert_eq!(catalog.view().count, 0);
        assert!(catalog.view().grid().is_empty_state());
    }

    #[test]
    fn test_loading_is_distinct_from_empty() {
        let mut catalog = Catalog::new(RecordStore::loading());
        assert!(catalog.is_loading());
        assert_eq!(catalog.view().grid(), GridView::Loading);

        catalog.toggle_facet(Facet::Climate, "frio").unwrap();
        assert_eq!(catalog.view().grid(), GridView::Loading);

        let (products, report) = load_with_fallback(&FixtureProvider, Fallback::Empty);
        catalog.finish_load(products, report);

        assert!(!catalog.is_loading());
        // Filters chosen during the load apply to the loaded data
        assert_eq!(ids(catalog.view()), vec!["3", "6", "1"]);
    }

    #[test]
    fn test_memo_is_not_stale_after_reload() {
        let mut catalog = ready_catalog();
        catalog.toggle_facet(Facet::Type, "arabe").unwrap();
        assert_eq!(catalog.view().count, 2);

        let mut reloaded = sample_products();
        reloaded.retain(|p| p.id != "7");
        let (_, report) = load_with_fallback(&FixtureProvider, Fallback::Empty);
        catalog.finish_load(reloaded, report);

        assert_eq!(ids(catalog.view()), vec!["1"]);
    }

    #[test]
    fn test_derive_matches_coordinator() {
        let mut catalog = ready_catalog();
        let filters = FilterState::new()
            .toggled(Facet::TimeOfDay, "dia")
            .with_price_range(PriceRange::new(100.0, 500.0).unwrap());
        catalog.set_filters(filters.clone());
        catalog.set_sort_key(SortKey::Newest);

        let derived = derive(&sample_products(), &filters, SortKey::Newest);
        assert_eq!(catalog.view().products, derived);
        // dia and >= 100: Aqua Marine (03-10), Fleur de Printemps (02-20)
        assert_eq!(ids(catalog.view()), vec!["8", "2"]);
    }
}
