//! Record store and record providers.
//!
//! A provider produces the base sequence once per view. Its failure never
//! reaches the render layer: [`load_with_fallback`] substitutes the fixture
//! (or an empty sequence) and the store always leaves the loading state.

use crate::config::{Config, Fallback, SourceKind};
use crate::db::{self, Batch};
use crate::error::{CatalogError, Result};
use crate::fixture::sample_products;
use crate::product::Product;
use std::collections::HashSet;
use std::path::PathBuf;

// ============================================================================
// PROVIDERS
// ============================================================================

pub trait RecordProvider: Send + Sync {
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<Batch>;
}

pub struct FixtureProvider;

impl RecordProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch(&self) -> Result<Batch> {
        Ok(Batch {
            products: sample_products(),
            rejected: 0,
        })
    }
}

pub struct CsvProvider {
    pub path: PathBuf,
}

impl RecordProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self) -> Result<Batch> {
        db::load_csv(&self.path).map_err(|e| CatalogError::Provider {
            provider: self.name().to_string(),
            message: format!("{}: {}", self.path.display(), e),
        })
    }
}

pub struct SqliteProvider {
    pub path: PathBuf,
}

impl RecordProvider for SqliteProvider {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn fetch(&self) -> Result<Batch> {
        let conn = db::open_read_only(&self.path)?;
        db::get_all_products(&conn)
    }
}

pub fn provider_from_config(config: &Config) -> Box<dyn RecordProvider> {
    match config.source {
        SourceKind::Fixture => Box::new(FixtureProvider),
        SourceKind::Csv => Box::new(CsvProvider {
            path: config.csv_path.clone(),
        }),
        SourceKind::Sqlite => Box::new(SqliteProvider {
            path: config.db_path.clone(),
        }),
    }
}

// ============================================================================
// LOADING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Provider,
    Fallback(Fallback),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub provider: String,
    pub origin: LoadOrigin,
    pub count: usize,
    /// Malformed rows plus duplicate ids dropped from the provider's data.
    pub rejected: usize,
    pub error: Option<String>,
}

impl LoadReport {
    /// Where the shown records came from: the provider's name, or the fallback.
    pub fn source(&self) -> &str {
        match self.origin {
            LoadOrigin::Provider => &self.provider,
            LoadOrigin::Fallback(Fallback::Fixture) => "fixture",
            LoadOrigin::Fallback(Fallback::Empty) => "empty",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, LoadOrigin::Fallback(_))
    }

    /// One-line status, e.g. `csv · 2 rechazados` or `fixture (csv falló)`.
    pub fn summary(&self) -> String {
        let mut line = if self.is_fallback() {
            format!("{} ({} falló)", self.source(), self.provider)
        } else {
            self.source().to_string()
        };
        if self.rejected > 0 {
            line.push_str(&format!(" · {} rechazados", self.rejected));
        }
        line
    }
}

/// Keeps the first occurrence of every id.
fn dedupe_ids(batch: Batch) -> Batch {
    let mut seen = HashSet::new();
    let mut rejected = batch.rejected;
    let mut products = Vec::with_capacity(batch.products.len());

    for product in batch.products {
        if seen.insert(product.id.clone()) {
            products.push(product);
        } else {
            tracing::warn!(id = %product.id, "dropping product with duplicate id");
            rejected += 1;
        }
    }

    Batch { products, rejected }
}

/// Runs the provider once. Zero rows is a valid, empty catalog; an error
/// switches to the configured fallback.
pub fn load_with_fallback(
    provider: &dyn RecordProvider,
    fallback: Fallback,
) -> (Vec<Product>, LoadReport) {
    tracing::info!(provider = provider.name(), "loading catalog");

    match provider.fetch() {
        Ok(batch) => {
            let batch = dedupe_ids(batch);
            let report = LoadReport {
                provider: provider.name().to_string(),
                origin: LoadOrigin::Provider,
                count: batch.products.len(),
                rejected: batch.rejected,
                error: None,
            };
            tracing::info!(count = report.count, rejected = report.rejected, "catalog loaded");
            (batch.products, report)
        }
        Err(e) => {
            tracing::warn!(
                provider = provider.name(),
                error = %e,
                ?fallback,
                "provider failed, using fallback"
            );
            let products = match fallback {
                Fallback::Fixture => sample_products(),
                Fallback::Empty => Vec::new(),
            };
            let report = LoadReport {
                provider: provider.name().to_string(),
                origin: LoadOrigin::Fallback(fallback),
                count: products.len(),
                rejected: 0,
                error: Some(e.to_string()),
            };
            (products, report)
        }
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// Base sequence plus the loading flag. `revision` changes on every
/// replacement so derived results can be cached against it.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    products: Vec<Product>,
    loading: bool,
    revision: u64,
    last_load: Option<LoadReport>,
}

impl RecordStore {
    /// Empty store waiting for its one load.
    pub fn loading() -> Self {
        RecordStore {
            loading: true,
            ..Default::default()
        }
    }

    /// Store that is ready immediately, e.g. from the fixture.
    pub fn with_products(products: Vec<Product>) -> Self {
        RecordStore {
            products,
            ..Default::default()
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_load(&self) -> Option<&LoadReport> {
        self.last_load.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Replaces the base sequence and clears the loading flag.
    pub fn finish_load(&mut self, products: Vec<Product>, report: LoadReport) {
        self.products = products;
        self.loading = false;
        self.revision += 1;
        self.last_load = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    impl RecordProvider for FailingProvider {
        fn name(&self) -> &str {
            "remote"
        }

        fn fetch(&self) -> Result<Batch> {
            Err(CatalogError::Provider {
                provider: "remote".to_string(),
                message: "unreachable".to_string(),
            })
        }
    }

    struct EmptyProvider;

    impl RecordProvider for EmptyProvider {
        fn name(&self) -> &str {
            "empty"
        }

        fn fetch(&self) -> Result<Batch> {
            Ok(Batch::default())
        }
    }

    struct DuplicatingProvider;

    impl RecordProvider for DuplicatingProvider {
        fn name(&self) -> &str {
            "dupes"
        }

        fn fetch(&self) -> Result<Batch> {
            let mut products = sample_products();
            let mut copy = products[0].clone();
            copy.name = "Second Oud".to_string();
            products.push(copy);
            Ok(Batch { products, rejected: 2 })
        }
    }

    #[test]
    fn test_failure_falls_back_to_fixture() {
        let (products, report) = load_with_fallback(&FailingProvider, Fallback::Fixture);
        assert_eq!(products.len(), 8);
        assert_eq!(report.origin, LoadOrigin::Fallback(Fallback::Fixture));
        assert!(report.error.unwrap().contains("unreachable"));
    }

    #[test]
    fn test_failure_falls_back_to_empty() {
        let (products, report) = load_with_fallback(&FailingProvider, Fallback::Empty);
        assert!(products.is_empty());
        assert_eq!(report.count, 0);
    }

    #[test]
    fn test_zero_rows_is_not_an_error() {
        let (products, report) = load_with_fallback(&EmptyProvider, Fallback::Fixture);
        assert!(products.is_empty());
        assert_eq!(report.origin, LoadOrigin::Provider);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let (products, report) = load_with_fallback(&DuplicatingProvider, Fallback::Empty);
        assert_eq!(products.len(), 8);
        assert_eq!(products[0].name, "Oud Royale");
        assert_eq!(report.rejected, 3);
    }

    #[test]
    fn test_missing_sqlite_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteProvider {
            path: dir.path().join("absent.db"),
        };
        let (products, report) = load_with_fallback(&provider, Fallback::Fixture);
        assert_eq!(products.len(), 8);
        assert!(matches!(report.origin, LoadOrigin::Fallback(_)));
    }

    #[test]
    fn test_store_load_lifecycle() {
        let mut store = RecordStore::loading();
        assert!(store.is_loading());
        assert!(store.products().is_empty());
        assert_eq!(store.revision(), 0);

        let (products, report) = load_with_fallback(&FixtureProvider, Fallback::Empty);
        store.finish_load(products, report);

        assert!(!store.is_loading());
        assert_eq!(store.revision(), 1);
        assert_eq!(store.get("3").unwrap().name, "Amber Noir");
        assert!(store.get("99").is_none());
    }

    #[test]
    fn test_report_summary_names_fallback_and_rejections() {
        let (_, report) = load_with_fallback(&FailingProvider, Fallback::Fixture);
        assert_eq!(report.source(), "fixture");
        assert_eq!(report.summary(), "fixture (remote falló)");

        let (_, report) = load_with_fallback(&DuplicatingProvider, Fallback::Empty);
        assert_eq!(report.source(), "dupes");
        assert!(!report.is_fallback());
        assert_eq!(report.summary(), "dupes · 3 rechazados");

        let (_, report) = load_with_fallback(&FixtureProvider, Fallback::Empty);
        assert_eq!(report.summary(), "fixture");
    }

    #[test]
    fn test_finish_load_keeps_report() {
        let mut store = RecordStore::loading();
        assert!(store.last_load().is_none());

        let (products, report) = load_with_fallback(&FailingProvider, Fallback::Empty);
        store.finish_load(products, report);

        let report = store.last_load().unwrap();
        assert_eq!(report.source(), "empty");
        assert!(report.error.as_deref().unwrap().contains("unreachable"));
    }

    #[test]
    fn test_provider_from_config() {
        let mut config = Config::default();
        assert_eq!(provider_from_config(&config).name(), "fixture");
        config.source = SourceKind::Sqlite;
        assert_eq!(provider_from_config(&config).name(), "sqlite");
        config.source = SourceKind::Csv;
        assert_eq!(provider_from_config(&config).name(), "csv");
    }
}
