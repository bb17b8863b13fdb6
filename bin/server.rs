// Perfume Catalog - Web Server
// REST API over the filter/sort pipeline with Axum

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use perfume_catalog::{
    apply_filters, derive, grid, load_with_fallback, logging, order_by_name, provider_from_config,
    CatalogError, Config, Facet, Fallback, FilterState, GridView, LoadOrigin, LoadReport,
    PriceRange, ProductCard, RecordStore, SortKey, PRICE_MAX, PRICE_MIN, PRICE_STEP,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<RwLock<RecordStore>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

/// Outcome of the one catalog load
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadStatus {
    source: String,
    provider: String,
    fallback: bool,
    count: usize,
    rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&LoadReport> for LoadStatus {
    fn from(report: &LoadReport) -> Self {
        LoadStatus {
            source: report.source().to_string(),
            provider: report.provider.clone(),
            fallback: report.is_fallback(),
            count: report.count,
            rejected: report.rejected,
            error: report.error.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    loading: bool,
    /// Absent until the load finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    load: Option<LoadStatus>,
}

/// Result grid plus everything the header needs
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductsResponse {
    count: usize,
    count_label: String,
    loading: bool,
    has_active_filters: bool,
    /// Absent when the requested sort name was not recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<SortKey>,
    filters: FilterState,
    grid: GridView,
}

#[derive(Serialize)]
struct OptionResponse {
    value: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct FacetResponse {
    key: &'static str,
    title: &'static str,
    options: Vec<OptionResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FacetsResponse {
    facets: Vec<FacetResponse>,
    price_min: f64,
    price_max: f64,
    price_step: f64,
    sort_options: Vec<OptionResponse>,
}

// ============================================================================
// Query parsing
// ============================================================================

/// Filters and sort requested by one call to /api/products
#[derive(Debug, PartialEq)]
struct ProductQuery {
    filters: FilterState,
    sort: Option<String>,
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// Facets may repeat (`type=nicho&type=arabe`) or use commas (`type=nicho,arabe`).
/// Unknown parameters are ignored.
fn parse_query(raw: Option<&str>) -> Result<ProductQuery, CatalogError> {
    let mut filters = FilterState::default();
    let mut sort = None;
    let mut lower = PRICE_MIN;
    let mut upper = PRICE_MAX;

    for pair in raw.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let value = decode(value);

        match key.as_str() {
            "sort" => sort = Some(value),
            "min_price" => lower = parse_price(&value)?,
            "max_price" => upper = parse_price(&value)?,
            other => {
                let Ok(facet) = other.parse::<Facet>() else {
                    tracing::debug!(param = other, "ignoring unknown query parameter");
                    continue;
                };
                for v in value.split(',').map(str::trim).filter(|v| !v.is_empty()) {
                    facet.validate_value(v)?;
                    if !filters.is_selected(facet, v) {
                        filters = filters.toggled(facet, v);
                    }
                }
            }
        }
    }

    let filters = filters.with_price_range(PriceRange::new(lower, upper)?);
    Ok(ProductQuery { filters, sort })
}

fn parse_price(value: &str) -> Result<f64, CatalogError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CatalogError::InvalidPrice(value.to_string()))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        loading: store.is_loading(),
        load: store.last_load().map(LoadStatus::from),
    }))
}

/// GET /api/products - Filtered and sorted grid
async fn get_products(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let query = match parse_query(query.as_deref()) {
        Ok(q) => q,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting product query");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let store = state.store.read().await;

    // Unknown sort names keep the filtered order instead of failing
    let (products, sort) = match query.sort.as_deref() {
        None => (
            derive(store.products(), &query.filters, SortKey::default()),
            Some(SortKey::default()),
        ),
        Some(name) => (
            order_by_name(&apply_filters(store.products(), &query.filters), name),
            name.parse::<SortKey>().ok(),
        ),
    };

    let grid_view = if store.is_loading() {
        GridView::Loading
    } else {
        grid::render(&products)
    };

    let response = ProductsResponse {
        count: products.len(),
        count_label: grid::count_label(products.len()),
        loading: store.is_loading(),
        has_active_filters: query.filters.has_active_filters(),
        sort,
        filters: query.filters,
        grid: grid_view,
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/products/:id - Single product card
async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    // Decode URL-encoded id
    let decoded_id = urlencoding::decode(&id)
        .map(|s| s.into_owned())
        .unwrap_or(id);

    let store = state.store.read().await;
    match store.get(&decoded_id) {
        Some(product) => {
            (StatusCode::OK, Json(ApiResponse::ok(ProductCard::from(product)))).into_response()
        }
        None if store.is_loading() => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, "catalog is still loading")
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("perfume '{}' not found", decoded_id),
        ),
    }
}

/// GET /api/facets - Filter panel and sort control options
async fn get_facets() -> impl IntoResponse {
    let facets = Facet::ALL
        .iter()
        .map(|facet| FacetResponse {
            key: facet.key(),
            title: facet.title(),
            options: facet
                .options()
                .iter()
                .map(|&(value, label)| OptionResponse { value, label })
                .collect(),
        })
        .collect();

    let sort_options = SortKey::ALL
        .iter()
        .map(|key| OptionResponse {
            value: key.as_str(),
            label: key.label(),
        })
        .collect();

    Json(ApiResponse::ok(FacetsResponse {
        facets,
        price_min: PRICE_MIN,
        price_max: PRICE_MAX,
        price_step: PRICE_STEP,
        sort_options,
    }))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products", get(get_products))
        .route("/products/:id", get(get_product))
        .route("/facets", get(get_facets))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init_stderr(&config);

    let state = AppState {
        store: Arc::new(RwLock::new(RecordStore::loading())),
    };

    // One background load; requests see `loading: true` until it lands
    let loader = state.store.clone();
    let provider = provider_from_config(&config);
    let fallback = config.fallback;
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || {
            load_with_fallback(provider.as_ref(), fallback)
        })
        .await;
        let mut store = loader.write().await;
        match result {
            Ok((products, report)) => store.finish_load(products, report),
            Err(e) => {
                tracing::error!(error = %e, "catalog loader panicked");
                store.finish_load(
                    Vec::new(),
                    LoadReport {
                        provider: "loader".to_string(),
                        origin: LoadOrigin::Fallback(Fallback::Empty),
                        count: 0,
                        rejected: 0,
                        error: Some(e.to_string()),
                    },
                );
            }
        }
    });

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.server_addr.as_str()).await?;
    tracing::info!(addr = %config.server_addr, "catalog server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use perfume_catalog::sample_products;
    use tower::ServiceExt;

    fn ready_state() -> AppState {
        AppState {
            store: Arc::new(RwLock::new(RecordStore::with_products(sample_products()))),
        }
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = build_router(state, &Config::default());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn card_ids(body: &serde_json::Value) -> Vec<String> {
        body["data"]["grid"]["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_parse_query_repeated_and_comma_values() {
        let q = parse_query(Some(
            "type=nicho&type=arabe&gender=hombre,mujer&sort=precio-asc",
        ))
        .unwrap();
        assert!(q.filters.is_selected(Facet::Type, "nicho"));
        assert!(q.filters.is_selected(Facet::Type, "arabe"));
        assert_eq!(q.filters.selection(Facet::Gender).len(), 2);
        assert_eq!(q.sort.as_deref(), Some("precio-asc"));
    }

    #[test]
    fn test_parse_query_decodes_values() {
        let q = parse_query(Some("occasion=ocasion%20especial&timeOfDay=dia")).unwrap();
        assert!(q.filters.is_selected(Facet::Occasion, "ocasion especial"));
        let q = parse_query(Some("occasion=ocasion+especial")).unwrap();
        assert!(q.filters.is_selected(Facet::Occasion, "ocasion especial"));
    }

    #[test]
    fn test_parse_query_rejects_bad_input() {
        assert!(parse_query(Some("type=celebrity")).is_err());
        assert!(parse_query(Some("min_price=300&max_price=100")).is_err());
        assert!(matches!(
            parse_query(Some("max_price=cheap")),
            Err(CatalogError::InvalidPrice(ref text)) if text == "cheap"
        ));
        assert!(parse_query(Some("brand=Ocean%20Blue")).is_ok());
        assert_eq!(parse_query(None).unwrap().filters, FilterState::default());
    }

    #[tokio::test]
    async fn test_products_price_range_and_sort() {
        let (status, body) = get_json(
            ready_state(),
            "/api/products?min_price=100&max_price=200&sort=precio-desc",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["sort"], "precio-desc");
        assert_eq!(body["data"]["count"], 3);
        assert_eq!(body["data"]["hasActiveFilters"], true);
        // Jasmine Dreams 195, Fleur de Printemps 180, Aqua Marine 120
        assert_eq!(card_ids(&body), vec!["7", "2", "8"]);
    }

    #[tokio::test]
    async fn test_unknown_sort_keeps_filtered_order() {
        let (status, body) =
            get_json(ready_state(), "/api/products?type=disenador&sort=name").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(card_ids(&body), vec!["2", "4", "6", "8"]);
        assert!(body["data"].get("sort").is_none());

        let (_, body) = get_json(ready_state(), "/api/products").await;
        assert_eq!(body["data"]["sort"], "nombrePerfume");
    }

    #[tokio::test]
    async fn test_non_numeric_price_names_the_text() {
        let (status, body) = get_json(ready_state(), "/api/products?min_price=barato").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid price 'barato'");
    }

    #[tokio::test]
    async fn test_health_reports_load_outcome() {
        let state = AppState {
            store: Arc::new(RwLock::new(RecordStore::loading())),
        };
        let (_, body) = get_json(state.clone(), "/api/health").await;
        assert_eq!(body["data"]["loading"], true);
        assert!(body["data"].get("load").is_none());

        let dir = tempfile::tempdir().unwrap();
        let provider = perfume_catalog::SqliteProvider {
            path: dir.path().join("absent.db"),
        };
        let (products, report) = load_with_fallback(&provider, Fallback::Fixture);
        state.store.write().await.finish_load(products, report);

        let (status, body) = get_json(state, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "OK");
        assert_eq!(body["data"]["loading"], false);
        assert_eq!(body["data"]["load"]["source"], "fixture");
        assert_eq!(body["data"]["load"]["provider"], "sqlite");
        assert_eq!(body["data"]["load"]["fallback"], true);
        assert_eq!(body["data"]["load"]["count"], 8);
        assert_eq!(body["data"]["load"]["rejected"], 0);
        assert!(body["data"]["load"]["error"].is_string());
    }

    #[tokio::test]
    async fn test_empty_result_returns_empty_state() {
        let (_, body) = get_json(ready_state(), "/api/products?occasion=informal").await;
        assert_eq!(body["data"]["count"], 0);
        assert_eq!(body["data"]["grid"]["state"], "empty");
        assert_eq!(body["data"]["grid"]["content"]["headline"], grid::EMPTY_HEADLINE);
    }

    #[tokio::test]
    async fn test_loading_store_reports_loading() {
        let state = AppState {
            store: Arc::new(RwLock::new(RecordStore::loading())),
        };
        let (status, body) = get_json(state.clone(), "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["loading"], true);
        assert_eq!(body["data"]["grid"]["state"], "loading");

        let (status, _) = get_json(state, "/api/products/1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_bad_filter_is_400() {
        let (status, body) = get_json(ready_state(), "/api/products?type=celebrity").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_product_by_id() {
        let (status, body) = get_json(ready_state(), "/api/products/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Amber Noir");
        assert_eq!(body["data"]["typeLabel"], "Nicho");

        let (status, _) = get_json(ready_state(), "/api/products/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_facets_lists_every_facet_and_sort_key() {
        let (_, body) = get_json(ready_state(), "/api/facets").await;
        assert_eq!(body["data"]["facets"].as_array().unwrap().len(), 6);
        assert_eq!(body["data"]["sortOptions"][0]["value"], "nombrePerfume");
        assert_eq!(body["data"]["priceMax"], 500.0);
    }
}
