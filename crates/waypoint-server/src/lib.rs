#![forbid(unsafe_code)]
//! Waypoint HTTP surface.
//!
//! Thin boundary glue: the router and handlers parse requests, take the
//! document critical section, and delegate to `waypoint-model` mutations and
//! the `waypoint-store` persistence seam.

mod config;
mod http;
mod middleware;
mod telemetry;

pub use config::{validate_startup_config, ApiConfig, CONFIG_SCHEMA_VERSION};
pub use telemetry::RequestMetrics;
pub use waypoint_store::{
    AssetStore, DocumentStore, InMemoryDocumentStore, LocalFsDocumentStore,
};

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CRATE_NAME: &str = "waypoint-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub assets: Arc<AssetStore>,
    /// Serializes every read-mutate-write sequence on the document, the one
    /// shared mutable resource. Image endpoints do not take it.
    pub document_lock: Arc<Mutex<()>>,
    pub metrics: Arc<RequestMetrics>,
    pub request_id_seed: Arc<AtomicU64>,
    pub api: ApiConfig,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, assets: Arc<AssetStore>) -> Self {
        Self::with_config(store, assets, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn DocumentStore>,
        assets: Arc<AssetStore>,
        api: ApiConfig,
    ) -> Self {
        Self {
            store,
            assets,
            document_lock: Arc::new(Mutex::new(())),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            api,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/version", get(http::handlers::version_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route(
            "/api/data",
            get(http::handlers::get_data_handler).put(http::handlers::put_data_handler),
        )
        .route("/api/travel-data", get(http::handlers::travel_data_handler))
        .route("/api/countries", post(http::handlers::create_country_handler))
        .route(
            "/api/countries/:key",
            delete(http::handlers::delete_country_handler),
        )
        .route(
            "/api/countries/:key/cities",
            post(http::handlers::add_city_handler),
        )
        .route(
            "/api/countries/:key/cities/:slug",
            delete(http::handlers::delete_city_handler),
        )
        .route(
            "/api/countries/:key/cities/:slug/guides",
            post(http::handlers::add_guide_handler),
        )
        .route(
            "/api/countries/:key/cities/:slug/guides/:index",
            delete(http::handlers::delete_guide_handler),
        )
        .route(
            "/api/countries/:key/itineraries",
            post(http::handlers::add_itinerary_handler),
        )
        .route(
            "/api/countries/:key/itineraries/:index",
            delete(http::handlers::delete_itinerary_handler),
        )
        .route(
            "/api/countries/:key/transport",
            post(http::handlers::add_transport_handler),
        )
        .route(
            "/api/countries/:key/transport/:index",
            delete(http::handlers::delete_transport_handler),
        )
        .route(
            "/api/images",
            post(http::images::upload_image_handler).get(http::images::list_images_handler),
        )
        .route(
            "/api/images/:filename",
            delete(http::images::delete_image_handler),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
