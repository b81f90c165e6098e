#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use waypoint_server::{
    build_router, validate_startup_config, ApiConfig, AppState, AssetStore, LocalFsDocumentStore,
};

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json_logs = env::var("WAYPOINT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("WAYPOINT_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let data_file = PathBuf::from(
        env::var("WAYPOINT_DATA_FILE").unwrap_or_else(|_| "data/travel-data.json".to_string()),
    );
    let image_dir =
        PathBuf::from(env::var("WAYPOINT_IMAGE_DIR").unwrap_or_else(|_| "images".to_string()));

    let api = ApiConfig {
        max_body_bytes: env_usize("WAYPOINT_MAX_BODY_BYTES", 12 * 1024 * 1024),
        max_image_bytes: env_usize("WAYPOINT_MAX_IMAGE_BYTES", waypoint_store::MAX_IMAGE_BYTES),
        image_public_prefix: env::var("WAYPOINT_IMAGE_PUBLIC_PREFIX")
            .unwrap_or_else(|_| "/images".to_string()),
        document_ttl: Duration::from_secs(env_u64("WAYPOINT_DOCUMENT_TTL_SECS", 0)),
    };
    validate_startup_config(&api).map_err(|e| format!("invalid configuration: {e}"))?;

    let store = LocalFsDocumentStore::new(data_file);
    store
        .ensure_initialized()
        .map_err(|e| format!("document store bootstrap failed: {e}"))?;
    info!(data_file = %store.data_file().display(), "document store ready");

    let assets = AssetStore::new(image_dir)
        .with_public_prefix(api.image_public_prefix.clone())
        .with_max_bytes(api.max_image_bytes);
    assets
        .ensure_directory()
        .map_err(|e| format!("asset directory bootstrap failed: {e}"))?;
    info!(image_dir = %assets.root().display(), "asset store ready");

    let state = AppState::with_config(Arc::new(store), Arc::new(assets), api);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
    info!(addr = %bind_addr, "waypoint server listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server exited with error: {e}"))
}
