//! Main entry point for the file gateway server binary

use anyhow::Result;
use core_lib::{
    create_app_with_config, run_server, AppConfig, AppState, LocalStorage, MemoryStorage,
    StorageBackend,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Storage backend: {}", config.storage.backend);

    config.create_directories()
        .map_err(|e| anyhow::anyhow!("Failed to create directories: {}", e))?;

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    // Backend initialization is an explicit startup step; if the configured
    // backend cannot come up, fall back to the in-memory store.
    let state = match build_storage(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(
                "Failed to initialize {} storage, falling back to in-memory: {}",
                config.storage.backend,
                e
            );
            let storage: Arc<dyn StorageBackend> =
                Arc::new(MemoryStorage::new(config.storage.inline_extensions.clone()));
            storage.init().await?;
            AppState::new(storage).with_backend_kind("memory")
        }
    };

    info!("App: {} v{}", state.app_name, state.version);
    info!("Storage: {}", state.backend_kind);

    let app = create_app_with_config(state, config);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn build_storage(config: &AppConfig) -> Result<AppState> {
    let (storage, kind): (Arc<dyn StorageBackend>, &str) = match config.storage.backend.as_str() {
        "memory" => (
            Arc::new(MemoryStorage::new(config.storage.inline_extensions.clone())),
            "memory",
        ),
        _ => (
            Arc::new(LocalStorage::new(
                config.storage.root_dir.clone(),
                config.storage.inline_extensions.clone(),
            )),
            "local",
        ),
    };

    storage.init().await?;

    Ok(AppState::new(storage).with_backend_kind(kind))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            format!(
                "{}={},tower_http=debug,axum=debug",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
