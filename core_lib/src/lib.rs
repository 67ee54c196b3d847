//! Core library for the file gateway: HTTP handlers, the storage backend
//! abstraction, and server assembly.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use storage::{
    DisplayMode, LocalStorage, MemoryStorage, StorageBackend, StorageError, StoredFile,
};

pub use middleware::cors::{cors_layer_from_config, cors_layer_permissive};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub backend_kind: String,
    pub storage: Arc<dyn StorageBackend>,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            app_name: "File Gateway".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend_kind: "unknown".to_string(),
            storage,
        }
    }

    pub fn with_backend_kind(mut self, kind: impl Into<String>) -> Self {
        self.backend_kind = kind.into();
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStorage::default())).with_backend_kind("memory")
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes());

    router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));

    router = router.layer(DefaultBodyLimit::max(config.max_body_bytes()));

    router = router.layer(middleware::logging::logging_layer());

    router.with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
