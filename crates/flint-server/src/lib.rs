//! HTTP server for flint.
//!
//! Serves static files from a directory and pushes live-reload notifications
//! to connected browsers over Server-Sent Events.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use flint_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root: PathBuf::from("public"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router
//!                       │
//!                       ├─► GET /__livereload ──► SSE stream (ListenerRegistry)
//!                       │
//!                       └─► GET /* ──► static responder (HTML script injection)
//!
//! filesystem ──notify──► relevance filter ──► debounce ──► broadcast reload
//! ```

mod app;
mod error;
mod live_reload;
mod mime;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use live_reload::LiveReloadManager;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory static files are served from (also the watched directory).
    pub root: PathBuf,
    /// Document served for `/` requests.
    pub default_document: String,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Extensions whose changes trigger a reload (`None` = html, css, js).
    pub watch_extensions: Option<Vec<String>>,
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3001,
            root: PathBuf::from("."),
            default_document: "index.html".to_owned(),
            live_reload_enabled: true,
            watch_extensions: None,
            debounce_ms: live_reload::DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Run the server.
///
/// Starts the file watcher when live reload is enabled, then serves until
/// interrupted (Ctrl-C).
///
/// # Errors
///
/// Returns an error if the watcher cannot be created or the address cannot
/// be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let live_reload = if config.live_reload_enabled {
        let mut manager =
            LiveReloadManager::new(config.root.clone(), config.watch_extensions.clone())
                .with_debounce_ms(config.debounce_ms);
        manager.start()?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState {
        root: config.root.clone(),
        default_document: config.default_document.clone(),
        live_reload,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, root = %config.root.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from flint config.
#[must_use]
pub fn server_config_from_config(config: &flint_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root: config.serve_resolved.root.clone(),
        default_document: config.serve_resolved.default_document.clone(),
        live_reload_enabled: config.live_reload.enabled,
        watch_extensions: config.watch_extensions(),
        debounce_ms: config.live_reload.debounce_ms,
    }
}
