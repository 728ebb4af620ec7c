//! HTTP surface.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`handlers::index`] |
//! | GET | `/static/app.js` | [`handlers::app_script`] |
//! | POST | `/scan_folders` | [`handlers::scan_folders`] |
//! | GET | `/thumbnail/{*path}` | [`handlers::thumbnail`] |
//! | GET | `/image/{*path}` | [`handlers::image`] |
//! | POST | `/save_annotation` | [`handlers::save_annotation`] |
//! | POST | `/delete_image` | [`handlers::delete_image`] |
//! | POST | `/toggle_star` | [`handlers::toggle_star`] |
//! | GET | `/get_starred_images` | [`handlers::get_starred_images`] |
//! | POST | `/tag_stats` | [`handlers::tag_stats`] |
//! | POST | `/batch_remove_tag` | [`handlers::batch_remove_tag`] |
//! | POST | `/batch_add_tag` | [`handlers::batch_add_tag`] |
//!
//! Request paths are resolved against the working directory captured in
//! [`AppState`]. Every response passes through a permissive CORS layer and a
//! trace layer.

pub mod error;
pub mod handlers;
pub mod headers;
pub mod page;

use crate::config::AppConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::starred::StarredStore;
use axum::Router;
use axum::routing::{get, post};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn ImageBackend>,
    pub starred: Arc<StarredStore>,
    /// Base for relative request paths.
    pub cwd: Arc<PathBuf>,
}

impl AppState {
    pub fn new(config: AppConfig, cwd: PathBuf) -> Self {
        Self::with_backend(config, cwd, Arc::new(RustBackend::new()))
    }

    pub fn with_backend(config: AppConfig, cwd: PathBuf, backend: Arc<dyn ImageBackend>) -> Self {
        let starred = StarredStore::new(cwd.join(&config.storage.starred_file));
        Self {
            config: Arc::new(config),
            backend,
            starred: Arc::new(starred),
            cwd: Arc::new(cwd),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/app.js", get(handlers::app_script))
        .route("/scan_folders", post(handlers::scan_folders))
        .route("/thumbnail/{*path}", get(handlers::thumbnail))
        .route("/image/{*path}", get(handlers::image))
        .route("/save_annotation", post(handlers::save_annotation))
        .route("/delete_image", post(handlers::delete_image))
        .route("/toggle_star", post(handlers::toggle_star))
        .route("/get_starred_images", get(handlers::get_starred_images))
        .route("/tag_stats", post(handlers::tag_stats))
        .route("/batch_remove_tag", post(handlers::batch_remove_tag))
        .route("/batch_add_tag", post(handlers::batch_add_tag))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: AppConfig, cwd: PathBuf) -> Result<(), ServerError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(
        address = %address,
        cwd = %cwd.display(),
        starred = %cwd.join(&config.storage.starred_file).display(),
        "listening"
    );

    let app = create_router(AppState::new(config, cwd));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
