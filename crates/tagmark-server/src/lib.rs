//! tagmark HTTP API
//!
//! Thin axum layer over [`tagmark_core::Store`]. The store sits behind a
//! single async mutex; every handler holds it for its whole read or
//! "mutate + persist" sequence, so concurrent requests never interleave on
//! the collection. Mutations write files, so they run on the blocking pool
//! via [`AppState::with_store`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tagmark_core::Store;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod error;

pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The catalog, serialized behind one lock
    pub store: Arc<Mutex<Store>>,
    /// Directory uploaded export files are written to
    pub upload_dir: PathBuf,
    /// Request body cap in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create application state around an opened store
    pub fn new(store: Store) -> Self {
        let upload_dir = store.config().upload_path();
        let max_body_bytes = store.config().max_upload_bytes;
        Self {
            store: Arc::new(Mutex::new(store)),
            upload_dir,
            max_body_bytes,
        }
    }

    /// Run `f` against the locked store on the blocking thread pool
    ///
    /// The lock is held until `f` returns, file I/O included.
    pub async fn with_store<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Store) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut store = self.store.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut *store))
            .await
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Store task failed")))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/bookmark", post(api::add_bookmark))
        .route("/bookmark/upload", post(api::upload_bookmark_file))
        .route(
            "/bookmark/*url",
            put(api::update_bookmark).delete(api::delete_bookmark),
        )
        .route("/bookmarks", get(api::list_bookmarks))
        .route("/bookmarks/batch", post(api::add_bookmarks_batch))
        .route(
            "/bookmarks/category/:category",
            get(api::list_bookmarks_by_category),
        )
        .route("/bookmarks/tag/:tag", get(api::list_bookmarks_by_tag))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until the process exits
pub async fn serve(store: Store) -> Result<()> {
    let address = store.config().bind_address();
    let app = build_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("tagmark listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
