//! HTTP API for flashdeck.
//!
//! Exposes the flashcard store and the category aggregator as JSON endpoints.
//! Every handler isolates its own failures: errors become a status code and a
//! `{"error": ...}` body, never a crash.

pub mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::error::{Error, Result};
use crate::storage::Storage;

pub use error::{ApiError, ErrorBody};
pub use handlers::{DeleteResponse, HealthResponse};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    storage: Arc<Mutex<Storage>>,
}

impl AppState {
    /// Wrap a storage engine for shared use.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Run a store operation on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or [`Error::Internal`] if the lock is
    /// poisoned or the blocking task fails.
    pub async fn with_storage<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let guard = storage
                .lock()
                .map_err(|_| Error::internal("storage lock poisoned"))?;
            op(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
    }
}

/// Options for building the router.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterOptions {
    /// Add a permissive CORS layer.
    pub cors_permissive: bool,
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/flashcards",
            get(handlers::list_flashcards).post(handlers::create_flashcard),
        )
        .route(
            "/flashcards/:id",
            get(handlers::get_flashcard)
                .put(handlers::update_flashcard)
                .delete(handlers::delete_flashcard),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let router = if options.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

/// Serve the API on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Serving flashcards on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState, options: RouterOptions) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_with_shutdown(listener, build_router(state, options), shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
