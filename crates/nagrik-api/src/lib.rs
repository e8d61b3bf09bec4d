//! Request-driven pipeline: the analysis HTTP API.
//!
//! Every handler is a function of its request plus, for the complaint
//! endpoints, one store read/write. The classifier is shared read-only.

mod error;
mod routes;

pub use error::ApiError;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use nagrik_ai::Classifier;
use nagrik_core::Clock;
use nagrik_store::ComplaintStore;
use tracing::info;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    /// `None` runs the API without a database: complaint endpoints answer 503.
    pub store: Option<Arc<dyn ComplaintStore>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        classifier: Arc<Classifier>,
        store: Option<Arc<dyn ComplaintStore>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            classifier,
            store,
            clock,
        }
    }

    pub fn has_database(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&dyn ComplaintStore, ApiError> {
        self.store.as_deref().ok_or(ApiError::StoreUnavailable)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/analyze", post(routes::analyze))
        .route("/batch-analyze", post(routes::batch_analyze))
        .route("/classify-complaint/{id}", post(routes::classify_complaint))
        .route("/stats", get(routes::stats))
        .route("/complaints", get(routes::list_complaints))
        .route("/my-complaints", get(routes::my_complaints))
        .route("/submit-complaint", post(routes::submit_complaint))
        .route("/update-complaint-status", post(routes::update_complaint_status))
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_listener(listener, state, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let has_database = state.has_database();
    info!(addr = %listener.local_addr()?, has_database, "analysis API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("analysis API stopped");
    Ok(())
}
