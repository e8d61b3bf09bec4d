//! Long-running modes: API plus listener, or listener alone.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::bail;
use nagrik_ai::Classifier;
use nagrik_api::AppState;
use nagrik_core::{Clock, SystemClock};
use nagrik_pipeline::{Listener, ListenerStats, PipelineError};
use nagrik_store::{ComplaintStore, DocumentStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{ServeArgs, StoreArgs};

/// Open the configured store. A store that fails to open leaves the
/// service in API-only mode.
pub async fn open_store(args: &StoreArgs) -> Option<Arc<dyn ComplaintStore>> {
    if args.no_store {
        info!("complaint store disabled, running in API-only mode");
        return None;
    }
    match &args.store_path {
        None => {
            info!("using in-memory complaint store");
            Some(Arc::new(DocumentStore::open()))
        }
        Some(path) => match DocumentStore::open_persistent(path).await {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "complaint store unavailable, running in API-only mode");
                None
            }
        },
    }
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}

fn spawn_listener(
    store: Arc<dyn ComplaintStore>,
    classifier: Arc<Classifier>,
    clock: Arc<dyn Clock>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<Result<ListenerStats, PipelineError>> {
    let listener = Listener::new(store, classifier, clock);
    tokio::spawn(async move { listener.run(shutdown).await })
}

async fn join_listener(task: JoinHandle<Result<ListenerStats, PipelineError>>) {
    match task.await {
        Ok(Ok(stats)) => info!(
            classified = stats.classified,
            marked_overdue = stats.marked_overdue,
            failed = stats.failed,
            "listener finished"
        ),
        Ok(Err(e)) => error!(error = %e, "listener failed"),
        Err(e) => error!(error = %e, "listener task panicked"),
    }
}

pub async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    info!("nagrik v{}", env!("CARGO_PKG_VERSION"));
    let classifier = Arc::new(Classifier::standard());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = open_store(&args.store).await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener = store
        .clone()
        .map(|store| spawn_listener(store, classifier.clone(), clock.clone(), shutdown_rx));

    let state = AppState::new(classifier, store, clock);
    let addr = SocketAddr::new(args.host, args.port);
    let served = nagrik_api::serve(addr, state, shutdown_signal()).await;

    let _ = shutdown_tx.send(true);
    if let Some(task) = listener {
        join_listener(task).await;
    }
    served
}

pub async fn run_listen(args: StoreArgs) -> anyhow::Result<()> {
    let Some(store) = open_store(&args).await else {
        bail!("the listener needs a complaint store");
    };
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = spawn_listener(
        store,
        Arc::new(Classifier::standard()),
        Arc::new(SystemClock),
        shutdown_rx,
    );

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);
    join_listener(task).await;
    Ok(())
}
