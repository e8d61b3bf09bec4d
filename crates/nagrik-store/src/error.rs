use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("complaint not found: {0}")]
    NotFound(String),

    #[error("store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store json error: {0}")]
    Json(#[from] serde_json::Error),
}
