use nagrik_ai::ClassifyError;
use nagrik_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("complaint not found: {0}")]
    NotFound(String),

    #[error("complaint {0} has no description")]
    MissingDescription(String),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
