//! Complaint pipelines.
//!
//! Two triggers drive the same [`Classifier`](nagrik_ai::Classifier): the
//! [`Listener`] reacts to store changes, and the request helpers
//! ([`classify_stored`], [`submit`], [`update_status`]) run one store
//! read/write per call for the HTTP layer.

mod error;
mod listener;
mod request;

pub use error::PipelineError;
pub use listener::{ChangeOutcome, Listener, ListenerStats};
pub use request::{classify_stored, submit, update_status};
