//! Storage layer: the `complaints` document collection and its change feed.
//!
//! [`ComplaintStore`] is the seam between the pipelines and the backing
//! database. [`DocumentStore`] is the bundled implementation, held in memory
//! and optionally persisted to a JSON snapshot file.

mod change;
mod document;
mod error;

pub use change::{Change, ChangeBatch, ChangeFeed, ChangeKind, ChangeSender};
pub use document::DocumentStore;
pub use error::StoreError;

use async_trait::async_trait;
use nagrik_core::{Complaint, ComplaintPatch};

/// Keyed complaint documents with single-document updates and change subscription.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Fetch one complaint. `Ok(None)` when the id is unknown.
    async fn get(&self, id: &str) -> Result<Option<Complaint>, StoreError>;

    /// Store a new complaint under a fresh id and return the id.
    async fn insert(&self, complaint: Complaint) -> Result<String, StoreError>;

    /// Apply `patch` to an existing complaint and return the updated document.
    ///
    /// Fails with [`StoreError::NotFound`] for unknown ids.
    async fn update(&self, id: &str, patch: ComplaintPatch) -> Result<Complaint, StoreError>;

    /// All complaints, ordered by id.
    async fn list(&self) -> Result<Vec<(String, Complaint)>, StoreError>;

    /// Subscribe to changes. The first batch replays every existing document as
    /// [`ChangeKind::Added`].
    async fn subscribe(&self) -> Result<ChangeFeed, StoreError>;
}
