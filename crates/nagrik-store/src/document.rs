//! In-process document store, optionally backed by a JSON snapshot file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nagrik_core::{Complaint, ComplaintPatch};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::change::{Change, ChangeBatch, ChangeFeed, ChangeSender};
use crate::{ComplaintStore, StoreError};

/// On-disk layout: `{"complaints": {"<id>": {...}}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    complaints: BTreeMap<String, Complaint>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<String, Complaint>,
    subscribers: Vec<ChangeSender>,
}

impl Inner {
    /// Send to every live subscriber and drop the ones whose feed is gone.
    fn broadcast(&mut self, batch: ChangeBatch) {
        self.subscribers.retain(|tx| tx.send(batch.clone()).is_ok());
    }
}

/// The `complaints` collection.
///
/// Every write that changes a document is saved (when a path is set) and then
/// pushed to subscribers as a single-change batch, under one lock, so
/// subscribers see writes in commit order.
#[derive(Debug)]
pub struct DocumentStore {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::open()
    }
}

impl DocumentStore {
    /// An empty in-memory store.
    pub fn open() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            path: None,
        }
    }

    /// A store persisted to `path`. Loads the file when it exists.
    pub async fn open_persistent(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let docs = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)?.complaints,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        info!(path = %path.display(), complaints = docs.len(), "opened complaint store");

        Ok(Self {
            inner: Mutex::new(Inner {
                docs,
                subscribers: Vec::new(),
            }),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert or replace a document under a caller-chosen id.
    pub async fn put(&self, id: &str, complaint: Complaint) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let previous = inner.docs.insert(id.to_string(), complaint.clone());
        if let Err(e) = self.save(&inner.docs).await {
            match previous {
                Some(old) => inner.docs.insert(id.to_string(), old),
                None => inner.docs.remove(id),
            };
            return Err(e);
        }
        let replaced = previous.is_some();

        let change = if replaced {
            Change::modified(id, complaint)
        } else {
            Change::added(id, complaint)
        };
        inner.broadcast(ChangeBatch::single(change));
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.subscribers.len()
    }

    /// Write the snapshot to a sibling temp file, then rename over the target.
    async fn save(&self, docs: &BTreeMap<String, Complaint>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        #[derive(Serialize)]
        struct SnapshotRef<'a> {
            complaints: &'a BTreeMap<String, Complaint>,
        }

        let bytes = serde_json::to_vec_pretty(&SnapshotRef { complaints: docs })?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), complaints = docs.len(), "saved complaint store");
        Ok(())
    }
}

#[async_trait]
impl ComplaintStore for DocumentStore {
    async fn get(&self, id: &str) -> Result<Option<Complaint>, StoreError> {
        Ok(self.inner.lock().await.docs.get(id).cloned())
    }

    async fn insert(&self, complaint: Complaint) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.put(&id, complaint).await?;
        Ok(id)
    }

    async fn update(&self, id: &str, patch: ComplaintPatch) -> Result<Complaint, StoreError> {
        let mut inner = self.inner.lock().await;
        let mut updated = inner
            .docs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if !updated.apply(patch) {
            return Ok(updated);
        }

        // Restored below if the snapshot cannot be written.
        let previous = inner.docs.insert(id.to_string(), updated.clone());
        if let Err(e) = self.save(&inner.docs).await {
            if let Some(old) = previous {
                inner.docs.insert(id.to_string(), old);
            }
            return Err(e);
        }
        inner.broadcast(ChangeBatch::single(Change::modified(id, updated.clone())));
        Ok(updated)
    }

    async fn list(&self) -> Result<Vec<(String, Complaint)>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .docs
            .iter()
            .map(|(id, c)| (id.clone(), c.clone()))
            .collect())
    }

    async fn subscribe(&self) -> Result<ChangeFeed, StoreError> {
        let mut inner = self.inner.lock().await;
        let (tx, feed) = ChangeFeed::channel();

        let replay = ChangeBatch {
            changes: inner
                .docs
                .iter()
                .map(|(id, c)| Change::added(id.as_str(), c.clone()))
                .collect(),
        };
        // The feed is still held here, so the send cannot fail.
        let _ = tx.send(replay);
        inner.subscribers.push(tx);
        Ok(feed)
    }
}
