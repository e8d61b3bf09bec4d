//! Change notifications delivered to subscribers.

use nagrik_core::Complaint;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
}

/// One document change, carrying the document as it is after the change.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub kind: ChangeKind,
    pub id: String,
    pub complaint: Complaint,
}

impl Change {
    pub fn added(id: impl Into<String>, complaint: Complaint) -> Self {
        Self {
            kind: ChangeKind::Added,
            id: id.into(),
            complaint,
        }
    }

    pub fn modified(id: impl Into<String>, complaint: Complaint) -> Self {
        Self {
            kind: ChangeKind::Modified,
            id: id.into(),
            complaint,
        }
    }
}

/// Changes delivered together, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch {
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    pub fn single(change: Change) -> Self {
        Self {
            changes: vec![change],
        }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Producer half of a change feed.
pub type ChangeSender = mpsc::UnboundedSender<ChangeBatch>;

/// Receiving end of a subscription. Ends when the store is dropped.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: mpsc::UnboundedReceiver<ChangeBatch>,
}

impl ChangeFeed {
    /// A connected sender/feed pair.
    pub fn channel() -> (ChangeSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Next batch, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<ChangeBatch> {
        self.rx.recv().await
    }
}
