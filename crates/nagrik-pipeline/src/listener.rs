//! Change-driven pipeline: a long-lived subscription to the complaint store.
//!
//! - `Added` with status `new`: classify, derive the deadline, append one audit
//!   action and write everything back in one update.
//! - `Modified` while still active (not `resolved` / `under_action`): set
//!   `overdue` once the deadline has passed. Nothing else is touched.
//!
//! A failing change is logged and skipped; the loop keeps going until the
//! shutdown signal fires or the feed closes.

use std::sync::Arc;

use nagrik_ai::Classifier;
use nagrik_core::{ClassificationResult, Clock, ComplaintPatch, ComplaintStatus, is_overdue};
use nagrik_store::{Change, ChangeBatch, ChangeKind, ComplaintStore};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::PipelineError;

/// What handling one change did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    Classified(ClassificationResult),
    MarkedOverdue,
    Skipped,
}

/// Running totals over a listener's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListenerStats {
    pub batches: usize,
    pub classified: usize,
    pub marked_overdue: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ListenerStats {
    fn record(&mut self, outcome: &Result<ChangeOutcome, PipelineError>) {
        match outcome {
            Ok(ChangeOutcome::Classified(_)) => self.classified += 1,
            Ok(ChangeOutcome::MarkedOverdue) => self.marked_overdue += 1,
            Ok(ChangeOutcome::Skipped) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    fn merge(&mut self, other: ListenerStats) {
        self.batches += other.batches;
        self.classified += other.classified;
        self.marked_overdue += other.marked_overdue;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[derive(Clone)]
pub struct Listener {
    store: Arc<dyn ComplaintStore>,
    classifier: Arc<Classifier>,
    clock: Arc<dyn Clock>,
}

impl Listener {
    pub fn new(
        store: Arc<dyn ComplaintStore>,
        classifier: Arc<Classifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            classifier,
            clock,
        }
    }

    /// Subscribe and process batches until `shutdown` becomes `true` (or its
    /// sender is dropped) or the feed ends.
    pub async fn run(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<ListenerStats, PipelineError> {
        let mut feed = self.store.subscribe().await?;
        let mut stats = ListenerStats::default();
        info!("listening for complaint changes");

        if *shutdown.borrow_and_update() {
            return Ok(stats);
        }

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                batch = feed.next() => match batch {
                    Some(batch) => stats.merge(self.handle_batch(&batch).await),
                    None => {
                        warn!("complaint change feed closed");
                        break;
                    }
                },
            }
        }

        info!(
            batches = stats.batches,
            classified = stats.classified,
            marked_overdue = stats.marked_overdue,
            failed = stats.failed,
            "listener stopped"
        );
        Ok(stats)
    }

    /// Handle every change of a batch in order. Failures are logged, not returned.
    pub async fn handle_batch(&self, batch: &ChangeBatch) -> ListenerStats {
        let mut stats = ListenerStats {
            batches: 1,
            ..Default::default()
        };
        for change in &batch.changes {
            let outcome = self.handle_change(change).await;
            if let Err(e) = &outcome {
                error!(complaint = %change.id, error = %e, "failed to process complaint change");
            }
            stats.record(&outcome);
        }
        stats
    }

    pub async fn handle_change(&self, change: &Change) -> Result<ChangeOutcome, PipelineError> {
        match change.kind {
            ChangeKind::Added => self.on_added(change).await,
            ChangeKind::Modified => self.on_modified(change).await,
        }
    }

    async fn on_added(&self, change: &Change) -> Result<ChangeOutcome, PipelineError> {
        if change.complaint.status != ComplaintStatus::New {
            return Ok(ChangeOutcome::Skipped);
        }

        let now = self.clock.now();
        let result = self
            .classifier
            .classify(change.complaint.description_text(), now)?;
        self.store
            .update(
                &change.id,
                ComplaintPatch::classification(result.clone(), now),
            )
            .await?;

        info!(
            complaint = %change.id,
            department = %result.department,
            priority = %result.priority,
            deadline = %result.deadline,
            "classified new complaint"
        );
        Ok(ChangeOutcome::Classified(result))
    }

    async fn on_modified(&self, change: &Change) -> Result<ChangeOutcome, PipelineError> {
        let complaint = &change.complaint;
        if complaint.status.is_settled() || complaint.overdue {
            return Ok(ChangeOutcome::Skipped);
        }
        if !is_overdue(complaint.deadline, self.clock.now()) {
            return Ok(ChangeOutcome::Skipped);
        }

        self.store
            .update(&change.id, ComplaintPatch::overdue())
            .await?;
        warn!(complaint = %change.id, "complaint marked overdue");
        Ok(ChangeOutcome::MarkedOverdue)
    }
}
