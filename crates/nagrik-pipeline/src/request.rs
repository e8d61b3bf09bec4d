//! One-shot store operations behind the HTTP handlers.

use nagrik_ai::Classifier;
use nagrik_core::{
    ClassificationResult, Clock, Complaint, ComplaintPatch, ComplaintStatus, NewComplaint,
};
use nagrik_store::ComplaintStore;
use tracing::info;

use crate::PipelineError;

/// Re-classify a stored complaint and write the result back.
///
/// Besides the fields the listener writes, this marks the document
/// `ai_processed` with a timestamp.
pub async fn classify_stored(
    store: &dyn ComplaintStore,
    classifier: &Classifier,
    clock: &dyn Clock,
    id: &str,
) -> Result<ClassificationResult, PipelineError> {
    let complaint = store
        .get(id)
        .await?
        .ok_or_else(|| PipelineError::NotFound(id.to_string()))?;

    let description = complaint.description_text();
    if description.is_empty() {
        return Err(PipelineError::MissingDescription(id.to_string()));
    }

    let now = clock.now();
    let result = classifier.classify(description, now)?;
    let patch = ComplaintPatch::classification(result.clone(), now).with_ai_processed(now);
    store.update(id, patch).await?;

    info!(
        complaint = %id,
        department = %result.department,
        priority = %result.priority,
        "classified stored complaint"
    );
    Ok(result)
}

/// File a new complaint with status `new`. Returns its id.
pub async fn submit(
    store: &dyn ComplaintStore,
    clock: &dyn Clock,
    new: NewComplaint,
) -> Result<String, PipelineError> {
    let complaint = Complaint::submitted(new, clock.now());
    let id = store.insert(complaint).await?;
    info!(complaint = %id, "complaint submitted");
    Ok(id)
}

/// Set a complaint's status and record who did it.
pub async fn update_status(
    store: &dyn ComplaintStore,
    clock: &dyn Clock,
    id: &str,
    status: ComplaintStatus,
    by: &str,
) -> Result<Complaint, PipelineError> {
    let patch = ComplaintPatch::status_change(status, by, clock.now());
    let updated = store.update(id, patch).await?;
    info!(complaint = %id, status = %updated.status, by, "complaint status updated");
    Ok(updated)
}
