//! Route handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use nagrik_core::api::{
    Analysis, AnalysisMetadata, AnalyzeResponse, BatchItem, BatchResponse, BatchSummary,
    ClassifyResponse, ClassifySummary, ComplaintListResponse, DatabaseInfo, ENGINE_NAME,
    EndpointInfo, HealthResponse, KeywordStats, ListedComplaint, SERVICE_NAME, SERVICE_VERSION,
    StatsResponse, StatusUpdateRequest, StatusUpdateResponse, SubmitRequest, SubmitResponse,
    UserComplaintsQuery, text_preview,
};
use nagrik_core::{Complaint, ComplaintStatus, NewComplaint};
use nagrik_pipeline::{classify_stored, submit, update_status};
use serde_json::Value;
use tracing::info;

use crate::{ApiError, AppState};

const DEFAULT_ADMIN: &str = "Admin";
const ANONYMOUS: &str = "Anonymous";

/// `null`, `{}`, `[]`, `""`, `false` and `0` all count as no payload.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn json_payload(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) if !is_blank(&value) => Ok(value),
        _ => Err(ApiError::BadRequest("No JSON data provided")),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        has_database: state.has_database(),
        timestamp: state.clock.now().to_rfc3339(),
    })
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let data = json_payload(body)?;
    let text = data.get("complaint").and_then(Value::as_str).unwrap_or("");
    if text.is_empty() {
        return Err(ApiError::BadRequest("No complaint text provided"));
    }

    let now = state.clock.now();
    let result = state
        .classifier
        .classify(text, now)
        .map_err(|e| ApiError::AnalysisFailed(e.to_string()))?;
    info!(
        department = %result.department,
        priority = %result.priority,
        "analyzed complaint text"
    );

    Ok(Json(AnalyzeResponse {
        analysis: Analysis::from(&result),
        metadata: AnalysisMetadata {
            text_length: text.chars().count(),
            processed_at: now.to_rfc3339(),
            service: ENGINE_NAME.to_string(),
        },
    }))
}

/// POST /batch-analyze
///
/// Non-string entries are skipped and show up only in `summary.failed`.
pub async fn batch_analyze(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let data = json_payload(body)?;
    let complaints = match data.get("complaints").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        _ => return Err(ApiError::BadRequest("No complaints provided")),
    };

    let results: Vec<BatchItem> = complaints
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let text = entry.as_str()?;
            let department = state.classifier.predict_department(text);
            let priority = state.classifier.predict_priority(text);
            Some(BatchItem {
                id: idx,
                text_preview: text_preview(text),
                department: department.label,
                department_confidence: department.confidence,
                priority: priority.label,
                priority_confidence: priority.confidence,
                status: "analyzed".to_string(),
            })
        })
        .collect();

    let summary = BatchSummary {
        total: complaints.len(),
        successful: results.len(),
        failed: complaints.len() - results.len(),
    };
    info!(
        total = summary.total,
        successful = summary.successful,
        "batch analyzed"
    );

    Ok(Json(BatchResponse {
        count: results.len(),
        results,
        summary,
    }))
}

/// POST /classify-complaint/{id}
pub async fn classify_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let store = state.store()?;
    let result = classify_stored(store, &state.classifier, state.clock.as_ref(), &id).await?;

    Ok(Json(ClassifyResponse {
        success: true,
        message: format!("Complaint {id} classified successfully"),
        complaint_id: id,
        analysis: ClassifySummary {
            department: result.department,
            priority: result.priority,
            deadline: result.deadline.to_rfc3339(),
        },
    }))
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let summary = state.classifier.summary();
    let connected = state.has_database();

    Json(StatsResponse {
        service: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        status: "operational".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check"),
            EndpointInfo::new("/analyze", "POST", "Analyze complaint"),
            EndpointInfo::new("/batch-analyze", "POST", "Batch analysis"),
            EndpointInfo::new("/classify-complaint/<id>", "POST", "Classify existing complaint"),
            EndpointInfo::new("/stats", "GET", "Service statistics"),
            EndpointInfo::new("/complaints", "GET", "List complaints"),
            EndpointInfo::new("/my-complaints", "GET", "List a user's complaints"),
            EndpointInfo::new("/submit-complaint", "POST", "Submit complaint"),
            EndpointInfo::new("/update-complaint-status", "POST", "Update complaint status"),
        ],
        keywords: KeywordStats {
            departments: summary.departments,
            priority_levels: summary.priority_levels,
            total_keywords: summary.total_keywords,
        },
        database: DatabaseInfo {
            connected,
            mode: if connected { "DocumentStore" } else { "API-only" }.to_string(),
        },
    })
}

/// Newest first; complaints without a creation time go last.
fn listing(state: &AppState, docs: Vec<(String, Complaint)>) -> Json<ComplaintListResponse> {
    let now = state.clock.now();
    let mut complaints: Vec<ListedComplaint> = docs
        .into_iter()
        .map(|(id, complaint)| ListedComplaint::at(id, complaint, now))
        .collect();
    complaints.sort_by(|a, b| b.complaint.created_at.cmp(&a.complaint.created_at));

    Json(ComplaintListResponse {
        success: true,
        count: complaints.len(),
        complaints,
    })
}

/// GET /complaints
pub async fn list_complaints(
    State(state): State<AppState>,
) -> Result<Json<ComplaintListResponse>, ApiError> {
    let docs = state
        .store()?
        .list()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(listing(&state, docs))
}

/// GET /my-complaints?userId=
pub async fn my_complaints(
    State(state): State<AppState>,
    Query(query): Query<UserComplaintsQuery>,
) -> Result<Json<ComplaintListResponse>, ApiError> {
    let store = state.store()?;
    let user_id = match query.user_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ApiError::BadRequest("Missing userId")),
    };
    let docs: Vec<(String, Complaint)> = store
        .list()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .into_iter()
        .filter(|(_, c)| c.user_id.as_deref() == Some(user_id.as_str()))
        .collect();
    Ok(listing(&state, docs))
}

/// POST /submit-complaint
pub async fn submit_complaint(
    State(state): State<AppState>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let store = state.store()?;
    let Ok(Json(req)) = body else {
        return Err(ApiError::BadRequest("Missing fields"));
    };
    let description = match req.description {
        Some(d) if !d.trim().is_empty() => d,
        _ => return Err(ApiError::BadRequest("Missing fields")),
    };
    let user_name = req
        .user_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    let id = submit(
        store,
        state.clock.as_ref(),
        NewComplaint {
            user_id: req.user_id.filter(|id| !id.is_empty()),
            user_name,
            description,
        },
    )
    .await?;

    Ok(Json(SubmitResponse {
        success: true,
        complaint_id: id,
        message: "Complaint submitted successfully".to_string(),
    }))
}

/// POST /update-complaint-status
pub async fn update_complaint_status(
    State(state): State<AppState>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let store = state.store()?;
    let Ok(Json(req)) = body else {
        return Err(ApiError::BadRequest("Missing fields"));
    };
    let (Some(id), Some(status)) = (req.complaint_id, req.status) else {
        return Err(ApiError::BadRequest("Missing fields"));
    };
    if id.is_empty() || status.is_empty() {
        return Err(ApiError::BadRequest("Missing fields"));
    }
    let admin = req
        .admin_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN.to_string());

    let updated = update_status(
        store,
        state.clock.as_ref(),
        &id,
        ComplaintStatus::from(status),
        &admin,
    )
    .await?;

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: format!("Status updated to {}", updated.status),
        complaint_id: id,
    }))
}
