//! Shared request/response types for the analysis HTTP API.
//!
//! Served by `nagrik-api` and consumed by `nagrik-client`. Field names are
//! snake_case on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClassificationResult, Complaint, Priority};

/// Service name reported by `/health` and `/stats`.
pub const SERVICE_NAME: &str = "Nagrik Rakshak AI";

/// Reported in `/analyze` metadata.
pub const ENGINE_NAME: &str = "AI Classification Engine";

/// Reported by `/stats`.
pub const SERVICE_VERSION: &str = "1.0.0";

/// Longest batch text preview, in characters, before an ellipsis is added.
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub has_database: bool,
    /// ISO 8601 timestamp string.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub complaint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub department: String,
    pub department_confidence: u8,
    pub priority: Priority,
    pub priority_confidence: u8,
    /// ISO 8601 timestamp string.
    pub deadline: String,
    pub recommended_action: String,
    /// `High` for High priority, otherwise `Normal`.
    pub urgency: String,
}

impl From<&ClassificationResult> for Analysis {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            department: result.department.clone(),
            department_confidence: result.department_confidence,
            priority: result.priority,
            priority_confidence: result.priority_confidence,
            deadline: result.deadline.to_rfc3339(),
            recommended_action: result.recommended_action(),
            urgency: result.urgency().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Length of the submitted text in characters.
    pub text_length: usize,
    pub processed_at: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: Analysis,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub complaints: Vec<String>,
}

/// One analysed entry of a batch. `id` is the entry's index in the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: usize,
    pub text_preview: String,
    pub department: String,
    pub department_confidence: u8,
    pub priority: Priority,
    pub priority_confidence: u8,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub count: usize,
    pub results: Vec<BatchItem>,
    pub summary: BatchSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifySummary {
    pub department: String,
    pub priority: Priority,
    pub deadline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub complaint_id: String,
    pub analysis: ClassifySummary,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default, alias = "userName")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub complaint_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default, alias = "complaintId")]
    pub complaint_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "adminName")]
    pub admin_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub complaint_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    pub fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordStats {
    pub departments: usize,
    pub priority_levels: usize,
    pub total_keywords: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub connected: bool,
    /// `DocumentStore` or `API-only`.
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub endpoints: Vec<EndpointInfo>,
    pub keywords: KeywordStats,
    pub database: DatabaseInfo,
}

/// A stored complaint with its id and elapsed-time fields computed at listing
/// time. Complaint fields keep their stored camelCase names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedComplaint {
    pub id: String,
    #[serde(flatten)]
    pub complaint: Complaint,
    /// `"3h"` or `"2d 5h"`; empty without a creation time.
    pub time_passed: String,
    pub hours_passed: i64,
    pub is_overdue: bool,
}

impl ListedComplaint {
    pub fn at(id: String, complaint: Complaint, now: DateTime<Utc>) -> Self {
        let hours_passed = complaint
            .created_at
            .map(|created| (now - created).num_hours().max(0))
            .unwrap_or(0);
        let time_passed = match complaint.created_at {
            None => String::new(),
            Some(_) if hours_passed >= 24 => {
                format!("{}d {}h", hours_passed / 24, hours_passed % 24)
            }
            Some(_) => format!("{hours_passed}h"),
        };
        Self {
            is_overdue: complaint.is_overdue_at(now),
            id,
            complaint,
            time_passed,
            hours_passed,
        }
    }
}

/// Query string of `/my-complaints`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserComplaintsQuery {
    #[serde(default, rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintListResponse {
    pub success: bool,
    pub count: usize,
    pub complaints: Vec<ListedComplaint>,
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` appended when cut.
pub fn text_preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn analysis_from_result() {
        let result = ClassificationResult {
            department: "PWD".into(),
            department_confidence: 40,
            priority: Priority::Medium,
            priority_confidence: 40,
            deadline: Utc.with_ymd_and_hms(2026, 2, 24, 10, 0, 0).unwrap(),
        };
        let analysis = Analysis::from(&result);
        assert_eq!(analysis.recommended_action, "Forward to PWD department");
        assert_eq!(analysis.urgency, "Normal");
        assert_eq!(analysis.deadline, "2026-02-24T10:00:00+00:00");

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["priority"], "Medium");
        assert_eq!(json["department_confidence"], 40);
    }

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(text_preview("pothole on main road"), "pothole on main road");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let preview = text_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn requests_accept_camel_case_names() {
        let req: StatusUpdateRequest = serde_json::from_str(
            r#"{"complaintId": "c1", "status": "resolved", "adminName": "Ravi"}"#,
        )
        .unwrap();
        assert_eq!(req.complaint_id.as_deref(), Some("c1"));
        assert_eq!(req.admin_name.as_deref(), Some("Ravi"));

        let req: SubmitRequest = serde_json::from_str(
            r#"{"userId": "u-1", "userName": "Asha", "description": "pothole"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
        assert_eq!(req.user_name.as_deref(), Some("Asha"));
    }

    #[test]
    fn listed_complaint_elapsed_time() {
        let created = Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap();
        let complaint = Complaint {
            created_at: Some(created),
            ..Default::default()
        };

        let fresh = ListedComplaint::at("c1".into(), complaint.clone(), created);
        assert_eq!(fresh.time_passed, "0h");
        assert_eq!(fresh.hours_passed, 0);

        let later = created + chrono::TimeDelta::minutes(53 * 60 + 59);
        let listed = ListedComplaint::at("c1".into(), complaint, later);
        assert_eq!(listed.time_passed, "2d 5h");
        assert_eq!(listed.hours_passed, 53);
        assert!(!listed.is_overdue);

        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["timePassed"], "2d 5h");
        assert_eq!(json["hoursPassed"], 53);
        assert_eq!(json["isOverdue"], false);
    }

    #[test]
    fn listed_complaint_without_creation_time() {
        let listed = ListedComplaint::at("c1".into(), Complaint::default(), Utc::now());
        assert_eq!(listed.time_passed, "");
        assert_eq!(listed.hours_passed, 0);
    }

    #[test]
    fn status_update_request_tolerates_missing_fields() {
        let req: StatusUpdateRequest = serde_json::from_str(r#"{"status": "resolved"}"#).unwrap();
        assert!(req.complaint_id.is_none());
        assert_eq!(req.status.as_deref(), Some("resolved"));
    }
}
