//! Complaint records and the classification outputs written onto them.
//!
//! The complaint document is owned by the store; this crate only describes its
//! shape and the single way it may be mutated ([`ComplaintPatch`]).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Actor recorded on audit actions written by the classification engine.
pub const AI_ACTOR: &str = "AI System";

/// Resolution priority assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority label: {0:?}")]
pub struct UnknownPriority(pub String);

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Lenient parse used by the deadline rules: anything that is not
    /// `High` or `Medium` is treated as `Low`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Low)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// Lifecycle status of a complaint.
///
/// Only `new` is acted on by the change listener. Statuses this crate does not
/// know about round-trip unchanged through [`ComplaintStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplaintStatus {
    #[default]
    New,
    Classified,
    UnderAction,
    Resolved,
    Other(String),
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Classified => "classified",
            Self::UnderAction => "under_action",
            Self::Resolved => "resolved",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Resolved or being acted on: no longer eligible for the overdue flag.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Resolved | Self::UnderAction)
    }
}

impl From<&str> for ComplaintStatus {
    fn from(s: &str) -> Self {
        match s {
            "new" => Self::New,
            "classified" => Self::Classified,
            "under_action" => Self::UnderAction,
            "resolved" => Self::Resolved,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ComplaintStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ComplaintStatus> for String {
    fn from(status: ComplaintStatus) -> Self {
        match status {
            ComplaintStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a complaint's append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditAction {
    /// Human-readable summary.
    pub action: String,
    /// ISO 8601 timestamp string.
    pub timestamp: String,
    pub by: String,
}

impl AuditAction {
    pub fn new(action: impl Into<String>, by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            action: action.into(),
            timestamp: at.to_rfc3339(),
            by: by.into(),
        }
    }

    /// Entry written by the engine after classifying a complaint.
    pub fn classified(result: &ClassificationResult, at: DateTime<Utc>) -> Self {
        Self::new(result.summary(), AI_ACTOR, at)
    }

    pub fn submitted(by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new("Complaint Submitted", by, at)
    }

    pub fn status_changed(status: &ComplaintStatus, by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(format!("Status changed to {status}"), by, at)
    }
}

/// Output of one classification event. Never cached; computed per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub department: String,
    /// 0-100.
    pub department_confidence: u8,
    pub priority: Priority,
    /// 0-100.
    pub priority_confidence: u8,
    /// Derived from `priority` at the same classification event.
    pub deadline: DateTime<Utc>,
}

impl ClassificationResult {
    /// "AI classified as High priority for Electricity department"
    pub fn summary(&self) -> String {
        format!(
            "AI classified as {} priority for {} department",
            self.priority, self.department
        )
    }

    pub fn recommended_action(&self) -> String {
        format!("Forward to {} department", self.department)
    }

    pub fn urgency(&self) -> &'static str {
        if self.priority == Priority::High {
            "High"
        } else {
            "Normal"
        }
    }
}

/// Fields a citizen supplies when filing a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    /// Account that filed the complaint, when known.
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_name: String,
    pub description: String,
}

/// A complaint document as stored in the `complaints` collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ComplaintStatus,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub department_confidence: Option<u8>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub priority_confidence: Option<u8>,
    #[serde(default)]
    pub actions: Vec<AuditAction>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overdue: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ai_processed: bool,
    #[serde(default)]
    pub ai_processed_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// A freshly filed complaint: status `new`, no deadline, one submission action.
    pub fn submitted(new: NewComplaint, at: DateTime<Utc>) -> Self {
        Self {
            actions: vec![AuditAction::submitted(new.user_name.clone(), at)],
            user_id: new.user_id,
            user_name: Some(new.user_name),
            description: Some(new.description),
            status: ComplaintStatus::New,
            created_at: Some(at),
            last_updated: Some(at),
            ..Default::default()
        }
    }

    /// Flagged overdue, or past a deadline without being resolved.
    ///
    /// Read-side view for listings; the stored `overdue` flag is only set by
    /// the change listener.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.overdue
            || (self.status != ComplaintStatus::Resolved && self.deadline.is_some_and(|d| now > d))
    }

    /// Description text, empty when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Apply a patch. Returns `true` when any field changed.
    ///
    /// Audit actions are only ever appended and `overdue` is only ever set,
    /// never cleared.
    pub fn apply(&mut self, patch: ComplaintPatch) -> bool {
        let before = self.clone();

        if let Some(result) = patch.classification {
            self.department = Some(result.department);
            self.department_confidence = Some(result.department_confidence);
            self.priority = Some(result.priority);
            self.priority_confidence = Some(result.priority_confidence);
            self.deadline = Some(result.deadline);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(action) = patch.append_action {
            self.actions.push(action);
        }
        if patch.mark_overdue {
            self.overdue = true;
        }
        if let Some(at) = patch.last_updated {
            self.last_updated = Some(at);
        }
        if let Some(at) = patch.ai_processed_at {
            self.ai_processed = true;
            self.ai_processed_at = Some(at);
        }

        *self != before
    }
}

/// A single-document field update.
///
/// Department, confidences, priority and deadline can only be written together
/// through `classification`, so a stored deadline always belongs to the stored
/// priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintPatch {
    pub classification: Option<ClassificationResult>,
    pub status: Option<ComplaintStatus>,
    pub append_action: Option<AuditAction>,
    pub mark_overdue: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub ai_processed_at: Option<DateTime<Utc>>,
}

impl ComplaintPatch {
    /// Write-back for a classification event: results, status `classified`,
    /// one audit action and the update timestamp.
    pub fn classification(result: ClassificationResult, at: DateTime<Utc>) -> Self {
        Self {
            append_action: Some(AuditAction::classified(&result, at)),
            classification: Some(result),
            status: Some(ComplaintStatus::Classified),
            last_updated: Some(at),
            ..Default::default()
        }
    }

    /// Only sets `overdue = true`.
    pub fn overdue() -> Self {
        Self {
            mark_overdue: true,
            ..Default::default()
        }
    }

    pub fn status_change(status: ComplaintStatus, by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            append_action: Some(AuditAction::status_changed(&status, by, at)),
            status: Some(status),
            last_updated: Some(at),
            ..Default::default()
        }
    }

    /// Mark the write as produced by an explicit AI processing request.
    pub fn with_ai_processed(mut self, at: DateTime<Utc>) -> Self {
        self.ai_processed_at = Some(at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap()
    }

    fn result() -> ClassificationResult {
        ClassificationResult {
            department: "Electricity".into(),
            department_confidence: 60,
            priority: Priority::High,
            priority_confidence: 25,
            deadline: at() + TimeDelta::hours(24),
        }
    }

    #[test]
    fn priority_labels() {
        assert_eq!("High".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(UnknownPriority("urgent".into()))
        );
        assert_eq!(Priority::from_label("Medium"), Priority::Medium);
        assert_eq!(Priority::from_label("whenever"), Priority::Low);
        assert_eq!(Priority::High.to_string(), "High");
    }

    #[test]
    fn status_round_trips_unknown_values() {
        let status: ComplaintStatus = serde_json::from_str("\"escalated\"").unwrap();
        assert_eq!(status, ComplaintStatus::Other("escalated".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"escalated\"");

        let status: ComplaintStatus = serde_json::from_str("\"under_action\"").unwrap();
        assert_eq!(status, ComplaintStatus::UnderAction);
        assert!(status.is_settled());
        assert!(!ComplaintStatus::Classified.is_settled());
    }

    #[test]
    fn summary_and_urgency() {
        let r = result();
        assert_eq!(
            r.summary(),
            "AI classified as High priority for Electricity department"
        );
        assert_eq!(r.recommended_action(), "Forward to Electricity department");
        assert_eq!(r.urgency(), "High");
    }

    #[test]
    fn submitted_complaint_shape() {
        let c = Complaint::submitted(
            NewComplaint {
                user_id: None,
                user_name: "Asha".into(),
                description: "No water since Monday".into(),
            },
            at(),
        );
        assert_eq!(c.status, ComplaintStatus::New);
        assert_eq!(c.deadline, None);
        assert!(!c.overdue);
        assert_eq!(c.actions.len(), 1);
        assert_eq!(c.actions[0].action, "Complaint Submitted");
        assert_eq!(c.actions[0].by, "Asha");
    }

    #[test]
    fn submitted_complaint_keeps_user_id() {
        let c = Complaint::submitted(
            NewComplaint {
                user_id: Some("u-17".into()),
                user_name: "Asha".into(),
                description: "broken streetlight".into(),
            },
            at(),
        );
        assert_eq!(c.user_id.as_deref(), Some("u-17"));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["userId"], "u-17");
    }

    #[test]
    fn overdue_view_ignores_resolved_complaints() {
        let mut c = Complaint::default();
        assert!(!c.is_overdue_at(at()));

        c.apply(ComplaintPatch::classification(result(), at()));
        let deadline = at() + TimeDelta::hours(24);
        assert!(!c.is_overdue_at(deadline));
        assert!(c.is_overdue_at(deadline + TimeDelta::seconds(1)));

        c.status = ComplaintStatus::Resolved;
        assert!(!c.is_overdue_at(deadline + TimeDelta::seconds(1)));

        // The stored flag wins regardless of status.
        c.overdue = true;
        assert!(c.is_overdue_at(at()));
    }

    #[test]
    fn classification_patch_sets_all_fields_and_appends() {
        let mut c = Complaint::submitted(
            NewComplaint {
                user_id: None,
                user_name: "Asha".into(),
                description: "live wire".into(),
            },
            at(),
        );
        let changed = c.apply(ComplaintPatch::classification(result(), at()));
        assert!(changed);
        assert_eq!(c.department.as_deref(), Some("Electricity"));
        assert_eq!(c.priority, Some(Priority::High));
        assert_eq!(c.deadline, Some(at() + TimeDelta::hours(24)));
        assert_eq!(c.status, ComplaintStatus::Classified);
        assert_eq!(c.actions.len(), 2);
        assert_eq!(c.actions[1].by, AI_ACTOR);
        assert!(!c.ai_processed);
    }

    #[test]
    fn overdue_is_monotonic() {
        let mut c = Complaint::default();
        assert!(c.apply(ComplaintPatch::overdue()));
        assert!(c.overdue);

        // A patch without mark_overdue leaves the flag alone.
        c.apply(ComplaintPatch::status_change(
            ComplaintStatus::Classified,
            "Admin",
            at(),
        ));
        assert!(c.overdue);

        // Re-marking is a no-op.
        assert!(!c.apply(ComplaintPatch::overdue()));
    }

    #[test]
    fn ai_processed_marker() {
        let mut c = Complaint::default();
        c.apply(ComplaintPatch::classification(result(), at()).with_ai_processed(at()));
        assert!(c.ai_processed);
        assert_eq!(c.ai_processed_at, Some(at()));
    }

    #[test]
    fn complaint_json_uses_camel_case() {
        let mut c = Complaint::default();
        c.apply(ComplaintPatch::classification(result(), at()));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["departmentConfidence"], 60);
        assert_eq!(json["priority"], "High");
        assert_eq!(json["status"], "classified");

        let parsed: Complaint = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, c);
    }

    #[test]
    fn sparse_document_parses() {
        let c: Complaint = serde_json::from_str(r#"{"description": "pothole", "status": "new"}"#).unwrap();
        assert_eq!(c.description_text(), "pothole");
        assert!(c.actions.is_empty());
        assert!(!c.overdue);
    }
}
