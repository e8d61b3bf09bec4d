pub mod api;
pub mod clock;
pub mod complaint;
pub mod deadline;
pub mod normalize;

pub use clock::{Clock, FixedClock, SystemClock};
pub use complaint::{
    AI_ACTOR, AuditAction, ClassificationResult, Complaint, ComplaintPatch, ComplaintStatus,
    NewComplaint, Priority, UnknownPriority,
};
pub use deadline::{DeadlineError, deadline_for, deadline_for_label, is_overdue, resolution_window};
pub use normalize::normalize_text;
