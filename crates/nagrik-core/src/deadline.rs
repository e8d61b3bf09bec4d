//! Resolution deadlines derived from priority.
//!
//! | Priority | Window   |
//! |----------|----------|
//! | High     | 24 hours |
//! | Medium   | 72 hours |
//! | Low      | 7 days   |
//!
//! Everything is UTC. The caller passes "now" explicitly (see [`crate::Clock`]).

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::Priority;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeadlineError {
    #[error("deadline for {priority} priority from {now} is outside the representable range")]
    OutOfRange { priority: Priority, now: DateTime<Utc> },
}

/// Time allowed to resolve a complaint of the given priority.
pub fn resolution_window(priority: Priority) -> TimeDelta {
    match priority {
        Priority::High => TimeDelta::hours(24),
        Priority::Medium => TimeDelta::hours(72),
        Priority::Low => TimeDelta::days(7),
    }
}

/// Absolute deadline: `now` plus the priority's resolution window.
pub fn deadline_for(priority: Priority, now: DateTime<Utc>) -> Result<DateTime<Utc>, DeadlineError> {
    now.checked_add_signed(resolution_window(priority))
        .ok_or(DeadlineError::OutOfRange { priority, now })
}

/// Like [`deadline_for`], from a free-form label. Labels other than
/// `High` and `Medium` get the `Low` window.
pub fn deadline_for_label(label: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DeadlineError> {
    deadline_for(Priority::from_label(label), now)
}

/// A deadline exists and `now` is strictly past it.
pub fn is_overdue(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.is_some_and(|d| now > d)
}
