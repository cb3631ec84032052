use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an assignment. Rejection is modeled as deletion, not a status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssignmentStatus {
    Pending,
    Sent,
    Confirmed,
    Hired,
}

impl AssignmentStatus {
    /// Forward-only transitions: Pending -> Sent -> Confirmed | Hired.
    pub fn can_transition_to(self, next: AssignmentStatus) -> bool {
        matches!(
            (self, next),
            (AssignmentStatus::Pending, AssignmentStatus::Sent)
                | (AssignmentStatus::Sent, AssignmentStatus::Confirmed)
                | (AssignmentStatus::Sent, AssignmentStatus::Hired)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Sent => "sent",
            AssignmentStatus::Confirmed => "confirmed",
            AssignmentStatus::Hired => "hired",
        }
    }
}

/// Links one staff member to one event. Date and times are copied from the
/// event at creation so the record stays meaningful if the event changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AssignmentStatus,
    pub score: Option<f64>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::AssignmentStatus;

    #[test]
    fn forward_transitions_are_accepted() {
        assert!(AssignmentStatus::Pending.can_transition_to(AssignmentStatus::Sent));
        assert!(AssignmentStatus::Sent.can_transition_to(AssignmentStatus::Confirmed));
        assert!(AssignmentStatus::Sent.can_transition_to(AssignmentStatus::Hired));
    }

    #[test]
    fn skipping_or_reversing_is_rejected() {
        assert!(!AssignmentStatus::Pending.can_transition_to(AssignmentStatus::Confirmed));
        assert!(!AssignmentStatus::Confirmed.can_transition_to(AssignmentStatus::Pending));
        assert!(!AssignmentStatus::Hired.can_transition_to(AssignmentStatus::Sent));
        assert!(!AssignmentStatus::Sent.can_transition_to(AssignmentStatus::Pending));
    }
}
