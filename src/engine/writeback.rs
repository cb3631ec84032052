use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::{Assignment, AssignmentStatus, Notification};
use crate::state::AppState;

/// Persists a chosen candidate as a pending assignment and notifies the
/// member. Not idempotent: two identical calls create two distinct records,
/// so callers must guard against double submission. The assignment and the
/// notification are independent writes with no shared transaction.
pub fn assign(
    state: &AppState,
    event_id: Uuid,
    staff_id: Uuid,
    score: Option<f64>,
) -> Result<Assignment, AppError> {
    let event = state
        .events
        .get(&event_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("event {event_id} not found")))?;
    let member = state
        .staff
        .get(&staff_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("staff member {staff_id} not found")))?;

    let assignment = Assignment {
        id: Uuid::new_v4(),
        event_id,
        staff_id,
        date: event.date,
        start_time: event.start_time,
        end_time: event.end_time,
        status: AssignmentStatus::Pending,
        score,
        assigned_at: Utc::now(),
    };
    state.assignments.insert(assignment.id, assignment.clone());
    state
        .metrics
        .assignments_total
        .with_label_values(&[assignment.status.label()])
        .inc();

    let notification = Notification {
        id: Uuid::new_v4(),
        staff_id,
        event_id,
        message: format!(
            "{}: new job for {} at {} on {}, from {} to {}",
            member.name, event.client, event.venue, event.date, event.start_time, event.end_time
        ),
        read: false,
        created_at: Utc::now(),
    };
    state.notifications.insert(notification.id, notification.clone());
    state.metrics.notifications_sent.inc();

    if state.notification_events_tx.send(notification).is_err() {
        debug!(staff_id = %staff_id, "no live notification subscribers");
    }

    info!(
        assignment_id = %assignment.id,
        event_id = %event_id,
        staff_id = %staff_id,
        "staff member assigned"
    );

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::assign;
    use crate::config::SchedulingConfig;
    use crate::error::AppError;
    use crate::models::assignment::AssignmentStatus;
    use crate::models::event::{Event, EventStatus};
    use crate::models::staff::{Specialty, StaffMember};
    use crate::state::AppState;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn seeded_state() -> (AppState, Uuid, Uuid) {
        let state = AppState::new(SchedulingConfig::default(), 16);

        let event = Event {
            id: Uuid::from_u128(1000),
            client: "Catering Sol".to_string(),
            venue: "Finca".to_string(),
            location: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            start_time: t(18),
            end_time: t(23),
            required_specialty: None,
            required_skills: Vec::new(),
            required_languages: Vec::new(),
            staff_needed: 2,
            shifts: Vec::new(),
            status: EventStatus::Open,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let member = StaffMember {
            id: Uuid::from_u128(1),
            name: "Lucía".to_string(),
            code: "C001".to_string(),
            specialty: Specialty::Waiter,
            experience_years: 3,
            skills: Vec::new(),
            languages: Vec::new(),
            rating: 4.0,
            work_radius_km: None,
            location: None,
            available: true,
            in_reserve: false,
            updated_at: Utc::now(),
        };

        let (event_id, staff_id) = (event.id, member.id);
        state.events.insert(event.id, event);
        state.staff.insert(member.id, member);
        (state, event_id, staff_id)
    }

    #[test]
    fn assignment_copies_the_event_window_and_notifies() {
        let (state, event_id, staff_id) = seeded_state();

        let assignment = assign(&state, event_id, staff_id, Some(87.0)).unwrap();

        assert_eq!(assignment.status, AssignmentStatus::Pending);
        assert_eq!(assignment.date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(assignment.start_time, t(18));
        assert_eq!(assignment.end_time, t(23));
        assert_eq!(assignment.score, Some(87.0));

        assert_eq!(state.notifications.len(), 1);
        let notification = state
            .notifications
            .iter()
            .next()
            .map(|entry| entry.value().clone())
            .unwrap();
        assert_eq!(notification.staff_id, staff_id);
        assert!(notification.message.contains("Catering Sol"));
    }

    // The write performs no dedup on purpose; the HTTP layer owns the
    // double-submission guard.
    #[test]
    fn repeated_calls_create_distinct_records() {
        let (state, event_id, staff_id) = seeded_state();

        let first = assign(&state, event_id, staff_id, None).unwrap();
        let second = assign(&state, event_id, staff_id, None).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(state.assignments.len(), 2);
        assert_eq!(state.notifications.len(), 2);
    }

    #[test]
    fn unknown_event_or_member_is_not_found() {
        let (state, event_id, staff_id) = seeded_state();

        let err = assign(&state, Uuid::from_u128(9999), staff_id, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = assign(&state, event_id, Uuid::from_u128(9999), None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
