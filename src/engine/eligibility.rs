use chrono::NaiveTime;
use tracing::debug;

use crate::config::SchedulingConfig;
use crate::models::assignment::Assignment;
use crate::models::availability::AvailabilityOverride;
use crate::models::event::Event;
use crate::models::staff::{Specialty, StaffMember};

#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    NotAvailable,
    InReserve,
    BlockedByOverride,
    AlreadyAssigned,
    InsufficientRest { gap_hours: f64 },
    SpecialtyMismatch,
    MissingSkills(Vec<String>),
    MissingLanguages(Vec<String>),
}

/// Gap between two same-date time windows, in hours at minute precision.
/// Overlapping windows count as zero gap.
pub(crate) fn window_gap_hours(
    new_start: NaiveTime,
    new_end: NaiveTime,
    existing_start: NaiveTime,
    existing_end: NaiveTime,
) -> f64 {
    let after = new_start.signed_duration_since(existing_end).num_minutes();
    let before = existing_start.signed_duration_since(new_end).num_minutes();

    // For disjoint windows exactly one direction is non-negative and is the
    // true gap; two negatives mean the windows overlap.
    let gap = after.max(before);
    if gap < 0 { 0.0 } else { gap as f64 / 60.0 }
}

/// Decides whether one staff member may be proposed for an event. `None`
/// means eligible. `assignments` and `overrides` are the member's own records.
pub fn check_eligibility(
    member: &StaffMember,
    event: &Event,
    assignments: &[Assignment],
    overrides: &[AvailabilityOverride],
    config: &SchedulingConfig,
) -> Option<RejectionReason> {
    if !member.available {
        return Some(RejectionReason::NotAvailable);
    }
    if member.in_reserve {
        return Some(RejectionReason::InReserve);
    }

    if overrides
        .iter()
        .any(|o| o.applies_on(event.date) && o.blocks(event.start_time, event.end_time))
    {
        return Some(RejectionReason::BlockedByOverride);
    }

    if assignments.iter().any(|a| a.event_id == event.id) {
        return Some(RejectionReason::AlreadyAssigned);
    }

    for existing in assignments.iter().filter(|a| a.date == event.date) {
        let gap = window_gap_hours(
            event.start_time,
            event.end_time,
            existing.start_time,
            existing.end_time,
        );
        if gap < config.min_rest_hours {
            return Some(RejectionReason::InsufficientRest { gap_hours: gap });
        }
    }

    if let Some(required) = event.required_specialty {
        if required != Specialty::General && member.specialty != required {
            return Some(RejectionReason::SpecialtyMismatch);
        }
    }

    let missing_skills = missing(&event.required_skills, &member.skills);
    if !missing_skills.is_empty() {
        return Some(RejectionReason::MissingSkills(missing_skills));
    }

    let missing_languages = missing(&event.required_languages, &member.languages);
    if !missing_languages.is_empty() {
        return Some(RejectionReason::MissingLanguages(missing_languages));
    }

    None
}

/// Narrows the full roster down to members who may be offered for the event,
/// sorted by stored average rating descending as the default presentation
/// order before any ranking runs.
pub fn eligible_candidates(
    staff: &[StaffMember],
    event: &Event,
    assignments: &[Assignment],
    overrides: &[AvailabilityOverride],
    config: &SchedulingConfig,
) -> Vec<StaffMember> {
    let mut eligible: Vec<StaffMember> = staff
        .iter()
        .filter(|member| {
            let member_assignments: Vec<Assignment> = assignments
                .iter()
                .filter(|a| a.staff_id == member.id)
                .cloned()
                .collect();
            let member_overrides: Vec<AvailabilityOverride> = overrides
                .iter()
                .filter(|o| o.staff_id == member.id)
                .cloned()
                .collect();

            match check_eligibility(member, event, &member_assignments, &member_overrides, config)
            {
                None => true,
                Some(reason) => {
                    debug!(staff_id = %member.id, ?reason, "candidate rejected");
                    false
                }
            }
        })
        .cloned()
        .collect();

    eligible.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    eligible
}

fn missing(required: &[String], held: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|req| !held.iter().any(|h| h.eq_ignore_ascii_case(req)))
        .cloned()
        .collect()
}
