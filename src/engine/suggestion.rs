use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::eligibility::eligible_candidates;
use crate::engine::enrichment::{enrich_candidate, CandidateProfile, NearbyConflict, SameDayWindow};
use crate::engine::ranking::{RankedCandidate, Tier};
use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::availability::AvailabilityOverride;
use crate::models::event::Event;
use crate::models::rating::Rating;
use crate::models::rule::AssignmentRule;
use crate::models::staff::StaffMember;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub client: String,
    pub venue: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub staff_needed: u16,
}

/// One ranked suggestion: the delegate's verdict joined with the enriched
/// features it was scored on.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub staff_id: Uuid,
    pub name: String,
    pub code: String,
    pub score: f64,
    pub tier: Tier,
    pub strengths: Vec<String>,
    pub caveats: Vec<String>,
    pub justification: String,
    pub average_rating: f64,
    pub recent_performance: Option<f64>,
    pub prior_jobs_with_client: usize,
    pub month_events: usize,
    pub distance_km: Option<f64>,
    pub nearby_conflicts: Vec<NearbyConflict>,
    pub same_day_assignments: Vec<SameDayWindow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub success: bool,
    pub event_id: Uuid,
    pub event: EventSummary,
    /// Eligible candidates before ranking, not the suggestion count.
    pub total_candidates: usize,
    pub suggestions: Vec<Suggestion>,
    pub summary: String,
    pub alerts: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub fn suggest(
    state: &AppState,
    event_id: Uuid,
    limit: Option<usize>,
) -> Result<SuggestionResponse, AppError> {
    let start = Instant::now();
    let result = run(state, event_id, limit);

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .suggestion_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .suggestions_total
        .with_label_values(&[outcome])
        .inc();

    result
}

fn run(
    state: &AppState,
    event_id: Uuid,
    limit: Option<usize>,
) -> Result<SuggestionResponse, AppError> {
    let event = state
        .events
        .get(&event_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("event {event_id} not found")))?;

    let staff: Vec<StaffMember> = state.staff.iter().map(|e| e.value().clone()).collect();
    let assignments: Vec<Assignment> =
        state.assignments.iter().map(|e| e.value().clone()).collect();
    let overrides: Vec<AvailabilityOverride> =
        state.overrides.iter().map(|e| e.value().clone()).collect();
    let events_by_id: HashMap<Uuid, Event> = state
        .events
        .iter()
        .map(|e| (*e.key(), e.value().clone()))
        .collect();
    let rules: Vec<AssignmentRule> = state.rules.iter().map(|e| e.value().clone()).collect();

    let eligible = eligible_candidates(&staff, &event, &assignments, &overrides, &state.scheduling);
    let total_candidates = eligible.len();
    state
        .metrics
        .eligible_candidates
        .observe(total_candidates as f64);

    let profiles: Vec<CandidateProfile> = eligible
        .iter()
        .map(|member| {
            let member_assignments: Vec<Assignment> = assignments
                .iter()
                .filter(|a| a.staff_id == member.id)
                .cloned()
                .collect();
            let member_ratings: Vec<Rating> = state
                .ratings
                .iter()
                .filter(|r| r.value().staff_id == member.id)
                .map(|r| r.value().clone())
                .collect();

            enrich_candidate(
                member,
                &event,
                &member_assignments,
                &events_by_id,
                &member_ratings,
                &state.scheduling,
            )
        })
        .collect();

    let limit = limit.unwrap_or(state.scheduling.default_suggestion_limit);
    let ranking = state
        .ranker
        .rank(&event, &profiles, &rules, limit)
        .map_err(|err| AppError::Upstream(err.to_string()))?;

    // Defensive join: only ids we actually offered to the delegate may come
    // back, whatever the delegate implementation.
    let by_id: HashMap<Uuid, &CandidateProfile> =
        profiles.iter().map(|p| (p.staff_id, p)).collect();
    let mut suggestions = Vec::with_capacity(ranking.ranked.len());
    for candidate in ranking.ranked {
        match by_id.get(&candidate.staff_id) {
            Some(profile) => suggestions.push(merge(candidate, profile)),
            None => {
                warn!(staff_id = %candidate.staff_id, "delegate returned an unknown candidate id; dropped");
            }
        }
    }

    let summary = if total_candidates == 0 {
        format!(
            "no eligible candidates for {} on {}; review availability and requirements",
            event.client, event.date
        )
    } else {
        format!(
            "{} of {} eligible candidates ranked for {} at {} on {}",
            suggestions.len(),
            total_candidates,
            event.client,
            event.venue,
            event.date
        )
    };

    info!(
        event_id = %event.id,
        eligible = total_candidates,
        ranked = suggestions.len(),
        "suggestions computed"
    );

    Ok(SuggestionResponse {
        success: true,
        event_id: event.id,
        event: EventSummary {
            id: event.id,
            client: event.client.clone(),
            venue: event.venue.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            staff_needed: event.staff_needed,
        },
        total_candidates,
        suggestions,
        summary,
        alerts: ranking.alerts,
        timestamp: Utc::now(),
    })
}

fn merge(candidate: RankedCandidate, profile: &CandidateProfile) -> Suggestion {
    Suggestion {
        staff_id: candidate.staff_id,
        name: profile.name.clone(),
        code: profile.code.clone(),
        score: candidate.score,
        tier: candidate.tier,
        strengths: candidate.strengths,
        caveats: candidate.caveats,
        justification: candidate.justification,
        average_rating: profile.average_rating,
        recent_performance: profile.recent_performance,
        prior_jobs_with_client: profile.prior_jobs_with_client,
        month_events: profile.month_events,
        distance_km: profile.distance_km,
        nearby_conflicts: profile.nearby_conflicts.clone(),
        same_day_assignments: profile.same_day_assignments.clone(),
    }
}
