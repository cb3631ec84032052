use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::eligibility::window_gap_hours;
use crate::engine::enrichment::CandidateProfile;
use crate::models::event::Event;
use crate::models::rule::{AssignmentRule, RuleKind};

const RATING_WEIGHT: f64 = 0.40;
const DISTANCE_WEIGHT: f64 = 0.25;
const CLIENT_HISTORY_WEIGHT: f64 = 0.20;
const WORKLOAD_WEIGHT: f64 = 0.15;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tier {
    Top,
    Recommended,
    Suitable,
    LastResort,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub staff_id: Uuid,
    /// 0..100.
    pub score: f64,
    pub tier: Tier,
    pub strengths: Vec<String>,
    pub caveats: Vec<String>,
    pub justification: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Ranking {
    pub ranked: Vec<RankedCandidate>,
    /// Mandatory-rule knockouts and other findings worth surfacing to the
    /// coordinator alongside the list.
    pub alerts: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("ranking delegate failed: {0}")]
    Delegate(String),
}

/// Scores and orders enriched candidates, honoring the configured assignment
/// rules. Implementations may call out to an external model; whatever comes
/// back, the caller joins returned ids against the eligible set before
/// display and drops anything unknown.
pub trait RankingDelegate: Send + Sync {
    fn rank(
        &self,
        event: &Event,
        candidates: &[CandidateProfile],
        rules: &[AssignmentRule],
        limit: usize,
    ) -> Result<Ranking, RankingError>;
}

/// Deterministic delegate: a weighted feature blend plus configured rule
/// bonuses and penalties. Mandatory rules are knockouts, never score
/// adjustments.
pub struct RuleScorer;

impl RuleScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingDelegate for RuleScorer {
    fn rank(
        &self,
        event: &Event,
        candidates: &[CandidateProfile],
        rules: &[AssignmentRule],
        limit: usize,
    ) -> Result<Ranking, RankingError> {
        let mut active: Vec<&AssignmentRule> = rules.iter().filter(|r| r.active).collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut alerts = Vec::new();
        let mut ranked = Vec::new();

        'candidates: for candidate in candidates {
            let mut score = base_score(candidate) * 100.0;
            let mut caveats = Vec::new();

            for rule in &active {
                match violation(rule, event, candidate) {
                    Some(message) if rule.mandatory => {
                        alerts.push(format!("{} excluded: {message}", candidate.name));
                        continue 'candidates;
                    }
                    Some(message) => {
                        score -= f64::from(rule.points.abs());
                        caveats.push(message);
                    }
                    None => {
                        if !rule.mandatory && rule.points > 0 {
                            score += f64::from(rule.points);
                        }
                    }
                }
            }

            let mut strengths = Vec::new();
            collect_signals(candidate, &mut strengths, &mut caveats);

            let score = score.clamp(0.0, 100.0);
            ranked.push(RankedCandidate {
                staff_id: candidate.staff_id,
                score,
                tier: tier_for(score),
                strengths,
                caveats,
                justification: justify(candidate, score),
            });
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(limit);

        Ok(Ranking { ranked, alerts })
    }
}

fn base_score(c: &CandidateProfile) -> f64 {
    let rating = (c.recent_performance.unwrap_or(c.average_rating) / 5.0).clamp(0.0, 1.0);
    // Unknown distance scores neutrally rather than penalizing members
    // without coordinates on file.
    let proximity = match c.distance_km {
        Some(d) => 1.0 / (1.0 + d.max(0.0) / 10.0),
        None => 0.5,
    };
    let history = (c.prior_jobs_with_client as f64 / 5.0).min(1.0);
    let freshness = 1.0 - (c.month_events as f64 / 10.0).min(1.0);

    rating * RATING_WEIGHT
        + proximity * DISTANCE_WEIGHT
        + history * CLIENT_HISTORY_WEIGHT
        + freshness * WORKLOAD_WEIGHT
}

fn violation(rule: &AssignmentRule, event: &Event, c: &CandidateProfile) -> Option<String> {
    match &rule.kind {
        RuleKind::MinRating { min } => (c.average_rating < *min).then(|| {
            format!(
                "rating {:.1} below required {:.1}",
                c.average_rating, min
            )
        }),
        RuleKind::MaxDistanceKm { max } => c
            .distance_km
            .filter(|d| d > max)
            .map(|d| format!("{d:.0} km from the venue, limit {max:.0} km")),
        RuleKind::MinRestHours { hours } => c
            .same_day_assignments
            .iter()
            .map(|w| window_gap_hours(event.start_time, event.end_time, w.start_time, w.end_time))
            .filter(|gap| gap < hours)
            .min_by(|a, b| a.total_cmp(b))
            .map(|gap| {
                format!("only {gap:.1} h of rest around an existing shift, {hours:.1} h required")
            }),
        RuleKind::MaxEventsPerMonth { max } => (c.month_events > *max as usize).then(|| {
            format!(
                "{} events already booked this month, limit {max}",
                c.month_events
            )
        }),
    }
}

fn collect_signals(c: &CandidateProfile, strengths: &mut Vec<String>, caveats: &mut Vec<String>) {
    let effective = c.recent_performance.unwrap_or(c.average_rating);
    if effective >= 4.5 {
        strengths.push(format!("rated {effective:.1} over recent events"));
    }
    if c.prior_jobs_with_client > 0 {
        strengths.push(format!(
            "{} previous job(s) with this client",
            c.prior_jobs_with_client
        ));
    }

    match c.distance_km {
        Some(d) if d <= 10.0 => strengths.push(format!("{d:.0} km from the venue")),
        Some(d) => {
            if c.work_radius_km.is_some_and(|radius| d > radius) {
                caveats.push(format!(
                    "venue is {d:.0} km away, outside the preferred {:.0} km radius",
                    c.work_radius_km.unwrap_or_default()
                ));
            }
        }
        None => caveats.push("no location on file".to_string()),
    }

    if !c.nearby_conflicts.is_empty() {
        caveats.push(format!(
            "{} assignment(s) on adjacent days",
            c.nearby_conflicts.len()
        ));
    }
    if !c.same_day_assignments.is_empty() {
        caveats.push(format!(
            "{} other shift(s) the same day",
            c.same_day_assignments.len()
        ));
    }
}

fn tier_for(score: f64) -> Tier {
    if score >= 85.0 {
        Tier::Top
    } else if score >= 70.0 {
        Tier::Recommended
    } else if score >= 50.0 {
        Tier::Suitable
    } else {
        Tier::LastResort
    }
}

fn justify(c: &CandidateProfile, score: f64) -> String {
    format!(
        "score {:.0}/100: rated {:.1}, {} prior job(s) for this client, {} confirmed event(s) this month",
        score,
        c.recent_performance.unwrap_or(c.average_rating),
        c.prior_jobs_with_client,
        c.month_events
    )
}
