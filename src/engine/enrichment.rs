use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::config::SchedulingConfig;
use crate::geo::distance_km;
use crate::models::assignment::{Assignment, AssignmentStatus};
use crate::models::event::Event;
use crate::models::rating::Rating;
use crate::models::staff::{Specialty, StaffMember};

#[derive(Debug, Clone, Serialize)]
pub struct NearbyConflict {
    pub event_id: Uuid,
    pub date: NaiveDate,
    pub day_offset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SameDayWindow {
    pub event_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Derived features for one eligible candidate, fed to the ranking delegate.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub staff_id: Uuid,
    pub name: String,
    pub code: String,
    pub specialty: Specialty,
    pub experience_years: u8,
    pub average_rating: f64,
    pub recent_performance: Option<f64>,
    pub prior_jobs_with_client: usize,
    pub month_events: usize,
    pub nearby_conflicts: Vec<NearbyConflict>,
    pub same_day_assignments: Vec<SameDayWindow>,
    pub distance_km: Option<f64>,
    pub work_radius_km: Option<f64>,
}

/// Read-only feature derivation. `assignments` and `ratings` are the member's
/// own records; `events` resolves assignment event ids for the client-history
/// count.
pub fn enrich_candidate(
    member: &StaffMember,
    event: &Event,
    assignments: &[Assignment],
    events: &HashMap<Uuid, Event>,
    ratings: &[Rating],
    config: &SchedulingConfig,
) -> CandidateProfile {
    let average_rating = if ratings.is_empty() {
        member.rating
    } else {
        ratings.iter().map(|r| r.score).sum::<f64>() / ratings.len() as f64
    };

    let recent_performance = {
        let mut by_date: Vec<&Rating> = ratings.iter().collect();
        by_date.sort_by(|a, b| b.event_date.cmp(&a.event_date));
        let recent: Vec<f64> = by_date
            .iter()
            .take(config.recent_ratings_window)
            .map(|r| r.score)
            .collect();
        if recent.is_empty() {
            None
        } else {
            Some(recent.iter().sum::<f64>() / recent.len() as f64)
        }
    };

    let prior_jobs_with_client = assignments
        .iter()
        .filter(|a| a.event_id != event.id && a.date < event.date)
        .filter(|a| {
            events
                .get(&a.event_id)
                .is_some_and(|e| e.client.eq_ignore_ascii_case(&event.client))
        })
        .count();

    let month_events = assignments
        .iter()
        .filter(|a| {
            a.date.year() == event.date.year() && a.date.month() == event.date.month()
        })
        .filter(|a| {
            matches!(
                a.status,
                AssignmentStatus::Confirmed | AssignmentStatus::Hired
            )
        })
        .count();

    let max_offset_days = config.conflict_window_hours / 24;
    let mut nearby_conflicts: Vec<NearbyConflict> = assignments
        .iter()
        .filter_map(|a| {
            let offset = (a.date - event.date).num_days();
            (offset != 0 && offset.abs() <= max_offset_days).then(|| NearbyConflict {
                event_id: a.event_id,
                date: a.date,
                day_offset: offset,
            })
        })
        .collect();
    nearby_conflicts.sort_by_key(|c| c.day_offset);

    let same_day_assignments = assignments
        .iter()
        .filter(|a| a.date == event.date)
        .map(|a| SameDayWindow {
            event_id: a.event_id,
            start_time: a.start_time,
            end_time: a.end_time,
        })
        .collect();

    CandidateProfile {
        staff_id: member.id,
        name: member.name.clone(),
        code: member.code.clone(),
        specialty: member.specialty,
        experience_years: member.experience_years,
        average_rating,
        recent_performance,
        prior_jobs_with_client,
        month_events,
        nearby_conflicts,
        same_day_assignments,
        distance_km: distance_km(event.location.as_ref(), member.location.as_ref()),
        work_radius_km: member.work_radius_km,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::enrich_candidate;
    use crate::config::SchedulingConfig;
    use crate::models::assignment::{Assignment, AssignmentStatus};
    use crate::models::event::{Event, EventStatus};
    use crate::models::rating::Rating;
    use crate::models::staff::{GeoPoint, Specialty, StaffMember};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn member() -> StaffMember {
        StaffMember {
            id: Uuid::from_u128(1),
            name: "Lucía".to_string(),
            code: "C001".to_string(),
            specialty: Specialty::Waiter,
            experience_years: 5,
            skills: Vec::new(),
            languages: Vec::new(),
            rating: 4.2,
            work_radius_km: Some(40.0),
            location: Some(GeoPoint {
                lat: 40.4168,
                lng: -3.7038,
            }),
            available: true,
            in_reserve: false,
            updated_at: Utc::now(),
        }
    }

    fn event_for(client: &str, id_seed: u128, day: u32) -> Event {
        Event {
            id: Uuid::from_u128(id_seed),
            client: client.to_string(),
            venue: "Finca".to_string(),
            location: Some(GeoPoint {
                lat: 40.45,
                lng: -3.70,
            }),
            date: d(day),
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
        }
    }

    fn assignment_for(event: &Event, status: AssignmentStatus) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            event_id: event.id,
            staff_id: Uuid::from_u128(1),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            status,
            score: None,
            assigned_at: Utc::now(),
        }
    }

    fn rating(score: f64, day: Option<u32>) -> Rating {
        Rating {
            id: Uuid::new_v4(),
            staff_id: Uuid::from_u128(1),
            event_id: Uuid::new_v4(),
            score,
            event_date: day.map(d),
            comment: None,
        }
    }

    #[test]
    fn average_falls_back_to_stored_rating_without_history() {
        let target = event_for("Catering Sol", 100, 15);
        let profile = enrich_candidate(
            &member(),
            &target,
            &[],
            &HashMap::new(),
            &[],
            &SchedulingConfig::default(),
        );

        assert_eq!(profile.average_rating, 4.2);
        assert_eq!(profile.recent_performance, None);
    }

    #[test]
    fn recent_performance_uses_latest_ratings_only() {
        let target = event_for("Catering Sol", 100, 20);
        // Seven ratings; the five most recent (days 14..10) average 3.0,
        // the two older ones would pull the mean up.
        let ratings = vec![
            rating(5.0, Some(1)),
            rating(5.0, Some(2)),
            rating(3.0, Some(10)),
            rating(3.0, Some(11)),
            rating(3.0, Some(12)),
            rating(3.0, Some(13)),
            rating(3.0, Some(14)),
        ];

        let profile = enrich_candidate(
            &member(),
            &target,
            &[],
            &HashMap::new(),
            &ratings,
            &SchedulingConfig::default(),
        );

        assert_eq!(profile.recent_performance, Some(3.0));
        assert!(profile.average_rating > 3.0);
    }

    #[test]
    fn client_history_counts_only_earlier_jobs_for_the_same_client() {
        let target = event_for("Catering Sol", 100, 20);
        let same_client_before = event_for("Catering Sol", 101, 5);
        let same_client_after = event_for("Catering Sol", 102, 25);
        let other_client = event_for("Bodas Norte", 103, 6);

        let events: HashMap<_, _> = [&same_client_before, &same_client_after, &other_client]
            .into_iter()
            .map(|e| (e.id, e.clone()))
            .collect();
        let assignments = vec![
            assignment_for(&same_client_before, AssignmentStatus::Hired),
            assignment_for(&same_client_after, AssignmentStatus::Pending),
            assignment_for(&other_client, AssignmentStatus::Hired),
        ];

        let profile = enrich_candidate(
            &member(),
            &target,
            &assignments,
            &events,
            &[],
            &SchedulingConfig::default(),
        );

        assert_eq!(profile.prior_jobs_with_client, 1);
    }

    #[test]
    fn month_count_only_includes_confirmed_or_hired() {
        let target = event_for("Catering Sol", 100, 20);
        let confirmed = event_for("A", 101, 3);
        let hired = event_for("B", 102, 8);
        let pending = event_for("C", 103, 9);
        let other_month = {
            let mut e = event_for("D", 104, 9);
            e.date = NaiveDate::from_ymd_opt(2026, 4, 9).unwrap();
            e
        };

        let assignments = vec![
            assignment_for(&confirmed, AssignmentStatus::Confirmed),
            assignment_for(&hired, AssignmentStatus::Hired),
            assignment_for(&pending, AssignmentStatus::Pending),
            assignment_for(&other_month, AssignmentStatus::Confirmed),
        ];

        let profile = enrich_candidate(
            &member(),
            &target,
            &assignments,
            &HashMap::new(),
            &[],
            &SchedulingConfig::default(),
        );

        assert_eq!(profile.month_events, 2);
    }

    #[test]
    fn nearby_conflicts_exclude_same_day_and_far_dates() {
        let target = event_for("Catering Sol", 100, 15);
        let same_day = event_for("A", 101, 15);
        let day_after = event_for("B", 102, 16);
        let two_before = event_for("C", 103, 13);
        let far = event_for("D", 104, 20);

        let assignments = vec![
            assignment_for(&same_day, AssignmentStatus::Confirmed),
            assignment_for(&day_after, AssignmentStatus::Confirmed),
            assignment_for(&two_before, AssignmentStatus::Confirmed),
            assignment_for(&far, AssignmentStatus::Confirmed),
        ];

        let profile = enrich_candidate(
            &member(),
            &target,
            &assignments,
            &HashMap::new(),
            &[],
            &SchedulingConfig::default(),
        );

        let offsets: Vec<i64> = profile.nearby_conflicts.iter().map(|c| c.day_offset).collect();
        assert_eq!(offsets, vec![-2, 1]);

        assert_eq!(profile.same_day_assignments.len(), 1);
        assert_eq!(profile.same_day_assignments[0].event_id, same_day.id);
    }

    #[test]
    fn distance_is_reported_when_both_sides_have_coordinates() {
        let target = event_for("Catering Sol", 100, 15);
        let profile = enrich_candidate(
            &member(),
            &target,
            &[],
            &HashMap::new(),
            &[],
            &SchedulingConfig::default(),
        );
        assert!(profile.distance_km.is_some());
        assert!(profile.distance_km.unwrap() < 10.0);

        let mut roaming = member();
        roaming.location = None;
        let profile = enrich_candidate(
            &roaming,
            &target,
            &[],
            &HashMap::new(),
            &[],
            &SchedulingConfig::default(),
        );
        assert_eq!(profile.distance_km, None);
    }
}
