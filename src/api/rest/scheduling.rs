use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::Notification;
use crate::models::availability::{AvailabilityOverride, OverrideKind};
use crate::models::rating::Rating;
use crate::models::rule::{AssignmentRule, RuleKind};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/availability",
            post(create_override).get(list_overrides),
        )
        .route("/ratings", post(create_rating).get(list_ratings))
        .route("/rules", post(create_rule).get(list_rules))
        .route("/rules/:id/active", patch(set_rule_active))
        .route("/notifications", get(list_notifications))
}

#[derive(Deserialize)]
pub struct CreateOverrideRequest {
    pub staff_id: Uuid,
    pub kind: OverrideKind,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub weekday: Option<Weekday>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRatingRequest {
    pub staff_id: Uuid,
    pub event_id: Uuid,
    pub score: f64,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    pub kind: RuleKind,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub points: i32,
}

#[derive(Deserialize)]
pub struct SetRuleActiveRequest {
    pub active: bool,
}

#[derive(Deserialize)]
pub struct StaffFilter {
    #[serde(default)]
    pub staff_id: Option<Uuid>,
}

async fn create_override(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOverrideRequest>,
) -> Result<Json<AvailabilityOverride>, AppError> {
    if !state.staff.contains_key(&payload.staff_id) {
        return Err(AppError::NotFound(format!(
            "staff member {} not found",
            payload.staff_id
        )));
    }
    if payload.date.is_none() && payload.weekday.is_none() {
        return Err(AppError::BadRequest(
            "either date or weekday is required".to_string(),
        ));
    }

    let entry = AvailabilityOverride {
        id: Uuid::new_v4(),
        staff_id: payload.staff_id,
        kind: payload.kind,
        date: payload.date,
        weekday: payload.weekday,
        start_time: payload.start_time,
        end_time: payload.end_time,
        note: payload.note,
    };

    state.overrides.insert(entry.id, entry.clone());
    Ok(Json(entry))
}

async fn list_overrides(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StaffFilter>,
) -> Json<Vec<AvailabilityOverride>> {
    let overrides = state
        .overrides
        .iter()
        .map(|entry| entry.value().clone())
        .filter(|o| filter.staff_id.is_none_or(|id| o.staff_id == id))
        .collect();
    Json(overrides)
}

async fn create_rating(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRatingRequest>,
) -> Result<Json<Rating>, AppError> {
    if !(0.0..=5.0).contains(&payload.score) {
        return Err(AppError::BadRequest(
            "score must be between 0 and 5".to_string(),
        ));
    }

    let rating = Rating {
        id: Uuid::new_v4(),
        staff_id: payload.staff_id,
        event_id: payload.event_id,
        score: payload.score,
        event_date: payload.event_date,
        comment: payload.comment,
    };
    state.ratings.insert(rating.id, rating.clone());

    // Rating aggregation: keep the stored profile average in sync.
    if let Some(mut member) = state.staff.get_mut(&payload.staff_id) {
        let (sum, count) = state
            .ratings
            .iter()
            .filter(|r| r.value().staff_id == payload.staff_id)
            .fold((0.0, 0usize), |(sum, count), r| {
                (sum + r.value().score, count + 1)
            });
        if count > 0 {
            member.rating = sum / count as f64;
        }
    }

    Ok(Json(rating))
}

async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StaffFilter>,
) -> Json<Vec<Rating>> {
    let ratings = state
        .ratings
        .iter()
        .map(|entry| entry.value().clone())
        .filter(|r| filter.staff_id.is_none_or(|id| r.staff_id == id))
        .collect();
    Json(ratings)
}

async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRuleRequest>,
) -> Result<Json<AssignmentRule>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let rule = AssignmentRule {
        id: Uuid::new_v4(),
        name: payload.name,
        kind: payload.kind,
        mandatory: payload.mandatory,
        priority: payload.priority,
        points: payload.points,
        active: true,
    };

    state.rules.insert(rule.id, rule.clone());
    Ok(Json(rule))
}

async fn list_rules(State(state): State<Arc<AppState>>) -> Json<Vec<AssignmentRule>> {
    let rules = state
        .rules
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(rules)
}

async fn set_rule_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRuleActiveRequest>,
) -> Result<Json<AssignmentRule>, AppError> {
    let mut rule = state
        .rules
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("rule {id} not found")))?;

    rule.active = payload.active;
    Ok(Json(rule.clone()))
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StaffFilter>,
) -> Json<Vec<Notification>> {
    let mut notifications: Vec<Notification> = state
        .notifications
        .iter()
        .map(|entry| entry.value().clone())
        .filter(|n| filter.staff_id.is_none_or(|id| n.staff_id == id))
        .collect();
    notifications.sort_by_key(|n| n.created_at);

    Json(notifications)
}
