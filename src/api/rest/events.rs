use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::auth::Role;
use crate::engine::suggestion::{self, SuggestionResponse};
use crate::error::AppError;
use crate::models::event::{Event, EventStatus, Shift};
use crate::models::staff::{GeoPoint, Specialty};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/:id", get(get_event))
        .route("/events/:id/suggestions", post(suggest_for_event))
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub client: String,
    pub venue: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub required_specialty: Option<Specialty>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_languages: Vec<String>,
    pub staff_needed: u16,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

#[derive(Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<Event>, AppError> {
    if payload.client.trim().is_empty() {
        return Err(AppError::BadRequest("client cannot be empty".to_string()));
    }
    if payload.staff_needed == 0 {
        return Err(AppError::BadRequest(
            "staff_needed must be > 0".to_string(),
        ));
    }

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        client: payload.client,
        venue: payload.venue,
        location: payload.location,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        required_specialty: payload.required_specialty,
        required_skills: payload.required_skills,
        required_languages: payload.required_languages,
        staff_needed: payload.staff_needed,
        shifts: payload.shifts,
        status: EventStatus::Open,
        created_at: now,
        updated_at: now,
    };

    state.events.insert(event.id, event.clone());
    Ok(Json(event))
}

async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<Event>> {
    let events = state
        .events
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(events)
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .events
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("event {id} not found")))?;

    Ok(Json(event.value().clone()))
}

async fn suggest_for_event(
    State(state): State<Arc<AppState>>,
    _role: Role,
    Path(id): Path<Uuid>,
    Json(payload): Json<SuggestRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let response = suggestion::suggest(&state, id, payload.limit)?;
    Ok(Json(response))
}
