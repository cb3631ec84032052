use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::staff::{GeoPoint, Specialty, StaffMember};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/staff", post(create_staff).get(list_staff))
        .route("/staff/:id", get(get_staff))
        .route("/staff/:id/availability", patch(update_availability_flags))
        .route("/staff/:id/location", patch(update_location))
}

#[derive(Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub code: String,
    pub specialty: Specialty,
    #[serde(default)]
    pub experience_years: u8,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub work_radius_km: Option<f64>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

#[derive(Deserialize)]
pub struct UpdateAvailabilityFlagsRequest {
    pub available: bool,
    #[serde(default)]
    pub in_reserve: bool,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

async fn create_staff(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<Json<StaffMember>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    if payload.code.trim().is_empty() {
        return Err(AppError::BadRequest("code cannot be empty".to_string()));
    }

    let member = StaffMember {
        id: Uuid::new_v4(),
        name: payload.name,
        code: payload.code,
        specialty: payload.specialty,
        experience_years: payload.experience_years,
        skills: payload.skills,
        languages: payload.languages,
        rating: payload.rating.clamp(0.0, 5.0),
        work_radius_km: payload.work_radius_km,
        location: payload.location,
        available: true,
        in_reserve: false,
        updated_at: Utc::now(),
    };

    state.staff.insert(member.id, member.clone());
    Ok(Json(member))
}

async fn list_staff(State(state): State<Arc<AppState>>) -> Json<Vec<StaffMember>> {
    let staff = state
        .staff
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(staff)
}

async fn get_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffMember>, AppError> {
    let member = state
        .staff
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("staff member {id} not found")))?;

    Ok(Json(member.value().clone()))
}

async fn update_availability_flags(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAvailabilityFlagsRequest>,
) -> Result<Json<StaffMember>, AppError> {
    let mut member = state
        .staff
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("staff member {id} not found")))?;

    member.available = payload.available;
    member.in_reserve = payload.in_reserve;
    member.updated_at = Utc::now();

    Ok(Json(member.clone()))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<StaffMember>, AppError> {
    let mut member = state
        .staff
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("staff member {id} not found")))?;

    member.location = Some(payload.location);
    member.updated_at = Utc::now();

    Ok(Json(member.clone()))
}
