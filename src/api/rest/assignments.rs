use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::auth::Role;
use crate::engine::writeback;
use crate::error::AppError;
use crate::models::assignment::{Assignment, AssignmentStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/assignments",
            post(create_assignment).get(list_assignments),
        )
        .route("/assignments/:id", delete(reject_assignment))
        .route("/assignments/:id/status", patch(update_status))
}

#[derive(Deserialize)]
pub struct CreateAssignmentRequest {
    pub event_id: Uuid,
    pub staff_id: Uuid,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AssignmentStatus,
}

#[derive(Deserialize)]
pub struct AssignmentFilter {
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub staff_id: Option<Uuid>,
}

async fn create_assignment(
    State(state): State<Arc<AppState>>,
    _role: Role,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    // The slot insert is the double-submission guard: it either claims the
    // (event, staff) pair atomically or reports it as taken. The writeback
    // itself performs no dedup.
    if !state
        .assignment_slots
        .insert((payload.event_id, payload.staff_id))
    {
        return Err(AppError::Conflict(format!(
            "staff member {} already holds an assignment for event {}",
            payload.staff_id, payload.event_id
        )));
    }

    match writeback::assign(&state, payload.event_id, payload.staff_id, payload.score) {
        Ok(assignment) => Ok(Json(assignment)),
        Err(err) => {
            state
                .assignment_slots
                .remove(&(payload.event_id, payload.staff_id));
            Err(err)
        }
    }
}

async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<AssignmentFilter>,
) -> Json<Vec<Assignment>> {
    let assignments = state
        .assignments
        .iter()
        .map(|entry| entry.value().clone())
        .filter(|a| filter.event_id.is_none_or(|id| a.event_id == id))
        .filter(|a| filter.staff_id.is_none_or(|id| a.staff_id == id))
        .collect();

    Json(assignments)
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    _role: Role,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Assignment>, AppError> {
    let mut assignment = state
        .assignments
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("assignment {id} not found")))?;

    if !assignment.status.can_transition_to(payload.status) {
        return Err(AppError::Conflict(format!(
            "cannot move assignment from {} to {}",
            assignment.status.label(),
            payload.status.label()
        )));
    }

    assignment.status = payload.status;
    state
        .metrics
        .assignments_total
        .with_label_values(&[payload.status.label()])
        .inc();

    Ok(Json(assignment.clone()))
}

/// Rejection deletes the record outright; there is no rejected status.
async fn reject_assignment(
    State(state): State<Arc<AppState>>,
    _role: Role,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let (_, assignment) = state
        .assignments
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("assignment {id} not found")))?;

    state
        .assignment_slots
        .remove(&(assignment.event_id, assignment.staff_id));

    Ok(StatusCode::NO_CONTENT)
}
