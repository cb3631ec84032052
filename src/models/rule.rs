use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RuleKind {
    MinRating { min: f64 },
    MaxDistanceKm { max: f64 },
    MinRestHours { hours: f64 },
    MaxEventsPerMonth { max: u32 },
}

/// A configured constraint or preference applied during ranking. Mandatory
/// rules are hard constraints: a violating candidate must never be suggested.
/// Optional rules only move the score by `points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub id: Uuid,
    pub name: String,
    pub kind: RuleKind,
    pub mandatory: bool,
    pub priority: u8,
    pub points: i32,
    pub active: bool,
}
