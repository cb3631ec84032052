use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::staff::{GeoPoint, Specialty};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventStatus {
    Open,
    Staffed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub headcount: u16,
}

/// A staffing order for a catering job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub client: String,
    pub venue: String,
    pub location: Option<GeoPoint>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_specialty: Option<Specialty>,
    pub required_skills: Vec<String>,
    pub required_languages: Vec<String>,
    pub staff_needed: u16,
    pub shifts: Vec<Shift>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
