use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Specialty {
    Waiter,
    Bartender,
    Cocktail,
    Chef,
    KitchenPorter,
    Sommelier,
    General,
}

/// Waitstaff profile. Soft deactivation happens through the `available` and
/// `in_reserve` flags rather than deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub specialty: Specialty,
    pub experience_years: u8,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    /// Stored average rating, 0..5. Kept in sync when new ratings arrive.
    pub rating: f64,
    pub work_radius_km: Option<f64>,
    pub location: Option<GeoPoint>,
    pub available: bool,
    pub in_reserve: bool,
    pub updated_at: DateTime<Utc>,
}
