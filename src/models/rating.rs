use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A score a client or coordinator gave a staff member for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub event_id: Uuid,
    /// 0..5.
    pub score: f64,
    pub event_date: Option<NaiveDate>,
    pub comment: Option<String>,
}
