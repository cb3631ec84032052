use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverrideKind {
    Available,
    Unavailable,
    Partial,
    Vacation,
    Sick,
}

/// Per-date or recurring per-weekday exception to a staff member's default
/// availability. Partial days carry the hours the member can work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub kind: OverrideKind,
    pub date: Option<NaiveDate>,
    pub weekday: Option<Weekday>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub note: Option<String>,
}

impl AvailabilityOverride {
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.date == Some(date) || self.weekday == Some(date.weekday())
    }

    /// Whether the member is blocked for the given window on a day this
    /// override applies to. Partial overrides block unless their hours cover
    /// the whole window.
    pub fn blocks(&self, start: NaiveTime, end: NaiveTime) -> bool {
        match self.kind {
            OverrideKind::Available => false,
            OverrideKind::Unavailable | OverrideKind::Vacation | OverrideKind::Sick => true,
            OverrideKind::Partial => match (self.start_time, self.end_time) {
                (Some(from), Some(until)) => !(from <= start && until >= end),
                _ => true,
            },
        }
    }
}
