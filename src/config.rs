use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub scheduling: SchedulingConfig,
}

/// Tunable thresholds for eligibility and enrichment.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Minimum gap between two same-day shifts of one staff member, in hours.
    pub min_rest_hours: f64,
    /// Assignments within this many hours of the event date count as nearby conflicts.
    pub conflict_window_hours: i64,
    /// How many of the latest ratings feed the recent-performance average.
    pub recent_ratings_window: usize,
    pub default_suggestion_limit: usize,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            min_rest_hours: 6.0,
            conflict_window_hours: 48,
            recent_ratings_window: 5,
            default_suggestion_limit: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            scheduling: SchedulingConfig {
                min_rest_hours: parse_or_default("MIN_REST_HOURS", 6.0)?,
                conflict_window_hours: parse_or_default("CONFLICT_WINDOW_HOURS", 48)?,
                recent_ratings_window: parse_or_default("RECENT_RATINGS_WINDOW", 5)?,
                default_suggestion_limit: parse_or_default("DEFAULT_SUGGESTION_LIMIT", 5)?,
            },
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
