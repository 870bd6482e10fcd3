use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub event_type: String,
    pub class_id: Option<i64>,
    pub created_by: i64,
    pub creator_type: String,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn validate_date_order(dto: &CreateEventDto) -> Result<(), ValidationError> {
    if dto.end_date < dto.start_date {
        let mut err = ValidationError::new("date_order");
        err.message = Some("end_date must not be before start_date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_date_order"))]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 50))]
    pub event_type: String,
    pub class_id: Option<i64>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 50))]
    pub event_type: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventQuery {
    /// Inclusive lower bound on start_date.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start_date.
    pub to: Option<DateTime<Utc>>,
    pub class_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dto(start: DateTime<Utc>, end: DateTime<Utc>) -> CreateEventDto {
        CreateEventDto {
            title: "Midterm".to_string(),
            description: None,
            start_date: start,
            end_date: end,
            event_type: "exam".to_string(),
            class_id: None,
            is_recurring: false,
            recurrence_pattern: None,
        }
    }

    #[test]
    fn test_end_before_start_rejected() {
        let now = Utc::now();
        assert!(dto(now, now - Duration::hours(1)).validate().is_err());
    }

    #[test]
    fn test_end_equal_to_start_allowed() {
        let now = Utc::now();
        assert!(dto(now, now).validate().is_ok());
        assert!(dto(now, now + Duration::hours(2)).validate().is_ok());
    }
}
