use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::modules::auth::model::Identity;
use crate::utils::errors::AppError;

use super::model::{CalendarEvent, CreateEventDto, EventQuery, UpdateEventDto};

const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, event_type, class_id, \
     created_by, creator_type, is_recurring, recurrence_pattern, created_at";

pub struct CalendarService;

impl CalendarService {
    #[instrument(skip(db, dto))]
    pub async fn create_event(
        db: &SqlitePool,
        identity: &Identity,
        dto: CreateEventDto,
    ) -> Result<CalendarEvent, AppError> {
        if let Some(class_id) = dto.class_id {
            if !matches!(identity, Identity::Teacher { .. }) {
                return Err(AppError::forbidden(anyhow::anyhow!(
                    "Only teachers may schedule class events"
                )));
            }

            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE id = ?1")
                .bind(class_id)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;
            if exists == 0 {
                return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
            }
        }

        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            "INSERT INTO calendar_events (title, description, start_date, end_date, event_type, \
                 class_id, created_by, creator_type, is_recurring, recurrence_pattern, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(&dto.event_type)
        .bind(dto.class_id)
        .bind(identity.user_id())
        .bind(identity.user_type())
        .bind(dto.is_recurring)
        .bind(&dto.recurrence_pattern)
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn list_events(
        db: &SqlitePool,
        query: &EventQuery,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        // Timestamps are stored as RFC 3339 text; datetime() normalizes both
        // sides so the range comparison is chronological, not lexical.
        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events
             WHERE (?1 IS NULL OR datetime(start_date) >= datetime(?1))
               AND (?2 IS NULL OR datetime(start_date) <= datetime(?2))
               AND (?3 IS NULL OR class_id = ?3)
             ORDER BY start_date ASC, id ASC"
        ))
            .bind(query.from)
            .bind(query.to)
            .bind(query.class_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)?;

        Ok(events)
    }

    #[instrument(skip(db))]
    pub async fn get_event(db: &SqlitePool, id: i64) -> Result<CalendarEvent, AppError> {
        sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Event not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_event(
        db: &SqlitePool,
        identity: &Identity,
        id: i64,
        dto: UpdateEventDto,
    ) -> Result<CalendarEvent, AppError> {
        let existing = Self::owned_event(db, identity, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        if end_date < start_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "end_date must not be before start_date"
            )));
        }

        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            "UPDATE calendar_events
             SET title = ?1, description = ?2, start_date = ?3, end_date = ?4, event_type = ?5,
                 is_recurring = ?6, recurrence_pattern = ?7
             WHERE id = ?8
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.description.or(existing.description))
        .bind(start_date)
        .bind(end_date)
        .bind(dto.event_type.unwrap_or(existing.event_type))
        .bind(dto.is_recurring.unwrap_or(existing.is_recurring))
        .bind(dto.recurrence_pattern.or(existing.recurrence_pattern))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn delete_event(
        db: &SqlitePool,
        identity: &Identity,
        id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM calendar_events WHERE id = ?1 AND created_by = ?2 AND creator_type = ?3",
        )
        .bind(id)
        .bind(identity.user_id())
        .bind(identity.user_type())
        .execute(db)
        .await
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Event not found")));
        }
        Ok(())
    }

    /// Fetches an event only if the caller created it. Mismatches read as
    /// absent so foreign events cannot be probed.
    async fn owned_event(
        db: &SqlitePool,
        identity: &Identity,
        id: i64,
    ) -> Result<CalendarEvent, AppError> {
        sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events
             WHERE id = ?1 AND created_by = ?2 AND creator_type = ?3"
        ))
        .bind(id)
        .bind(identity.user_id())
        .bind(identity.user_type())
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Event not found")))
    }
}
