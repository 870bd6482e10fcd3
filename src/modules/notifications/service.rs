use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::utils::errors::AppError;

use super::model::{BulkNotificationDto, CreateNotificationDto, Notification};

pub struct NotificationService;

impl NotificationService {
    /// Inserts one notification row. Workflow side effects funnel through
    /// here; callers that must not fail on notification errors catch and
    /// log the result themselves.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(db, title, message))]
    pub async fn notify(
        db: &SqlitePool,
        user_id: i64,
        user_type: &str,
        title: &str,
        message: &str,
        notification_type: &str,
        related_id: Option<i64>,
        related_type: Option<&str>,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, user_type, title, message, type, is_read, related_id, related_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, FALSE, ?6, ?7, ?8)
             RETURNING id, user_id, user_type, title, message, type, is_read, related_id, related_type, created_at",
        )
        .bind(user_id)
        .bind(user_type)
        .bind(title)
        .bind(message)
        .bind(notification_type)
        .bind(related_id)
        .bind(related_type)
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(notification)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &SqlitePool,
        dto: CreateNotificationDto,
    ) -> Result<Notification, AppError> {
        Self::notify(
            db,
            dto.user_id,
            &dto.user_type,
            &dto.title,
            &dto.message,
            &dto.notification_type,
            dto.related_id,
            dto.related_type.as_deref(),
        )
        .await
    }

    /// Fan-out creation. Recipients are resolved once, up front; the class
    /// audience is a snapshot of current enrollment.
    #[instrument(skip(db, dto))]
    pub async fn bulk_create(db: &SqlitePool, dto: BulkNotificationDto) -> Result<i64, AppError> {
        let mut recipients: Vec<(i64, &str)> = Vec::new();

        match dto.audience.as_str() {
            "all" | "students" => {
                let ids = sqlx::query_scalar::<_, i64>(
                    "SELECT id FROM students WHERE is_active = TRUE",
                )
                .fetch_all(db)
                .await
                .map_err(AppError::database)?;
                recipients.extend(ids.into_iter().map(|id| (id, "student")));
            }
            _ => {}
        }

        match dto.audience.as_str() {
            "all" | "teachers" => {
                let ids = sqlx::query_scalar::<_, i64>(
                    "SELECT id FROM teachers WHERE is_active = TRUE",
                )
                .fetch_all(db)
                .await
                .map_err(AppError::database)?;
                recipients.extend(ids.into_iter().map(|id| (id, "teacher")));
            }
            _ => {}
        }

        if dto.audience == "class" {
            let class_id = dto.class_id.ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!("class_id is required for class audience"))
            })?;

            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes WHERE id = ?1")
                .bind(class_id)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;
            if exists == 0 {
                return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
            }

            let ids = sqlx::query_scalar::<_, i64>(
                "SELECT student_id FROM enrollments WHERE class_id = ?1",
            )
            .bind(class_id)
            .fetch_all(db)
            .await
            .map_err(AppError::database)?;
            recipients.extend(ids.into_iter().map(|id| (id, "student")));
        }

        let mut tx = db.begin().await.map_err(AppError::database)?;
        let now = Utc::now();

        for (user_id, user_type) in &recipients {
            sqlx::query(
                "INSERT INTO notifications (user_id, user_type, title, message, type, is_read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, FALSE, ?6)",
            )
            .bind(user_id)
            .bind(user_type)
            .bind(&dto.title)
            .bind(&dto.message)
            .bind(&dto.notification_type)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(AppError::database)?;
        }

        tx.commit().await.map_err(AppError::database)?;

        Ok(recipients.len() as i64)
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &SqlitePool,
        user_id: i64,
        user_type: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, user_type, title, message, type, is_read, related_id, related_type, created_at
             FROM notifications
             WHERE user_id = ?1 AND user_type = ?2
             ORDER BY created_at DESC, id DESC
             LIMIT ?3 OFFSET ?4",
        )
        .bind(user_id)
        .bind(user_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND user_type = ?2",
        )
        .bind(user_id)
        .bind(user_type)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok((notifications, total))
    }

    /// Idempotent: marking an already-read notification succeeds unchanged.
    #[instrument(skip(db))]
    pub async fn mark_read(
        db: &SqlitePool,
        user_id: i64,
        user_type: &str,
        id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE
             WHERE id = ?1 AND user_id = ?2 AND user_type = ?3",
        )
        .bind(id)
        .bind(user_id)
        .bind(user_type)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Notification not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn mark_all_read(
        db: &SqlitePool,
        user_id: i64,
        user_type: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE
             WHERE user_id = ?1 AND user_type = ?2 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(user_type)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }

    /// Always computed from the store; nothing caches this.
    #[instrument(skip(db))]
    pub async fn unread_count(
        db: &SqlitePool,
        user_id: i64,
        user_type: &str,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications
             WHERE user_id = ?1 AND user_type = ?2 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(user_type)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(count)
    }

    #[instrument(skip(db))]
    pub async fn delete(
        db: &SqlitePool,
        user_id: i64,
        user_type: &str,
        id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = ?1 AND user_id = ?2 AND user_type = ?3",
        )
        .bind(id)
        .bind(user_id)
        .bind(user_type)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Notification not found")));
        }

        Ok(())
    }
}
