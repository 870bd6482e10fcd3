use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{instrument, warn};

use crate::modules::notifications::service::NotificationService;
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::slug::unique_slug;

use super::model::{Class, CreateClassDto, Enrollment, RosterEntry, UpdateClassDto};

const CLASS_COLUMNS: &str =
    "id, name, description, semester, slug, teacher_id, max_students, is_active, created_at";

/// Internal row carrying the join-secret hash; never serialized.
#[derive(sqlx::FromRow)]
struct ClassJoinRow {
    id: i64,
    name: String,
    password: String,
}

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db, dto))]
    pub async fn create_class(
        db: &SqlitePool,
        teacher_id: i64,
        dto: CreateClassDto,
    ) -> Result<Class, AppError> {
        let password_hash = hash_password(&dto.password)?;
        let description = dto.description.unwrap_or_default();

        // The random suffix makes collisions unlikely; the unique index is
        // the backstop, retried a couple of times.
        for _ in 0..3 {
            let slug = unique_slug(&dto.name);

            let result = sqlx::query_as::<_, Class>(&format!(
                "INSERT INTO classes (name, description, semester, slug, password, teacher_id, max_students, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, TRUE, ?8)
                 RETURNING {CLASS_COLUMNS}"
            ))
            .bind(&dto.name)
            .bind(&description)
            .bind(&dto.semester)
            .bind(&slug)
            .bind(&password_hash)
            .bind(teacher_id)
            .bind(dto.max_students)
            .bind(Utc::now())
            .fetch_one(db)
            .await;

            match result {
                Ok(class) => return Ok(class),
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => continue,
                Err(e) => return Err(AppError::database(e)),
            }
        }

        Err(AppError::internal(anyhow::anyhow!(
            "Could not generate a unique class slug"
        )))
    }

    #[instrument(skip(db))]
    pub async fn list_classes(
        db: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Class>, i64), AppError> {
        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE is_active = TRUE
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes WHERE is_active = TRUE")
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

        Ok((classes, total))
    }

    /// Resolves an active class by numeric id or by slug.
    #[instrument(skip(db))]
    pub async fn resolve_class(db: &SqlitePool, key: &str) -> Result<Class, AppError> {
        let query = if key.parse::<i64>().is_ok() {
            format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?1 AND is_active = TRUE")
        } else {
            format!("SELECT {CLASS_COLUMNS} FROM classes WHERE slug = ?1 AND is_active = TRUE")
        };

        sqlx::query_as::<_, Class>(&query)
            .bind(key)
            .fetch_optional(db)
            .await
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &SqlitePool,
        teacher_id: i64,
        class_id: i64,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        // Ownership mismatch reads the same as absence.
        let existing = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?1 AND teacher_id = ?2"
        ))
        .bind(class_id)
        .bind(teacher_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.unwrap_or(existing.description);
        let semester = dto.semester.unwrap_or(existing.semester);
        let max_students = dto.max_students.unwrap_or(existing.max_students);
        let is_active = dto.is_active.unwrap_or(existing.is_active);

        let class = sqlx::query_as::<_, Class>(&format!(
            "UPDATE classes
             SET name = ?1, description = ?2, semester = ?3, max_students = ?4, is_active = ?5
             WHERE id = ?6 AND teacher_id = ?7
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(&name)
        .bind(&description)
        .bind(&semester)
        .bind(max_students)
        .bind(is_active)
        .bind(class_id)
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn delete_class(
        db: &SqlitePool,
        teacher_id: i64,
        class_id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = ?1 AND teacher_id = ?2")
            .bind(class_id)
            .bind(teacher_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn roster(
        db: &SqlitePool,
        teacher_id: i64,
        class_id: i64,
    ) -> Result<Vec<RosterEntry>, AppError> {
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classes WHERE id = ?1 AND teacher_id = ?2",
        )
        .bind(class_id)
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if owned == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        let roster = sqlx::query_as::<_, RosterEntry>(
            "SELECT s.id, s.name, s.email, e.enrolled_at
             FROM enrollments e
             JOIN students s ON s.id = e.student_id
             WHERE e.class_id = ?1
             ORDER BY s.name",
        )
        .bind(class_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(roster)
    }

    /// Enrollment workflow. Checks run in a fixed order and short-circuit:
    /// class resolution, join password, duplicate pair, capacity, insert.
    ///
    /// The capacity check and insert are a single conditional statement, so
    /// SQLite's single-writer execution makes them atomic; the composite
    /// unique key backstops the duplicate check under races.
    #[instrument(skip(db, supplied_password))]
    pub async fn enroll(
        db: &SqlitePool,
        student_id: i64,
        class_key: &str,
        supplied_password: &str,
    ) -> Result<Enrollment, AppError> {
        let class = Self::resolve_class(db, class_key).await?;

        let join = sqlx::query_as::<_, ClassJoinRow>(
            "SELECT id, name, password FROM classes WHERE id = ?1",
        )
        .bind(class.id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if !verify_password(supplied_password, &join.password)? {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid class password"
            )));
        }

        let already = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE student_id = ?1 AND class_id = ?2",
        )
        .bind(student_id)
        .bind(class.id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if already > 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Already enrolled in this class"
            )));
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (student_id, class_id, enrolled_at)
             SELECT ?1, ?2, ?3
             WHERE (SELECT COUNT(*) FROM enrollments WHERE class_id = ?2)
                   < (SELECT max_students FROM classes WHERE id = ?2)
             RETURNING id, student_id, class_id, enrolled_at",
        )
        .bind(student_id)
        .bind(class.id)
        .bind(Utc::now())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!("Already enrolled in this class"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Class is full")))?;

        // Confirmation is a side effect; never roll back the enrollment.
        if let Err(e) = NotificationService::notify(
            db,
            student_id,
            "student",
            "Enrollment confirmed",
            &format!("You are now enrolled in {}", join.name),
            "enrollment",
            Some(class.id),
            Some("class"),
        )
        .await
        {
            warn!(student_id, class_id = class.id, error = %e.error, "Failed to send enrollment notification");
        }

        Ok(enrollment)
    }
}
