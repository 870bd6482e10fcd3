use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::config::session::SessionConfig;
use crate::modules::notifications::service::NotificationService;
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

use super::model::{Identity, LoginDto, Session, SignupDto, StudentProfile};

/// Both unknown identifier and wrong password render this exact message so
/// the response does not leak which accounts exist.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(sqlx::FromRow)]
struct StudentAuthRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    is_active: bool,
}

#[derive(sqlx::FromRow)]
struct TeacherAuthRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    is_teacher: Option<bool>,
    is_admin: bool,
    is_active: bool,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto))]
    pub async fn signup(db: &SqlitePool, dto: SignupDto) -> Result<StudentProfile, AppError> {
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE email = ?1 OR id = ?2",
        )
        .bind(&dto.email)
        .bind(dto.student_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if taken > 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A student with that email or id already exists"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;

        let student = sqlx::query_as::<_, StudentProfile>(
            "INSERT INTO students (id, name, email, password, is_active, enrollment_date)
             VALUES (?1, ?2, ?3, ?4, TRUE, ?5)
             RETURNING id, name, email, is_active, enrollment_date, last_login",
        )
        .bind(dto.student_id)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A student with that email or id already exists"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        // Side effect only: a failed welcome notification never fails signup.
        if let Err(e) = NotificationService::notify(
            db,
            student.id,
            "student",
            "Welcome to ClassHub",
            "Your account has been created. Join a class to get started.",
            "system",
            None,
            None,
        )
        .await
        {
            warn!(student_id = student.id, error = %e.error, "Failed to send welcome notification");
        }

        Ok(student)
    }

    #[instrument(skip(db, dto, session_config))]
    pub async fn login_student(
        db: &SqlitePool,
        dto: LoginDto,
        session_config: &SessionConfig,
    ) -> Result<(Identity, Session), AppError> {
        let row = sqlx::query_as::<_, StudentAuthRow>(
            "SELECT id, name, email, password, is_active FROM students WHERE email = ?1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS)))?;

        if !verify_password(&dto.password, &row.password)? || !row.is_active {
            return Err(AppError::unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS)));
        }

        sqlx::query("UPDATE students SET last_login = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(row.id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        let identity = Identity::Student {
            id: row.id,
            name: row.name,
            email: row.email,
        };
        let session = Self::create_session(db, &identity, session_config).await?;

        Ok((identity, session))
    }

    #[instrument(skip(db, dto, session_config))]
    pub async fn login_teacher(
        db: &SqlitePool,
        dto: LoginDto,
        session_config: &SessionConfig,
    ) -> Result<(Identity, Session), AppError> {
        let row = sqlx::query_as::<_, TeacherAuthRow>(
            "SELECT id, name, email, password, is_teacher, is_admin, is_active
             FROM teachers WHERE email = ?1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS)))?;

        if !verify_password(&dto.password, &row.password)? || !row.is_active {
            return Err(AppError::unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS)));
        }

        // Tri-state flag: absent, false, and null all mean "not a teacher".
        // This is a role failure, not a credential failure.
        if row.is_teacher != Some(true) {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Not authorized as a teacher"
            )));
        }

        let identity = Identity::Teacher {
            id: row.id,
            name: row.name,
            email: row.email,
            is_admin: row.is_admin,
        };
        let session = Self::create_session(db, &identity, session_config).await?;

        Ok((identity, session))
    }

    #[instrument(skip(db, identity, session_config))]
    pub async fn create_session(
        db: &SqlitePool,
        identity: &Identity,
        session_config: &SessionConfig,
    ) -> Result<Session, AppError> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_type: identity.user_type().to_string(),
            user_id: identity.user_id(),
            name: identity.name().to_string(),
            email: identity.email().to_string(),
            is_admin: identity.is_admin(),
            created_at: now,
            expires_at: now + Duration::hours(session_config.ttl_hours),
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_type, user_id, name, email, is_admin, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&session.token)
        .bind(&session.user_type)
        .bind(session.user_id)
        .bind(&session.name)
        .bind(&session.email)
        .bind(session.is_admin)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(db)
        .await
        .map_err(AppError::database)?;

        Ok(session)
    }

    /// Resolves a token to a live session. Expired rows are removed lazily
    /// and treated as absent.
    #[instrument(skip(db, token))]
    pub async fn find_valid_session(
        db: &SqlitePool,
        token: &str,
    ) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_type, user_id, name, email, is_admin, created_at, expires_at
             FROM sessions WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?;

        match session {
            Some(s) if s.expires_at > Utc::now() => Ok(Some(s)),
            Some(s) => {
                Self::destroy_session(db, &s.token).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Idempotent: deleting a missing session is a success.
    #[instrument(skip(db, token))]
    pub async fn destroy_session(db: &SqlitePool, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        Ok(())
    }
}
