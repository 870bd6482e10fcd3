use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

use super::model::{
    ClassEnrollmentStat, ClassGradeStat, CreateStudentDto, CreateTeacherDto, DashboardCounts,
    PlatformStats, StudentRecord, TeacherRecord,
};

const STUDENT_COLUMNS: &str = "id, name, email, is_active, enrollment_date, last_login";
const TEACHER_COLUMNS: &str = "id, name, email, department, is_admin, is_active";

async fn count(db: &SqlitePool, sql: &str) -> Result<i64, AppError> {
    sqlx::query_scalar(sql)
        .fetch_one(db)
        .await
        .map_err(AppError::database)
}

/// Maps a path user type to its table, rejecting anything else.
fn user_table(user_type: &str) -> Result<&'static str, AppError> {
    match user_type {
        "student" => Ok("students"),
        "teacher" => Ok("teachers"),
        _ => Err(AppError::bad_request(anyhow::anyhow!(
            "User type must be 'student' or 'teacher'"
        ))),
    }
}

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db))]
    pub async fn dashboard_counts(db: &SqlitePool) -> Result<DashboardCounts, AppError> {
        Ok(DashboardCounts {
            students: count(db, "SELECT COUNT(*) FROM students").await?,
            teachers: count(db, "SELECT COUNT(*) FROM teachers").await?,
            classes: count(db, "SELECT COUNT(*) FROM classes").await?,
            exams: count(db, "SELECT COUNT(*) FROM exams").await?,
            submissions: count(db, "SELECT COUNT(*) FROM submissions").await?,
            enrollments: count(db, "SELECT COUNT(*) FROM enrollments").await?,
        })
    }

    #[instrument(skip(db))]
    pub async fn platform_stats(db: &SqlitePool) -> Result<PlatformStats, AppError> {
        let enrollment_by_class = sqlx::query_as::<_, ClassEnrollmentStat>(
            "SELECT c.id AS class_id, c.name AS class_name,
                    COUNT(e.id) AS enrolled, c.max_students
             FROM classes c
             LEFT JOIN enrollments e ON e.class_id = c.id
             GROUP BY c.id, c.name, c.max_students
             ORDER BY c.id",
        )
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let grades_by_class = sqlx::query_as::<_, ClassGradeStat>(
            "SELECT c.id AS class_id, c.name AS class_name,
                    COUNT(g.id) AS graded_submissions, AVG(g.grade) AS average_grade
             FROM classes c
             LEFT JOIN exams ex ON ex.class_id = c.id
             LEFT JOIN submissions s ON s.exam_id = ex.id
             LEFT JOIN gradings g ON g.submission_id = s.id
             GROUP BY c.id, c.name
             ORDER BY c.id",
        )
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(PlatformStats {
            enrollment_by_class,
            grades_by_class,
        })
    }

    /// Includes inactive accounts; the admin surface is the one place soft
    /// deleted rows stay visible.
    #[instrument(skip(db))]
    pub async fn list_students(
        db: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StudentRecord>, i64), AppError> {
        let students = sqlx::query_as::<_, StudentRecord>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let total = count(db, "SELECT COUNT(*) FROM students").await?;
        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn list_teachers(
        db: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TeacherRecord>, i64), AppError> {
        let teachers = sqlx::query_as::<_, TeacherRecord>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY id LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let total = count(db, "SELECT COUNT(*) FROM teachers").await?;
        Ok((teachers, total))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &SqlitePool,
        dto: CreateStudentDto,
    ) -> Result<StudentRecord, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let result = sqlx::query_as::<_, StudentRecord>(&format!(
            "INSERT INTO students (id, name, email, password, is_active, enrollment_date)
             VALUES (?1, ?2, ?3, ?4, TRUE, ?5)
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(db)
        .await;

        match result {
            Ok(student) => Ok(student),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::conflict(
                anyhow::anyhow!("A student with this ID or email already exists"),
            )),
            Err(e) => Err(AppError::database(e)),
        }
    }

    #[instrument(skip(db, dto))]
    pub async fn create_teacher(
        db: &SqlitePool,
        dto: CreateTeacherDto,
    ) -> Result<TeacherRecord, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let result = sqlx::query_as::<_, TeacherRecord>(&format!(
            "INSERT INTO teachers (id, name, email, password, department, is_teacher, is_admin, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, TRUE, ?6, TRUE)
             RETURNING {TEACHER_COLUMNS}"
        ))
        .bind(dto.teacher_id)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(dto.department.as_deref().unwrap_or(""))
        .bind(dto.is_admin)
        .fetch_one(db)
        .await;

        match result {
            Ok(teacher) => Ok(teacher),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::conflict(
                anyhow::anyhow!("A teacher with this ID or email already exists"),
            )),
            Err(e) => Err(AppError::database(e)),
        }
    }

    #[instrument(skip(db))]
    pub async fn set_status(
        db: &SqlitePool,
        user_type: &str,
        id: i64,
        is_active: bool,
    ) -> Result<(), AppError> {
        let table = user_table(user_type)?;
        let result = sqlx::query(&format!("UPDATE {table} SET is_active = ?1 WHERE id = ?2"))
            .bind(is_active)
            .bind(id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }
        Ok(())
    }

    /// Deactivates the account. Rows are never physically removed so history
    /// (submissions, grades, uploads) stays attributable.
    #[instrument(skip(db))]
    pub async fn soft_delete(db: &SqlitePool, user_type: &str, id: i64) -> Result<(), AppError> {
        Self::set_status(db, user_type, id, false).await
    }
}
