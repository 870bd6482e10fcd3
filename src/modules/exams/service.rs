use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{instrument, warn};

use crate::modules::notifications::service::NotificationService;
use crate::utils::errors::AppError;
use crate::utils::slug::unique_slug;

use super::model::{CreateExamDto, CreateSubmissionDto, Exam, GradeDto, Grading, Submission};

const EXAM_COLUMNS: &str =
    "id, title, description, class_id, deadline, material_url, slug, created_at";

/// Ownership chain for grading: submission -> exam -> class -> teacher.
#[derive(sqlx::FromRow)]
struct SubmissionOwnerRow {
    submission_id: i64,
    student_id: i64,
    exam_title: String,
    teacher_id: i64,
}

pub struct ExamService;

impl ExamService {
    #[instrument(skip(db, dto))]
    pub async fn create_exam(
        db: &SqlitePool,
        teacher_id: i64,
        dto: CreateExamDto,
    ) -> Result<Exam, AppError> {
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classes WHERE id = ?1 AND teacher_id = ?2",
        )
        .bind(dto.class_id)
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if owned == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        let description = dto.description.unwrap_or_default();

        for _ in 0..3 {
            let slug = unique_slug(&dto.title);

            let result = sqlx::query_as::<_, Exam>(&format!(
                "INSERT INTO exams (title, description, class_id, deadline, material_url, slug, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING {EXAM_COLUMNS}"
            ))
            .bind(&dto.title)
            .bind(&description)
            .bind(dto.class_id)
            .bind(dto.deadline)
            .bind(&dto.material_url)
            .bind(&slug)
            .bind(Utc::now())
            .fetch_one(db)
            .await;

            match result {
                Ok(exam) => return Ok(exam),
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => continue,
                Err(e) => return Err(AppError::database(e)),
            }
        }

        Err(AppError::internal(anyhow::anyhow!(
            "Could not generate a unique exam slug"
        )))
    }

    #[instrument(skip(db))]
    pub async fn get_exam(db: &SqlitePool, exam_id: i64) -> Result<Exam, AppError> {
        sqlx::query_as::<_, Exam>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams WHERE id = ?1"
        ))
        .bind(exam_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam not found")))
    }

    #[instrument(skip(db))]
    pub async fn list_by_class(db: &SqlitePool, class_id: i64) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams WHERE class_id = ?1 ORDER BY deadline"
        ))
        .bind(class_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(exams)
    }

    /// A student may only submit to exams of classes they are enrolled in.
    /// Multiple submissions per (student, exam) are allowed.
    #[instrument(skip(db, dto))]
    pub async fn submit(
        db: &SqlitePool,
        student_id: i64,
        exam_id: i64,
        dto: CreateSubmissionDto,
    ) -> Result<Submission, AppError> {
        let exam = Self::get_exam(db, exam_id).await?;

        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE student_id = ?1 AND class_id = ?2",
        )
        .bind(student_id)
        .bind(exam.class_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if enrolled == 0 {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Not enrolled in this exam's class"
            )));
        }

        let submission = sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions (exam_id, student_id, file_url, comment, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, exam_id, student_id, file_url, comment, submitted_at",
        )
        .bind(exam_id)
        .bind(student_id)
        .bind(&dto.file_url)
        .bind(&dto.comment)
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(submission)
    }

    #[instrument(skip(db))]
    pub async fn list_submissions(
        db: &SqlitePool,
        teacher_id: i64,
        exam_id: i64,
    ) -> Result<Vec<Submission>, AppError> {
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM exams e
             JOIN classes c ON c.id = e.class_id
             WHERE e.id = ?1 AND c.teacher_id = ?2",
        )
        .bind(exam_id)
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if owned == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Exam not found")));
        }

        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT id, exam_id, student_id, file_url, comment, submitted_at
             FROM submissions WHERE exam_id = ?1
             ORDER BY submitted_at DESC, id DESC",
        )
        .bind(exam_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(submissions)
    }

    /// Grading upsert: one row per submission, latest grade wins, graded_at
    /// refreshed on every write. The student id is denormalized from the
    /// submission for query convenience.
    #[instrument(skip(db, dto))]
    pub async fn grade(
        db: &SqlitePool,
        teacher_id: i64,
        submission_id: i64,
        dto: GradeDto,
    ) -> Result<Grading, AppError> {
        if !(0.0..=100.0).contains(&dto.grade) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "grade must be between 0 and 100"
            )));
        }

        let owner = sqlx::query_as::<_, SubmissionOwnerRow>(
            "SELECT s.id AS submission_id, s.student_id, e.title AS exam_title, c.teacher_id
             FROM submissions s
             JOIN exams e ON e.id = s.exam_id
             JOIN classes c ON c.id = e.class_id
             WHERE s.id = ?1",
        )
        .bind(submission_id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Submission not found")))?;

        if owner.teacher_id != teacher_id {
            // Existence hiding: foreign submissions read as absent.
            return Err(AppError::not_found(anyhow::anyhow!("Submission not found")));
        }

        let grading = sqlx::query_as::<_, Grading>(
            "INSERT INTO gradings (submission_id, student_id, grade, feedback, graded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (submission_id) DO UPDATE SET
                 grade = excluded.grade,
                 feedback = excluded.feedback,
                 graded_at = excluded.graded_at
             RETURNING id, submission_id, student_id, grade, feedback, graded_at",
        )
        .bind(owner.submission_id)
        .bind(owner.student_id)
        .bind(dto.grade)
        .bind(&dto.feedback)
        .bind(Utc::now())
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        if let Err(e) = NotificationService::notify(
            db,
            owner.student_id,
            "student",
            "Submission graded",
            &format!("Your submission for {} has been graded", owner.exam_title),
            "grade",
            Some(submission_id),
            Some("submission"),
        )
        .await
        {
            warn!(submission_id, error = %e.error, "Failed to send grading notification");
        }

        Ok(grading)
    }
}
