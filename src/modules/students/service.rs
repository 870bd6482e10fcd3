use sqlx::SqlitePool;
use tracing::instrument;

use crate::utils::errors::AppError;

use super::model::{CourseEntry, GradeEntry, StudentDashboard, SubmissionEntry};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn dashboard(db: &SqlitePool, student_id: i64) -> Result<StudentDashboard, AppError> {
        let enrolled_classes: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE student_id = ?1")
                .bind(student_id)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

        let submissions: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE student_id = ?1")
                .bind(student_id)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

        let (graded_submissions, average_grade): (i64, Option<f64>) =
            sqlx::query_as("SELECT COUNT(*), AVG(grade) FROM gradings WHERE student_id = ?1")
                .bind(student_id)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

        let unread_notifications: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications
             WHERE user_id = ?1 AND user_type = 'student' AND is_read = FALSE",
        )
        .bind(student_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(StudentDashboard {
            enrolled_classes,
            submissions,
            graded_submissions,
            average_grade,
            unread_notifications,
        })
    }

    #[instrument(skip(db))]
    pub async fn courses(db: &SqlitePool, student_id: i64) -> Result<Vec<CourseEntry>, AppError> {
        let courses = sqlx::query_as::<_, CourseEntry>(
            "SELECT c.id AS class_id, c.name, c.semester, c.slug,
                    t.name AS teacher_name, e.enrolled_at
             FROM enrollments e
             JOIN classes c ON c.id = e.class_id
             JOIN teachers t ON t.id = c.teacher_id
             WHERE e.student_id = ?1
             ORDER BY e.enrolled_at DESC, c.id DESC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn grades(db: &SqlitePool, student_id: i64) -> Result<Vec<GradeEntry>, AppError> {
        let grades = sqlx::query_as::<_, GradeEntry>(
            "SELECT s.id AS submission_id, ex.id AS exam_id, ex.title AS exam_title,
                    c.name AS class_name, g.grade, g.feedback, g.graded_at
             FROM gradings g
             JOIN submissions s ON s.id = g.submission_id
             JOIN exams ex ON ex.id = s.exam_id
             JOIN classes c ON c.id = ex.class_id
             WHERE s.student_id = ?1
             ORDER BY g.graded_at DESC, s.id DESC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(grades)
    }

    #[instrument(skip(db))]
    pub async fn submissions(
        db: &SqlitePool,
        student_id: i64,
    ) -> Result<Vec<SubmissionEntry>, AppError> {
        let submissions = sqlx::query_as::<_, SubmissionEntry>(
            "SELECT s.id, ex.id AS exam_id, ex.title AS exam_title,
                    s.file_url, s.comment, s.submitted_at, g.grade
             FROM submissions s
             JOIN exams ex ON ex.id = s.exam_id
             LEFT JOIN gradings g ON g.submission_id = s.id
             WHERE s.student_id = ?1
             ORDER BY s.submitted_at DESC, s.id DESC",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(submissions)
    }
}
