use sqlx::SqlitePool;
use tracing::instrument;

use crate::modules::classes::model::Class;
use crate::utils::errors::AppError;

use super::model::{
    ClassAnalytics, ExamAnalytics, TaughtStudent, TeacherAnalytics, TeacherDashboard,
};

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn dashboard(db: &SqlitePool, teacher_id: i64) -> Result<TeacherDashboard, AppError> {
        let classes: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE teacher_id = ?1")
                .bind(teacher_id)
                .fetch_one(db)
                .await
                .map_err(AppError::database)?;

        let students: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT e.student_id)
             FROM enrollments e
             JOIN classes c ON c.id = e.class_id
             WHERE c.teacher_id = ?1",
        )
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let exams: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM exams ex
             JOIN classes c ON c.id = ex.class_id
             WHERE c.teacher_id = ?1",
        )
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let ungraded_submissions: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM submissions s
             JOIN exams ex ON ex.id = s.exam_id
             JOIN classes c ON c.id = ex.class_id
             LEFT JOIN gradings g ON g.submission_id = s.id
             WHERE c.teacher_id = ?1 AND g.id IS NULL",
        )
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        let unread_notifications: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications
             WHERE user_id = ?1 AND user_type = 'teacher' AND is_read = FALSE",
        )
        .bind(teacher_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;

        Ok(TeacherDashboard {
            classes,
            students,
            exams,
            ungraded_submissions,
            unread_notifications,
        })
    }

    #[instrument(skip(db))]
    pub async fn classes(db: &SqlitePool, teacher_id: i64) -> Result<Vec<Class>, AppError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT id, name, description, semester, slug, teacher_id, max_students, is_active, created_at
             FROM classes
             WHERE teacher_id = ?1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(classes)
    }

    #[instrument(skip(db))]
    pub async fn students(db: &SqlitePool, teacher_id: i64) -> Result<Vec<TaughtStudent>, AppError> {
        let students = sqlx::query_as::<_, TaughtStudent>(
            "SELECT st.id AS student_id, st.name, st.email,
                    c.id AS class_id, c.name AS class_name, e.enrolled_at
             FROM enrollments e
             JOIN classes c ON c.id = e.class_id
             JOIN students st ON st.id = e.student_id
             WHERE c.teacher_id = ?1
             ORDER BY c.id, st.id",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn analytics(db: &SqlitePool, teacher_id: i64) -> Result<TeacherAnalytics, AppError> {
        let classes = sqlx::query_as::<_, ClassAnalytics>(
            "SELECT c.id AS class_id, c.name AS class_name,
                    COUNT(e.id) AS enrolled, c.max_students
             FROM classes c
             LEFT JOIN enrollments e ON e.class_id = c.id
             WHERE c.teacher_id = ?1
             GROUP BY c.id, c.name, c.max_students
             ORDER BY c.id",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let exams = sqlx::query_as::<_, ExamAnalytics>(
            "SELECT ex.id AS exam_id, ex.title AS exam_title, ex.class_id,
                    COUNT(s.id) AS submissions,
                    COUNT(g.id) AS graded,
                    AVG(g.grade) AS average_grade
             FROM exams ex
             JOIN classes c ON c.id = ex.class_id
             LEFT JOIN submissions s ON s.exam_id = ex.id
             LEFT JOIN gradings g ON g.submission_id = s.id
             WHERE c.teacher_id = ?1
             GROUP BY ex.id, ex.title, ex.class_id
             ORDER BY ex.id",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        Ok(TeacherAnalytics { classes, exams })
    }
}
