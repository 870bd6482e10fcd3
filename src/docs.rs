use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admin::model::{
    CreateStudentDto, CreateTeacherDto, DashboardCounts, PlatformStats, StudentRecord,
    TeacherRecord, UpdateStatusDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{Identity, LoginDto, SignupDto, StudentProfile};
use crate::modules::calendar::model::{CalendarEvent, CreateEventDto, UpdateEventDto};
use crate::modules::classes::model::{
    Class, CreateClassDto, EnrollDto, Enrollment, RosterEntry, UpdateClassDto,
};
use crate::modules::exams::model::{
    CreateExamDto, CreateSubmissionDto, Exam, GradeDto, Grading, Submission,
};
use crate::modules::files::model::{BulkUploadResponse, StoredFile};
use crate::modules::notifications::model::{
    BulkCreateResponse, BulkNotificationDto, CreateNotificationDto, Notification,
    UnreadCountResponse,
};
use crate::modules::students::model::{
    CourseEntry, GradeEntry, StudentDashboard, SubmissionEntry,
};
use crate::modules::teachers::model::{
    ClassAnalytics, ExamAnalytics, TaughtStudent, TeacherAnalytics, TeacherDashboard,
};
use crate::utils::pagination::PaginationMeta;
use crate::utils::response::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::teacher_login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::verify,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::list_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::class_roster,
        crate::modules::classes::controller::enroll,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::list_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::submit,
        crate::modules::exams::controller::list_submissions,
        crate::modules::exams::controller::grade_submission,
        crate::modules::notifications::controller::list_notifications,
        crate::modules::notifications::controller::create_notification,
        crate::modules::notifications::controller::bulk_create_notifications,
        crate::modules::notifications::controller::mark_notification_read,
        crate::modules::notifications::controller::mark_all_notifications_read,
        crate::modules::notifications::controller::unread_notification_count,
        crate::modules::notifications::controller::delete_notification,
        crate::modules::calendar::controller::create_event,
        crate::modules::calendar::controller::list_events,
        crate::modules::calendar::controller::get_event,
        crate::modules::calendar::controller::update_event,
        crate::modules::calendar::controller::delete_event,
        crate::modules::files::controller::upload_file,
        crate::modules::files::controller::bulk_upload_files,
        crate::modules::files::controller::list_files,
        crate::modules::files::controller::download_file,
        crate::modules::files::controller::delete_file,
        crate::modules::admin::controller::admin_dashboard,
        crate::modules::admin::controller::admin_stats,
        crate::modules::admin::controller::list_students,
        crate::modules::admin::controller::list_teachers,
        crate::modules::admin::controller::create_student,
        crate::modules::admin::controller::create_teacher,
        crate::modules::admin::controller::update_user_status,
        crate::modules::admin::controller::delete_user,
        crate::modules::students::controller::student_dashboard,
        crate::modules::students::controller::student_courses,
        crate::modules::students::controller::student_grades,
        crate::modules::students::controller::student_submissions,
        crate::modules::teachers::controller::teacher_dashboard,
        crate::modules::teachers::controller::teacher_classes,
        crate::modules::teachers::controller::teacher_students,
        crate::modules::teachers::controller::teacher_analytics,
    ),
    components(
        schemas(
            Identity,
            SignupDto,
            LoginDto,
            StudentProfile,
            Class,
            CreateClassDto,
            UpdateClassDto,
            EnrollDto,
            Enrollment,
            RosterEntry,
            Exam,
            CreateExamDto,
            Submission,
            CreateSubmissionDto,
            Grading,
            GradeDto,
            Notification,
            CreateNotificationDto,
            BulkNotificationDto,
            BulkCreateResponse,
            UnreadCountResponse,
            CalendarEvent,
            CreateEventDto,
            UpdateEventDto,
            StoredFile,
            BulkUploadResponse,
            DashboardCounts,
            PlatformStats,
            StudentRecord,
            TeacherRecord,
            CreateStudentDto,
            CreateTeacherDto,
            UpdateStatusDto,
            StudentDashboard,
            CourseEntry,
            GradeEntry,
            SubmissionEntry,
            TeacherDashboard,
            TaughtStudent,
            ClassAnalytics,
            ExamAnalytics,
            TeacherAnalytics,
            PaginationMeta,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login, and session management"),
        (name = "Classes", description = "Class catalog and enrollment"),
        (name = "Exams", description = "Exams, submissions, and grading"),
        (name = "Notifications", description = "Per-user notification feed"),
        (name = "Calendar", description = "Shared calendar events"),
        (name = "Files", description = "File attachments"),
        (name = "Admin", description = "Administrative account management"),
        (name = "Students", description = "Student self-service views"),
        (name = "Teachers", description = "Teacher self-service views")
    ),
    info(
        title = "ClassHub API",
        version = "0.1.0",
        description = "School management REST API built with Rust, Axum, and SQLite, using cookie-based sessions."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("sid"))),
            )
        }
    }
}
