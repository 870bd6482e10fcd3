use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use crate::middleware::auth::{CurrentStudent, CurrentTeacher, CurrentUser};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{CreateExamDto, CreateSubmissionDto, Exam, GradeDto, Grading, Submission};
use super::service::ExamService;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExamQuery {
    pub class_id: i64,
}

/// Create an exam on a class the session teacher owns.
#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam created", body = Exam),
        (status = 403, description = "Teacher account required", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Exams"
)]
#[instrument(skip(state, teacher, dto))]
pub async fn create_exam(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<(StatusCode, Json<ApiResponse<Exam>>), AppError> {
    let exam = ExamService::create_exam(&state.db, teacher.id, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(exam))))
}

/// Exams of one class.
#[utoipa::path(
    get,
    path = "/api/exams",
    params(ExamQuery),
    responses(
        (status = 200, description = "Exams for the class", body = [Exam])
    ),
    tag = "Exams"
)]
#[instrument(skip(state, _user))]
pub async fn list_exams(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ExamQuery>,
) -> Result<Json<ApiResponse<Vec<Exam>>>, AppError> {
    let exams = ExamService::list_by_class(&state.db, query.class_id).await?;
    Ok(Json(ApiResponse::new(exams)))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(("id" = i64, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam detail", body = Exam),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams"
)]
#[instrument(skip(state, _user))]
pub async fn get_exam(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Exam>>, AppError> {
    let exam = ExamService::get_exam(&state.db, id).await?;
    Ok(Json(ApiResponse::new(exam)))
}

/// Submit to an exam. Requires enrollment in the exam's class.
#[utoipa::path(
    post,
    path = "/api/exams/{id}/submissions",
    params(("id" = i64, Path, description = "Exam ID")),
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission recorded", body = Submission),
        (status = 403, description = "Not enrolled in the exam's class", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams"
)]
#[instrument(skip(state, student, dto))]
pub async fn submit(
    State(state): State<AppState>,
    student: CurrentStudent,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<ApiResponse<Submission>>), AppError> {
    let submission = ExamService::submit(&state.db, student.id, id, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(submission))))
}

/// Submissions for an exam. Owner teacher only.
#[utoipa::path(
    get,
    path = "/api/exams/{id}/submissions",
    params(("id" = i64, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Submissions", body = [Submission]),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams"
)]
#[instrument(skip(state, teacher))]
pub async fn list_submissions(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Submission>>>, AppError> {
    let submissions = ExamService::list_submissions(&state.db, teacher.id, id).await?;
    Ok(Json(ApiResponse::new(submissions)))
}

/// Grade (or re-grade) a submission. Upsert keyed on the submission.
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/grade",
    params(("id" = i64, Path, description = "Submission ID")),
    request_body = GradeDto,
    responses(
        (status = 200, description = "Grading recorded", body = Grading),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 400, description = "Grade out of bounds", body = ErrorResponse)
    ),
    tag = "Exams"
)]
#[instrument(skip(state, teacher, dto))]
pub async fn grade_submission(
    State(state): State<AppState>,
    teacher: CurrentTeacher,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<GradeDto>,
) -> Result<Json<ApiResponse<Grading>>, AppError> {
    let grading = ExamService::grade(&state.db, teacher.id, id, dto).await?;
    Ok(Json(ApiResponse::new(grading)))
}
