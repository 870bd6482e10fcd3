mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    create_test_class, create_test_student, create_test_teacher, generate_unique_email,
    json_request, read_json, setup_test_app, student_session, teacher_session,
};
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn seed_graded_submission(
    pool: &SqlitePool,
    class_id: i64,
    student_id: i64,
    grade: f64,
) -> i64 {
    let exam_id: i64 = sqlx::query_scalar(
        "INSERT INTO exams (title, description, class_id, deadline, slug, created_at)
         VALUES ('Quiz', '', ?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(class_id)
    .bind(Utc::now() + Duration::days(1))
    .bind(format!("quiz-{}", uuid::Uuid::new_v4()))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap();

    let submission_id: i64 = sqlx::query_scalar(
        "INSERT INTO submissions (exam_id, student_id, file_url, submitted_at)
         VALUES (?1, ?2, 'http://files.test/q.pdf', ?3) RETURNING id",
    )
    .bind(exam_id)
    .bind(student_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO gradings (submission_id, student_id, grade, feedback, graded_at)
         VALUES (?1, ?2, ?3, NULL, ?4)",
    )
    .bind(submission_id)
    .bind(student_id)
    .bind(grade)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();

    submission_id
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_views_are_self_only(pool: SqlitePool) {
    let a = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let b = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &a).await;

    let app = setup_test_app(pool);
    for surface in ["dashboard", "courses", "grades", "submissions"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "GET",
                &format!("/api/students/{}/{surface}", b.id),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "surface {surface}");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_dashboard_aggregates(pool: SqlitePool) {
    let teacher = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let class = create_test_class(&pool, teacher.id, "Stats 101", "join-me", 10).await;
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;

    sqlx::query("INSERT INTO enrollments (student_id, class_id, enrolled_at) VALUES (?1, ?2, ?3)")
        .bind(student.id)
        .bind(class.id)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();
    seed_graded_submission(&pool, class.id, student.id, 80.0).await;
    seed_graded_submission(&pool, class.id, student.id, 90.0).await;

    let token = student_session(&pool, &student).await;
    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/students/{}/dashboard", student.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["enrolled_classes"], 1);
    assert_eq!(body["data"]["submissions"], 2);
    assert_eq!(body["data"]["graded_submissions"], 2);
    assert_eq!(body["data"]["average_grade"], 85.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_grades_join_exam_and_class(pool: SqlitePool) {
    let teacher = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let class = create_test_class(&pool, teacher.id, "Stats 101", "join-me", 10).await;
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    seed_graded_submission(&pool, class.id, student.id, 77.0).await;

    let token = student_session(&pool, &student).await;
    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/students/{}/grades", student.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let grades = body["data"].as_array().unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0]["grade"], 77.0);
    assert_eq!(grades[0]["exam_title"], "Quiz");
    assert_eq!(grades[0]["class_name"], "Stats 101");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_views_are_self_only(pool: SqlitePool) {
    let a = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let b = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let token = teacher_session(&pool, &a).await;

    let app = setup_test_app(pool);
    for surface in ["dashboard", "classes", "students", "analytics"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "GET",
                &format!("/api/teachers/{}/{surface}", b.id),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "surface {surface}");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_dashboard_and_analytics(pool: SqlitePool) {
    let teacher = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let class = create_test_class(&pool, teacher.id, "Geometry", "join-me", 10).await;
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;

    sqlx::query("INSERT INTO enrollments (student_id, class_id, enrolled_at) VALUES (?1, ?2, ?3)")
        .bind(student.id)
        .bind(class.id)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();
    seed_graded_submission(&pool, class.id, student.id, 65.0).await;

    let token = teacher_session(&pool, &teacher).await;
    let app = setup_test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/teachers/{}/dashboard", teacher.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["classes"], 1);
    assert_eq!(body["data"]["students"], 1);
    assert_eq!(body["data"]["exams"], 1);
    assert_eq!(body["data"]["ungraded_submissions"], 0);

    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/teachers/{}/analytics", teacher.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let classes = body["data"]["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["enrolled"], 1);
    let exams = body["data"]["exams"].as_array().unwrap();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0]["submissions"], 1);
    assert_eq!(exams[0]["graded"], 1);
    assert_eq!(exams[0]["average_grade"], 65.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_use_teacher_surface(pool: SqlitePool) {
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &student).await;

    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/teachers/{}/dashboard", student.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
