mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    create_test_student, create_test_teacher, generate_unique_email, json_request, read_json,
    setup_test_app, student_session, teacher_session,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_event(pool: SqlitePool) {
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &student).await;

    let start = Utc::now() + Duration::days(1);
    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/calendar/events",
            Some(&token),
            Some(json!({
                "title": "Study group",
                "start_date": start.to_rfc3339(),
                "end_date": (start + Duration::hours(2)).to_rfc3339(),
                "event_type": "meeting"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert_eq!(body["data"]["created_by"], student.id);
    assert_eq!(body["data"]["creator_type"], "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_event_rejects_inverted_range(pool: SqlitePool) {
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &student).await;

    let start = Utc::now();
    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/calendar/events",
            Some(&token),
            Some(json!({
                "title": "Backwards",
                "start_date": start.to_rfc3339(),
                "end_date": (start - Duration::hours(1)).to_rfc3339(),
                "event_type": "meeting"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_event_requires_teacher(pool: SqlitePool) {
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &student).await;

    let start = Utc::now();
    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/calendar/events",
            Some(&token),
            Some(json!({
                "title": "Class thing",
                "start_date": start.to_rfc3339(),
                "end_date": (start + Duration::hours(1)).to_rfc3339(),
                "event_type": "exam",
                "class_id": 12345
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_range_filter_on_start_date(pool: SqlitePool) {
    let teacher = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let token = teacher_session(&pool, &teacher).await;

    let base = Utc::now();
    let app = setup_test_app(pool);
    for (title, offset_days) in [("early", 1), ("middle", 5), ("late", 20)] {
        let start = base + Duration::days(offset_days);
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/calendar/events",
                Some(&token),
                Some(json!({
                    "title": title,
                    "start_date": start.to_rfc3339(),
                    "end_date": (start + Duration::hours(1)).to_rfc3339(),
                    "event_type": "meeting"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let from = (base + Duration::days(3)).to_rfc3339();
    let to = (base + Duration::days(10)).to_rfc3339();
    let uri = format!(
        "/api/calendar/events?from={}&to={}",
        urlencoding(&from),
        urlencoding(&to)
    );

    let response = app
        .oneshot(json_request("GET", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "middle");
}

fn urlencoding(value: &str) -> String {
    value.replace('+', "%2B").replace(':', "%3A")
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_creator_only(pool: SqlitePool) {
    let creator = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let other = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let creator_token = student_session(&pool, &creator).await;
    let other_token = student_session(&pool, &other).await;

    let start = Utc::now();
    let app = setup_test_app(pool);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/calendar/events",
            Some(&creator_token),
            Some(json!({
                "title": "Mine",
                "start_date": start.to_rfc3339(),
                "end_date": (start + Duration::hours(1)).to_rfc3339(),
                "event_type": "meeting"
            })),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/calendar/events/{id}"),
            Some(&other_token),
            Some(json!({"title": "Stolen"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/calendar/events/{id}"),
            Some(&creator_token),
            Some(json!({"title": "Renamed"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["title"], "Renamed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_cannot_invert_range(pool: SqlitePool) {
    let creator = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &creator).await;

    let start = Utc::now();
    let app = setup_test_app(pool);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/calendar/events",
            Some(&token),
            Some(json!({
                "title": "Window",
                "start_date": start.to_rfc3339(),
                "end_date": (start + Duration::hours(1)).to_rfc3339(),
                "event_type": "meeting"
            })),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/calendar/events/{id}"),
            Some(&token),
            Some(json!({"end_date": (start - Duration::hours(5)).to_rfc3339()})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_creator_only(pool: SqlitePool) {
    let creator = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let other = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let creator_token = student_session(&pool, &creator).await;
    let other_token = student_session(&pool, &other).await;

    let start = Utc::now();
    let app = setup_test_app(pool);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/calendar/events",
            Some(&creator_token),
            Some(json!({
                "title": "Short lived",
                "start_date": start.to_rfc3339(),
                "end_date": start.to_rfc3339(),
                "event_type": "meeting"
            })),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/calendar/events/{id}"),
            Some(&other_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/calendar/events/{id}"),
            Some(&creator_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
