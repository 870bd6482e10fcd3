mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use common::{
    create_test_student, create_test_teacher, generate_unique_email, json_request, read_json,
    setup_test_app, student_session, teacher_session,
};
use sqlx::SqlitePool;
use tower::ServiceExt;

const BOUNDARY: &str = "----classhub-test-boundary";

/// Hand-built multipart body with a single file part and optional text fields.
fn multipart_request(
    uri: &str,
    token: &str,
    field_name: &str,
    filename: &str,
    content_type: &str,
    content: &[u8],
    extra_fields: &[(&str, &str)],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");
    for (name, value) in extra_fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("cookie", format!("sid={token}"))
        .body(Body::from(body))
        .unwrap()
}

async fn insert_file(
    pool: &SqlitePool,
    uploaded_by: i64,
    uploader_type: &str,
    is_public: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO files (filename, original_name, file_url, file_size, mime_type, file_type,
             uploaded_by, uploader_type, folder_path, is_public, download_count, uploaded_at)
         VALUES (?1, 'notes.pdf', ?2, 42, 'application/pdf', 'document',
             ?3, ?4, '/', ?5, 0, ?6)
         RETURNING id",
    )
    .bind(format!("attachments/{}.pdf", uuid::Uuid::new_v4()))
    .bind(format!("http://localhost:3000/uploads/{}.pdf", uuid::Uuid::new_v4()))
    .bind(uploaded_by)
    .bind(uploader_type)
    .bind(is_public)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_classifies_and_stores(pool: SqlitePool) {
    let teacher = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let token = teacher_session(&pool, &teacher).await;

    let app = setup_test_app(pool);
    let response = app
        .oneshot(multipart_request(
            "/api/files/upload",
            &token,
            "file",
            "syllabus.pdf",
            "application/pdf",
            b"%PDF-1.4 fake content",
            &[("is_public", "true"), ("folder_path", "/course-docs")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert_eq!(body["data"]["original_name"], "syllabus.pdf");
    assert_eq!(body["data"]["file_type"], "document");
    assert_eq!(body["data"]["is_public"], true);
    assert_eq!(body["data"]["folder_path"], "/course-docs");
    assert_eq!(body["data"]["download_count"], 0);
    assert!(body["data"]["file_url"].as_str().unwrap().contains("/uploads/"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_without_file_part(pool: SqlitePool) {
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let token = student_session(&pool, &student).await;

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"folder_path\"\r\n\r\n/x\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("cookie", format!("sid={token}"))
        .body(Body::from(body))
        .unwrap();

    let app = setup_test_app(pool);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_private_files_hidden_from_others(pool: SqlitePool) {
    let uploader = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let other = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    insert_file(&pool, uploader.id, "student", false).await;
    insert_file(&pool, uploader.id, "student", true).await;

    let app = setup_test_app(pool.clone());

    let uploader_token = student_session(&pool, &uploader).await;
    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/files", Some(&uploader_token), None))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let other_token = student_session(&pool, &other).await;
    let response = app
        .oneshot(json_request("GET", "/api/files", Some(&other_token), None))
        .await
        .unwrap();
    let body = read_json(response).await;
    let visible = body["data"].as_array().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["is_public"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_download_redirects_and_counts(pool: SqlitePool) {
    let student = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let id = insert_file(&pool, student.id, "student", true).await;
    let token = student_session(&pool, &student).await;

    let app = setup_test_app(pool.clone());
    let uri = format!("/api/files/{id}/download");

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("GET", &uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().get("location").is_some());
    }

    let count: i64 = sqlx::query_scalar("SELECT download_count FROM files WHERE id = ?1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_download_private_file_of_other_user(pool: SqlitePool) {
    let uploader = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let other = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let id = insert_file(&pool, uploader.id, "student", false).await;

    let token = student_session(&pool, &other).await;
    let app = setup_test_app(pool);
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/files/{id}/download"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_uploader_only(pool: SqlitePool) {
    let uploader = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let other = create_test_student(&pool, &generate_unique_email(), "secret123").await;
    let id = insert_file(&pool, uploader.id, "student", true).await;

    let app = setup_test_app(pool.clone());

    let other_token = student_session(&pool, &other).await;
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/files/{id}"),
            Some(&other_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uploader_token = student_session(&pool, &uploader).await;
    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/files/{id}"),
            Some(&uploader_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE id = ?1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_upload(pool: SqlitePool) {
    let teacher = create_test_teacher(&pool, &generate_unique_email(), "secret123", false).await;
    let token = teacher_session(&pool, &teacher).await;

    let mut body = Vec::new();
    for (name, mime) in [("a.png", "image/png"), ("b.zip", "application/zip")] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; \
                 filename=\"{name}\"\r\nContent-Type: {mime}\r\n\r\ncontent\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/files/upload/bulk")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("cookie", format!("sid={token}"))
        .body(Body::from(body))
        .unwrap();

    let app = setup_test_app(pool);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    let files = body["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file_type"], "image");
    assert_eq!(files[1]["file_type"], "archive");
}
