use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::body::Body;
use axum::http::{Request, Response};
use chrono::{Duration, Utc};
use classhub::config::cors::CorsConfig;
use classhub::config::session::SessionConfig;
use classhub::config::uploads::UploadConfig;
use classhub::router::init_router;
use classhub::state::AppState;
use classhub::utils::password::hash_password;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use uuid::Uuid;

static NEXT_ID: AtomicI64 = AtomicI64::new(1000);

/// Process-unique id for student/teacher rows, which carry externally
/// assigned primary keys.
pub fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn setup_test_app(pool: SqlitePool) -> axum::Router {
    dotenvy::dotenv().ok();
    let upload_config = UploadConfig {
        base_dir: PathBuf::from(std::env::temp_dir()).join(format!("classhub-test-{}", Uuid::new_v4())),
        base_url: "http://localhost:3000/uploads".to_string(),
        max_file_size: 1024 * 1024,
    };
    let state = AppState::new(
        pool,
        CorsConfig::from_env(),
        SessionConfig::from_env(),
        upload_config,
    );
    init_router(state)
}

#[allow(dead_code)]
pub struct TestStudent {
    pub id: i64,
    pub email: String,
    pub password: String,
}

#[allow(dead_code)]
pub struct TestTeacher {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

#[allow(dead_code)]
pub struct TestClass {
    pub id: i64,
    pub slug: String,
    pub password: String,
}

pub async fn create_test_student(pool: &SqlitePool, email: &str, password: &str) -> TestStudent {
    let id = next_id();
    let hashed = hash_password(password).unwrap();

    sqlx::query(
        "INSERT INTO students (id, name, email, password, is_active, enrollment_date)
         VALUES (?1, ?2, ?3, ?4, TRUE, ?5)",
    )
    .bind(id)
    .bind("Test Student")
    .bind(email)
    .bind(&hashed)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();

    TestStudent {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub async fn create_test_teacher(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    is_admin: bool,
) -> TestTeacher {
    let id = next_id();
    let hashed = hash_password(password).unwrap();

    sqlx::query(
        "INSERT INTO teachers (id, name, email, password, department, is_teacher, is_admin, is_active)
         VALUES (?1, ?2, ?3, ?4, '', TRUE, ?5, TRUE)",
    )
    .bind(id)
    .bind("Test Teacher")
    .bind(email)
    .bind(&hashed)
    .bind(is_admin)
    .execute(pool)
    .await
    .unwrap();

    TestTeacher {
        id,
        email: email.to_string(),
        password: password.to_string(),
        is_admin,
    }
}

#[allow(dead_code)]
pub async fn create_test_class(
    pool: &SqlitePool,
    teacher_id: i64,
    name: &str,
    password: &str,
    max_students: i64,
) -> TestClass {
    let hashed = hash_password(password).unwrap();
    let slug = format!("test-class-{}", Uuid::new_v4());

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO classes (name, description, semester, slug, password, teacher_id, max_students, is_active, created_at)
         VALUES (?1, '', '2026-fall', ?2, ?3, ?4, ?5, TRUE, ?6)
         RETURNING id",
    )
    .bind(name)
    .bind(&slug)
    .bind(&hashed)
    .bind(teacher_id)
    .bind(max_students)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap();

    TestClass {
        id,
        slug,
        password: password.to_string(),
    }
}

/// Inserts a session row directly so tests skip the login round trip.
pub async fn create_test_session(
    pool: &SqlitePool,
    user_type: &str,
    user_id: i64,
    email: &str,
    is_admin: bool,
) -> String {
    let token = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO sessions (token, user_type, user_id, name, email, is_admin, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&token)
    .bind(user_type)
    .bind(user_id)
    .bind("Test User")
    .bind(email)
    .bind(is_admin)
    .bind(now)
    .bind(now + Duration::hours(24))
    .execute(pool)
    .await
    .unwrap();

    token
}

#[allow(dead_code)]
pub async fn student_session(pool: &SqlitePool, student: &TestStudent) -> String {
    create_test_session(pool, "student", student.id, &student.email, false).await
}

#[allow(dead_code)]
pub async fn teacher_session(pool: &SqlitePool, teacher: &TestTeacher) -> String {
    create_test_session(pool, "teacher", teacher.id, &teacher.email, teacher.is_admin).await
}

/// Builds a JSON request, attaching the session cookie when given.
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("cookie", format!("sid={token}"));
    }

    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Pulls the session token out of a login response's Set-Cookie header.
#[allow(dead_code)]
pub fn session_token_from(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get("set-cookie")?.to_str().ok()?;
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    (name == "sid").then(|| value.to_string())
}
