//! # ClassHub API
//!
//! A school management REST API built with Rust, Axum, and SQLite.
//!
//! ## Overview
//!
//! ClassHub covers the day-to-day workflow of a small school:
//!
//! - **Authentication**: server-side sessions carried in an HttpOnly cookie
//! - **Classes**: teacher-owned classes with password-protected, capacity
//!   limited enrollment
//! - **Exams**: per-class exams, student submissions, and teacher grading
//! - **Notifications**: per-user feed with bulk fan-out for admins
//! - **Calendar**: shared events, optionally tied to a class
//! - **Files**: attachment uploads with a pluggable storage sink
//! - **Admin**: account provisioning, soft deletion, and platform stats
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── config/           # Configuration (database, CORS, sessions, uploads)
//! ├── middleware/       # Session extractors (CurrentUser, CurrentTeacher, ...)
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Signup, login, logout, session verification
//! │   ├── classes/     # Class catalog and enrollment
//! │   ├── exams/       # Exams, submissions, grading
//! │   ├── notifications/
//! │   ├── calendar/
//! │   ├── files/
//! │   ├── admin/
//! │   ├── students/    # Student self-service read models
//! │   └── teachers/    # Teacher self-service read models
//! └── utils/           # Errors, pagination, password hashing, slugs
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## Authorization
//!
//! The acting identity is always re-derived from the session; path ids only
//! address resources. Role checks yield 403, ownership mismatches yield 404
//! so foreign resources cannot be probed.

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
