//! Feature modules, one directory per resource.
//!
//! Each module follows the same layout: `model` (rows and DTOs), `service`
//! (business logic against the pool), `controller` (axum handlers), and
//! `router` (route table).

pub mod admin;
pub mod auth;
pub mod calendar;
pub mod classes;
pub mod exams;
pub mod files;
pub mod notifications;
pub mod students;
pub mod teachers;
