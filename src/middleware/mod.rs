//! Request middleware and extractors.
//!
//! [`auth`] resolves the opaque session cookie into a typed [`Identity`]
//! before handler dispatch, and provides role-gated wrapper extractors
//! (`CurrentStudent`, `CurrentTeacher`, `CurrentAdmin`). A role mismatch
//! rejects with 403; a missing or expired session with 401.
//!
//! [`Identity`]: crate::modules::auth::model::Identity

pub mod auth;
