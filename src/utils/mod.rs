//! Shared utilities.
//!
//! - [`errors`]: application error type and HTTP rendering
//! - [`pagination`]: offset+limit pagination parameters and metadata
//! - [`password`]: bcrypt hashing and verification
//! - [`response`]: JSON success envelopes
//! - [`slug`]: URL-safe slug generation

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;
pub mod slug;
