//! Request extractors for the caller's identity.
//!
//! - [`auth::AuthUser`] -- any logged-in user (403 when anonymous, 401 on a bad token).
//! - [`rbac::RequireAdmin`] -- an admin.

pub mod auth;
pub mod rbac;
