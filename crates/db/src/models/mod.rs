//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where rows are inserted from outside, a create DTO.

pub mod currency;
pub mod event;
pub mod form;
pub mod sms_notification;
pub mod user;
