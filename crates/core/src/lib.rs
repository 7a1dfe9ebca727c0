//! Domain logic for the cabinet backend.
//!
//! Everything here is free of database and HTTP concerns: currency diff
//! math and ingestion planning, the dynamic form overlay with its
//! template and validators, and the friend-invitation rules.

pub mod currency;
pub mod error;
pub mod form;
pub mod invite;
pub mod roles;
pub mod types;
