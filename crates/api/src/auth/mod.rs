//! Credentials and tokens: [`password`] hashing and [`jwt`] access tokens.

pub mod jwt;
pub mod password;
