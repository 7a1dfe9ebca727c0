//! Exchange-rate ingestion.
//!
//! - [`client`] -- the [`RateProvider`] seam and its HTTP implementation.
//! - [`ingest`] -- fetch, filter and upsert one day of rates.

pub mod client;
pub mod ingest;

pub use client::{CbrClient, RateProvider, RateProviderError};
pub use ingest::RateIngestor;
