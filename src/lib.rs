//! Country Registry Library
//!
//! A Rust library for managing a CSV file of country records: tolerant
//! validation of raw rows, an in-memory store with case-insensitive name
//! uniqueness, filters, stable sorts and aggregate statistics.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
