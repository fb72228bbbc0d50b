//! Prelude module for Country Registry Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use country_registry::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use country_registry::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut session = Session::new(true);
//!     session.load("data/countries.csv")?;
//!
//!     let range = parse_range(">=10_000_000").ok_or_else(|| AppError::generic("bad range"))?;
//!     for record in filter_by_range(session.store(), NumericField::Population, range) {
//!         println!("{}", record.name());
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Data types
pub use crate::app::{MatchMode, NumericField, NumericRange, RawRecord, Record, SortField};

// Store, session and persistence
pub use crate::app::{
    load_records, save_records, AutoSave, LoadReport, LoadSummary, RecordStore, Session,
};

// Parsing and validation
pub use crate::app::{normalize, parse_integer, parse_range, validate};

// Queries
pub use crate::app::{
    count_by_continent, extremes_by_population, filter_by_continent, filter_by_range, mean_area,
    mean_population, sort, summary, ContinentCounts, StatsSummary,
};

// Configuration
pub use crate::config::AppConfig;
