//! Core application logic for Country Registry
//!
//! This module contains the record engine: tolerant numeric parsing, text
//! normalization, range expressions, validation, the record store, queries,
//! CSV persistence and the session that ties them together.
//!
//! # Examples
//!
//! ```rust
//! use country_registry::app::{
//!     count_by_continent, filter_by_range, parse_range, MatchMode, NumericField, RawRecord,
//!     RecordStore,
//! };
//!
//! let mut store = RecordStore::new();
//! store.insert_raw(&RawRecord::new("Chile", "19_000_000", "756 102", "America")).unwrap();
//! store.insert_raw(&RawRecord::new("Peru", "33_000_000", "1_285_216", "america")).unwrap();
//!
//! let range = parse_range(">=20_000_000").unwrap();
//! let large = filter_by_range(&store, NumericField::Population, range);
//! assert_eq!(large[0].name(), "Peru");
//!
//! assert_eq!(store.find_by_name("CHI", MatchMode::Partial).len(), 1);
//! assert_eq!(count_by_continent(&store).len(), 2);
//! ```

pub mod models;
pub mod numeric;
pub mod persistence;
pub mod query;
pub mod range;
pub mod session;
pub mod store;
pub mod text;
pub mod validator;

// Re-export main public API
pub use models::{MatchMode, NumericField, RawRecord, Record, SortField};
pub use numeric::parse_integer;
pub use persistence::{
    load_records, read_records, save_records, write_records, LoadReport, RejectReason,
    RejectedRow,
};
pub use query::{
    count_by_continent, extremes_by_population, filter_by_continent, filter_by_range,
    mean_area, mean_population, sort, summary, ContinentCount, ContinentCounts, Extremes,
    StatsSummary,
};
pub use range::{parse_range, NumericRange};
pub use session::{AutoSave, LoadSummary, Session, SkipReason};
pub use store::RecordStore;
pub use text::normalize;
pub use validator::validate;
