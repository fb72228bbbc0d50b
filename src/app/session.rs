//! Working session over one dataset
//!
//! A [`Session`] owns the record store, remembers which file it was loaded
//! from and saves back to that file after each mutation when auto-save is on.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::models::{MatchMode, RawRecord, Record};
use crate::app::persistence::{load_records, save_records, LoadReport, RejectedRow};
use crate::app::store::RecordStore;
use crate::errors::{PersistenceError, Result, SessionError, SessionResult, StoreResult};

/// Why an automatic save did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Auto-save is disabled in the configuration
    Disabled,
    /// No file is associated with the session
    NoSource,
}

/// What happened to the backing file after a mutation
#[derive(Debug)]
pub enum AutoSave {
    /// Changes were written to this path
    Saved(PathBuf),
    /// No save was attempted
    Skipped(SkipReason),
    /// The save failed; the in-memory change is kept
    Failed(PersistenceError),
}

/// Summary of a load, without the records themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows accepted into the store
    pub accepted: usize,
    /// Rows skipped
    pub rejected: Vec<RejectedRow>,
}

impl LoadSummary {
    /// Number of rows skipped
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Record store bound to an optional backing file
#[derive(Debug, Default)]
pub struct Session {
    store: RecordStore,
    source: Option<PathBuf>,
    auto_save: bool,
}

impl Session {
    /// Create an empty session
    pub fn new(auto_save: bool) -> Self {
        Self {
            store: RecordStore::new(),
            source: None,
            auto_save,
        }
    }

    /// Replace the store with the contents of `path` and remember the path
    ///
    /// On error the current store and source are left as they were.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadSummary> {
        let path = path.as_ref();
        let LoadReport { records, rejected } = load_records(path)?;
        let accepted = records.len();

        self.store.replace_all(records)?;
        self.source = Some(path.to_path_buf());

        Ok(LoadSummary { accepted, rejected })
    }

    /// Validate and add a record, then auto-save
    pub fn add(&mut self, raw: &RawRecord) -> StoreResult<AutoSave> {
        let record = self.store.insert_raw(raw)?;
        info!("Added {} ({})", record.name(), record.continent());
        Ok(self.auto_save())
    }

    /// Update population and/or area of the record at `index`, then auto-save
    pub fn update(
        &mut self,
        index: usize,
        population: Option<i64>,
        area: Option<i64>,
    ) -> StoreResult<AutoSave> {
        self.store.update_numeric_fields(index, population, area)?;
        Ok(self.auto_save())
    }

    /// Write the store to its backing file
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.source.as_ref().ok_or(SessionError::NoDataLoaded)?;
        save_records(path, self.store.records())?;
        Ok(path.clone())
    }

    fn auto_save(&self) -> AutoSave {
        if !self.auto_save {
            return AutoSave::Skipped(SkipReason::Disabled);
        }
        let Some(path) = &self.source else {
            debug!("No backing file; skipping auto-save");
            return AutoSave::Skipped(SkipReason::NoSource);
        };
        match save_records(path, self.store.records()) {
            Ok(()) => AutoSave::Saved(path.clone()),
            Err(e) => {
                warn!("Auto-save to {} failed: {}", path.display(), e);
                AutoSave::Failed(e)
            }
        }
    }

    /// Resolve a name query to a single record position
    ///
    /// An exact match wins; otherwise the query must match exactly one name
    /// partially.
    pub fn resolve_single(&self, query: &str) -> SessionResult<usize> {
        let exact = self.store.find_indices(query, MatchMode::Exact);
        if let [index] = exact.as_slice() {
            return Ok(*index);
        }

        let partial = self.store.find_indices(query, MatchMode::Partial);
        match partial.as_slice() {
            [] => Err(SessionError::NoMatch {
                query: query.to_string(),
            }),
            [index] => Ok(*index),
            indices => Err(SessionError::AmbiguousMatch {
                query: query.to_string(),
                candidates: indices
                    .iter()
                    .filter_map(|&i| self.store.get(i))
                    .map(|r| r.name().to_string())
                    .collect(),
            }),
        }
    }

    /// The record store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Record at `index`
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.store.get(index)
    }

    /// Backing file, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, StoreError, ValidationError};
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("countries.csv");
        std::fs::write(
            &path,
            "name,population,area,continent\n\
             Guatemala,17_000_000,108889,America\n\
             Guyana,800000,214969,America\n\
             Bad,,1,America\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_load_reports_counts() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        let mut session = Session::new(true);
        let summary = session.load(&path).unwrap();
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.rejected_count(), 1);
        assert_eq!(session.store().count(), 2);
        assert_eq!(session.source(), Some(path.as_path()));
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        let mut session = Session::new(true);
        session.load(&path).unwrap();
        let err = session.load(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, AppError::Persistence(PersistenceError::NotFound { .. })));
        assert_eq!(session.store().count(), 2);
        assert_eq!(session.source(), Some(path.as_path()));
    }

    #[test]
    fn test_add_auto_saves() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        let mut session = Session::new(true);
        session.load(&path).unwrap();
        let outcome = session
            .add(&RawRecord::new("Belize", "400_000", "22966", "America"))
            .unwrap();
        assert!(matches!(outcome, AutoSave::Saved(ref p) if p == &path));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Belize,400000,22966,America"));
        assert!(!content.contains("Bad"));
    }

    #[test]
    fn test_add_without_source_or_disabled() {
        let mut session = Session::new(true);
        let outcome = session
            .add(&RawRecord::new("Belize", "1", "1", "America"))
            .unwrap();
        assert!(matches!(outcome, AutoSave::Skipped(SkipReason::NoSource)));

        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let before = std::fs::read_to_string(&path).unwrap();
        let mut session = Session::new(false);
        session.load(&path).unwrap();
        let outcome = session.update(0, Some(1), None).unwrap();
        assert!(matches!(outcome, AutoSave::Skipped(SkipReason::Disabled)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_rejected_mutations_do_not_save() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let before = std::fs::read_to_string(&path).unwrap();

        let mut session = Session::new(true);
        session.load(&path).unwrap();
        let err = session
            .add(&RawRecord::new("guyana", "1", "1", "America"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));
        let err = session.update(0, None, Some(0)).unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::AreaOutOfRange));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_resolve_single() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let mut session = Session::new(false);
        session.load(&path).unwrap();

        assert_eq!(session.resolve_single("guyana").unwrap(), 1);
        assert_eq!(session.resolve_single("temal").unwrap(), 0);
        assert!(matches!(
            session.resolve_single("gu"),
            Err(SessionError::AmbiguousMatch { ref candidates, .. }) if candidates.len() == 2
        ));
        assert!(matches!(
            session.resolve_single("peru"),
            Err(SessionError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_save_requires_source() {
        let session = Session::new(true);
        assert!(matches!(
            session.save(),
            Err(AppError::Session(SessionError::NoDataLoaded))
        ));
    }
}
