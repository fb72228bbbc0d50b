//! In-memory record store
//!
//! An ordered collection of validated records with case-insensitive name
//! uniqueness. Every mutation goes through the validator, so the store never
//! holds an invalid record or two records whose names normalize equal.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::app::models::{MatchMode, RawRecord, Record};
use crate::app::text::normalize;
use crate::app::validator::{check_numeric, validate};
use crate::errors::{StoreError, StoreResult};

/// Ordered collection of validated records
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate names
    pub fn from_records(records: Vec<Record>) -> StoreResult<Self> {
        let mut store = Self::new();
        store.replace_all(records)?;
        Ok(store)
    }

    /// Swap the entire collection
    ///
    /// The new collection must not contain duplicate names; on error the
    /// current contents are kept.
    pub fn replace_all(&mut self, records: Vec<Record>) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.name_key()) {
                return Err(StoreError::DuplicateName {
                    name: record.name().to_string(),
                });
            }
        }

        info!("Replacing store contents with {} records", records.len());
        self.records = records;
        Ok(())
    }

    /// Append a record unless its name collides with an existing one
    pub fn insert(&mut self, record: Record) -> StoreResult<()> {
        if self.contains_name(record.name()) {
            debug!("Rejected duplicate name: {}", record.name());
            return Err(StoreError::DuplicateName {
                name: record.name().to_string(),
            });
        }

        debug!("Inserted record: {}", record.name());
        self.records.push(record);
        Ok(())
    }

    /// Validate raw fields and insert the resulting record
    pub fn insert_raw(&mut self, raw: &RawRecord) -> StoreResult<&Record> {
        let record = validate(raw)?;
        self.insert(record)?;
        Ok(&self.records[self.records.len() - 1])
    }

    /// Whether a record with this name (after normalization) exists
    pub fn contains_name(&self, name: &str) -> bool {
        let key = normalize(name);
        self.records.iter().any(|r| r.name_key() == key)
    }

    /// Records whose name matches `query`
    ///
    /// An empty query matches nothing.
    pub fn find_by_name(&self, query: &str, mode: MatchMode) -> Vec<&Record> {
        self.find_indices(query, mode)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Positions of the records whose name matches `query`
    pub fn find_indices(&self, query: &str, mode: MatchMode) -> Vec<usize> {
        let key = normalize(query);
        if key.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                let name = r.name_key();
                match mode {
                    MatchMode::Exact => name == key,
                    MatchMode::Partial => name.contains(&key),
                }
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Change population and/or area of the record at `index`
    ///
    /// Missing values keep the current ones. The merged values are validated
    /// before anything is committed.
    pub fn update_numeric_fields(
        &mut self,
        index: usize,
        population: Option<i64>,
        area: Option<i64>,
    ) -> StoreResult<&Record> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfBounds { index, len })?;

        let population = population.unwrap_or(record.population());
        let area = area.unwrap_or(record.area());
        check_numeric(population, area)?;

        record.set_numeric(population, area);
        info!(
            "Updated {}: population={} area={}",
            record.name(),
            population,
            area
        );
        Ok(record)
    }

    /// Record at `index`
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// All records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    fn record(name: &str, population: i64, area: i64, continent: &str) -> Record {
        validate(&RawRecord::new(
            name,
            population.to_string(),
            area.to_string(),
            continent,
        ))
        .unwrap()
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            record("Argentina", 45_000_000, 2_780_400, "America"),
            record("Brazil", 210_000_000, 8_515_767, "America"),
            record("Germany", 83_000_000, 357_022, "Europe"),
        ])
        .unwrap()
    }

    #[test]
    fn test_insert_rejects_case_variant_duplicate() {
        let mut store = RecordStore::new();
        store.insert(record("Brazil", 1, 1, "America")).unwrap();

        let err = store.insert(record("  BRAZIL ", 2, 2, "America")).unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateName {
                name: "BRAZIL".to_string()
            }
        );
        assert_eq!(store.count(), 1);

        store.insert(record("Argentina", 1, 1, "America")).unwrap();
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_insert_raw_validates_first() {
        let mut store = RecordStore::new();
        let err = store
            .insert_raw(&RawRecord::new("Chile", "-3", "10", "America"))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::PopulationOutOfRange)
        );
        assert!(store.is_empty());

        let inserted = store
            .insert_raw(&RawRecord::new("Chile", "19_000_000", "756_102", "America"))
            .unwrap();
        assert_eq!(inserted.population(), 19_000_000);
    }

    #[test]
    fn test_replace_all_keeps_old_contents_on_duplicate() {
        let mut store = sample_store();
        let err = store
            .replace_all(vec![record("Peru", 1, 1, "America"), record("peru", 2, 2, "America")])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));
        assert_eq!(store.count(), 3);

        store.replace_all(vec![record("Peru", 1, 1, "America")]).unwrap();
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_find_by_name_modes() {
        let store = sample_store();

        let partial = store.find_by_name("AR", MatchMode::Partial);
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].name(), "Argentina");

        let partial = store.find_by_name("a", MatchMode::Partial);
        assert_eq!(partial.len(), 3);

        assert!(store.find_by_name("Braz", MatchMode::Exact).is_empty());
        assert_eq!(store.find_by_name(" brazil ", MatchMode::Exact).len(), 1);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let store = sample_store();
        assert!(store.find_by_name("", MatchMode::Partial).is_empty());
        assert!(store.find_by_name("   ", MatchMode::Exact).is_empty());
        assert!(store.find_indices("", MatchMode::Partial).is_empty());
    }

    #[test]
    fn test_update_numeric_fields() {
        let mut store = sample_store();

        let updated = store.update_numeric_fields(2, Some(84_000_000), None).unwrap();
        assert_eq!(updated.population(), 84_000_000);
        assert_eq!(updated.area(), 357_022);

        let updated = store.update_numeric_fields(2, None, Some(357_000)).unwrap();
        assert_eq!(updated.population(), 84_000_000);
        assert_eq!(updated.area(), 357_000);
    }

    #[test]
    fn test_update_rejection_leaves_store_unchanged() {
        let mut store = sample_store();

        let err = store.update_numeric_fields(0, Some(1), Some(0)).unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::AreaOutOfRange));
        assert_eq!(store.get(0).unwrap().population(), 45_000_000);
        assert_eq!(store.get(0).unwrap().area(), 2_780_400);

        let err = store.update_numeric_fields(9, Some(1), None).unwrap_err();
        assert_eq!(err, StoreError::IndexOutOfBounds { index: 9, len: 3 });
    }
}
