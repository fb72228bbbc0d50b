//! Query engine: filters, sorting and aggregate statistics
//!
//! Every function here reads a [`RecordStore`] and returns derived data; the
//! store itself is never modified.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::app::models::{NumericField, Record, SortField};
use crate::app::range::NumericRange;
use crate::app::store::RecordStore;
use crate::app::text::normalize;

/// Records whose continent equals `continent` after normalization
///
/// An empty query yields no records.
pub fn filter_by_continent<'a>(store: &'a RecordStore, continent: &str) -> Vec<&'a Record> {
    let key = normalize(continent);
    if key.is_empty() {
        return Vec::new();
    }
    store
        .iter()
        .filter(|r| normalize(r.continent()) == key)
        .collect()
}

/// Records whose `field` value lies in `range` (both bounds inclusive)
pub fn filter_by_range(
    store: &RecordStore,
    field: NumericField,
    range: NumericRange,
) -> Vec<&Record> {
    let matches: Vec<&Record> = store
        .iter()
        .filter(|r| range.contains(r.numeric(field)))
        .collect();
    debug!("{} filter {} matched {} records", field, range, matches.len());
    matches
}

/// Records ordered by `field`
///
/// Names sort on their case-folded form, numeric fields on their value. The
/// sort is stable in both directions: tied records keep store order.
pub fn sort(store: &RecordStore, field: SortField, descending: bool) -> Vec<&Record> {
    let mut sorted: Vec<&Record> = store.iter().collect();
    match field {
        SortField::Name => {
            let mut keyed: Vec<(String, &Record)> =
                sorted.into_iter().map(|r| (r.name_key(), r)).collect();
            keyed.sort_by(|(a, _), (b, _)| directed(a.cmp(b), descending));
            sorted = keyed.into_iter().map(|(_, r)| r).collect();
        }
        SortField::Population => {
            sorted.sort_by(|a, b| directed(a.population().cmp(&b.population()), descending))
        }
        SortField::Area => sorted.sort_by(|a, b| directed(a.area().cmp(&b.area()), descending)),
    }
    sorted
}

fn directed(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Most and least populated records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extremes<'a> {
    /// Record with the highest population
    pub max: &'a Record,
    /// Record with the lowest population
    pub min: &'a Record,
}

/// Most and least populated records, or `None` for an empty store
///
/// Ties resolve to the first occurrence in store order.
pub fn extremes_by_population(store: &RecordStore) -> Option<Extremes<'_>> {
    let mut iter = store.iter();
    let first = iter.next()?;
    let mut extremes = Extremes {
        max: first,
        min: first,
    };
    for record in iter {
        if record.population() > extremes.max.population() {
            extremes.max = record;
        }
        if record.population() < extremes.min.population() {
            extremes.min = record;
        }
    }
    Some(extremes)
}

/// Arithmetic mean of populations
pub fn mean_population(store: &RecordStore) -> Option<f64> {
    mean_of(store, NumericField::Population)
}

/// Arithmetic mean of areas
pub fn mean_area(store: &RecordStore) -> Option<f64> {
    mean_of(store, NumericField::Area)
}

fn mean_of(store: &RecordStore, field: NumericField) -> Option<f64> {
    if store.is_empty() {
        return None;
    }
    // Summed in floating point so large datasets cannot overflow
    let total: f64 = store.iter().map(|r| r.numeric(field) as f64).sum();
    Some(total / store.count() as f64)
}

/// Number of records for one continent spelling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinentCount {
    /// Continent exactly as stored
    pub continent: String,
    /// Records with this spelling
    pub count: usize,
}

/// Record counts per continent, keyed by the continent text as stored
///
/// Spellings that differ only by case form separate groups. Groups appear in
/// order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContinentCounts {
    groups: Vec<ContinentCount>,
}

impl ContinentCounts {
    /// Count for an exact continent spelling
    pub fn get(&self, continent: &str) -> Option<usize> {
        self.groups
            .iter()
            .find(|g| g.continent == continent)
            .map(|g| g.count)
    }

    /// Groups in first-seen order
    pub fn iter(&self) -> std::slice::Iter<'_, ContinentCount> {
        self.groups.iter()
    }

    /// Number of distinct spellings
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group records by continent as stored
pub fn count_by_continent(store: &RecordStore) -> ContinentCounts {
    let mut counts = ContinentCounts::default();
    for record in store {
        match counts
            .groups
            .iter_mut()
            .find(|g| g.continent == record.continent())
        {
            Some(group) => group.count += 1,
            None => counts.groups.push(ContinentCount {
                continent: record.continent().to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// All statistics in one value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary<'a> {
    /// Number of records
    pub total: usize,
    /// Most populated record
    pub most_populated: &'a Record,
    /// Least populated record
    pub least_populated: &'a Record,
    /// Mean population
    pub mean_population: f64,
    /// Mean area in km²
    pub mean_area: f64,
    /// Counts per continent as stored
    pub continents: ContinentCounts,
}

/// Compute every statistic, or `None` for an empty store
pub fn summary(store: &RecordStore) -> Option<StatsSummary<'_>> {
    let extremes = extremes_by_population(store)?;
    Some(StatsSummary {
        total: store.count(),
        most_populated: extremes.max,
        least_populated: extremes.min,
        mean_population: mean_population(store)?,
        mean_area: mean_area(store)?,
        continents: count_by_continent(store),
    })
}
