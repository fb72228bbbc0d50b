//! Data models for Country Registry
//!
//! This module defines the record type held by the store, the untyped raw
//! form it is validated from, and the field selectors used by queries.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::app::text::normalize;
use crate::errors::QueryError;

/// One validated country entry
///
/// Records are only built by the validator, so every instance satisfies the
/// business rules: non-empty trimmed name and continent, population >= 0 and
/// area > 0. Name and continent cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    population: i64,
    area: i64,
    continent: String,
}

impl Record {
    /// Assemble a record from already-checked parts
    pub(crate) fn from_checked(name: String, population: i64, area: i64, continent: String) -> Self {
        Self {
            name,
            population,
            area,
            continent,
        }
    }

    /// Country name as stored
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Population
    pub fn population(&self) -> i64 {
        self.population
    }

    /// Area in km²
    pub fn area(&self) -> i64 {
        self.area
    }

    /// Continent as stored (original spelling preserved)
    pub fn continent(&self) -> &str {
        &self.continent
    }

    /// Normalized name used for uniqueness and matching
    pub fn name_key(&self) -> String {
        normalize(&self.name)
    }

    /// Value of a numeric field
    pub fn numeric(&self, field: NumericField) -> i64 {
        match field {
            NumericField::Population => self.population,
            NumericField::Area => self.area,
        }
    }

    /// Raw textual form of this record, as it would be read back from a file
    pub fn to_raw(&self) -> RawRecord {
        RawRecord::new(
            self.name.clone(),
            self.population.to_string(),
            self.area.to_string(),
            self.continent.clone(),
        )
    }

    pub(crate) fn set_numeric(&mut self, population: i64, area: i64) {
        self.population = population;
        self.area = area;
    }
}

/// Untyped field text for one candidate record
///
/// Produced by the file reader for each row and by the interactive prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Country name text
    pub name: String,
    /// Population text (may contain `_` or space separators)
    pub population: String,
    /// Area text (may contain `_` or space separators)
    pub area: String,
    /// Continent text
    pub continent: String,
}

impl RawRecord {
    /// Create a raw record from its four field texts
    pub fn new(
        name: impl Into<String>,
        population: impl Into<String>,
        area: impl Into<String>,
        continent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            population: population.into(),
            area: area.into(),
            continent: continent.into(),
        }
    }
}

/// Name matching mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Normalized name equals normalized query
    Exact,
    /// Normalized name contains normalized query
    #[default]
    Partial,
}

/// Numeric fields usable in range filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    /// Population
    Population,
    /// Area in km²
    Area,
}

impl NumericField {
    /// Field name as used in headers and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "population" => Ok(Self::Population),
            "area" => Ok(Self::Area),
            _ => Err(QueryError::InvalidNumericField {
                field: s.to_string(),
            }),
        }
    }
}

/// Fields usable as sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Case-folded name
    Name,
    /// Population
    Population,
    /// Area in km²
    Area,
}

impl SortField {
    /// All valid sort fields, in menu order
    pub const ALL: [SortField; 3] = [Self::Name, Self::Population, Self::Area];

    /// Field name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Population => "population",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "name" => Ok(Self::Name),
            "population" => Ok(Self::Population),
            "area" => Ok(Self::Area),
            _ => Err(QueryError::InvalidSortField {
                field: s.to_string(),
            }),
        }
    }
}
