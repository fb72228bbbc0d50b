//! Range expressions for numeric filters
//!
//! A range expression describes an inclusive interval:
//!
//! ```text
//! A-B     both bounds        1_000_000-5_000_000
//! >=N     lower bound only   >=2000000
//! <=N     upper bound only   <=800000
//! N       exact value        3000000
//! ```
//!
//! Interior spaces are ignored and each number accepts the digit-group
//! separators understood by [`parse_integer`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::numeric::parse_integer;
use crate::errors::QueryError;

/// Inclusive numeric interval; a missing bound is unbounded on that side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NumericRange {
    /// Lower bound (inclusive)
    pub min: Option<i64>,
    /// Upper bound (inclusive)
    pub max: Option<i64>,
}

impl NumericRange {
    /// Range with both bounds
    pub fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Range with only a lower bound
    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Range with only an upper bound
    pub fn at_most(max: i64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Range matching exactly one value
    pub fn exactly(value: i64) -> Self {
        Self::between(value, value)
    }

    /// Check whether `value` lies inside the range
    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| min <= value) && self.max.map_or(true, |max| value <= max)
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{}", min),
            (Some(min), Some(max)) => write!(f, "{}-{}", min, max),
            (Some(min), None) => write!(f, ">={}", min),
            (None, Some(max)) => write!(f, "<={}", max),
            (None, None) => write!(f, "any"),
        }
    }
}

impl FromStr for NumericRange {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s).ok_or_else(|| QueryError::InvalidRangeExpression {
            input: s.to_string(),
        })
    }
}

/// Parse a range expression
///
/// Forms are tried in order: `A-B` (any hyphen after the first character
/// commits to this form), `>=N`, `<=N`, then a single exact value. Returns
/// `None` for empty or malformed input and for `A-B` with `A > B`.
///
/// # Examples
///
/// ```
/// use country_registry::app::range::{parse_range, NumericRange};
///
/// assert_eq!(parse_range("10-20"), Some(NumericRange::between(10, 20)));
/// assert_eq!(parse_range(">=10"), Some(NumericRange::at_least(10)));
/// assert_eq!(parse_range("5000-1000"), None);
/// ```
pub fn parse_range(text: &str) -> Option<NumericRange> {
    let compact: String = text.trim().chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() {
        return None;
    }

    // A leading hyphen is a sign; only later hyphens separate the bounds
    let separator = compact
        .char_indices()
        .skip(1)
        .find_map(|(i, c)| (c == '-').then_some(i));
    if let Some(split_at) = separator {
        let min = parse_integer(&compact[..split_at])?;
        let max = parse_integer(&compact[split_at + 1..])?;
        if min > max {
            return None;
        }
        return Some(NumericRange::between(min, max));
    }

    if let Some(rest) = compact.strip_prefix(">=") {
        return parse_integer(rest).map(NumericRange::at_least);
    }

    if let Some(rest) = compact.strip_prefix("<=") {
        return parse_integer(rest).map(NumericRange::at_most);
    }

    parse_integer(&compact).map(NumericRange::exactly)
}
