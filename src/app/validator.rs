//! Record validation
//!
//! The single place where untyped field text becomes a typed [`Record`].
//! File loading, interactive entry and in-place updates all go through these
//! functions, so the rules cannot diverge between paths.

use tracing::trace;

use crate::app::models::{RawRecord, Record};
use crate::app::numeric::parse_integer;
use crate::errors::{ValidationError, ValidationResult};

/// Validate raw field text and build a record
///
/// Rules, checked in order with the first failure returned:
///
/// 1. name and continent non-empty after trimming ([`ValidationError::EmptyRequiredField`])
/// 2. population and area parse as integers ([`ValidationError::NotNumeric`])
/// 3. population >= 0 ([`ValidationError::PopulationOutOfRange`])
/// 4. area > 0 ([`ValidationError::AreaOutOfRange`])
///
/// # Examples
///
/// ```
/// use country_registry::app::models::RawRecord;
/// use country_registry::app::validator::validate;
///
/// let record = validate(&RawRecord::new(" Chile ", "19_000_000", "756 102", "America")).unwrap();
/// assert_eq!(record.name(), "Chile");
/// assert_eq!(record.area(), 756_102);
/// ```
pub fn validate(raw: &RawRecord) -> ValidationResult<Record> {
    let name = raw.name.trim();
    let continent = raw.continent.trim();
    if name.is_empty() || continent.is_empty() {
        return Err(ValidationError::EmptyRequiredField);
    }

    let (population, area) = match (parse_integer(&raw.population), parse_integer(&raw.area)) {
        (Some(population), Some(area)) => (population, area),
        _ => {
            trace!(
                "Non-numeric fields: population={:?} area={:?}",
                raw.population,
                raw.area
            );
            return Err(ValidationError::NotNumeric);
        }
    };

    check_numeric(population, area)?;

    Ok(Record::from_checked(
        name.to_string(),
        population,
        area,
        continent.to_string(),
    ))
}

/// Apply the numeric range rules to already-parsed values
pub fn check_numeric(population: i64, area: i64) -> ValidationResult<()> {
    if population < 0 {
        return Err(ValidationError::PopulationOutOfRange);
    }
    if area <= 0 {
        return Err(ValidationError::AreaOutOfRange);
    }
    Ok(())
}

/// Re-check a record that is about to be written
///
/// Records can only be built through [`validate`], but the writer still checks
/// every record before touching the destination file.
pub fn revalidate(record: &Record) -> ValidationResult<()> {
    validate(&record.to_raw()).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, population: &str, area: &str, continent: &str) -> RawRecord {
        RawRecord::new(name, population, area, continent)
    }

    #[test]
    fn test_valid_record_is_trimmed() {
        let record = validate(&raw("  Brazil ", "210_000_000", "8 515 767", " América ")).unwrap();
        assert_eq!(record.name(), "Brazil");
        assert_eq!(record.population(), 210_000_000);
        assert_eq!(record.area(), 8_515_767);
        assert_eq!(record.continent(), "América");
    }

    #[test]
    fn test_empty_required_fields() {
        assert_eq!(
            validate(&raw("", "10", "10", "X")),
            Err(ValidationError::EmptyRequiredField)
        );
        assert_eq!(
            validate(&raw("A", "10", "10", "   ")),
            Err(ValidationError::EmptyRequiredField)
        );
    }

    #[test]
    fn test_not_numeric() {
        assert_eq!(
            validate(&raw("A", "ten", "10", "X")),
            Err(ValidationError::NotNumeric)
        );
        assert_eq!(
            validate(&raw("A", "10", "", "X")),
            Err(ValidationError::NotNumeric)
        );
    }

    #[test]
    fn test_ranges() {
        assert_eq!(
            validate(&raw("A", "-1", "10", "X")),
            Err(ValidationError::PopulationOutOfRange)
        );
        assert_eq!(
            validate(&raw("A", "10", "0", "X")),
            Err(ValidationError::AreaOutOfRange)
        );
        assert!(validate(&raw("A", "0", "1", "X")).is_ok());
    }

    #[test]
    fn test_rule_order_short_circuits() {
        // Empty name wins over a non-numeric population
        assert_eq!(
            validate(&raw("", "abc", "0", "X")),
            Err(ValidationError::EmptyRequiredField)
        );
        // Non-numeric area wins over a negative population
        assert_eq!(
            validate(&raw("A", "-5", "abc", "X")),
            Err(ValidationError::NotNumeric)
        );
        // Negative population wins over zero area
        assert_eq!(
            validate(&raw("A", "-5", "0", "X")),
            Err(ValidationError::PopulationOutOfRange)
        );
    }

    #[test]
    fn test_revalidate_accepts_built_records() {
        let record = validate(&raw("A", "1", "1", "X")).unwrap();
        assert!(revalidate(&record).is_ok());
    }
}
