//! Human-readable rendering of records and statistics
//!
//! Numbers are grouped with the configured thousands separator; listings are
//! cut at the configured result limit with a note telling how many were shown.

use std::io::{self, Write};

use crate::app::{ContinentCounts, Record, StatsSummary};
use crate::config::DisplayConfig;

/// Group the digits of `value` in threes using `separator`
///
/// ```rust
/// use country_registry::cli::display::group_thousands;
///
/// assert_eq!(group_thousands(1234567, '.'), "1.234.567");
/// assert_eq!(group_thousands(-1000, ','), "-1,000");
/// assert_eq!(group_thousands(999, '.'), "999");
/// ```
pub fn group_thousands(value: i64, separator: char) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Format a mean with two decimals and grouped integer part
///
/// The decimal mark is `,` when the group separator is `.`, and `.` otherwise.
pub fn format_mean(value: f64, separator: char) -> String {
    let decimal_mark = if separator == '.' { ',' } else { '.' };
    let cents = (value * 100.0).round() as i64;
    let whole = group_thousands(cents / 100, separator);
    let sign = if cents < 0 && cents / 100 == 0 { "-" } else { "" };
    format!("{}{}{}{:02}", sign, whole, decimal_mark, (cents % 100).abs())
}

/// Renders engine results for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    separator: char,
    limit: usize,
}

impl Renderer {
    /// Create a renderer
    pub fn new(separator: char, limit: usize) -> Self {
        Self {
            separator,
            limit: limit.max(1),
        }
    }

    /// Create a renderer from the display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.separator(), config.result_limit)
    }

    /// One-line description of a record
    pub fn record_line(&self, record: &Record) -> String {
        format!(
            "- {} | Population: {} | Area: {} km² | Continent: {}",
            record.name(),
            group_thousands(record.population(), self.separator),
            group_thousands(record.area(), self.separator),
            record.continent()
        )
    }

    /// Format a mean value
    pub fn mean(&self, value: f64) -> String {
        format_mean(value, self.separator)
    }

    /// Print records, truncated to the result limit
    pub fn write_records<W: Write>(&self, out: &mut W, records: &[&Record]) -> io::Result<()> {
        for record in records.iter().take(self.limit) {
            writeln!(out, "{}", self.record_line(record))?;
        }
        if records.len() > self.limit {
            writeln!(
                out,
                "Showing {} of {}. Refine the query to see fewer results.",
                self.limit,
                records.len()
            )?;
        }
        Ok(())
    }

    /// Print counts per continent
    pub fn write_counts<W: Write>(&self, out: &mut W, counts: &ContinentCounts) -> io::Result<()> {
        for group in counts.iter() {
            writeln!(
                out,
                "  - {}: {}",
                group.continent,
                group_thousands(group.count as i64, self.separator)
            )?;
        }
        Ok(())
    }

    /// Print the full statistics summary
    pub fn write_summary<W: Write>(&self, out: &mut W, stats: &StatsSummary<'_>) -> io::Result<()> {
        writeln!(out, "=== Statistics ===")?;
        writeln!(out, "Records: {}", group_thousands(stats.total as i64, self.separator))?;
        writeln!(out, "Most populated:")?;
        writeln!(out, "  {}", self.record_line(stats.most_populated))?;
        writeln!(out, "Least populated:")?;
        writeln!(out, "  {}", self.record_line(stats.least_populated))?;
        writeln!(out, "Mean population: {}", self.mean(stats.mean_population))?;
        writeln!(out, "Mean area (km²): {}", self.mean(stats.mean_area))?;
        writeln!(out, "Records per continent:")?;
        self.write_counts(out, &stats.continents)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}
