//! CSV backing file reading and writing
//!
//! Loading validates every row through the validator and skips rejected rows
//! instead of aborting. Saving re-validates the whole collection before the
//! destination is touched, then writes a temporary file in the same
//! directory and atomically renames it into place.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::app::models::{RawRecord, Record};
use crate::app::text::normalize;
use crate::app::validator::{revalidate, validate};
use crate::constants::csv_format;
use crate::errors::{PersistenceError, PersistenceResult, ValidationError};

/// Why a data row was skipped during load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The row failed validation
    Invalid(ValidationError),
    /// An earlier row already used this name
    DuplicateName(String),
    /// The row could not be decoded
    Malformed(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(reason) => write!(f, "{}", reason),
            Self::DuplicateName(name) => write!(f, "duplicate name '{}'", name),
            Self::Malformed(detail) => write!(f, "malformed row: {}", detail),
        }
    }
}

/// A skipped data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the file (the header is line 1)
    pub line: u64,
    /// Reason the row was skipped
    pub reason: RejectReason,
}

/// Outcome of reading a data file
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Accepted records, in file order
    pub records: Vec<Record>,
    /// Skipped rows, in file order
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    /// Number of accepted rows
    pub fn accepted(&self) -> usize {
        self.records.len()
    }

    /// Number of rejected rows
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Total data rows seen
    pub fn total_rows(&self) -> usize {
        self.accepted() + self.rejected_count()
    }
}

/// Column positions of the required fields in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    name: usize,
    population: usize,
    area: usize,
    continent: usize,
}

impl ColumnMap {
    /// Locate the required columns, accepting legacy header names
    fn from_headers(headers: &StringRecord) -> PersistenceResult<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| normalize(h.trim_start_matches(csv_format::BOM)))
            .collect();

        let mut positions = [None; 4];
        let mut missing = Vec::new();
        for (slot, (primary, legacy)) in csv_format::HEADERS
            .iter()
            .zip(csv_format::LEGACY_HEADERS.iter())
            .enumerate()
        {
            positions[slot] = normalized
                .iter()
                .position(|h| h.as_str() == *primary)
                .or_else(|| normalized.iter().position(|h| h.as_str() == *legacy));
            if positions[slot].is_none() {
                missing.push((*primary).to_string());
            }
        }

        match positions {
            [Some(name), Some(population), Some(area), Some(continent)] => Ok(Self {
                name,
                population,
                area,
                continent,
            }),
            _ => Err(PersistenceError::MissingHeaders { missing }),
        }
    }

    fn extract(&self, row: &StringRecord) -> RawRecord {
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        RawRecord::new(
            field(self.name),
            field(self.population),
            field(self.area),
            field(self.continent),
        )
    }
}

/// Read records from CSV text
///
/// Fails only when the header row is unusable; individual bad rows are
/// reported in [`LoadReport::rejected`].
pub fn read_records<R: Read>(reader: R) -> PersistenceResult<LoadReport> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.headers()?)?;
    let mut report = LoadReport::default();
    let mut seen_names = HashSet::new();
    let mut line = 1u64;

    for result in csv_reader.records() {
        line += 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if let Some(position) = e.position() {
                    line = position.line();
                }
                warn!("Row {} is malformed: {}. Skipping", line, e);
                report.rejected.push(RejectedRow {
                    line,
                    reason: RejectReason::Malformed(e.to_string()),
                });
                continue;
            }
        };
        if let Some(position) = row.position() {
            line = position.line();
        }

        let reason = match validate(&columns.extract(&row)) {
            Ok(record) if seen_names.insert(record.name_key()) => {
                report.records.push(record);
                continue;
            }
            Ok(record) => RejectReason::DuplicateName(record.name().to_string()),
            Err(e) => RejectReason::Invalid(e),
        };

        warn!("Row {} rejected: {}. Skipping", line, reason);
        report.rejected.push(RejectedRow { line, reason });
    }

    Ok(report)
}

/// Load records from a data file
pub fn load_records<P: AsRef<Path>>(path: P) -> PersistenceResult<LoadReport> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PersistenceError::NotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Loading records from {}", path.display());
    let report = read_records(File::open(path)?)?;
    info!(
        "Loaded {} records from {} ({} rows rejected)",
        report.accepted(),
        path.display(),
        report.rejected_count()
    );
    Ok(report)
}

/// Write records as CSV with the canonical header order
pub fn write_records<'a, W, I>(writer: W, records: I) -> PersistenceResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut csv_writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer.write_record(csv_format::HEADERS)?;
    for record in records {
        let population = record.population().to_string();
        let area = record.area().to_string();
        csv_writer.write_record([
            record.name(),
            population.as_str(),
            area.as_str(),
            record.continent(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save records to `path`, replacing the file atomically
///
/// Nothing is written unless the destination directory exists, the
/// collection is non-empty and every record passes validation.
pub fn save_records<P: AsRef<Path>>(path: P, records: &[Record]) -> PersistenceResult<()> {
    let path = path.as_ref();
    let directory = parent_dir(path);
    if !directory.is_dir() {
        return Err(PersistenceError::DirectoryMissing { path: directory });
    }

    if records.is_empty() {
        return Err(PersistenceError::NothingToSave);
    }

    for (index, record) in records.iter().enumerate() {
        revalidate(record).map_err(|reason| PersistenceError::InvalidRecord {
            index: index + 1,
            reason,
        })?;
    }

    let mut temp = NamedTempFile::new_in(&directory)?;
    // The replacement keeps the permissions of the file it replaces
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    write_records(temp.as_file_mut(), records)?;
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| {
        error!("Failed to replace {}: {}", path.display(), e.error);
        PersistenceError::AtomicWriteFailed {
            path: path.to_path_buf(),
        }
    })?;

    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
