//! Integration tests for CSV loading and saving
//!
//! These tests exercise the persistence functions against real files in
//! temporary directories, including the guarantees around failed saves.

use std::fs;

use country_registry::app::*;
use country_registry::errors::{PersistenceError, ValidationError};
use tempfile::TempDir;

const HEADER: &str = "name,population,area,continent\n";

fn write_csv(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("countries.csv");
    fs::write(&path, format!("{}{}", HEADER, body)).unwrap();
    path
}

#[test]
fn test_load_mixed_file_reports_each_rejection() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "Peru,33_000_000,1 285 216,América\n\
         ,1,1,América\n\
         Laos,7.3M,236800,Asia\n\
         Nauru,12000,0,Oceanía\n\
         PERU,1,1,América\n\
         Fiji,900000,18274,Oceanía\n",
    );

    let report = load_records(&path).unwrap();
    assert_eq!(report.accepted(), 2);
    assert_eq!(report.rejected_count(), 4);

    let lines: Vec<u64> = report.rejected.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6]);
    assert_eq!(
        report.rejected[2].reason,
        RejectReason::Invalid(ValidationError::AreaOutOfRange)
    );
    assert_eq!(
        report.rejected[3].reason,
        RejectReason::DuplicateName("PERU".to_string())
    );
}

#[test]
fn test_quoted_fields_and_extra_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("countries.csv");
    fs::write(
        &path,
        "iso,name,continent,area,population\n\
         KOR,\"Korea, Republic of\",Asia,100210,51_700_000\n",
    )
    .unwrap();

    let report = load_records(&path).unwrap();
    assert_eq!(report.accepted(), 1);
    let korea = &report.records[0];
    assert_eq!(korea.name(), "Korea, Republic of");
    assert_eq!(korea.population(), 51_700_000);
    assert_eq!(korea.area(), 100_210);
}

#[test]
fn test_missing_header_fails_whole_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("countries.csv");
    fs::write(&path, "name,pop,area,continent\nPeru,1,1,América\n").unwrap();

    match load_records(&path) {
        Err(PersistenceError::MissingHeaders { missing }) => {
            assert_eq!(missing, vec!["population".to_string()])
        }
        other => panic!("expected missing headers, got {:?}", other),
    }
}

#[test]
fn test_save_round_trip_normalizes_numbers() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "Peru,33_000_000,1 285 216,América\n");

    let report = load_records(&path).unwrap();
    save_records(&path, &report.records).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{}Peru,33000000,1285216,América\n", HEADER)
    );
    assert_eq!(load_records(&path).unwrap().records, report.records);
}

#[test]
fn test_failed_save_leaves_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "Peru,33000000,1285216,América\n");
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(
        save_records(&path, &[]),
        Err(PersistenceError::NothingToSave)
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);

    // No temporary files are left behind
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[cfg(unix)]
#[test]
fn test_save_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "Peru,33000000,1285216,América\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let report = load_records(&path).unwrap();
    save_records(&path, &report.records).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn test_malformed_row_is_skipped_with_its_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("countries.csv");
    let mut bytes = HEADER.as_bytes().to_vec();
    bytes.extend_from_slice(b"\"Cabo\nVerde\",590000,4033,\xc3\x81frica\n");
    bytes.extend_from_slice(b"Bad\xff,1,1,Asia\n");
    bytes.extend_from_slice(b"Fiji,900000,18274,Ocean\xc3\xada\n");
    fs::write(&path, bytes).unwrap();

    let report = load_records(&path).unwrap();
    assert_eq!(report.accepted(), 2);
    assert_eq!(report.records[1].name(), "Fiji");
    assert_eq!(report.rejected_count(), 1);
    assert_eq!(report.rejected[0].line, 4);
    assert!(matches!(
        report.rejected[0].reason,
        RejectReason::Malformed(_)
    ));
}
