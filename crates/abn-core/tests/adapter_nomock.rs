//! CSV files on disk through the adapter.

use abn_common::Error;
use abn_core::adapter::{normalize, ColumnMapping, RawTable};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write csv fixture");
    path
}

#[test]
fn loads_standard_layout() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "experiment.csv",
        "user_id,group,converted\n1,B,0\n2,A,1\n3,B,1\n4,C,0\n5,A,0\n",
    );

    let table = RawTable::from_csv_path(&path).expect("read csv");
    assert_eq!(table.headers, ["user_id", "group", "converted"]);
    assert_eq!(table.rows.len(), 5);

    let ds = normalize(&table, &ColumnMapping::default()).expect("normalize");
    let groups: Vec<&str> = ds.groups().iter().map(|g| g.as_str()).collect();
    assert_eq!(groups, ["B", "A", "C"]);

    let counts = ds.group_counts();
    assert_eq!((counts[0].trials, counts[0].successes), (2, 1));
    assert_eq!((counts[1].trials, counts[1].successes), (2, 1));
    assert_eq!((counts[2].trials, counts[2].successes), (1, 0));
}

#[test]
fn extra_columns_and_custom_names() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "custom.csv",
        "ts,visitor,arm,purchased,country\n\
         100,v1,control,yes,DE\n\
         101,v2,treatment,no,FR\n\
         102,v3,treatment,TRUE,US\n",
    );

    let table = RawTable::from_csv_path(&path).expect("read csv");
    let mapping = ColumnMapping {
        id: "visitor".into(),
        group: "arm".into(),
        converted: "purchased".into(),
    };
    let ds = normalize(&table, &mapping).expect("normalize");
    assert_eq!(ds.len(), 3);
    let counts = ds.group_counts();
    assert_eq!(counts[1].group, "treatment");
    assert_eq!((counts[1].trials, counts[1].successes), (2, 1));
}

#[test]
fn quoted_labels_keep_commas() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "quoted.csv",
        "user_id,group,converted\nu1,\"red, large\",1\nu2,blue,0\n",
    );

    let table = RawTable::from_csv_path(&path).expect("read csv");
    let ds = normalize(&table, &ColumnMapping::default()).expect("normalize");
    assert_eq!(ds.groups()[0], "red, large");
}

#[test]
fn missing_columns_are_all_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "narrow.csv", "id,variant\n1,A\n");

    let table = RawTable::from_csv_path(&path).expect("read csv");
    match normalize(&table, &ColumnMapping::default()) {
        Err(Error::MissingColumns { missing, available }) => {
            assert_eq!(missing, ["user_id", "group", "converted"]);
            assert_eq!(available, ["id", "variant"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn short_row_is_rejected_with_its_position() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "ragged.csv", "user_id,group,converted\n1,A,1\n2,B\n");

    let table = RawTable::from_csv_path(&path).expect("flexible reader accepts ragged rows");
    match normalize(&table, &ColumnMapping::default()) {
        Err(Error::RaggedRow {
            row,
            expected,
            found,
        }) => {
            assert_eq!((row, expected, found), (2, 3, 2));
        }
        other => panic!("expected RaggedRow, got {other:?}"),
    }
}

#[test]
fn non_binary_outcome_is_a_validation_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "bad.csv",
        "user_id,group,converted\n1,A,1\n2,A,0\n3,B,2\n",
    );

    let table = RawTable::from_csv_path(&path).expect("read csv");
    let err = normalize(&table, &ColumnMapping::default()).unwrap_err();
    assert!(err.is_validation_error());
    match err {
        Error::NonBinaryOutcome { row, value } => {
            assert_eq!(row, 3);
            assert_eq!(value, "2");
        }
        other => panic!("expected NonBinaryOutcome, got {other:?}"),
    }
}

#[test]
fn header_only_file_is_empty_dataset() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "empty.csv", "user_id,group,converted\n");

    let table = RawTable::from_csv_path(&path).expect("read csv");
    let err = normalize(&table, &ColumnMapping::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyDataset));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = RawTable::from_csv_path(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
