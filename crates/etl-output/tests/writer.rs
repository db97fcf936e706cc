use std::fs;

use polars::prelude::*;
use tempfile::TempDir;

use etl_output::{OutputError, partial_path, write_dataset};

fn result_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("email".into(), vec!["feliza@example.pl", "kim@example.kr"]).into(),
        Series::new("country".into(), vec!["PL", "KOR"]).into(),
        Series::new(
            "bitcoin_address".into(),
            vec![
                "1wjtPamAZeGhRnZfhBAHHHjNvnHefd2V2",
                "1Js9BA1rV31hJFmN25rh8HWfrrYLXAyw9T",
            ],
        )
        .into(),
        Series::new("credit_card_type".into(), vec![Some("visa-electron"), None]).into(),
    ])
    .unwrap()
}

#[test]
fn writes_header_and_rows_in_column_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client_data.csv");

    write_dataset(&result_frame(), &path).expect("write dataset");

    let contents = fs::read_to_string(&path).unwrap();
    insta::assert_snapshot!(contents.trim_end(), @r"
    email,country,bitcoin_address,credit_card_type
    feliza@example.pl,PL,1wjtPamAZeGhRnZfhBAHHHjNvnHefd2V2,visa-electron
    kim@example.kr,KOR,1Js9BA1rV31hJFmN25rh8HWfrrYLXAyw9T,
    ");
    assert!(!partial_path(&path).exists());
}

#[test]
fn empty_frame_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    let df = result_frame().head(Some(0));

    write_dataset(&df, &path).expect("write dataset");

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents.trim_end(),
        "email,country,bitcoin_address,credit_card_type"
    );
}

#[test]
fn replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client_data.csv");
    fs::write(&path, "stale contents\n").unwrap();

    write_dataset(&result_frame(), &path).expect("write dataset");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("email,country"));
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn missing_directory_is_reported_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("client_data.csv");

    let err = write_dataset(&result_frame(), &path).unwrap_err();

    match err {
        OutputError::MissingDirectory { path: reported } => {
            assert_eq!(reported, dir.path().join("missing"));
        }
        other => panic!("expected MissingDirectory, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn failed_persist_cleans_up_partial_file() {
    let dir = TempDir::new().unwrap();
    // A directory at the target path makes the final rename fail.
    let path = dir.path().join("client_data.csv");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep.txt"), "x").unwrap();

    let err = write_dataset(&result_frame(), &path).unwrap_err();

    assert!(matches!(err, OutputError::Persist { .. }));
    assert!(!partial_path(&path).exists());
}
