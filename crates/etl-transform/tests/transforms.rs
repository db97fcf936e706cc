//! Tests for the filter, join and rename transforms.

use polars::prelude::*;

use etl_model::ColumnRename;
use etl_transform::{
    JoinSide, TransformError, drop_column_if_present, filter_by_membership, join_on_key,
    rename_columns,
};

fn clients() -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), (1i64..=10).collect::<Vec<_>>()).into(),
        Series::new(
            "country".into(),
            vec!["PL", "GB", "USA", "CAN", "FIN", "RUS", "UA", "CZ", "JPN", "KOR"],
        )
        .into(),
        Series::new("attribute2".into(), (101i64..=110).collect::<Vec<_>>()).into(),
    ])
    .unwrap()
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn countries(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_filter_keeps_matching_rows_in_order() {
    let df = clients();

    let filtered = filter_by_membership(&df, "country", &countries(&["KOR", "PL"])).unwrap();

    assert_eq!(filtered.height(), 2);
    assert_eq!(names(&filtered), names(&df));
    let ids = filtered.column("id").unwrap().i64().unwrap();
    assert_eq!(ids.get(0), Some(1));
    assert_eq!(ids.get(1), Some(10));
    let attrs = filtered.column("attribute2").unwrap().i64().unwrap();
    assert_eq!(attrs.get(0), Some(101));
    assert_eq!(attrs.get(1), Some(110));
}

#[test]
fn test_filter_with_duplicate_values() {
    let df = clients();

    let filtered =
        filter_by_membership(&df, "country", &countries(&["PL", "PL", "KOR"])).unwrap();

    assert_eq!(filtered.height(), 2);
}

#[test]
fn test_filter_with_no_values_is_empty() {
    let df = clients();

    let filtered = filter_by_membership(&df, "country", &[]).unwrap();

    assert_eq!(filtered.height(), 0);
    assert_eq!(names(&filtered), names(&df));
}

#[test]
fn test_filter_missing_column() {
    let df = clients();

    let err = filter_by_membership(&df, "region", &countries(&["PL"])).unwrap_err();

    assert!(matches!(
        err,
        TransformError::FilterColumnMissing { ref column } if column == "region"
    ));
}

#[test]
fn test_filter_does_not_touch_input() {
    let df = clients();
    let _ = filter_by_membership(&df, "country", &countries(&["PL"])).unwrap();
    assert_eq!(df.height(), 10);
}

#[test]
fn test_join_on_key() {
    let users = DataFrame::new(vec![
        Series::new("id".into(), vec![101i64, 102, 103, 104, 105]).into(),
        Series::new(
            "attribute10".into(),
            vec!["00101", "00102", "00103", "00104", "00105"],
        )
        .into(),
    ])
    .unwrap();
    let transactions = DataFrame::new(vec![
        Series::new("id".into(), vec![101i64, 102, 105]).into(),
        Series::new("attribute11".into(), vec![10100i64, 10200, 10500]).into(),
    ])
    .unwrap();

    let joined = join_on_key(&users, &transactions, "id").unwrap();

    assert_eq!(joined.height(), 3);
    assert_eq!(names(&joined), vec!["id", "attribute10", "attribute11"]);
    let ids = joined.column("id").unwrap().i64().unwrap();
    assert_eq!(
        ids.into_iter().collect::<Vec<_>>(),
        vec![Some(101), Some(102), Some(105)]
    );
    let codes = joined.column("attribute10").unwrap().str().unwrap();
    assert_eq!(codes.get(2), Some("00105"));
    let amounts = joined.column("attribute11").unwrap().i64().unwrap();
    assert_eq!(amounts.get(2), Some(10500));
}

#[test]
fn test_join_preserves_left_order() {
    let left = DataFrame::new(vec![
        Series::new("id".into(), vec![5i64, 3, 9, 1]).into(),
        Series::new("name".into(), vec!["e", "c", "i", "a"]).into(),
    ])
    .unwrap();
    let right = DataFrame::new(vec![
        Series::new("id".into(), vec![1i64, 3, 5, 9]).into(),
        Series::new("amount".into(), vec![1i64, 3, 5, 9]).into(),
    ])
    .unwrap();

    let joined = join_on_key(&left, &right, "id").unwrap();

    let names = joined.column("name").unwrap().str().unwrap();
    assert_eq!(
        names.into_iter().collect::<Vec<_>>(),
        vec![Some("e"), Some("c"), Some("i"), Some("a")]
    );
}

#[test]
fn test_join_missing_key() {
    let left = clients();
    let right = DataFrame::new(vec![
        Series::new("client_id".into(), vec![1i64]).into(),
    ])
    .unwrap();

    let err = join_on_key(&left, &right, "id").unwrap_err();

    assert!(matches!(
        err,
        TransformError::JoinKeyMissing {
            side: JoinSide::Right,
            ..
        }
    ));
}

#[test]
fn test_rename_single_column() {
    let df = clients();

    let renamed =
        rename_columns(&df, &[ColumnRename::new("country", "country_code")]).unwrap();

    assert_eq!(renamed.height(), df.height());
    assert_eq!(names(&renamed), vec!["id", "country_code", "attribute2"]);
    assert!(
        renamed
            .column("country_code")
            .unwrap()
            .as_materialized_series()
            .equals(df.column("country").unwrap().as_materialized_series())
    );
}

#[test]
fn test_rename_with_no_pairs_is_identity() {
    let df = clients();

    let renamed = rename_columns(&df, &[]).unwrap();

    assert!(renamed.equals(&df));
}

#[test]
fn test_rename_applies_in_order_and_skips_incomplete() {
    let df = clients();
    let renames = vec![
        ColumnRename::new("attribute2", "amount"),
        ColumnRename {
            original_name: Some("id".to_string()),
            new_name: None,
        },
        ColumnRename::new("amount", "total"),
        ColumnRename::new("email", "contact"),
    ];

    let renamed = rename_columns(&df, &renames).unwrap();

    assert_eq!(names(&renamed), vec!["id", "country", "total"]);
}

#[test]
fn test_rename_collision_fails() {
    let df = clients();

    let err = rename_columns(&df, &[ColumnRename::new("attribute2", "id")]).unwrap_err();

    assert!(matches!(err, TransformError::RenameCollision { .. }));
}

#[test]
fn test_drop_column_if_present() {
    let df = clients();

    let dropped = drop_column_if_present(&df, "id").unwrap();
    assert_eq!(names(&dropped), vec!["country", "attribute2"]);

    let untouched = drop_column_if_present(&dropped, "id").unwrap();
    assert!(untouched.equals(&dropped));
}

#[test]
fn test_rename_matches_names_exactly() {
    let df = clients();

    let renamed =
        rename_columns(&df, &[ColumnRename::new(" id ", "client_identifier")]).unwrap();

    assert_eq!(names(&renamed), vec!["id", "country", "attribute2"]);
}
