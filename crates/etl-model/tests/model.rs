//! Tests for etl-model types.

use etl_model::{ColumnRename, DatasetKind, Stage};

#[test]
fn rename_pair_requires_both_names() {
    assert_eq!(
        ColumnRename::new("btc_a", "bitcoin_address").pair(),
        Some(("btc_a", "bitcoin_address"))
    );

    let missing_new = ColumnRename {
        original_name: Some("btc_a".to_string()),
        new_name: None,
    };
    assert_eq!(missing_new.pair(), None);

    let empty_original = ColumnRename {
        original_name: Some(String::new()),
        new_name: Some("bitcoin_address".to_string()),
    };
    assert_eq!(empty_original.pair(), None);
}

#[test]
fn rename_names_are_not_trimmed() {
    let padded = ColumnRename::new(" id ", "client_identifier");
    assert_eq!(padded.pair(), Some((" id ", "client_identifier")));
}

#[test]
fn dataset_kinds_map_to_selection_keys() {
    assert_eq!(DatasetKind::Clients.selection_key(), "clients_columns");
    assert_eq!(DatasetKind::Financials.selection_key(), "financials_columns");
    assert_eq!(DatasetKind::Clients.to_string(), "Clients");
}

#[test]
fn stages_are_listed_in_execution_order() {
    let mut sorted = Stage::ALL.to_vec();
    sorted.sort();
    assert_eq!(sorted, Stage::ALL.to_vec());
    assert_eq!(Stage::ALL.first(), Some(&Stage::LoadConfig));
    assert_eq!(Stage::ALL.last(), Some(&Stage::Write));
    assert!(!Stage::Write.produces_rows());
    assert!(Stage::Join.produces_rows());
}
