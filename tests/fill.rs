use chrono::NaiveDate;
use csv_fill::{
    Cell, Column, FillConfig, FillError, SemanticType, Table, Warning, classify, fill,
};

fn table(columns: Vec<Column>) -> Table {
    Table::new(columns).expect("valid table")
}

#[test]
fn value_fill_text_column() {
    let mut t = table(vec![Column::text("A", [Some("a"), None])]);
    let warnings = fill(&mut t, &FillConfig::value(["A"], "v")).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(t.column("A").unwrap(), &Column::text("A", [Some("a"), Some("v")]));
}

#[test]
fn value_fill_number_with_text_demotes() {
    let mut t = table(vec![Column::number("A", [Some(1.1), None])]);
    let warnings = fill(&mut t, &FillConfig::value(["A"], "c")).unwrap();
    assert_eq!(t.column("A").unwrap(), &Column::text("A", [Some("1.1"), Some("c")]));
    assert_eq!(warnings, vec![Warning::value_not_number("A", "c")]);
}

#[test]
fn value_fill_number_with_number_keeps_type() {
    let mut t = table(vec![Column::number("A", [Some(1.1), None])]);
    let warnings = fill(&mut t, &FillConfig::value(["A"], "2")).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(t.column("A").unwrap(), &Column::number("A", [Some(1.1), Some(2.0)]));
}

#[test]
fn value_fill_timestamp_with_text_demotes() {
    let when = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let mut t = table(vec![Column::timestamp("A", [Some(when), None])]);
    let warnings = fill(&mut t, &FillConfig::value(["A"], "later")).unwrap();
    assert_eq!(
        t.column("A").unwrap(),
        &Column::text("A", [Some("2024-01-02 03:04:05"), Some("later")])
    );
    assert_eq!(warnings, vec![Warning::value_not_timestamp("A", "later")]);
}

#[test]
fn value_fill_categorical_adds_category() {
    let mut t = table(vec![Column::categorical("A", [Some("a"), Some("b"), None])]);
    let warnings = fill(&mut t, &FillConfig::value(["A"], "c")).unwrap();
    assert!(warnings.is_empty());
    let column = t.column("A").unwrap();
    assert!(column.is_categorical());
    assert_eq!(
        column.categories(),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );
    assert_eq!(column.cell(2), Cell::Text("c".into()));
}

#[test]
fn empty_literal_leaves_number_column_untouched() {
    let mut t = table(vec![Column::number("A", [Some(1.0), None])]);
    let before = t.clone();
    let warnings = fill(&mut t, &FillConfig::value(["A"], "")).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(t, before);
}

#[test]
fn value_fill_is_idempotent() {
    let mut once = table(vec![
        Column::number("A", [None, Some(1.0), None]),
        Column::text("B", [Some("b"), None, None]),
    ]);
    let config = FillConfig::value(["A", "B"], "x");
    let first = fill(&mut once, &config).unwrap();
    assert_eq!(first.len(), 1);
    let mut twice = once.clone();
    let second = fill(&mut twice, &config).unwrap();
    assert!(second.is_empty());
    assert_eq!(twice, once);
}

#[test]
fn pad_carries_value_forward() {
    let mut t = table(vec![Column::number("A", [Some(1.1), None, None])]);
    fill(&mut t, &FillConfig::pad(["A"])).unwrap();
    assert_eq!(
        t.column("A").unwrap(),
        &Column::number("A", [Some(1.1), Some(1.1), Some(1.1)])
    );
}

#[test]
fn pad_and_backfill_leave_edges_null() {
    let mut t = table(vec![
        Column::text("A", [None, Some("x"), None]),
        Column::text("B", [None, Some("y"), None]),
    ]);
    fill(&mut t, &FillConfig::pad(["A"])).unwrap();
    fill(&mut t, &FillConfig::backfill(["B"])).unwrap();
    assert_eq!(t.column("A").unwrap(), &Column::text("A", [None, Some("x"), Some("x")]));
    assert_eq!(t.column("B").unwrap(), &Column::text("B", [Some("y"), Some("y"), None]));
}

#[test]
fn backfill_keeps_categorical_encoding() {
    let mut t = table(vec![Column::categorical("A", [None, Some("b"), None, Some("a")])]);
    fill(&mut t, &FillConfig::backfill(["A"])).unwrap();
    let column = t.column("A").unwrap();
    assert!(column.is_categorical());
    assert_eq!(
        column.cells().collect::<Vec<_>>(),
        vec![
            Cell::Text("b".into()),
            Cell::Text("b".into()),
            Cell::Text("a".into()),
            Cell::Text("a".into()),
        ]
    );
}

#[test]
fn from_columns_same_types() {
    let mut t = table(vec![
        Column::number("A", [Some(1.0), None, None, None]),
        Column::number("B", [Some(2.0), Some(2.0), None, None]),
        Column::number("C", [Some(3.0), Some(3.0), Some(3.0), None]),
    ]);
    let warnings = fill(&mut t, &FillConfig::from_columns(["A"], ["B", "C"])).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(
        t.column("A").unwrap(),
        &Column::number("A", [Some(1.0), Some(2.0), Some(3.0), None])
    );
}

#[test]
fn from_columns_conflict_lists_only_mismatched_sources() {
    let when = NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut t = table(vec![
        Column::number("A", [Some(1.0), None, None, None]),
        Column::number("B", [Some(2.0), Some(2.0), None, None]),
        Column::timestamp("C", [Some(when), Some(when), Some(when), None]),
    ]);
    let source_before = t.column("C").unwrap().clone();
    let warnings = fill(&mut t, &FillConfig::from_columns(["A"], ["B", "C"])).unwrap();
    assert_eq!(
        warnings,
        vec![Warning::columns_type_conflict("A", vec!["C".to_string()])]
    );
    assert_eq!(
        t.column("A").unwrap(),
        &Column::text("A", [Some("1"), Some("2"), Some("2024-05-06 00:00:00"), None])
    );
    assert_eq!(t.column("C").unwrap(), &source_before);
}

#[test]
fn from_columns_all_categorical_stays_categorical() {
    let mut t = table(vec![
        Column::categorical("A", [Some("x"), None, None]),
        Column::categorical("B", [Some("y"), Some("z"), None]),
    ]);
    let warnings = fill(&mut t, &FillConfig::from_columns(["A"], ["B"])).unwrap();
    assert!(warnings.is_empty());
    let column = t.column("A").unwrap();
    assert!(column.is_categorical());
    assert_eq!(classify(column), SemanticType::Text);
    assert_eq!(column.cell(1), Cell::Text("z".into()));
    assert!(column.is_null_at(2));
    assert_eq!(column.categories().unwrap()[0], "x");
}

#[test]
fn from_columns_mixed_categorical_becomes_plain() {
    let mut t = table(vec![
        Column::categorical("A", [Some("x"), None]),
        Column::text("B", [Some("y"), Some("z")]),
    ]);
    let warnings = fill(&mut t, &FillConfig::from_columns(["A"], ["B"])).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(t.column("A").unwrap(), &Column::text("A", [Some("x"), Some("z")]));
}

#[test]
fn from_columns_unused_plain_source_keeps_categorical() {
    let mut t = table(vec![
        Column::categorical("A", [Some("x"), None]),
        Column::categorical("B", [Some("y"), Some("z")]),
        Column::text("C", [Some("q"), Some("w")]),
    ]);
    let warnings = fill(&mut t, &FillConfig::from_columns(["A"], ["B", "C"])).unwrap();
    assert!(warnings.is_empty());
    let column = t.column("A").unwrap();
    assert!(column.is_categorical());
    assert_eq!(column.cell(1), Cell::Text("z".into()));
}

#[test]
fn from_columns_categorical_target_with_number_source() {
    let mut t = table(vec![
        Column::categorical("A", [Some("x"), None, None]),
        Column::text("B", [None, Some("y"), None]),
        Column::number("N", [Some(1.0), Some(3.0), Some(4.0)]),
    ]);
    let warnings = fill(&mut t, &FillConfig::from_columns(["A"], ["B", "N"])).unwrap();
    assert_eq!(
        warnings,
        vec![Warning::columns_type_conflict("A", vec!["N".to_string()])]
    );
    assert_eq!(
        t.column("A").unwrap(),
        &Column::text("A", [Some("x"), Some("y"), Some("4")])
    );
    assert_eq!(classify(t.column("N").unwrap()), SemanticType::Number);
}

#[test]
fn source_listed_as_its_own_target_is_skipped() {
    let mut t = table(vec![
        Column::number("A", [None, Some(1.0)]),
        Column::number("B", [None, None]),
        Column::number("C", [Some(9.0), None]),
    ]);
    fill(&mut t, &FillConfig::from_columns(["B", "A"], ["C", "B"])).unwrap();
    assert_eq!(t.column("B").unwrap(), &Column::number("B", [Some(9.0), None]));
    assert_eq!(t.column("A").unwrap(), &Column::number("A", [Some(9.0), Some(1.0)]));
}

#[test]
fn unknown_target_is_an_error_and_table_is_untouched() {
    let mut t = table(vec![Column::text("A", [Some("a"), None])]);
    let before = t.clone();
    let err = fill(&mut t, &FillConfig::value(["A", "Z"], "v")).unwrap_err();
    assert_eq!(err, FillError::UnknownTargetColumn("Z".into()));
    assert_eq!(err.to_string(), "There is no column named 'Z'");
    assert_eq!(t, before);
}
