//! Literal coercion and demotion of columns to text.
//!
//! Nothing here mutates its input.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    categorical,
    column::{Cell, Column, ColumnData, SemanticType},
    data::{parse_number, parse_timestamp},
};

/// A literal parsed into the payload of a non-text column.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Number(f64),
    Timestamp(NaiveDateTime),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{value}' is not a number")]
    NotNumber { value: String },
    #[error("'{value}' is not a timestamp")]
    NotTimestamp { value: String },
    #[error("text literals need no coercion")]
    TextTarget,
}

pub fn coerce_literal(value: &str, target: SemanticType) -> Result<TypedValue, ParseError> {
    match target {
        SemanticType::Number => parse_number(value)
            .map(TypedValue::Number)
            .ok_or_else(|| ParseError::NotNumber {
                value: value.to_string(),
            }),
        SemanticType::Timestamp => parse_timestamp(value)
            .map(TypedValue::Timestamp)
            .ok_or_else(|| ParseError::NotTimestamp {
                value: value.to_string(),
            }),
        SemanticType::Text => Err(ParseError::TextTarget),
    }
}

/// Converts every non-null cell to its canonical string. Null cells stay null.
/// Categorical columns lose their dictionary; plain text is returned unchanged.
pub fn demote_to_text(column: &Column) -> Column {
    match column.data() {
        ColumnData::Text(_) => column.clone(),
        ColumnData::Categorical { .. } => categorical::to_plain(column),
        ColumnData::Number(_) | ColumnData::Timestamp(_) => {
            let values = column.cells().map(|cell| cell.as_text()).collect();
            Column::new(column.name(), ColumnData::Text(values))
        }
    }
}

/// Writes `cell` into row `row` of a column whose storage matches the cell's
/// tag. Callers reconcile types beforehand; a mismatched tag is dropped in
/// release builds and panics in debug builds.
pub(crate) fn write_cell(column: &mut Column, row: usize, cell: Cell) {
    let code = match &cell {
        Cell::Text(value) if column.is_categorical() => {
            categorical::ensure_category(column, value)
        }
        _ => None,
    };
    match (column.data_mut(), cell) {
        (ColumnData::Number(values), Cell::Number(n)) => values[row] = Some(n),
        (ColumnData::Timestamp(values), Cell::Timestamp(ts)) => values[row] = Some(ts),
        (ColumnData::Text(values), Cell::Text(s)) => values[row] = Some(s),
        (ColumnData::Categorical { codes, .. }, Cell::Text(_)) => codes[row] = code,
        (_, cell) => debug_assert!(
            false,
            "cell {cell:?} does not match the storage of the column it is written to"
        ),
    }
}
