//! In-memory table model.
//!
//! A [`Table`] owns an ordered set of uniquely named [`Column`]s. Each column
//! stores its cells in a [`ColumnData`] variant, which fixes both the
//! [`SemanticType`] and the storage encoding: a column cannot hold cells of
//! two types, and a categorical column always carries its dictionary.

use std::{collections::HashSet, fmt};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{format_number, format_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Number,
    Timestamp,
    Text,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SemanticType::Number => "number",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Text => "text",
        };
        f.write_str(label)
    }
}

/// Row-level view of a single value, independent of column storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Canonical string form used when a value is demoted to text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Timestamp(ts) => Some(format_timestamp(ts)),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Finite values only; `Column::number` and the CSV reader store NaN as null.
    Number(Vec<Option<f64>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
    /// Dictionary-encoded text. `codes[i]` indexes into `categories`.
    Categorical {
        categories: Vec<String>,
        codes: Vec<Option<u32>>,
    },
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Number(values) => values.len(),
            ColumnData::Timestamp(values) => values.len(),
            ColumnData::Text(values) => values.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Builds a number column. Non-finite values (NaN, infinities) are stored
    /// as nulls.
    pub fn number<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = values
            .into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect();
        Self::new(name, ColumnData::Number(values))
    }

    pub fn timestamp<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<NaiveDateTime>>,
    {
        Self::new(name, ColumnData::Timestamp(values.into_iter().collect()))
    }

    pub fn text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Builds a categorical column, assigning categories in first-seen order.
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let plain = Self::text(name, values);
        crate::categorical::to_categorical(&plain)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.data, ColumnData::Categorical { .. })
    }

    pub fn categories(&self) -> Option<&[String]> {
        match &self.data {
            ColumnData::Categorical { categories, .. } => Some(categories),
            _ => None,
        }
    }

    pub fn cell(&self, row: usize) -> Cell {
        match &self.data {
            ColumnData::Number(values) => values
                .get(row)
                .copied()
                .flatten()
                .map_or(Cell::Null, Cell::Number),
            ColumnData::Timestamp(values) => values
                .get(row)
                .copied()
                .flatten()
                .map_or(Cell::Null, Cell::Timestamp),
            ColumnData::Text(values) => values
                .get(row)
                .cloned()
                .flatten()
                .map_or(Cell::Null, Cell::Text),
            ColumnData::Categorical { categories, codes } => codes
                .get(row)
                .copied()
                .flatten()
                .and_then(|code| categories.get(code as usize))
                .map_or(Cell::Null, |value| Cell::Text(value.clone())),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len()).map(|row| self.cell(row))
    }

    pub fn is_null_at(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Number(values) => values.get(row).is_some_and(Option::is_none),
            ColumnData::Timestamp(values) => values.get(row).is_some_and(Option::is_none),
            ColumnData::Text(values) => values.get(row).is_some_and(Option::is_none),
            ColumnData::Categorical { codes, .. } => codes.get(row).is_some_and(Option::is_none),
        }
    }

    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|row| self.is_null_at(*row)).count()
    }

    pub fn has_nulls(&self) -> bool {
        (0..self.len()).any(|row| self.is_null_at(row))
    }
}

/// Semantic type of a column. Categorical columns classify as text.
pub fn classify(column: &Column) -> SemanticType {
    match column.data() {
        ColumnData::Number(_) => SemanticType::Number,
        ColumnData::Timestamp(_) => SemanticType::Timestamp,
        ColumnData::Text(_) | ColumnData::Categorical { .. } => SemanticType::Text,
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("column '{name}' has {actual} row(s) but the table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("no column named '{0}'")]
    UnknownColumn(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        let expected = columns.first().map(Column::len).unwrap_or(0);
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != expected {
                return Err(TableError::LengthMismatch {
                    name: column.name().to_string(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Swaps in a new column under an existing name, keeping its position.
    pub fn replace(&mut self, column: Column) -> Result<Column, TableError> {
        let idx = self
            .column_index(column.name())
            .ok_or_else(|| TableError::UnknownColumn(column.name().to_string()))?;
        if column.len() != self.row_count() {
            return Err(TableError::LengthMismatch {
                name: column.name().to_string(),
                expected: self.row_count(),
                actual: column.len(),
            });
        }
        Ok(std::mem::replace(&mut self.columns[idx], column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn classify_reports_text_for_categorical() {
        let column = Column::categorical("A", [Some("a"), None]);
        assert!(column.is_categorical());
        assert_eq!(classify(&column), SemanticType::Text);
        assert_eq!(classify(&Column::number("B", [Some(1.0)])), SemanticType::Number);
        let ts = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            classify(&Column::timestamp("C", [Some(ts)])),
            SemanticType::Timestamp
        );
    }

    #[test]
    fn cell_reads_through_dictionary() {
        let column = Column::categorical("A", [Some("x"), None, Some("y"), Some("x")]);
        assert_eq!(column.cell(0), Cell::Text("x".into()));
        assert_eq!(column.cell(1), Cell::Null);
        assert_eq!(column.cell(3), Cell::Text("x".into()));
        assert_eq!(column.categories(), Some(&["x".to_string(), "y".to_string()][..]));
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn number_column_stores_non_finite_as_null() {
        let column = Column::number("A", [Some(f64::NAN), Some(1.0), Some(f64::INFINITY)]);
        assert_eq!(
            column.cells().collect::<Vec<_>>(),
            vec![Cell::Null, Cell::Number(1.0), Cell::Null]
        );
        assert_eq!(column.null_count(), 2);
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::number("A", [Some(1.0)]),
            Column::number("A", [Some(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("A".into()));
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::number("A", [Some(1.0), None]),
            Column::number("B", [Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { actual: 1, .. }));
    }

    #[test]
    fn replace_keeps_column_position() {
        let mut table = Table::new(vec![
            Column::number("A", [Some(1.0)]),
            Column::number("B", [None]),
        ])
        .unwrap();
        table.replace(Column::text("A", [Some("1")])).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(classify(table.column("A").unwrap()), SemanticType::Text);
    }
}
