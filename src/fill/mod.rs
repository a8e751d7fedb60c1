//! Fill strategies.
//!
//! Each strategy takes a snapshot of one target column (plus read access to the
//! rest of the table for cross-column fills) and produces a replacement column
//! together with any warnings raised while reconciling types.

mod directional;
mod from_columns;
mod value;

use serde::{Deserialize, Serialize};

pub use directional::Direction;

use crate::{
    column::{Column, Table},
    engine::FillError,
    warning::Warning,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FillStrategy {
    /// Fill nulls with a literal, coerced to the column's type when possible.
    Value { literal: String },
    /// Carry the previous non-null value forward.
    Pad,
    /// Carry the next non-null value backward.
    Backfill,
    /// Take the first non-null value from the listed columns, in order.
    FromColumns { sources: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub column: Column,
    pub warnings: Vec<Warning>,
}

impl FillOutcome {
    pub(crate) fn unchanged(column: &Column) -> Self {
        Self {
            column: column.clone(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn filled(column: Column) -> Self {
        Self {
            column,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warning(column: Column, warning: Warning) -> Self {
        Self {
            column,
            warnings: vec![warning],
        }
    }
}

impl FillStrategy {
    pub fn describe(&self) -> &'static str {
        match self {
            FillStrategy::Value { .. } => "value",
            FillStrategy::Pad => "pad",
            FillStrategy::Backfill => "backfill",
            FillStrategy::FromColumns { .. } => "columns",
        }
    }

    /// Source column names this strategy reads besides its target.
    pub fn source_columns(&self) -> &[String] {
        match self {
            FillStrategy::FromColumns { sources } => sources,
            _ => &[],
        }
    }

    pub fn apply(&self, column: &Column, table: &Table) -> Result<FillOutcome, FillError> {
        match self {
            FillStrategy::Value { literal } => Ok(value::fill_value(column, literal)),
            FillStrategy::Pad => Ok(directional::fill_directional(column, Direction::Forward)),
            FillStrategy::Backfill => {
                Ok(directional::fill_directional(column, Direction::Backward))
            }
            FillStrategy::FromColumns { sources } => {
                let resolved = sources
                    .iter()
                    .map(|name| {
                        table
                            .column(name)
                            .ok_or_else(|| FillError::UnknownSourceColumn(name.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(from_columns::fill_from_columns(column, &resolved))
            }
        }
    }
}
