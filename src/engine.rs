//! Orchestrates a fill pass over a table.
//!
//! The engine borrows the caller's [`Table`] mutably for the duration of one
//! pass and writes each filled column back in place. Every column name in the
//! configuration is resolved before anything is written, so a failed call
//! leaves the table exactly as it was.

use log::{debug, info};
use thiserror::Error;

use crate::{
    column::{Table, TableError},
    config::FillConfig,
    fill::FillStrategy,
    warning::Warning,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FillError {
    #[error("There is no column named '{0}'")]
    UnknownTargetColumn(String),
    #[error("There is no source column named '{0}'")]
    UnknownSourceColumn(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Fills the configured target columns of `table` in place and returns the
/// warnings raised, in target order.
pub fn fill(table: &mut Table, config: &FillConfig) -> Result<Vec<Warning>, FillError> {
    fill_columns(table, &config.target_columns, &config.strategy)
}

pub fn fill_columns(
    table: &mut Table,
    target_columns: &[String],
    strategy: &FillStrategy,
) -> Result<Vec<Warning>, FillError> {
    if target_columns.is_empty() {
        debug!("No target columns; nothing to fill");
        return Ok(Vec::new());
    }
    validate(table, target_columns, strategy)?;

    let mut warnings = Vec::new();
    for name in target_columns {
        let Some(column) = table.column(name) else {
            return Err(FillError::UnknownTargetColumn(name.clone()));
        };
        let before = column.null_count();
        let outcome = strategy.apply(column, table)?;
        debug!(
            "Column '{}' ({}): {} null(s) before, {} after",
            name,
            strategy.describe(),
            before,
            outcome.column.null_count()
        );
        warnings.extend(outcome.warnings);
        table.replace(outcome.column)?;
    }
    info!(
        "Filled {} column(s) using '{}' with {} warning(s)",
        target_columns.len(),
        strategy.describe(),
        warnings.len()
    );
    Ok(warnings)
}

fn validate(
    table: &Table,
    target_columns: &[String],
    strategy: &FillStrategy,
) -> Result<(), FillError> {
    if let Some(missing) = target_columns.iter().find(|name| !table.contains(name)) {
        return Err(FillError::UnknownTargetColumn(missing.clone()));
    }
    if let Some(missing) = strategy
        .source_columns()
        .iter()
        .find(|name| !table.contains(name))
    {
        return Err(FillError::UnknownSourceColumn(missing.clone()));
    }
    Ok(())
}
