use log::debug;

use crate::{
    coerce::{ParseError, TypedValue, coerce_literal, demote_to_text, write_cell},
    column::{Cell, Column, SemanticType, classify},
    fill::FillOutcome,
    warning::Warning,
};

pub(crate) fn fill_value(column: &Column, literal: &str) -> FillOutcome {
    if !column.has_nulls() {
        return FillOutcome::unchanged(column);
    }
    // empty literal leaves nulls as nulls for every type
    let Some(literal) = normalize_literal(literal) else {
        debug!("Empty fill value; leaving '{}' unchanged", column.name());
        return FillOutcome::unchanged(column);
    };

    let ty = classify(column);
    if ty == SemanticType::Text {
        return FillOutcome::filled(fill_nulls(column, &Cell::Text(literal.to_string())));
    }

    match coerce_literal(literal, ty) {
        Ok(TypedValue::Number(n)) => FillOutcome::filled(fill_nulls(column, &Cell::Number(n))),
        Ok(TypedValue::Timestamp(ts)) => {
            FillOutcome::filled(fill_nulls(column, &Cell::Timestamp(ts)))
        }
        Err(err) => {
            debug!(
                "Demoting '{}' from {ty} to text: {err}",
                column.name()
            );
            let demoted = demote_to_text(column);
            let filled = fill_nulls(&demoted, &Cell::Text(literal.to_string()));
            match err {
                ParseError::NotNumber { .. } => FillOutcome::with_warning(
                    filled,
                    Warning::value_not_number(column.name(), literal),
                ),
                ParseError::NotTimestamp { .. } => FillOutcome::with_warning(
                    filled,
                    Warning::value_not_timestamp(column.name(), literal),
                ),
                ParseError::TextTarget => FillOutcome::filled(filled),
            }
        }
    }
}

fn normalize_literal(literal: &str) -> Option<&str> {
    if literal.is_empty() {
        None
    } else {
        Some(literal)
    }
}

fn fill_nulls(column: &Column, cell: &Cell) -> Column {
    let mut filled = column.clone();
    for row in 0..column.len() {
        if column.is_null_at(row) {
            write_cell(&mut filled, row, cell.clone());
        }
    }
    filled
}
