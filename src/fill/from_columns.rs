use std::borrow::Cow;

use itertools::Itertools;
use log::debug;

use crate::{
    categorical,
    coerce::{demote_to_text, write_cell},
    column::{Cell, Column, classify},
    fill::FillOutcome,
    warning::Warning,
};

/// Fills each null of `target` with the first non-null value found in
/// `sources`, scanned in order. When a source's type differs from the target's
/// the target and the mismatched sources are merged as text and a single
/// conflict warning names the sources that had to be converted.
pub(crate) fn fill_from_columns(target: &Column, sources: &[&Column]) -> FillOutcome {
    if !target.has_nulls() {
        return FillOutcome::unchanged(target);
    }

    // categorical targets merge as plain text; classify already reports Text
    let best = classify(target);
    let converted = sources
        .iter()
        .filter(|source| classify(source) != best)
        .map(|source| source.name().to_string())
        .unique()
        .collect_vec();

    let (working, readable, warning) = if converted.is_empty() {
        let readable = sources
            .iter()
            .map(|source| plain_view(source))
            .collect_vec();
        (plain_view(target).into_owned(), readable, None)
    } else {
        debug!(
            "Column '{}' ({best}) conflicts with {}; merging as text",
            target.name(),
            converted.join(", ")
        );
        let readable = sources
            .iter()
            .map(|source| Cow::Owned(demote_to_text(source)))
            .collect_vec();
        let warning = Warning::columns_type_conflict(target.name(), converted);
        (demote_to_text(target), readable, Some(warning))
    };

    let fills = (0..working.len())
        .filter(|row| working.is_null_at(*row))
        .filter_map(|row| first_non_null(&readable, row).map(|(idx, cell)| (row, idx, cell)))
        .collect_vec();

    // only sources that supplied a value decide the encoding of the result
    let all_categorical = target.is_categorical()
        && fills
            .iter()
            .all(|(_, idx, _)| sources[*idx].is_categorical());
    let mut result = if all_categorical {
        // re-encode onto the target's own dictionary so its category order survives
        target.clone()
    } else {
        working
    };
    for (row, _, cell) in fills {
        write_cell(&mut result, row, cell);
    }

    match warning {
        Some(warning) => FillOutcome::with_warning(result, warning),
        None => FillOutcome::filled(result),
    }
}

fn plain_view<'a>(column: &'a Column) -> Cow<'a, Column> {
    if column.is_categorical() {
        Cow::Owned(categorical::to_plain(column))
    } else {
        Cow::Borrowed(column)
    }
}

/// First non-null cell at `row`, with the index of the source it came from.
fn first_non_null(sources: &[Cow<'_, Column>], row: usize) -> Option<(usize, Cell)> {
    sources
        .iter()
        .map(|source| source.cell(row))
        .find_position(|cell| !cell.is_null())
}
