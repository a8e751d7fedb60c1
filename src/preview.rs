//! Elastic console rendering of a typed table.

use std::{borrow::Cow, fmt::Write as _};

use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::{
    cli::PreviewArgs,
    column::{Table, classify},
    io_utils,
    schema::Schema,
};

const COLUMN_GAP: &str = "  ";

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let schema = args.schema.as_deref().map(Schema::load).transpose()?;
    let table = io_utils::read_table(&args.input, schema.as_ref(), delimiter, encoding)?;
    print!("{}", render_table(&table, Some(args.rows)));
    info!(
        "Displayed {} of {} row(s) from {:?}",
        table.row_count().min(args.rows),
        table.row_count(),
        args.input
    );
    Ok(())
}

/// Renders up to `limit` rows under a `name:type` header line.
pub fn render_table(table: &Table, limit: Option<usize>) -> String {
    let headers = table
        .columns()
        .iter()
        .map(|column| {
            let suffix = if column.is_categorical() { "*" } else { "" };
            format!("{}:{}{}", column.name(), classify(column), suffix)
        })
        .collect_vec();
    let rows = io_utils::table_rows(table)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect_vec();
    render_rows(&headers, &rows)
}

pub fn render_rows(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect_vec();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(&sanitize_cell(cell)));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat((*w).max(3))).collect_vec();
    let rule_widths = widths.iter().map(|w| (*w).max(3)).collect_vec();
    let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .join(COLUMN_GAP);
    line.trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
