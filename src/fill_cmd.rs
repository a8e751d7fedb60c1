use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    cli::FillArgs,
    config::{self, FillConfig, FillParams},
    engine, io_utils, preview,
    schema::Schema,
    warning::{Warning, WarningKind, WarningParam},
};

pub fn execute(args: &FillArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_path = args.output.as_deref();
    let use_table_output = args.table && output_path.is_none_or(io_utils::is_dash);
    let output_delimiter =
        io_utils::resolve_output_delimiter(output_path, args.output_delimiter, delimiter);

    let config = resolve_config(args)?;
    info!(
        "Filling {:?} in '{}' using '{}' (delimiter '{}')",
        config.target_columns,
        args.input.display(),
        config.strategy.describe(),
        crate::printable_delimiter(delimiter)
    );

    let schema = match &args.schema {
        Some(path) => Some(
            Schema::load(path).with_context(|| format!("Loading schema from {path:?}"))?,
        ),
        None => None,
    };
    let mut table = io_utils::read_table(&args.input, schema.as_ref(), delimiter, encoding)
        .with_context(|| format!("Reading {:?}", args.input))?;
    debug!(
        "Loaded {} row(s) across {} column(s)",
        table.row_count(),
        table.columns().len()
    );

    let warnings = engine::fill(&mut table, &config)?;
    for warning in &warnings {
        warn!("{}", render_warning(warning));
    }
    if let Some(path) = &args.warnings {
        write_warnings(path, &warnings)?;
    }
    if let Some(path) = &args.emit_schema {
        Schema::from_table(&table)
            .save(path)
            .with_context(|| format!("Writing schema to {path:?}"))?;
        info!("Schema of filled table written to {path:?}");
    }

    if use_table_output {
        print!("{}", preview::render_table(&table, None));
    } else {
        let mut writer = io_utils::open_csv_writer(output_path, output_delimiter)?;
        io_utils::write_table(&table, &mut writer)?;
    }
    info!(
        "Wrote {} row(s) with {} warning(s)",
        table.row_count(),
        warnings.len()
    );
    Ok(())
}

fn resolve_config(args: &FillArgs) -> Result<FillConfig> {
    if let Some(path) = &args.params {
        return FillConfig::load(path);
    }
    let method = args
        .method
        .ok_or_else(|| anyhow!("Either --params or --method must be provided"))?;
    let params = FillParams {
        target_columns: split_args(&args.columns),
        method,
        value: args.value.clone(),
        source_columns: split_args(&args.sources),
    };
    Ok(FillConfig::from_params(params)?)
}

fn split_args(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|raw| config::split_column_list(raw))
        .collect()
}

fn write_warnings(path: &Path, warnings: &[Warning]) -> Result<()> {
    let serialized = serde_json::to_string_pretty(warnings).context("Serializing warnings")?;
    fs::write(path, serialized).with_context(|| format!("Writing warnings to {path:?}"))?;
    debug!("{} warning(s) written to {path:?}", warnings.len());
    Ok(())
}

/// English rendering of a warning for the console.
pub fn render_warning(warning: &Warning) -> String {
    let param = |key: &str| match warning.param(key) {
        Some(WarningParam::Text(text)) => text.clone(),
        Some(WarningParam::List(items)) => items.iter().map(|i| format!("'{i}'")).join(", "),
        None => String::new(),
    };
    match warning.kind {
        WarningKind::ValueNotNumber => format!(
            "'{}' is not a number, so column '{}' was converted to text",
            param("value"),
            warning.column
        ),
        WarningKind::ValueNotTimestamp => format!(
            "'{}' is not a timestamp, so column '{}' was converted to text",
            param("value"),
            warning.column
        ),
        WarningKind::ColumnsTypeConflict => format!(
            "Column '{}' and source(s) {} have different types, so they were filled as text",
            warning.column,
            param("value_colnames")
        ),
    }
}
