pub mod categorical;
pub mod cli;
pub mod coerce;
pub mod column;
pub mod config;
pub mod data;
pub mod engine;
pub mod fill;
pub mod fill_cmd;
pub mod io_utils;
pub mod preview;
pub mod schema;
pub mod warning;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

pub use crate::{
    column::{Cell, Column, ColumnData, SemanticType, Table, classify},
    config::FillConfig,
    engine::{FillError, fill},
    fill::FillStrategy,
    warning::{Warning, WarningKind},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_fill", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
        Commands::Fill(args) => fill_cmd::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Probing '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let schema = schema::infer_schema(&args.input, args.sample_rows, delimiter, encoding)
        .with_context(|| format!("Inferring schema from {:?}", args.input))?;
    schema
        .save(&args.schema)
        .with_context(|| format!("Writing schema to {:?}", args.schema))?;
    for column in &schema.columns {
        info!("  {} -> {}", column.name, column.describe());
    }
    info!(
        "Inferred schema for {} column(s) written to {:?}",
        schema.columns.len(),
        args.schema
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
