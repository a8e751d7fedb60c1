use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::FillMethod;

#[derive(Debug, Parser)]
#[command(author, version, about = "Fill missing values in CSV columns", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe a CSV file and infer column types into a schema file
    Probe(ProbeArgs),
    /// Fill empty cells in selected columns
    Fill(FillArgs),
    /// Preview the first few rows of a CSV file with their inferred types
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination schema file (YAML)
    #[arg(short = 'm', long = "schema")]
    pub schema: PathBuf,
    /// Number of rows to sample when inferring types (0 means full scan)
    #[arg(long, default_value_t = 2000)]
    pub sample_rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct FillArgs {
    /// Input CSV file to fill
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Schema file declaring column types; inferred from the data if omitted
    #[arg(short = 'm', long = "schema")]
    pub schema: Option<PathBuf>,
    /// Parameter file (YAML or JSON); legacy layouts are migrated
    #[arg(short = 'p', long = "params", conflicts_with_all = ["columns", "method", "value", "sources"])]
    pub params: Option<PathBuf>,
    /// Comma-separated list of columns to fill
    #[arg(short = 'C', long = "columns", action = clap::ArgAction::Append)]
    pub columns: Vec<String>,
    /// Fill method
    #[arg(long, value_enum)]
    pub method: Option<FillMethod>,
    /// Literal used by the `value` method
    #[arg(long, default_value = "")]
    pub value: String,
    /// Comma-separated source columns used by the `columns` method
    #[arg(long = "sources", action = clap::ArgAction::Append)]
    pub sources: Vec<String>,
    /// Write structured warnings as JSON to this path
    #[arg(long = "warnings")]
    pub warnings: Option<PathBuf>,
    /// Write a schema describing the filled table to this path
    #[arg(long = "emit-schema")]
    pub emit_schema: Option<PathBuf>,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Render output as an elastic table to stdout
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input CSV file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Schema file declaring column types; inferred from the data if omitted
    #[arg(short = 'm', long = "schema")]
    pub schema: Option<PathBuf>,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_chars() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("#"), Ok(b'#'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
    }

    #[test]
    fn fill_args_parse_inline_configuration() {
        let cli = Cli::try_parse_from([
            "csv-fill", "fill", "-i", "in.csv", "-C", "A,B", "--method", "columns", "--sources",
            "C",
        ])
        .expect("parse");
        match cli.command {
            Commands::Fill(args) => {
                assert_eq!(args.columns, vec!["A,B"]);
                assert_eq!(args.method, Some(FillMethod::Columns));
                assert_eq!(args.sources, vec!["C"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn params_conflict_with_inline_method() {
        let result = Cli::try_parse_from([
            "csv-fill", "fill", "-i", "in.csv", "-p", "p.yml", "--method", "pad",
        ]);
        assert!(result.is_err());
    }
}
