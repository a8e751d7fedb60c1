//! CSV reading and writing, encodings, and delimiter resolution.
//!
//! - **Delimiters**: `.tsv` paths default to tab, everything else to comma,
//!   unless overridden.
//! - **Encoding**: input is decoded via `encoding_rs` (UTF-8 by default);
//!   output is always UTF-8.
//! - **stdin/stdout**: the `-` path routes through the standard streams.
//! - **Nulls**: an empty field loads as a null cell and a null cell is written
//!   back as an empty field.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::{
    categorical,
    column::{Column, ColumnData, SemanticType, Table},
    data::{parse_number, parse_timestamp},
    schema::{ColumnSpec, Schema},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
    has_headers: bool,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(reader))
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .double_quote(true)
        .from_writer(sink))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

/// Reads a whole CSV file into a typed [`Table`]. When no schema is given one
/// is inferred from every row.
pub fn read_table(
    path: &Path,
    schema: Option<&Schema>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Table> {
    let mut reader = open_csv_reader_from_path(path, delimiter, true)?;
    let headers = reader_headers(&mut reader, encoding)?;
    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = decode_record(&record, encoding)?;
        for (column, value) in raw_columns.iter_mut().zip(decoded) {
            column.push(value);
        }
    }

    let inferred;
    let schema = match schema {
        Some(schema) => {
            schema
                .validate_headers(&headers)
                .with_context(|| format!("Validating headers for {path:?}"))?;
            schema
        }
        None => {
            inferred = Schema::infer_from_columns(&headers, &raw_columns);
            &inferred
        }
    };

    let columns = schema
        .columns
        .iter()
        .zip(&raw_columns)
        .map(|(spec, values)| build_column(spec, values))
        .collect::<Result<Vec<_>>>()?;
    Table::new(columns).with_context(|| format!("Assembling table from {path:?}"))
}

fn build_column(spec: &ColumnSpec, values: &[String]) -> Result<Column> {
    let data = match spec.kind {
        SemanticType::Number => ColumnData::Number(parse_cells(spec, values, parse_number)?),
        SemanticType::Timestamp => {
            ColumnData::Timestamp(parse_cells(spec, values, parse_timestamp)?)
        }
        SemanticType::Text => ColumnData::Text(
            values
                .iter()
                .map(|v| (!v.is_empty()).then(|| v.clone()))
                .collect(),
        ),
    };
    let column = Column::new(spec.name.clone(), data);
    if spec.categorical && spec.kind == SemanticType::Text {
        Ok(categorical::to_categorical(&column))
    } else {
        Ok(column)
    }
}

fn parse_cells<T>(
    spec: &ColumnSpec,
    values: &[String],
    parse: fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            if value.is_empty() {
                return Ok(None);
            }
            parse(value).map(Some).ok_or_else(|| {
                anyhow!(
                    "Row {} column '{}': '{}' is not a valid {}",
                    row + 2,
                    spec.name,
                    value,
                    spec.kind
                )
            })
        })
        .collect()
}

/// Renders every row of `table` as strings; nulls become empty fields.
pub fn table_rows(table: &Table) -> Vec<Vec<String>> {
    (0..table.row_count())
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|column| column.cell(row).as_text().unwrap_or_default())
                .collect()
        })
        .collect()
}

pub fn write_table(table: &Table, writer: &mut csv::Writer<Box<dyn Write>>) -> Result<()> {
    writer
        .write_record(table.column_names())
        .context("Writing output headers")?;
    for (idx, row) in table_rows(table).into_iter().enumerate() {
        writer
            .write_record(&row)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output")
}
