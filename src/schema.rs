//! Column schema files and type inference.
//!
//! A CSV file carries no types, so a [`Schema`] declares for each column its
//! [`SemanticType`] and whether its text is stored categorically. Schemas are
//! persisted as YAML and can be inferred by sampling rows.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, ensure};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    column::{Column, SemanticType, Table, classify},
    data::{parse_number, parse_timestamp},
    io_utils,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SemanticType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub categorical: bool,
}

impl ColumnSpec {
    pub fn describe(&self) -> String {
        if self.categorical {
            format!("{} (categorical)", self.kind)
        } else {
            self.kind.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Describes a table as it currently is, including any demotions.
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|column: &Column| ColumnSpec {
                name: column.name().to_string(),
                kind: classify(column),
                categorical: column.is_categorical(),
            })
            .collect();
        Schema { columns }
    }

    /// Infers a schema from values already held in memory, one vector per
    /// header.
    pub fn infer_from_columns(headers: &[String], raw_columns: &[Vec<String>]) -> Self {
        let columns = headers
            .iter()
            .zip(raw_columns)
            .map(|(name, values)| ColumnSpec {
                name: name.clone(),
                kind: infer_type(values.iter().map(String::as_str)),
                categorical: false,
            })
            .collect();
        Schema { columns }
    }

    pub fn validate_headers(&self, headers: &[String]) -> Result<()> {
        ensure!(
            headers.len() == self.columns.len(),
            "Header has {} column(s) but schema defines {}",
            headers.len(),
            self.columns.len()
        );
        for (idx, (header, column)) in headers.iter().zip(&self.columns).enumerate() {
            if header != &column.name {
                return Err(anyhow!(
                    "Header column {} is '{}' but schema expects '{}'",
                    idx + 1,
                    header,
                    column.name
                ));
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening schema file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing schema file {path:?}"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating schema directory {parent:?}"))?;
        }
        let serialized = serde_yaml::to_string(self).context("Serializing schema")?;
        fs::write(path, serialized).with_context(|| format!("Writing schema file {path:?}"))
    }
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    observed: bool,
    possible_number: bool,
    possible_timestamp: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            observed: false,
            possible_number: true,
            possible_timestamp: true,
        }
    }

    fn observe(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        self.observed = true;
        if self.possible_number && parse_number(value).is_none() {
            self.possible_number = false;
        }
        if self.possible_timestamp && parse_timestamp(value).is_none() {
            self.possible_timestamp = false;
        }
    }

    fn decide(&self) -> SemanticType {
        if !self.observed {
            SemanticType::Text
        } else if self.possible_number {
            SemanticType::Number
        } else if self.possible_timestamp {
            SemanticType::Timestamp
        } else {
            SemanticType::Text
        }
    }
}

fn infer_type<'a, I>(values: I) -> SemanticType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidate = TypeCandidate::new();
    for value in values {
        candidate.observe(value);
    }
    candidate.decide()
}

/// Samples up to `sample_rows` rows (0 scans the whole file) and picks the
/// narrowest type every non-empty value parses as.
pub fn infer_schema(
    path: &Path,
    sample_rows: usize,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Schema> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut candidates = vec![TypeCandidate::new(); headers.len()];

    for (row_idx, record) in reader.byte_records().enumerate() {
        if sample_rows > 0 && row_idx >= sample_rows {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)?;
        for (candidate, value) in candidates.iter_mut().zip(&decoded) {
            candidate.observe(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(&candidates)
        .map(|(name, candidate)| ColumnSpec {
            name,
            kind: candidate.decide(),
            categorical: false,
        })
        .collect();
    Ok(Schema { columns })
}
