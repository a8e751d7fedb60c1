//! Fill configuration and the parameter documents that produce it.
//!
//! [`FillParams`] is the current external parameter shape. Older documents are
//! still accepted: [`VersionedParams`] recognizes each historical layout and
//! [`VersionedParams::migrate`] normalizes it before a [`FillConfig`] is built.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fill::FillStrategy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("method 'columns' requires at least one source column")]
    MissingSourceColumns,
    #[error("unknown {field} code {code} in legacy parameters")]
    UnknownLegacyCode { field: &'static str, code: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillConfig {
    pub target_columns: Vec<String>,
    pub strategy: FillStrategy,
}

impl FillConfig {
    pub fn new<I, S>(target_columns: I, strategy: FillStrategy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_columns: target_columns.into_iter().map(Into::into).collect(),
            strategy,
        }
    }

    pub fn value<I, S>(target_columns: I, literal: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            target_columns,
            FillStrategy::Value {
                literal: literal.into(),
            },
        )
    }

    pub fn pad<I, S>(target_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(target_columns, FillStrategy::Pad)
    }

    pub fn backfill<I, S>(target_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(target_columns, FillStrategy::Backfill)
    }

    pub fn from_columns<I, S, J, T>(target_columns: I, sources: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(
            target_columns,
            FillStrategy::FromColumns {
                sources: sources.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn from_params(params: FillParams) -> Result<Self, ConfigError> {
        let strategy = match params.method {
            FillMethod::Value => FillStrategy::Value {
                literal: params.value,
            },
            FillMethod::Pad => FillStrategy::Pad,
            FillMethod::Backfill => FillStrategy::Backfill,
            FillMethod::Columns => {
                if params.source_columns.is_empty() {
                    return Err(ConfigError::MissingSourceColumns);
                }
                FillStrategy::FromColumns {
                    sources: params.source_columns,
                }
            }
        };
        Ok(Self {
            target_columns: params.target_columns,
            strategy,
        })
    }

    /// Loads a parameter document (YAML or JSON), migrating legacy layouts.
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening params file {path:?}"))?;
        let versioned: VersionedParams = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing params file {path:?}"))?;
        let params = versioned.migrate()?;
        debug!("Loaded fill params {params:?}");
        Ok(Self::from_params(params)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum FillMethod {
    Value,
    Pad,
    Backfill,
    Columns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillParams {
    pub target_columns: Vec<String>,
    pub method: FillMethod,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub source_columns: Vec<String>,
}

/// Every parameter layout the fill step has ever accepted, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VersionedParams {
    Current(FillParams),
    V1 {
        colnames: Vec<String>,
        method: FillMethod,
        #[serde(default)]
        value: String,
    },
    V0 {
        colnames: String,
        contenttype: i64,
        #[serde(default)]
        fillvalue: String,
        method: i64,
    },
}

impl VersionedParams {
    pub fn migrate(self) -> Result<FillParams, ConfigError> {
        match self {
            VersionedParams::Current(params) => Ok(params),
            VersionedParams::V1 {
                colnames,
                method,
                value,
            } => Ok(FillParams {
                target_columns: colnames,
                method,
                value,
                source_columns: Vec::new(),
            }),
            VersionedParams::V0 {
                colnames,
                contenttype,
                fillvalue,
                method,
            } => {
                let method = match (contenttype, method) {
                    (0, _) => FillMethod::Value,
                    (1, 0) => FillMethod::Pad,
                    (1, 1) => FillMethod::Backfill,
                    (1, code) => {
                        return Err(ConfigError::UnknownLegacyCode {
                            field: "method",
                            code,
                        });
                    }
                    (code, _) => {
                        return Err(ConfigError::UnknownLegacyCode {
                            field: "contenttype",
                            code,
                        });
                    }
                };
                Ok(FillParams {
                    target_columns: split_column_list(&colnames),
                    method,
                    value: fillvalue,
                    source_columns: Vec::new(),
                })
            }
        }
    }
}

/// Splits a comma-separated column list, trimming names and dropping empties.
pub fn split_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
