//! Structured fill warnings.
//!
//! Warnings carry a kind and named parameters only. Turning them into prose is
//! left to whoever presents them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    ValueNotNumber,
    ValueNotTimestamp,
    ColumnsTypeConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WarningParam {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for WarningParam {
    fn from(value: &str) -> Self {
        WarningParam::Text(value.to_string())
    }
}

impl From<Vec<String>> for WarningParam {
    fn from(value: Vec<String>) -> Self {
        WarningParam::List(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub column: String,
    pub kind: WarningKind,
    pub params: BTreeMap<String, WarningParam>,
}

impl Warning {
    pub fn value_not_number(column: &str, value: &str) -> Self {
        Self::value_mismatch(WarningKind::ValueNotNumber, column, value)
    }

    pub fn value_not_timestamp(column: &str, value: &str) -> Self {
        Self::value_mismatch(WarningKind::ValueNotTimestamp, column, value)
    }

    pub fn columns_type_conflict(column: &str, converted: Vec<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert("colname".to_string(), WarningParam::from(column));
        params.insert("value_colnames".to_string(), WarningParam::from(converted));
        Self {
            column: column.to_string(),
            kind: WarningKind::ColumnsTypeConflict,
            params,
        }
    }

    fn value_mismatch(kind: WarningKind, column: &str, value: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("colname".to_string(), WarningParam::from(column));
        params.insert("value".to_string(), WarningParam::from(value));
        Self {
            column: column.to_string(),
            kind,
            params,
        }
    }

    pub fn param(&self, key: &str) -> Option<&WarningParam> {
        self.params.get(key)
    }
}
