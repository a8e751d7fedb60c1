//! Dictionary maintenance for categorical text columns.

use std::collections::HashMap;

use log::debug;

use crate::column::{Column, ColumnData};

/// Adds `value` to the dictionary of a categorical column if it is missing and
/// returns its code. Existing categories keep their order. Returns `None` for
/// columns that are not categorical.
pub fn ensure_category(column: &mut Column, value: &str) -> Option<u32> {
    let name = column.name().to_string();
    match column.data_mut() {
        ColumnData::Categorical { categories, .. } => {
            if let Some(pos) = categories.iter().position(|c| c == value) {
                return Some(pos as u32);
            }
            debug!("Adding category '{value}' to column '{name}'");
            categories.push(value.to_string());
            Some((categories.len() - 1) as u32)
        }
        _ => None,
    }
}

/// Materializes a categorical column as plain text. Other columns are
/// returned as-is.
pub fn to_plain(column: &Column) -> Column {
    match column.data() {
        ColumnData::Categorical { categories, codes } => {
            let values = codes
                .iter()
                .map(|code| code.and_then(|c| categories.get(c as usize).cloned()))
                .collect();
            Column::new(column.name(), ColumnData::Text(values))
        }
        _ => column.clone(),
    }
}

/// Re-encodes a plain text column as categorical, assigning codes in
/// first-seen order. Non-text columns are returned as-is.
pub fn to_categorical(column: &Column) -> Column {
    match column.data() {
        ColumnData::Text(values) => {
            let mut categories: Vec<String> = Vec::new();
            let mut lookup: HashMap<&str, u32> = HashMap::new();
            let codes = values
                .iter()
                .map(|value| {
                    value.as_deref().map(|v| {
                        *lookup.entry(v).or_insert_with(|| {
                            categories.push(v.to_string());
                            (categories.len() - 1) as u32
                        })
                    })
                })
                .collect();
            Column::new(column.name(), ColumnData::Categorical { categories, codes })
        }
        _ => column.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Cell;

    #[test]
    fn ensure_category_is_idempotent() {
        let mut column = Column::categorical("A", [Some("a"), Some("b"), None]);
        assert_eq!(ensure_category(&mut column, "c"), Some(2));
        assert_eq!(ensure_category(&mut column, "c"), Some(2));
        assert_eq!(ensure_category(&mut column, "a"), Some(0));
        assert_eq!(
            column.categories().unwrap(),
            &["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn ensure_category_ignores_plain_columns() {
        let mut column = Column::text("A", [Some("a")]);
        assert_eq!(ensure_category(&mut column, "b"), None);
        assert_eq!(column, Column::text("A", [Some("a")]));
    }

    #[test]
    fn plain_and_categorical_round_trip_values() {
        let original = Column::categorical("A", [Some("b"), None, Some("a"), Some("b")]);
        let plain = to_plain(&original);
        assert!(!plain.is_categorical());
        assert_eq!(
            plain.cells().collect::<Vec<_>>(),
            vec![
                Cell::Text("b".into()),
                Cell::Null,
                Cell::Text("a".into()),
                Cell::Text("b".into()),
            ]
        );
        assert_eq!(to_categorical(&plain), original);
    }
}
