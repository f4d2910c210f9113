use crate::types::{ColumnDef, TypedValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One table row, keyed by the declared column names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub data: HashMap<String, TypedValue>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// A row holding `Null` in every column of `columns`.
    pub fn null_filled(columns: &[ColumnDef]) -> Self {
        let mut row = Self::new();
        for column in columns {
            row.insert(column.name.clone(), TypedValue::Null);
        }
        row
    }

    pub fn insert(&mut self, column: String, value: TypedValue) {
        self.data.insert(column, value);
    }

    pub fn get(&self, column: &str) -> Option<&TypedValue> {
        self.data.get(column)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values in the order of `columns`; missing entries read as `Null`.
    pub fn values_in_order(&self, columns: &[ColumnDef]) -> Vec<TypedValue> {
        columns
            .iter()
            .map(|c| self.data.get(&c.name).cloned().unwrap_or(TypedValue::Null))
            .collect()
    }

    /// A new row restricted to `columns`.
    pub fn project(&self, columns: &[ColumnDef]) -> Self {
        let mut row = Self::new();
        for column in columns {
            let value = self.data.get(&column.name).cloned().unwrap_or(TypedValue::Null);
            row.insert(column.name.clone(), value);
        }
        row
    }
}
