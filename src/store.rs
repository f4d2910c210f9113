use crate::errors::ExecutionError;
use crate::parser::{Assignment, Condition};
use crate::row::Row;
use crate::table::Table;
use crate::types::{ColumnDef, SqlValue};
use ahash::AHashMap;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A store shared between clients. The lock is held for one whole statement.
pub type SharedTableStore = Arc<Mutex<TableStore>>;

/// Owns every table for the lifetime of the store.
///
/// Tables are kept in creation order; `index` maps the lowercased name to
/// the table's position, so lookups are case-insensitive. Tables are never
/// removed, which keeps those positions stable.
#[derive(Debug, Default)]
pub struct TableStore {
    tables: Vec<Table>,
    index: AHashMap<String, usize>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedTableStore {
        Arc::new(Mutex::new(self))
    }

    fn key(name: &str) -> String {
        name.to_ascii_lowercase()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.index.contains_key(&Self::key(name))
    }

    pub fn get_table(&self, name: &str) -> Result<&Table, ExecutionError> {
        self.index
            .get(&Self::key(name))
            .map(|&i| &self.tables[i])
            .ok_or_else(|| ExecutionError::table_not_found(name))
    }

    fn get_table_mut(&mut self, name: &str) -> Result<&mut Table, ExecutionError> {
        match self.index.get(&Self::key(name)) {
            Some(&i) => Ok(&mut self.tables[i]),
            None => Err(ExecutionError::table_not_found(name)),
        }
    }

    /// Tables in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<(), ExecutionError> {
        if self.contains_table(name) {
            return Err(ExecutionError::table_already_exists(name));
        }
        if columns.is_empty() {
            return Err(ExecutionError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(Self::key(&column.name)) {
                return Err(ExecutionError::DuplicateColumn(column.name.clone()));
            }
        }

        log::debug!("creating table '{}' with {} columns", name, columns.len());
        self.index.insert(Self::key(name), self.tables.len());
        self.tables.push(Table::new(name.to_string(), columns));
        Ok(())
    }

    /// Appends a row and returns its insertion index.
    pub fn insert_row(
        &mut self,
        name: &str,
        columns: Option<&[String]>,
        values: &[SqlValue],
    ) -> Result<usize, ExecutionError> {
        self.get_table_mut(name)?.insert_row(columns, values)
    }

    pub fn select_rows(&self, name: &str, predicate: Option<&Condition>) -> Result<Vec<Row>, ExecutionError> {
        let table = self.get_table(name)?;
        let predicate = table.bind(predicate)?;
        Ok(table.select_rows(predicate.as_ref()))
    }

    pub fn update_rows(
        &mut self,
        name: &str,
        assignments: &[Assignment],
        predicate: Option<&Condition>,
    ) -> Result<usize, ExecutionError> {
        let table = self.get_table_mut(name)?;
        let predicate = table.bind(predicate)?;
        table.update_rows(assignments, predicate.as_ref())
    }

    pub fn delete_rows(&mut self, name: &str, predicate: Option<&Condition>) -> Result<usize, ExecutionError> {
        let table = self.get_table_mut(name)?;
        let predicate = table.bind(predicate)?;
        Ok(table.delete_rows(predicate.as_ref()))
    }

    pub fn describe_schema(&self, name: &str) -> Result<&[ColumnDef], ExecutionError> {
        Ok(self.get_table(name)?.get_columns())
    }

    /// Table names as declared, in creation order.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.get_name()).collect()
    }
}
