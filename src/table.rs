use crate::errors::ExecutionError;
use crate::executor::Predicate;
use crate::parser::{Assignment, Condition};
use crate::row::Row;
use crate::types::{ColumnDef, SqlValue, TypedValue};
use std::collections::HashSet;

/// A named table: ordered schema plus rows in insertion order.
///
/// Every mutation validates its whole input before touching a row, so a
/// failed call leaves the table exactly as it was.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDef>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: String, columns: Vec<ColumnDef>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn find_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.matches(name))
    }

    pub fn resolve_column(&self, name: &str) -> Result<&ColumnDef, ExecutionError> {
        self.find_column(name)
            .ok_or_else(|| ExecutionError::column_not_found(name))
    }

    /// Resolves a list of column names, rejecting unknown and repeated ones.
    pub fn resolve_columns(&self, names: &[String]) -> Result<Vec<ColumnDef>, ExecutionError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let column = self.resolve_column(name)?;
            if !seen.insert(column.name.as_str()) {
                return Err(ExecutionError::DuplicateColumn(column.name.clone()));
            }
            resolved.push(column.clone());
        }
        Ok(resolved)
    }

    pub fn bind(&self, condition: Option<&Condition>) -> Result<Option<Predicate>, ExecutionError> {
        condition
            .map(|c| Predicate::bind(c, &self.columns))
            .transpose()
    }

    /// Appends one row and returns its insertion index.
    ///
    /// `columns` of `None` targets the full schema in declared order. Columns
    /// not targeted are stored as `Null`.
    pub fn insert_row(
        &mut self,
        columns: Option<&[String]>,
        values: &[SqlValue],
    ) -> Result<usize, ExecutionError> {
        // Work out which columns the values go to
        let targets = match columns {
            Some(names) => self.resolve_columns(names)?,
            None => self.columns.clone(),
        };

        if targets.len() != values.len() {
            return Err(ExecutionError::invalid_column_count(targets.len(), values.len()));
        }

        // Build the row off to the side; a type error drops it before it
        // reaches `self.rows`.
        let mut row = Row::null_filled(&self.columns);
        for (column, value) in targets.iter().zip(values) {
            row.insert(column.name.clone(), Self::typed_for(column, value)?);
        }

        self.rows.push(row);
        Ok(self.rows.len() - 1)
    }

    pub fn select_rows(&self, predicate: Option<&Predicate>) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|row| predicate.map_or(true, |p| p.matches(row)))
            .cloned()
            .collect()
    }

    /// Applies `assignments` in order to every matching row; returns how many rows matched.
    pub fn update_rows(
        &mut self,
        assignments: &[Assignment],
        predicate: Option<&Predicate>,
    ) -> Result<usize, ExecutionError> {
        // Resolve and type-check every assignment first. Nothing below can
        // fail, so either every matching row changes or none does.
        let mut resolved: Vec<(String, TypedValue)> = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let column = self.resolve_column(&assignment.column)?;
            let value = Self::typed_for(column, &assignment.value)?;
            resolved.push((column.name.clone(), value));
        }

        let mut updated_count = 0;
        for row in self.rows.iter_mut() {
            if !predicate.map_or(true, |p| p.matches(row)) {
                continue;
            }
            // Later assignments to the same column win
            for (column, value) in &resolved {
                row.insert(column.clone(), value.clone());
            }
            updated_count += 1;
        }

        Ok(updated_count)
    }

    /// Removes every matching row; survivors keep their relative order.
    pub fn delete_rows(&mut self, predicate: Option<&Predicate>) -> usize {
        let original_count = self.rows.len();
        match predicate {
            // retain keeps the survivors in insertion order
            Some(p) => self.rows.retain(|row| !p.matches(row)),
            None => self.rows.clear(),
        }
        original_count - self.rows.len()
    }

    fn typed_for(column: &ColumnDef, value: &SqlValue) -> Result<TypedValue, ExecutionError> {
        value.to_typed(column.column_type).ok_or_else(|| {
            ExecutionError::type_mismatch(&column.name, column.column_type, value.column_type())
        })
    }
}
