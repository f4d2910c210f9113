use crate::errors::{DbError, ExecutionError};
use crate::parser::{parse_sql, CompareOp, Condition, Connective, SqlStatement};
use crate::row::Row;
use crate::store::{SharedTableStore, TableStore};
use crate::types::{ColumnDef, SqlValue, TypedValue};
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::PoisonError;
use std::time::Instant;

/// Uniform success payload of `execute`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// SELECT output; `columns` gives the projection order.
    Rows { columns: Vec<ColumnDef>, rows: Vec<Row> },
    RowsAffected(usize),
    TableList(Vec<String>),
    SchemaInfo(Vec<ColumnDef>),
    Ack(String),
}

/// A WHERE condition bound to one table's schema.
///
/// Column names are resolved to their declared spelling and LIKE patterns
/// are compiled once, so `matches` can run per row without failing.
#[derive(Debug, Clone)]
pub enum Predicate {
    Comparison {
        column: String,
        op: CompareOp,
        value: SqlValue,
    },
    Like {
        column: String,
        pattern: Regex,
    },
    /// First term, then each `(connective, term)` applied in order.
    Chain(Box<Predicate>, Vec<(Connective, Predicate)>),
}

impl Predicate {
    pub fn bind(condition: &Condition, columns: &[ColumnDef]) -> Result<Self, ExecutionError> {
        // Condition columns are matched case-insensitively but rows are keyed
        // by the declared spelling, so swap in the schema's name here.
        let resolve = |name: &str| {
            columns
                .iter()
                .find(|c| c.matches(name))
                .map(|c| c.name.clone())
                .ok_or_else(|| ExecutionError::column_not_found(name))
        };

        match condition {
            Condition::Comparison(column, op, value) => Ok(Predicate::Comparison {
                column: resolve(column)?,
                op: *op,
                value: value.clone(),
            }),
            Condition::Like(column, pattern) => Ok(Predicate::Like {
                column: resolve(column)?,
                pattern: like_to_regex(pattern)?,
            }),
            Condition::Chain(first, rest) => {
                // Chains are flat; recursion only happens for parenthesised
                // terms, whose depth the parser caps.
                let first = Self::bind(first, columns)?;
                let mut bound = Vec::with_capacity(rest.len());
                for (connective, term) in rest {
                    bound.push((*connective, Self::bind(term, columns)?));
                }
                Ok(Predicate::Chain(Box::new(first), bound))
            }
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            // A missing cell can only happen for rows built outside a table.
            Predicate::Comparison { column, op, value } => match row.get(column) {
                Some(cell) => compare_values(cell, *op, value),
                None => false,
            },
            // LIKE only looks at text; integers and NULL never match.
            Predicate::Like { column, pattern } => match row.get(column) {
                Some(TypedValue::Text(s)) => pattern.is_match(s),
                _ => false,
            },
            // Left to right, no precedence: `a OR b AND c` is `(a OR b) AND c`.
            Predicate::Chain(first, rest) => {
                let mut result = first.matches(row);
                for (connective, term) in rest {
                    result = match connective {
                        Connective::And => result && term.matches(row),
                        Connective::Or => result || term.matches(row),
                    };
                }
                result
            }
        }
    }
}

/// Integer against Integer is numeric, Text against Text is lexicographic.
/// Any other pairing, NULL included, never matches, even for `!=`.
fn compare_values(cell: &TypedValue, op: CompareOp, literal: &SqlValue) -> bool {
    let ordering = match (cell, literal) {
        (TypedValue::Integer(a), SqlValue::Integer(b)) => a.cmp(b),
        (TypedValue::Text(a), SqlValue::Text(b)) => a.as_str().cmp(b.as_str()),
        _ => return false,
    };

    match op {
        CompareOp::Equal => ordering == Ordering::Equal,
        CompareOp::NotEqual => ordering != Ordering::Equal,
        CompareOp::Less => ordering == Ordering::Less,
        CompareOp::Greater => ordering == Ordering::Greater,
        CompareOp::LessEqual => ordering != Ordering::Greater,
        CompareOp::GreaterEqual => ordering != Ordering::Less,
    }
}

// % matches any run of characters, _ exactly one; everything else is literal.
fn like_to_regex(pattern: &str) -> Result<Regex, ExecutionError> {
    let mut source = String::from("(?s)^");
    for c in pattern.chars() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|_| ExecutionError::InvalidPattern(pattern.to_string()))
}

/// Parses and runs one statement against `store`.
pub fn execute(sql: &str, store: &mut TableStore) -> Result<ExecutionResult, DbError> {
    let start_time = Instant::now();

    let statement = parse_sql(sql)?;
    let result = execute_statement(statement, store);

    match &result {
        Ok(_) => log::debug!(
            "executed `{}` in {}μs",
            sql.trim(),
            start_time.elapsed().as_micros()
        ),
        Err(e) => log::debug!("statement `{}` failed: {}", sql.trim(), e),
    }

    result.map_err(DbError::from)
}

/// Runs `sql` while holding the store lock for the whole statement.
pub fn execute_shared(sql: &str, store: &SharedTableStore) -> Result<ExecutionResult, DbError> {
    let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    execute(sql, &mut guard)
}

/// Applies an already parsed statement.
pub fn execute_statement(
    statement: SqlStatement,
    store: &mut TableStore,
) -> Result<ExecutionResult, ExecutionError> {
    match statement {
        SqlStatement::CreateTable { table_name, columns } => {
            store.create_table(&table_name, columns)?;
            Ok(ExecutionResult::Ack(format!("Table '{}' created", table_name)))
        }
        SqlStatement::Insert {
            table_name,
            columns,
            values,
        } => {
            store.insert_row(&table_name, columns.as_deref(), &values)?;
            Ok(ExecutionResult::RowsAffected(1))
        }
        SqlStatement::Select {
            table_name,
            columns,
            where_clause,
        } => {
            let condition = where_clause.as_ref().map(|w| &w.condition);
            let table = store.get_table(&table_name)?;

            // Resolve the projection before filtering so an unknown column
            // fails even when no row would match.
            let selected = if columns.is_empty() {
                table.get_columns().to_vec()
            } else {
                columns
                    .iter()
                    .map(|name| table.resolve_column(name).cloned())
                    .collect::<Result<Vec<_>, _>>()?
            };

            let rows = store.select_rows(&table_name, condition)?;
            // SELECT * hands rows back whole
            let rows = if columns.is_empty() {
                rows
            } else {
                rows.iter().map(|row| row.project(&selected)).collect()
            };

            Ok(ExecutionResult::Rows {
                columns: selected,
                rows,
            })
        }
        SqlStatement::Update {
            table_name,
            assignments,
            where_clause,
        } => {
            let condition = where_clause.as_ref().map(|w| &w.condition);
            let updated_count = store.update_rows(&table_name, &assignments, condition)?;
            Ok(ExecutionResult::RowsAffected(updated_count))
        }
        SqlStatement::Delete {
            table_name,
            where_clause,
        } => {
            let condition = where_clause.as_ref().map(|w| &w.condition);
            let deleted_count = store.delete_rows(&table_name, condition)?;
            Ok(ExecutionResult::RowsAffected(deleted_count))
        }
        SqlStatement::ShowTables => Ok(ExecutionResult::TableList(
            store.list_tables().into_iter().map(String::from).collect(),
        )),
        SqlStatement::ShowSchema { table_name } => Ok(ExecutionResult::SchemaInfo(
            store.describe_schema(&table_name)?.to_vec(),
        )),
    }
}
