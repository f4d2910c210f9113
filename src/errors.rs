use crate::types::ColumnType;
use thiserror::Error;

/// Syntax-level failure while turning a statement string into a `SqlStatement`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the trimmed statement where parsing stopped.
    pub position: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "Parse error at position {}: {}", pos, self.message),
            None => write!(f, "Parse error: {}", self.message),
        }
    }
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

/// Semantic failure raised by the table store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Table '{0}' not found")]
    UnknownTable(String),

    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Column '{0}' specified more than once")]
    DuplicateColumn(String),

    #[error("Table must have at least one column")]
    EmptySchema,

    #[error("Invalid column count: expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("Type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    #[error("Invalid LIKE pattern '{0}'")]
    InvalidPattern(String),
}

impl ExecutionError {
    pub fn table_not_found(table_name: &str) -> Self {
        ExecutionError::UnknownTable(table_name.to_string())
    }

    pub fn table_already_exists(table_name: &str) -> Self {
        ExecutionError::DuplicateTable(table_name.to_string())
    }

    pub fn column_not_found(column_name: &str) -> Self {
        ExecutionError::UnknownColumn(column_name.to_string())
    }

    pub fn type_mismatch(column: &str, expected: ColumnType, actual: ColumnType) -> Self {
        ExecutionError::TypeMismatch {
            column: column.to_string(),
            expected,
            actual,
        }
    }

    pub fn invalid_column_count(expected: usize, actual: usize) -> Self {
        ExecutionError::ColumnCountMismatch { expected, actual }
    }
}

/// Anything `execute` can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
