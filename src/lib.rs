pub mod types;
pub mod row;
pub mod errors;
pub mod parser;
pub mod table;
pub mod store;
pub mod executor;
pub mod cli;

pub use types::{ColumnDef, ColumnType, SqlValue, TypedValue};
pub use row::Row;
pub use errors::{DbError, ExecutionError, ParseError};
pub use parser::{parse_sql, Assignment, CompareOp, Condition, Connective, SqlStatement, WhereClause};
pub use table::Table;
pub use store::{SharedTableStore, TableStore};
pub use executor::{execute, execute_shared, execute_statement, ExecutionResult, Predicate};
