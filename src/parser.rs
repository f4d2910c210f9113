use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, multispace1, satisfy},
    combinator::{all_consuming, cut, map, not, opt, recognize, value},
    error::{context, VerboseError, VerboseErrorKind},
    multi::{many0_count, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult, Parser,
};
use serde::Serialize;
use std::collections::HashSet;

use crate::errors::ParseError;
use crate::types::{ColumnDef, ColumnType, SqlValue};

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SqlStatement {
    CreateTable {
        table_name: String,
        columns: Vec<ColumnDef>,
    },
    Insert {
        table_name: String,
        /// `None` means every column in schema order.
        columns: Option<Vec<String>>,
        values: Vec<SqlValue>,
    },
    Select {
        table_name: String,
        columns: Vec<String>, // empty for "*"
        where_clause: Option<WhereClause>,
    },
    Update {
        table_name: String,
        assignments: Vec<Assignment>,
        where_clause: Option<WhereClause>,
    },
    Delete {
        table_name: String,
        where_clause: Option<WhereClause>,
    },
    ShowTables,
    ShowSchema {
        table_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub column: String,
    pub value: SqlValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhereClause {
    pub condition: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Connective {
    And,
    Or,
}

/// WHERE expression tree.
///
/// `a AND b OR c` is kept as one flat `Chain` and applied strictly left to
/// right, so the tree only grows deeper through explicit parentheses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Condition {
    Comparison(String, CompareOp, SqlValue),
    Like(String, String),
    Chain(Box<Condition>, Vec<(Connective, Condition)>),
}

/// Deepest parenthesis nesting accepted in a WHERE clause.
pub const MAX_CONDITION_NESTING: usize = 32;

/// Parses a single statement. One trailing `;` is allowed.
pub fn parse_sql(input: &str) -> Result<SqlStatement, ParseError> {
    let trimmed = input.trim();
    let statement = trimmed.strip_suffix(';').map(str::trim_end).unwrap_or(trimmed);

    if statement.is_empty() {
        return Err(ParseError::new("empty statement"));
    }

    let keyword_token = leading_token(statement);
    let parser: fn(&str) -> Res<'_, SqlStatement> = match keyword_token.to_uppercase().as_str() {
        "CREATE" => create_table_statement,
        "INSERT" => insert_statement,
        "SELECT" => select_statement,
        "UPDATE" => update_statement,
        "DELETE" => delete_statement,
        "SHOW" => show_statement,
        _ => {
            return Err(ParseError::at(
                format!("unknown statement keyword '{}'", keyword_token),
                0,
            ))
        }
    };

    match all_consuming(terminated(parser, multispace0))(statement) {
        Ok((_, parsed)) => {
            validate(&parsed)?;
            log::trace!("parsed statement: {:?}", parsed);
            Ok(parsed)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(to_parse_error(statement, e)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new("incomplete statement")),
    }
}

// Everything up to the first whitespace or punctuation, so the error quotes what was typed.
fn leading_token(statement: &str) -> &str {
    let end = statement
        .find(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '_'))
        .unwrap_or(statement.len());
    if end == 0 {
        let first_len = statement.chars().next().map(char::len_utf8).unwrap_or(0);
        &statement[..first_len]
    } else {
        &statement[..end]
    }
}

fn to_parse_error(input: &str, error: VerboseError<&str>) -> ParseError {
    let deepest = error.errors.first().map(|(rest, _)| *rest).unwrap_or(input);
    let message = error
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some(*ctx),
            _ => None,
        })
        .unwrap_or("unexpected input");

    let rest = deepest.trim_start();
    let near = if rest.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{}'", rest.chars().take(20).collect::<String>())
    };

    ParseError::at(format!("{} near {}", message, near), input.len() - rest.len())
}

/// Structural checks nom cannot express.
fn validate(statement: &SqlStatement) -> Result<(), ParseError> {
    match statement {
        SqlStatement::CreateTable { columns, .. } => {
            ensure_unique(columns.iter().map(|c| c.name.as_str()), "table definition")
        }
        SqlStatement::Insert {
            columns: Some(columns),
            values,
            ..
        } => {
            ensure_unique(columns.iter().map(String::as_str), "INSERT column list")?;
            if columns.len() != values.len() {
                return Err(ParseError::new(format!(
                    "INSERT lists {} columns but {} values",
                    columns.len(),
                    values.len()
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn ensure_unique<'a>(names: impl Iterator<Item = &'a str>, place: &str) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.to_lowercase()) {
            return Err(ParseError::new(format!("duplicate column '{}' in {}", name, place)));
        }
    }
    Ok(())
}

// CREATE TABLE name (col TYPE, ...)
fn create_table_statement(input: &str) -> Res<SqlStatement> {
    let (input, _) = keyword("CREATE")(input)?;
    let (input, _) = required("expected TABLE", preceded(multispace1, keyword("TABLE")))(input)?;
    let (input, table_name) = table_ident(input)?;
    let (input, _) = multispace0(input)?;
    let (input, columns) = required(
        "expected column definitions",
        paren_list("expected column definition", column_definition),
    )(input)?;

    Ok((
        input,
        SqlStatement::CreateTable {
            table_name: table_name.to_string(),
            columns,
        },
    ))
}

fn column_definition(input: &str) -> Res<ColumnDef> {
    let (input, name) = identifier(input)?;
    let (input, _) = required("expected column type", multispace1)(input)?;
    let (rest, type_name) = required("expected column type", identifier)(input)?;

    match ColumnType::from_keyword(type_name) {
        Some(column_type) => Ok((rest, ColumnDef::new(name, column_type))),
        None => Err(nom::Err::Failure(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("unknown column type"))],
        })),
    }
}

// INSERT INTO name [(col, ...)] VALUES (v, ...)
fn insert_statement(input: &str) -> Res<SqlStatement> {
    let (input, _) = keyword("INSERT")(input)?;
    let (input, _) = required("expected INTO", preceded(multispace1, keyword("INTO")))(input)?;
    let (input, table_name) = table_ident(input)?;
    let (input, _) = multispace0(input)?;
    let (input, columns) = opt(terminated(
        paren_list("expected column name", map(identifier, String::from)),
        multispace0,
    ))(input)?;
    let (input, _) = required("expected VALUES", keyword("VALUES"))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, values) = required("expected value list", paren_list("expected literal", sql_value))(input)?;

    Ok((
        input,
        SqlStatement::Insert {
            table_name: table_name.to_string(),
            columns,
            values,
        },
    ))
}

// SELECT * | col, ... FROM name [WHERE ...]
fn select_statement(input: &str) -> Res<SqlStatement> {
    let (input, _) = keyword("SELECT")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, columns) = required(
        "expected '*' or column list",
        alt((
            value(Vec::new(), char('*')),
            separated_list1(
                comma,
                map(required("expected column name", identifier), String::from),
            ),
        )),
    )(input)?;
    let (input, _) = required("expected FROM", preceded(multispace0, keyword("FROM")))(input)?;
    let (input, table_name) = table_ident(input)?;
    let (input, where_clause) = opt_where_clause(input)?;

    Ok((
        input,
        SqlStatement::Select {
            table_name: table_name.to_string(),
            columns,
            where_clause,
        },
    ))
}

// UPDATE name SET col=v, ... [WHERE ...]
fn update_statement(input: &str) -> Res<SqlStatement> {
    let (input, _) = keyword("UPDATE")(input)?;
    let (input, table_name) = table_ident(input)?;
    let (input, _) = required("expected SET", preceded(multispace1, keyword("SET")))(input)?;
    let (input, assignments) = required(
        "expected assignment list",
        preceded(multispace1, separated_list1(comma, cut(assignment))),
    )(input)?;
    let (input, where_clause) = opt_where_clause(input)?;

    Ok((
        input,
        SqlStatement::Update {
            table_name: table_name.to_string(),
            assignments,
            where_clause,
        },
    ))
}

// DELETE FROM name [WHERE ...]
fn delete_statement(input: &str) -> Res<SqlStatement> {
    let (input, _) = keyword("DELETE")(input)?;
    let (input, _) = required("expected FROM", preceded(multispace1, keyword("FROM")))(input)?;
    let (input, table_name) = table_ident(input)?;
    let (input, where_clause) = opt_where_clause(input)?;

    Ok((
        input,
        SqlStatement::Delete {
            table_name: table_name.to_string(),
            where_clause,
        },
    ))
}

// SHOW TABLES | SHOW SCHEMA name
fn show_statement(input: &str) -> Res<SqlStatement> {
    let (input, _) = keyword("SHOW")(input)?;
    required(
        "expected TABLES or SCHEMA",
        preceded(
            multispace1,
            alt((
                value(SqlStatement::ShowTables, keyword("TABLES")),
                map(preceded(keyword("SCHEMA"), cut(table_ident)), |name| {
                    SqlStatement::ShowSchema {
                        table_name: name.to_string(),
                    }
                }),
            )),
        ),
    )(input)
}

fn assignment(input: &str) -> Res<Assignment> {
    let (input, column) = context("expected column name", identifier)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = required("expected '='", char('='))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = required("expected literal", sql_value)(input)?;

    Ok((
        input,
        Assignment {
            column: column.to_string(),
            value,
        },
    ))
}

fn opt_where_clause<'a>(input: &'a str) -> Res<'a, Option<WhereClause>> {
    opt(preceded(
        pair(multispace0, keyword("WHERE")),
        required(
            "expected condition",
            map(
                preceded(multispace0, |i: &'a str| condition(i, 0)),
                |condition| WhereClause { condition },
            ),
        ),
    ))(input)
}

/// term ((AND | OR) term)*, collected flat with no precedence between AND and OR.
fn condition<'a>(input: &'a str, depth: usize) -> Res<'a, Condition> {
    let (mut input, first) = condition_term(input, depth)?;
    let mut rest = Vec::new();

    loop {
        match connective(input) {
            Ok((after, op)) => {
                let (after, term) =
                    required("expected condition", |i: &'a str| condition_term(i, depth))(after)?;
                rest.push((op, term));
                input = after;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    if rest.is_empty() {
        Ok((input, first))
    } else {
        Ok((input, Condition::Chain(Box::new(first), rest)))
    }
}

fn connective(input: &str) -> Res<Connective> {
    delimited(
        multispace0,
        alt((
            value(Connective::And, keyword("AND")),
            value(Connective::Or, keyword("OR")),
        )),
        multispace0,
    )(input)
}

fn condition_term<'a>(input: &'a str, depth: usize) -> Res<'a, Condition> {
    let open: Res<'a, (char, &'a str)> = pair(char('('), multispace0)(input);
    let inner = match open {
        Ok((inner, _)) => inner,
        Err(_) => return comparison(input),
    };

    if depth >= MAX_CONDITION_NESTING {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("conditions nested too deeply"))],
        }));
    }

    cut(terminated(
        |i: &'a str| condition(i, depth + 1),
        required("expected ')'", preceded(multispace0, char(')'))),
    ))(inner)
}

fn comparison(input: &str) -> Res<Condition> {
    let (input, column) = identifier(input)?;
    let (input, _) = multispace0(input)?;

    if let Ok((rest, _)) = keyword("LIKE")(input) {
        let (rest, pattern) =
            required("expected quoted LIKE pattern", preceded(multispace0, text_literal))(rest)?;
        return Ok((rest, Condition::Like(column.to_string(), pattern)));
    }

    let (input, op) = required("expected comparison operator", compare_op)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = required("expected literal", sql_value)(input)?;

    Ok((input, Condition::Comparison(column.to_string(), op, value)))
}

fn compare_op(input: &str) -> Res<CompareOp> {
    alt((
        value(CompareOp::GreaterEqual, tag(">=")),
        value(CompareOp::LessEqual, tag("<=")),
        value(CompareOp::NotEqual, tag("!=")),
        value(CompareOp::NotEqual, tag("<>")),
        value(CompareOp::Equal, tag("=")),
        value(CompareOp::Greater, tag(">")),
        value(CompareOp::Less, tag("<")),
    ))(input)
}

fn sql_value(input: &str) -> Res<SqlValue> {
    alt((
        map(text_literal, SqlValue::Text),
        map(integer_literal, SqlValue::Integer),
    ))(input)
}

// 'text' with no escape sequences
fn text_literal(input: &str) -> Res<String> {
    map(
        preceded(
            char('\''),
            cut(terminated(
                take_while(|c: char| c != '\''),
                context("unterminated string literal", char('\'')),
            )),
        ),
        String::from,
    )(input)
}

fn integer_literal(input: &str) -> Res<i64> {
    let (rest, digits) = recognize(pair(
        opt(char('-')),
        terminated(digit1, not(satisfy(is_ident_char))),
    ))(input)?;

    match digits.parse::<i64>() {
        Ok(number) => Ok((rest, number)),
        Err(_) => Err(nom::Err::Failure(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("integer literal out of range"))],
        })),
    }
}

fn table_ident(input: &str) -> Res<&str> {
    required("expected table name", preceded(multispace1, identifier))(input)
}

fn identifier(input: &str) -> Res<&str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A case-insensitive keyword that is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    terminated(tag_no_case(word), not(satisfy(is_ident_char)))
}

/// Commits to `parser`: failure is reported under `what` instead of backtracking.
fn required<'a, O, F>(what: &'static str, parser: F) -> impl FnMut(&'a str) -> Res<'a, O>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    cut(context(what, parser))
}

fn comma(input: &str) -> Res<char> {
    delimited(multispace0, char(','), multispace0)(input)
}

/// `( item, item, ... )` with at least one item.
fn paren_list<'a, O, F>(what: &'static str, item: F) -> impl FnMut(&'a str) -> Res<'a, Vec<O>>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    delimited(
        pair(char('('), multispace0),
        separated_list1(comma, required(what, item)),
        required("expected ')'", preceded(multispace0, char(')'))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(column: &str, op: CompareOp, value: SqlValue) -> Condition {
        Condition::Comparison(column.to_string(), op, value)
    }

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(s.to_string())
    }

    #[test]
    fn test_create_table_parsing() {
        let sql = "CREATE TABLE students (id INTEGER, name TEXT, age INTEGER)";
        let result = parse_sql(sql).unwrap();

        match result {
            SqlStatement::CreateTable { table_name, columns } => {
                assert_eq!(table_name, "students");
                assert_eq!(
                    columns,
                    vec![
                        ColumnDef::new("id", ColumnType::Integer),
                        ColumnDef::new("name", ColumnType::Text),
                        ColumnDef::new("age", ColumnType::Integer),
                    ]
                );
            }
            _ => panic!("Expected CreateTable statement"),
        }
    }

    #[test]
    fn test_keywords_are_case_insensitive_and_identifiers_keep_case() {
        let result = parse_sql("  create table Students (Id integer, Name text);  ").unwrap();
        match result {
            SqlStatement::CreateTable { table_name, columns } => {
                assert_eq!(table_name, "Students");
                assert_eq!(columns[0].name, "Id");
                assert_eq!(columns[1].column_type, ColumnType::Text);
            }
            _ => panic!("Expected CreateTable statement"),
        }
    }

    #[test]
    fn test_create_table_errors() {
        assert!(parse_sql("CREATE TABLE t ()").is_err());
        let err = parse_sql("CREATE TABLE t (a INTEGER, b REAL)").unwrap_err();
        assert!(err.message.contains("unknown column type"), "{}", err);
        let err = parse_sql("CREATE TABLE t (a INTEGER, A TEXT)").unwrap_err();
        assert!(err.message.contains("duplicate column 'A'"), "{}", err);
        let err = parse_sql("CREATE TABLE t (a INTEGER").unwrap_err();
        assert!(err.message.contains("expected ')'"), "{}", err);
    }

    #[test]
    fn test_insert_with_column_list() {
        let sql = "INSERT INTO students (name, age) VALUES ('Alice', 20)";
        let result = parse_sql(sql).unwrap();

        assert_eq!(
            result,
            SqlStatement::Insert {
                table_name: "students".to_string(),
                columns: Some(vec!["name".to_string(), "age".to_string()]),
                values: vec![text("Alice"), SqlValue::Integer(20)],
            }
        );
    }

    #[test]
    fn test_insert_without_column_list() {
        let sql = "INSERT INTO students VALUES (1, 'Bob', -3)";
        match parse_sql(sql).unwrap() {
            SqlStatement::Insert { columns, values, .. } => {
                assert!(columns.is_none());
                assert_eq!(values, vec![SqlValue::Integer(1), text("Bob"), SqlValue::Integer(-3)]);
            }
            _ => panic!("Expected Insert statement"),
        }
    }

    #[test]
    fn test_insert_count_mismatch_is_parse_error() {
        let err = parse_sql("INSERT INTO students (name, age) VALUES ('Alice')").unwrap_err();
        assert!(err.message.contains("2 columns but 1 values"), "{}", err);
    }

    #[test]
    fn test_insert_missing_into() {
        let err = parse_sql("INSERT students VALUES (1)").unwrap_err();
        assert!(err.message.starts_with("expected INTO"), "{}", err);
        assert_eq!(err.position, Some(7));
    }

    #[test]
    fn test_unquoted_value_is_rejected() {
        let err = parse_sql("INSERT INTO students (name) VALUES (Alice)").unwrap_err();
        assert!(err.message.starts_with("expected literal"), "{}", err);
        assert!(parse_sql("INSERT INTO t VALUES (12abc)").is_err());
        assert!(parse_sql("INSERT INTO t VALUES (99999999999999999999)").is_err());
    }

    #[test]
    fn test_select_parsing() {
        match parse_sql("SELECT * FROM students").unwrap() {
            SqlStatement::Select { table_name, columns, where_clause } => {
                assert_eq!(table_name, "students");
                assert!(columns.is_empty());
                assert!(where_clause.is_none());
            }
            _ => panic!("Expected Select statement"),
        }
    }

    #[test]
    fn test_select_named_columns_with_where() {
        let sql = "SELECT name, age FROM students WHERE age >= 18";
        match parse_sql(sql).unwrap() {
            SqlStatement::Select { columns, where_clause, .. } => {
                assert_eq!(columns, vec!["name".to_string(), "age".to_string()]);
                assert_eq!(
                    where_clause.unwrap().condition,
                    cmp("age", CompareOp::GreaterEqual, SqlValue::Integer(18))
                );
            }
            _ => panic!("Expected Select statement"),
        }
    }

    #[test]
    fn test_select_missing_from() {
        let err = parse_sql("SELECT * students").unwrap_err();
        assert!(err.message.starts_with("expected FROM"), "{}", err);
    }

    #[test]
    fn test_and_or_fold_left_to_right() {
        let sql = "SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3";
        match parse_sql(sql).unwrap() {
            SqlStatement::Select { where_clause, .. } => {
                let expected = Condition::Chain(
                    Box::new(cmp("a", CompareOp::Equal, SqlValue::Integer(1))),
                    vec![
                        (Connective::Or, cmp("b", CompareOp::Equal, SqlValue::Integer(2))),
                        (Connective::And, cmp("c", CompareOp::Equal, SqlValue::Integer(3))),
                    ],
                );
                assert_eq!(where_clause.unwrap().condition, expected);
            }
            _ => panic!("Expected Select statement"),
        }
    }

    #[test]
    fn test_parentheses_group_conditions() {
        let sql = "DELETE FROM t WHERE a = 1 OR (b = 2 AND c != 'x')";
        match parse_sql(sql).unwrap() {
            SqlStatement::Delete { where_clause, .. } => {
                let expected = Condition::Chain(
                    Box::new(cmp("a", CompareOp::Equal, SqlValue::Integer(1))),
                    vec![(
                        Connective::Or,
                        Condition::Chain(
                            Box::new(cmp("b", CompareOp::Equal, SqlValue::Integer(2))),
                            vec![(Connective::And, cmp("c", CompareOp::NotEqual, text("x")))],
                        ),
                    )],
                );
                assert_eq!(where_clause.unwrap().condition, expected);
            }
            _ => panic!("Expected Delete statement"),
        }
        assert!(parse_sql("DELETE FROM t WHERE (a = 1").is_err());

        // A single parenthesised term is just that term.
        match parse_sql("SELECT * FROM t WHERE ((a = 1))").unwrap() {
            SqlStatement::Select { where_clause, .. } => assert_eq!(
                where_clause.unwrap().condition,
                cmp("a", CompareOp::Equal, SqlValue::Integer(1))
            ),
            _ => panic!("Expected Select statement"),
        }
    }

    #[test]
    fn test_long_chain_stays_flat() {
        let mut sql = String::from("SELECT * FROM t WHERE a = 1");
        for i in 0..50_000 {
            sql.push_str(if i % 2 == 0 { " AND a = 1" } else { " OR b != 'x'" });
        }

        match parse_sql(&sql).unwrap() {
            SqlStatement::Select { where_clause, .. } => match where_clause.unwrap().condition {
                Condition::Chain(_, rest) => assert_eq!(rest.len(), 50_000),
                other => panic!("Expected a chain, got {:?}", other),
            },
            _ => panic!("Expected Select statement"),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| {
            format!(
                "SELECT * FROM t WHERE {}a = 1{}",
                "(".repeat(depth),
                ")".repeat(depth)
            )
        };

        assert!(parse_sql(&nested(MAX_CONDITION_NESTING)).is_ok());
        let err = parse_sql(&nested(MAX_CONDITION_NESTING + 1)).unwrap_err();
        assert!(err.message.starts_with("conditions nested too deeply"), "{}", err);
        assert_eq!(err.position, Some(22 + MAX_CONDITION_NESTING));
    }

    #[test]
    fn test_where_needs_no_leading_space_after_literal() {
        let sql = "UPDATE t SET b='q'WHERE a=1";
        match parse_sql(sql).unwrap() {
            SqlStatement::Update { assignments, where_clause, .. } => {
                assert_eq!(assignments[0].value, text("q"));
                assert_eq!(
                    where_clause.unwrap().condition,
                    cmp("a", CompareOp::Equal, SqlValue::Integer(1))
                );
            }
            _ => panic!("Expected Update statement"),
        }
        assert!(parse_sql("SELECT * FROM tWHERE a = 1").is_err());
    }

    #[test]
    fn test_all_comparison_operators() {
        let cases = [
            ("=", CompareOp::Equal),
            ("!=", CompareOp::NotEqual),
            ("<>", CompareOp::NotEqual),
            ("<", CompareOp::Less),
            (">", CompareOp::Greater),
            ("<=", CompareOp::LessEqual),
            (">=", CompareOp::GreaterEqual),
        ];
        for (token, op) in cases {
            let sql = format!("SELECT * FROM t WHERE age{}5", token);
            match parse_sql(&sql).unwrap() {
                SqlStatement::Select { where_clause, .. } => {
                    assert_eq!(where_clause.unwrap().condition, cmp("age", op, SqlValue::Integer(5)));
                }
                _ => panic!("Expected Select statement"),
            }
        }
    }

    #[test]
    fn test_like_condition() {
        match parse_sql("SELECT * FROM t WHERE name LIKE 'A%'").unwrap() {
            SqlStatement::Select { where_clause, .. } => {
                assert_eq!(
                    where_clause.unwrap().condition,
                    Condition::Like("name".to_string(), "A%".to_string())
                );
            }
            _ => panic!("Expected Select statement"),
        }
        assert!(parse_sql("SELECT * FROM t WHERE name LIKE 5").is_err());
    }

    #[test]
    fn test_malformed_predicate() {
        let err = parse_sql("SELECT * FROM t WHERE").unwrap_err();
        assert!(err.message.starts_with("expected condition"), "{}", err);
        let err = parse_sql("SELECT * FROM t WHERE age 5").unwrap_err();
        assert!(err.message.starts_with("expected comparison operator"), "{}", err);
        assert!(parse_sql("SELECT * FROM t WHERE age > 5 AND").is_err());
    }

    #[test]
    fn test_update_parsing() {
        let sql = "UPDATE students SET age=21, name = 'Al' WHERE name='Alice'";
        match parse_sql(sql).unwrap() {
            SqlStatement::Update { table_name, assignments, where_clause } => {
                assert_eq!(table_name, "students");
                assert_eq!(
                    assignments,
                    vec![
                        Assignment { column: "age".to_string(), value: SqlValue::Integer(21) },
                        Assignment { column: "name".to_string(), value: text("Al") },
                    ]
                );
                assert_eq!(
                    where_clause.unwrap().condition,
                    cmp("name", CompareOp::Equal, text("Alice"))
                );
            }
            _ => panic!("Expected Update statement"),
        }
    }

    #[test]
    fn test_update_missing_set() {
        let err = parse_sql("UPDATE students age = 1").unwrap_err();
        assert!(err.message.starts_with("expected SET"), "{}", err);
    }

    #[test]
    fn test_delete_all_parsing() {
        assert_eq!(
            parse_sql("DELETE FROM students;").unwrap(),
            SqlStatement::Delete {
                table_name: "students".to_string(),
                where_clause: None,
            }
        );
    }

    #[test]
    fn test_show_statements() {
        assert_eq!(parse_sql("show tables").unwrap(), SqlStatement::ShowTables);
        assert_eq!(
            parse_sql("SHOW SCHEMA students").unwrap(),
            SqlStatement::ShowSchema {
                table_name: "students".to_string()
            }
        );
        assert!(parse_sql("SHOW COLUMNS").is_err());
    }

    #[test]
    fn test_unknown_keyword() {
        let err = parse_sql("DROP TABLE students").unwrap_err();
        assert_eq!(err.message, "unknown statement keyword 'DROP'");
        assert_eq!(err.position, Some(0));

        let err = parse_sql("SÉLECT * FROM t").unwrap_err();
        assert_eq!(err.message, "unknown statement keyword 'SÉLECT'");
        let err = parse_sql("SELEKT(*) FROM t").unwrap_err();
        assert_eq!(err.message, "unknown statement keyword 'SELEKT'");
    }

    #[test]
    fn test_multiple_statements_rejected() {
        assert!(parse_sql("SHOW TABLES; SHOW TABLES").is_err());
        assert!(parse_sql("").is_err());
        assert!(parse_sql("   ;").is_err());
    }

    #[test]
    fn test_text_literal_keeps_spaces_and_case() {
        match parse_sql("INSERT INTO t VALUES ('Hello, World ')").unwrap() {
            SqlStatement::Insert { values, .. } => assert_eq!(values, vec![text("Hello, World ")]),
            _ => panic!("Expected Insert statement"),
        }
        let err = parse_sql("INSERT INTO t VALUES ('open)").unwrap_err();
        assert!(err.message.starts_with("unterminated string literal"), "{}", err);
    }
}
