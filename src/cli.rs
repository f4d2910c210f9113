use crate::errors::DbError;
use crate::executor::{execute, ExecutionResult};
use crate::row::Row;
use crate::store::TableStore;
use crate::types::ColumnDef;
use std::io::{self, BufRead, IsTerminal, Write};

pub const DEFAULT_PROMPT: &str = "minirel> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    pub prompt: String,
    /// Render results as JSON instead of tables.
    pub json: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            json: false,
        }
    }
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Sql(String),
    ListTables,
    Help,
    Quit,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let trimmed = line.trim();
        if !trimmed.starts_with('.') {
            return Ok(ReplCommand::Sql(trimmed.to_string()));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            ".exit" | ".quit" | ".q" => Ok(ReplCommand::Quit),
            ".help" | ".h" => Ok(ReplCommand::Help),
            ".tables" | ".t" => Ok(ReplCommand::ListTables),
            _ => Err(format!("Unknown command: {} (try .help)", trimmed)),
        }
    }
}

/// Line-oriented shell over a single `TableStore`.
pub struct Repl {
    store: TableStore,
    config: ReplConfig,
}

impl Repl {
    pub fn new(config: ReplConfig) -> Self {
        Self {
            store: TableStore::new(),
            config,
        }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Reads statements from stdin until EOF or `.exit`.
    pub fn run(&mut self) -> io::Result<()> {
        let is_interactive = io::stdin().is_terminal();
        if is_interactive {
            println!("minirel {}", env!("CARGO_PKG_VERSION"));
            println!("Type '.help' for usage, '.exit' to quit.");
        }

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            if is_interactive {
                print!("{}", self.config.prompt);
                io::stdout().flush()?;
            }

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if line.trim().is_empty() {
                continue;
            }

            match ReplCommand::parse(&line) {
                Ok(ReplCommand::Quit) => break,
                Ok(command) => self.run_command(command),
                Err(message) => eprintln!("{}", message),
            }
        }

        if is_interactive {
            println!("Bye!");
        }
        Ok(())
    }

    fn run_command(&mut self, command: ReplCommand) {
        match command {
            ReplCommand::Sql(sql) => match self.execute_sql(&sql) {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    log::warn!("statement failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            },
            ReplCommand::ListTables => println!("{}", self.render_table_list()),
            ReplCommand::Help => println!("{}", help_text()),
            ReplCommand::Quit => {}
        }
    }

    /// Executes one statement and returns its rendered output.
    pub fn execute_sql(&mut self, sql: &str) -> Result<String, DbError> {
        let result = execute(sql, &mut self.store)?;
        Ok(render_result(&result, self.config.json))
    }

    fn render_table_list(&self) -> String {
        if self.store.is_empty() {
            return "No tables".to_string();
        }

        let headers = ["table", "columns", "rows"].map(String::from);
        let cells: Vec<Vec<String>> = self
            .store
            .tables()
            .map(|t| {
                vec![
                    t.get_name().to_string(),
                    t.get_columns().len().to_string(),
                    t.row_count().to_string(),
                ]
            })
            .collect();
        draw_box(&headers, &cells)
    }
}

pub fn render_result(result: &ExecutionResult, json: bool) -> String {
    if json {
        return match serde_json::to_string_pretty(result) {
            Ok(s) => s,
            Err(e) => format!("{{\"error\": \"{}\"}}", e),
        };
    }

    match result {
        ExecutionResult::Rows { columns, rows } => render_rows(columns, rows),
        ExecutionResult::RowsAffected(n) => {
            format!("{} row{} affected", n, if *n == 1 { "" } else { "s" })
        }
        ExecutionResult::TableList(names) if names.is_empty() => "No tables".to_string(),
        ExecutionResult::TableList(names) => names.join("\n"),
        ExecutionResult::SchemaInfo(columns) => {
            let headers = ["column", "type"].map(String::from);
            let cells: Vec<Vec<String>> = columns
                .iter()
                .map(|c| vec![c.name.clone(), c.column_type.to_string()])
                .collect();
            draw_box(&headers, &cells)
        }
        ExecutionResult::Ack(message) => message.clone(),
    }
}

fn render_rows(columns: &[ColumnDef], rows: &[Row]) -> String {
    let headers: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.values_in_order(columns)
                .iter()
                .map(|v| v.to_string())
                .collect()
        })
        .collect();

    let mut out = draw_box(&headers, &cells);
    out.push_str(&format!(
        "\n{} row{}",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    ));
    out
}

fn draw_box(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(mid), right)
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!(" {:width$} ", cell, width = width))
            .collect();
        format!("│{}│", padded.join("│"))
    };

    let mut lines = vec![rule("┌", "┬", "┐"), line(headers), rule("├", "┼", "┤")];
    lines.extend(rows.iter().map(|r| line(r.as_slice())));
    lines.push(rule("└", "┴", "┘"));
    lines.join("\n")
}

pub fn help_text() -> &'static str {
    "Statements:
  CREATE TABLE name (col INTEGER|TEXT, ...)
  INSERT INTO name [(col, ...)] VALUES (value, ...)
  SELECT *|col, ... FROM name [WHERE condition]
  UPDATE name SET col = value, ... [WHERE condition]
  DELETE FROM name [WHERE condition]
  SHOW TABLES
  SHOW SCHEMA name

Conditions:
  col = | != | <> | < | > | <= | >= value
  col LIKE 'pattern'       % any run, _ one character
  cond AND|OR cond         evaluated left to right; use ( ) to group

Commands:
  .tables                  list tables with column and row counts
  .help                    show this help
  .exit, .quit             leave"
}
