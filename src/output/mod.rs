//! Output formatting module
//!
//! Data goes to stdout; status messages go to stderr so piped output stays
//! machine-readable.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use crate::config::OutputFormat;
use crate::values::flatten::{lookup, scalar_text};
use crate::values::{flatten_fields, flatten_record, FlatRecord};

/// How rows are built for one resource type
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Records and list entries: `id` plus every flattened attribute
    Record { id_field: &'a str },
    /// Other resources: fixed dotted-path columns
    Fields {
        id_field: &'a str,
        columns: &'a [&'a str],
    },
}

impl Shape<'_> {
    fn id_field(&self) -> &str {
        match self {
            Shape::Record { id_field } | Shape::Fields { id_field, .. } => id_field,
        }
    }

    fn row(&self, item: &Value) -> FlatRecord {
        match self {
            Shape::Record { .. } => flatten_record(item),
            Shape::Fields { columns, .. } => flatten_fields(item, columns),
        }
    }
}

/// Print a list of items in the configured format
pub fn print_list(items: &[Value], shape: Shape<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_pretty(&items),
        OutputFormat::Quiet => {
            let mut out = io::stdout().lock();
            for item in items {
                if let Some(id) = extract_id(item, shape.id_field()) {
                    writeln!(out, "{}", id)?;
                }
            }
            Ok(())
        }
        OutputFormat::Csv => {
            let rows: Vec<FlatRecord> = items.iter().map(|i| shape.row(i)).collect();
            write_csv(io::stdout().lock(), &rows)
        }
        OutputFormat::Table => {
            let rows: Vec<FlatRecord> = items.iter().map(|i| shape.row(i)).collect();
            print_table(&rows);
            info(&format!("Total: {}", items.len()));
            Ok(())
        }
    }
}

/// Print a single item in the configured format
pub fn print_item(item: &Value, shape: Shape<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_pretty(item),
        OutputFormat::Quiet => {
            if let Some(id) = extract_id(item, shape.id_field()) {
                println!("{}", id);
            }
            Ok(())
        }
        OutputFormat::Csv => write_csv(io::stdout().lock(), &[shape.row(item)]),
        OutputFormat::Table => {
            match shape {
                Shape::Record { .. } => {
                    for (column, text) in shape.row(item) {
                        println!("{}\t{}", column.cyan(), text);
                    }
                }
                Shape::Fields { .. } => print_value_compact(item, 0),
            }
            Ok(())
        }
    }
}

/// Print an arbitrary payload (`self`, raw API calls)
pub fn print_value(value: &Value, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_value_compact(value, 0);
            Ok(())
        }
        _ => print_json_pretty(value),
    }
}

/// Pull `id.<field>` (or a top-level `<field>`) out of an item
pub fn extract_id(item: &Value, id_field: &str) -> Option<String> {
    item.get("id")
        .and_then(|id| match id {
            Value::Object(_) => id.get(id_field),
            other => Some(other),
        })
        .or_else(|| lookup(item, id_field))
        .map(scalar_text)
        .filter(|s| !s.is_empty())
}

/// Column names across all rows, in first-seen order
fn column_names(rows: &[FlatRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (column, _) in row {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }
    columns
}

fn cell<'a>(row: &'a FlatRecord, column: &str) -> &'a str {
    row.iter()
        .find(|(c, _)| c == column)
        .map(|(_, text)| text.as_str())
        .unwrap_or("")
}

/// Write rows as CSV with a header line
pub fn write_csv<W: Write>(writer: W, rows: &[FlatRecord]) -> Result<()> {
    let columns = column_names(rows);
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&columns)?;
    for row in rows {
        csv.write_record(columns.iter().map(|c| cell(row, c)))?;
    }
    csv.flush()?;
    Ok(())
}

/// Print rows as a tab-separated table
pub fn print_table(rows: &[FlatRecord]) {
    let columns = column_names(rows);
    if columns.is_empty() {
        return;
    }
    let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
    table_header(&headers);
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| cell(row, c).replace(['\t', '\n'], " "))
            .collect();
        println!("{}", cells.join("\t"));
    }
}

/// Print as pretty JSON
pub fn print_json_pretty<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn print_value_compact(value: &Value, indent: usize) {
    let prefix = "  ".repeat(indent);

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(_) | Value::Array(_) => {
                        println!("{}{}: ", prefix, key.cyan());
                        print_value_compact(val, indent + 1);
                    }
                    _ => {
                        println!("{}{}: {}", prefix, key.cyan(), format_value(val));
                    }
                }
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter().enumerate() {
                println!("{}[{}]", prefix, i.to_string().dimmed());
                print_value_compact(val, indent + 1);
            }
        }
        _ => {
            println!("{}{}", prefix, format_value(value));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".dimmed().to_string(),
        Value::Bool(b) => {
            if *b {
                "true".green().to_string()
            } else {
                "false".red().to_string()
            }
        }
        Value::Number(n) => n.to_string().yellow().to_string(),
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Print success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), msg.dimmed());
}

/// Print a table header
pub fn table_header(columns: &[&str]) {
    let header: Vec<String> = columns
        .iter()
        .map(|c| c.bold().underline().to_string())
        .collect();
    println!("{}", header.join("\t"));
}
