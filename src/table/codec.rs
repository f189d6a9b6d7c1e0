// CSV codec for cached tables.
// Writes a leading unnamed row-index column and strips it again on read.

use std::io::{Read, Write};

use serde_json::{Number, Value};

use crate::error::{Result, WrangleError};

use super::frame::Table;

/// Write `table` as CSV: a header row whose first cell is empty, then one line
/// per row prefixed with its zero-based index.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let header = std::iter::once("").chain(table.columns().iter().map(String::as_str));
    csv.write_record(header)?;

    for (index, row) in table.rows().iter().enumerate() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(index.to_string());
        record.extend(row.iter().map(format_cell));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Read a table written by [`write_csv`].
///
/// The first column is treated as the row index and dropped; rows are
/// re-indexed by position. Cell types are recovered from their text.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let header = csv.headers()?.clone();
    if header.is_empty() {
        return Err(WrangleError::CacheFormat {
            path: String::new(),
            reason: "missing header row".to_string(),
        });
    }
    let columns: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

    let mut table = Table::new(columns);
    for record in csv.records() {
        let record = record?;
        table.push_row(record.iter().skip(1).map(parse_cell).collect())?;
    }

    Ok(table)
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Numbers are recovered only from their canonical text, so values such as
/// `035200264013` or `+5` stay strings.
fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>()
        && i.to_string() == cell
    {
        return Value::from(i);
    }
    if let Ok(u) = cell.parse::<u64>()
        && u.to_string() == cell
    {
        return Value::from(u);
    }
    // Non-finite floats stay text.
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64)
        && n.to_string() == cell
    {
        return Value::Number(n);
    }
    match cell {
        "True" => Value::Bool(true),
        "False" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}
