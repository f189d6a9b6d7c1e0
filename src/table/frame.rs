// Table type used for API records and the joined dataset.
// Rows are stored column-aligned; records are converted at the edges.

use serde_json::{Map, Value};

use crate::error::{Result, WrangleError};

/// One API record: column name to JSON value, in response order.
pub type Record = Map<String, Value>;

/// An ordered set of rows sharing one header.
///
/// Row indices are positional, so they stay sequential (0..n) after every
/// append, join, or cache read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from a header and column-aligned rows.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a table from records.
    ///
    /// The header is the union of all record keys in first-seen order. Cells a
    /// record does not carry are null.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.push_record(record);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at a row for a named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of a named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }

    /// Row `row` as a record.
    pub fn record(&self, row: usize) -> Option<Record> {
        self.rows.get(row).map(|values| {
            self.columns
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect()
        })
    }

    /// Iterate over all rows as records.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.rows.len()).filter_map(|row| self.record(row))
    }

    /// Append a column-aligned row.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(WrangleError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a record, widening the header for unseen keys.
    pub fn push_record(&mut self, mut record: Record) {
        for key in record.keys() {
            if self.column_index(key).is_none() {
                self.add_column(key.clone());
            }
        }
        let row = self
            .columns
            .iter()
            .map(|c| record.remove(c).unwrap_or(Value::Null))
            .collect();
        self.rows.push(row);
    }

    /// Append all rows of `other` below this table.
    ///
    /// Columns are aligned by name; columns only one side has are filled with
    /// null on the other.
    pub fn append(&mut self, other: Table) {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }

        for column in &other.columns {
            if self.column_index(column).is_none() {
                self.add_column(column.clone());
            }
        }

        let mapping: Vec<usize> = other
            .columns
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();

        for values in other.rows {
            let mut row = vec![Value::Null; self.columns.len()];
            for (value, &idx) in values.into_iter().zip(&mapping) {
                row[idx] = value;
            }
            self.rows.push(row);
        }
    }

    /// Rename columns in place. Names not present are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for column in &mut self.columns {
            if let Some((_, to)) = renames.iter().find(|(from, _)| column == from) {
                *column = (*to).to_string();
            }
        }
    }

    fn add_column(&mut self, name: String) {
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_from_records_keeps_order() {
        let table = Table::from_records(vec![
            record(json!({"id": 1, "name": "a"})),
            record(json!({"id": 2, "name": "b"})),
        ]);

        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "name"), Some(&json!("b")));
    }

    #[test]
    fn test_from_records_fills_missing_cells() {
        let table = Table::from_records(vec![
            record(json!({"id": 1})),
            record(json!({"id": 2, "extra": true})),
        ]);

        assert_eq!(table.columns(), ["id", "extra"]);
        assert_eq!(table.get(0, "extra"), Some(&Value::Null));
        assert_eq!(table.get(1, "extra"), Some(&json!(true)));
    }

    #[test]
    fn test_append_reindexes_sequentially() {
        let mut table = Table::from_records(vec![record(json!({"id": 0}))]);
        table.append(Table::from_records(vec![
            record(json!({"id": 1})),
            record(json!({"id": 2})),
        ]));

        assert_eq!(table.len(), 3);
        for i in 0..3 {
            assert_eq!(table.get(i, "id"), Some(&json!(i)));
        }
    }

    #[test]
    fn test_append_aligns_columns_by_name() {
        let mut table = Table::from_records(vec![record(json!({"a": 1, "b": 2}))]);
        table.append(Table::from_records(vec![record(json!({"b": 3, "c": 4}))]));

        assert_eq!(table.columns(), ["a", "b", "c"]);
        assert_eq!(table.rows()[0], vec![json!(1), json!(2), Value::Null]);
        assert_eq!(table.rows()[1], vec![Value::Null, json!(3), json!(4)]);
    }

    #[test]
    fn test_append_to_empty_takes_other() {
        let mut table = Table::default();
        let other = Table::from_records(vec![record(json!({"a": 1}))]);
        table.append(other.clone());
        assert_eq!(table, other);
    }

    #[test]
    fn test_rename_columns() {
        let mut table = Table::from_records(vec![record(
            json!({"store": 1, "item": 10, "amount": 5.5}),
        )]);
        table.rename_columns(&[("store", "store_id"), ("item", "item_id")]);

        assert_eq!(table.columns(), ["store_id", "item_id", "amount"]);
        assert_eq!(table.rows()[0], vec![json!(1), json!(10), json!(5.5)]);
    }

    #[test]
    fn test_rename_ignores_unknown_columns() {
        let mut table = Table::from_records(vec![record(json!({"a": 1}))]);
        table.rename_columns(&[("missing", "other")]);
        assert_eq!(table.columns(), ["a"]);
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        let err = table.push_row(vec![json!(1)]).unwrap_err();
        assert!(matches!(
            err,
            WrangleError::RowWidth {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_record_round_trip() {
        let original = record(json!({"id": 7, "name": "x"}));
        let table = Table::from_records(vec![original.clone()]);
        assert_eq!(table.record(0), Some(original));
        assert_eq!(table.records().count(), 1);
    }
}
