//! # Tabular Data Model
//!
//! A [`Table`] holds one of the two record tables of a filter report: the
//! protein table or the peptide table. Rows are plain string fields kept in
//! the order of the table's column schema; the editing API keeps every row's
//! arity consistent with the schema, and the writer re-validates before
//! emitting anything.
//!
//! Each [`Row`] carries a protein-group ordinal. Protein rows belong to a
//! group (consecutive protein lines with no intervening peptides share one),
//! and peptide rows point at the group that owns them. The link is derived
//! from line order at parse time and is not re-derived later: callers that
//! remove protein rows are responsible for removing (or accepting the
//! configured write policy for) the peptides that reference them.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// A single record of a protein or peptide table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Protein-group ordinal: the group this protein row belongs to, or the
    /// group a peptide row is owned by.
    pub group: usize,
    values: Vec<String>,
}

impl Row {
    /// Field values in column-schema order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An ordered table of records governed by a column schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    /// Indented source layout: every row of this table is written with a
    /// leading tab, and the leading empty token is not part of the schema.
    /// Set by the reader when the peptide header row was recognized by
    /// indentation rather than by the `Unique` label.
    #[serde(default)]
    pub indent: bool,
}

impl Table {
    /// Create an empty table with the given name and column schema.
    ///
    /// Fails with a schema error if a column name occurs more than once.
    pub fn new<I, S>(name: &str, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if let Some(dup) = first_duplicate(&columns) {
            return Err(FilterError::Schema {
                table: name.to_string(),
                row: None,
                reason: format!("duplicate column name: {dup:?}"),
            });
        }
        Ok(Self {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
            indent: false,
        })
    }

    /// Table name used in error messages ("protein" or "peptide" for tables
    /// produced by the reader).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column schema, in emission order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column in the schema.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// All rows, in emission order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, or `None` when either does not exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r.values[col].as_str())
    }

    /// Overwrite the value of `column` in row `row`.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<String>) -> Result<()> {
        let col = self
            .column_index(column)
            .ok_or_else(|| self.schema_error(None, format!("no such column: {column:?}")))?;
        let len = self.rows.len();
        let slot = self
            .rows
            .get_mut(row)
            .ok_or_else(|| FilterError::Schema {
                table: self.name.clone(),
                row: Some(row),
                reason: format!("row index out of range (table has {len} rows)"),
            })?;
        slot.values[col] = value.into();
        Ok(())
    }

    /// Append a row. The number of values must match the schema.
    pub fn push_row(&mut self, group: usize, values: Vec<String>) -> Result<()> {
        let at = self.rows.len();
        self.insert_row(at, group, values)
    }

    /// Insert a row at `index`, shifting later rows down.
    pub fn insert_row(&mut self, index: usize, group: usize, values: Vec<String>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(self.schema_error(
                Some(index),
                format!(
                    "expected {} fields, found {}",
                    self.columns.len(),
                    values.len()
                ),
            ));
        }
        if index > self.rows.len() {
            return Err(self.schema_error(
                Some(index),
                format!("row index out of range (table has {} rows)", self.rows.len()),
            ));
        }
        self.rows.insert(index, Row { group, values });
        Ok(())
    }

    /// Remove and return the row at `index`, or `None` when out of range.
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain_rows<F: FnMut(&Row) -> bool>(&mut self, keep: F) {
        self.rows.retain(keep);
    }

    /// Append a new column, filling every existing row with `default`.
    pub fn add_column(&mut self, column: &str, default: &str) -> Result<()> {
        if self.column_index(column).is_some() {
            return Err(self.schema_error(None, format!("duplicate column name: {column:?}")));
        }
        self.columns.push(column.to_string());
        for row in &mut self.rows {
            row.values.push(default.to_string());
        }
        Ok(())
    }

    /// Remove a column and its value from every row.
    pub fn remove_column(&mut self, column: &str) -> Result<()> {
        let col = self
            .column_index(column)
            .ok_or_else(|| self.schema_error(None, format!("no such column: {column:?}")))?;
        self.columns.remove(col);
        for row in &mut self.rows {
            row.values.remove(col);
        }
        Ok(())
    }

    /// Rename a column, leaving row values untouched.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        if from != to && self.column_index(to).is_some() {
            return Err(self.schema_error(None, format!("duplicate column name: {to:?}")));
        }
        let col = self
            .column_index(from)
            .ok_or_else(|| self.schema_error(None, format!("no such column: {from:?}")))?;
        self.columns[col] = to.to_string();
        Ok(())
    }

    /// Move a column (and every row's value for it) to a new schema position.
    pub fn move_column(&mut self, column: &str, new_index: usize) -> Result<()> {
        let col = self
            .column_index(column)
            .ok_or_else(|| self.schema_error(None, format!("no such column: {column:?}")))?;
        if new_index >= self.columns.len() {
            return Err(self.schema_error(
                None,
                format!(
                    "column index {new_index} out of range (table has {} columns)",
                    self.columns.len()
                ),
            ));
        }
        let name = self.columns.remove(col);
        self.columns.insert(new_index, name);
        for row in &mut self.rows {
            let value = row.values.remove(col);
            row.values.insert(new_index, value);
        }
        Ok(())
    }

    fn schema_error(&self, row: Option<usize>, reason: String) -> FilterError {
        FilterError::Schema {
            table: self.name.clone(),
            row,
            reason,
        }
    }
}

fn first_duplicate(columns: &[String]) -> Option<&String> {
    columns
        .iter()
        .enumerate()
        .find(|(i, c)| columns[..*i].contains(c))
        .map(|(_, c)| c)
}
