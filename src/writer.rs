//! # Filter Report Writer
//!
//! Re-serializes a [`FilterDocument`] into filter report text: header lines
//! verbatim, the synthesized schema rows, protein rows interleaved with the
//! peptide rows their group owns, then trailer lines verbatim. With no edits
//! in between, output reproduces the parsed input byte for byte (modulo a
//! normalized line terminator).
//!
//! Both tables are validated against their own schemas before a single byte
//! is emitted, so a failed write never leaves a half-written stream behind
//! the caller's back.

use std::collections::HashMap;
use std::io::Write;

use log::warn;

use crate::document::FilterDocument;
use crate::error::{FilterError, Result};
use crate::table::Table;

/// What to do with peptide rows whose owning protein group has no surviving
/// protein row at serialization time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DanglingPeptides {
    /// Fail with [`FilterError::DanglingPeptide`]. The default: data loss
    /// stays opt-in.
    #[default]
    Reject,
    /// Omit the rows and log one warning per orphaned group.
    Drop,
}

/// Serialization options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Policy for peptide rows with no surviving protein group.
    pub dangling: DanglingPeptides,
}

/// Serialize a document with default options.
pub fn to_filter_text(doc: &FilterDocument) -> Result<String> {
    to_filter_text_with(doc, &WriteOptions::default())
}

/// Serialize a document with explicit options.
pub fn to_filter_text_with(doc: &FilterDocument, options: &WriteOptions) -> Result<String> {
    let mut buf = Vec::new();
    to_filter_writer(doc, options, &mut buf)?;
    String::from_utf8(buf).map_err(|err| {
        FilterError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

/// Serialize a document into any writer.
///
/// The document is not mutated; calling this twice produces identical output.
pub fn to_filter_writer<W: Write>(
    doc: &FilterDocument,
    options: &WriteOptions,
    writer: &mut W,
) -> Result<()> {
    validate_table(&doc.protein_table, true)?;
    validate_table(&doc.peptide_table, false)?;

    for line in &doc.header_lines {
        writeln!(writer, "{line}")?;
    }

    // Schema rows are always synthesized from the live schemas, never
    // carried from header_lines, so column renames and reorders take effect.
    writeln!(writer, "{}", doc.protein_table.columns().join("\t"))?;
    // The labelled peptide schema row sits next to the protein schema row.
    // Indent-layout reports place theirs under the first protein row
    // instead, so emit_records handles that variant.
    if !doc.peptide_table.columns().is_empty() && !doc.peptide_table.indent {
        write_row(writer, &doc.peptide_table, doc.peptide_table.columns())?;
    }

    emit_records(doc, options, writer)?;

    for line in &doc.trailer_lines {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Emit protein rows in table order, flushing each group's peptides after
/// the group's last protein row.
fn emit_records<W: Write>(
    doc: &FilterDocument,
    options: &WriteOptions,
    writer: &mut W,
) -> Result<()> {
    let proteins = doc.protein_table.rows();
    let peptides = doc.peptide_table.rows();

    // Peptide row indices per owning group, in sibling order.
    let mut pending: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, row) in peptides.iter().enumerate() {
        pending.entry(row.group).or_default().push(idx);
    }

    // A group's peptides are flushed after its last protein row, which keeps
    // shared-group runs (several loci, then their common peptides) intact.
    let mut last_of_group: HashMap<usize, usize> = HashMap::new();
    for (idx, row) in proteins.iter().enumerate() {
        last_of_group.insert(row.group, idx);
    }

    for (idx, row) in proteins.iter().enumerate() {
        write_row(writer, &doc.protein_table, row.values())?;
        if idx == 0 && doc.peptide_table.indent && !doc.peptide_table.columns().is_empty() {
            write_row(writer, &doc.peptide_table, doc.peptide_table.columns())?;
        }
        if last_of_group.get(&row.group) == Some(&idx) {
            if let Some(rows) = pending.remove(&row.group) {
                for pep_idx in rows {
                    write_row(writer, &doc.peptide_table, peptides[pep_idx].values())?;
                }
            }
        }
    }

    if !pending.is_empty() {
        match options.dangling {
            DanglingPeptides::Reject => {
                // Report the first orphaned row in table order so the error
                // is deterministic.
                for (idx, row) in peptides.iter().enumerate() {
                    if pending.contains_key(&row.group) {
                        return Err(FilterError::DanglingPeptide {
                            row: idx,
                            group: row.group,
                        });
                    }
                }
            }
            DanglingPeptides::Drop => {
                let mut groups: Vec<usize> = pending.keys().copied().collect();
                groups.sort_unstable();
                for group in groups {
                    let count = pending[&group].len();
                    warn!(
                        "dropping {count} peptide row(s) referencing protein group {group} with no surviving protein row"
                    );
                }
            }
        }
    }
    Ok(())
}

/// Write one tab-joined row, with the leading tab of the indented layout
/// when the table calls for it.
fn write_row<W: Write>(writer: &mut W, table: &Table, values: &[String]) -> Result<()> {
    if table.indent {
        write!(writer, "\t")?;
    }
    writeln!(writer, "{}", values.join("\t"))?;
    Ok(())
}

/// Check a table's rows against its own schema before emission.
///
/// The editing API keeps tables consistent, but documents can also arrive
/// through serde, so nothing here is assumed.
fn validate_table(table: &Table, require_columns: bool) -> Result<()> {
    let columns = table.columns();
    if columns.is_empty() {
        if require_columns || !table.is_empty() {
            return Err(FilterError::Schema {
                table: table.name().to_string(),
                row: None,
                reason: "table has no column schema".to_string(),
            });
        }
        return Ok(());
    }
    for (idx, column) in columns.iter().enumerate() {
        if columns[..idx].contains(column) {
            return Err(FilterError::Schema {
                table: table.name().to_string(),
                row: None,
                reason: format!("duplicate column name: {column:?}"),
            });
        }
    }
    for (idx, row) in table.rows().iter().enumerate() {
        if row.values().len() != columns.len() {
            return Err(FilterError::Schema {
                table: table.name().to_string(),
                row: Some(idx),
                reason: format!(
                    "expected {} fields, found {}",
                    columns.len(),
                    row.values().len()
                ),
            });
        }
    }
    Ok(())
}
