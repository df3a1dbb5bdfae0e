//! # Filter Report Reader
//!
//! Parses a DTASelect filter report in a single linear pass. Lines are
//! classified with the predicates in [`crate::classify`] while a region
//! cursor walks `AwaitingTable -> InTable -> AfterTable`:
//!
//! - **AwaitingTable**: everything is verbatim header text until the protein
//!   header row (`Locus` plus a plausible column count) establishes the
//!   protein column schema.
//! - **InTable**: each line is a peptide header (first occurrence only), a
//!   protein record, a peptide record attached to the current protein group,
//!   or the start of the trailing summary. Anything else is a format error
//!   carrying the line number.
//! - **AfterTable**: everything is verbatim trailer text.
//!
//! The schema rows themselves are not kept in `header_lines`; the writer
//! re-synthesizes them from the live schemas so column edits take effect.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use log::debug;

use crate::classify::{
    classify_table_line, is_peptide_header, is_protein_header, is_trailer_start, split_row,
    LineKind,
};
use crate::document::FilterDocument;
use crate::error::{FilterError, Result};
use crate::table::Table;

enum Region {
    AwaitingTable,
    InTable,
    AfterTable,
}

/// Parse a filter report from a file on disk.
pub fn from_filter_path<P: AsRef<Path>>(path: P) -> Result<FilterDocument> {
    let file = File::open(path)?;
    from_filter_reader(BufReader::new(file))
}

/// Parse a filter report from in-memory text.
pub fn from_filter_text(source: &str) -> Result<FilterDocument> {
    from_filter_reader(Cursor::new(source))
}

/// Parse a filter report from any buffered reader.
///
/// Streams line by line; auxiliary state beyond the accumulated tables is
/// O(1). A trailing `\r` is stripped from each line so CRLF input
/// round-trips with normalized line terminators.
pub fn from_filter_reader<R: BufRead>(reader: R) -> Result<FilterDocument> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut trailer_lines: Vec<String> = Vec::new();
    let mut protein_table: Option<Table> = None;
    let mut peptide_table: Option<Table> = None;

    let mut region = Region::AwaitingTable;
    // Current protein group ordinal. Consecutive protein lines with no
    // intervening peptides share a group; the next protein line after a
    // peptide run opens a new one.
    let mut group: usize = 0;
    let mut group_has_peptides = false;
    let mut protein_seen = false;
    let mut line_no: usize = 0;

    for line in reader.lines() {
        let mut line = line?;
        line_no += 1;
        if line.ends_with('\r') {
            line.pop();
        }

        match region {
            Region::AwaitingTable => {
                let fields = split_row(&line);
                if is_protein_header(&fields) {
                    protein_table = Some(schema_table("protein", &fields, false, line_no)?);
                    region = Region::InTable;
                } else {
                    header_lines.push(line);
                }
            }
            Region::AfterTable => trailer_lines.push(line),
            Region::InTable => {
                let fields = split_row(&line);

                // The first peptide header row establishes the peptide
                // schema: either the labelled `Unique ...` form, or (once a
                // protein exists to own peptides) the indented form whose
                // leading empty token is layout, not a column. An indented
                // line before any protein is an orphan peptide, never a
                // schema row.
                if peptide_table.is_none() && !is_trailer_start(&fields) {
                    if is_peptide_header(&fields) {
                        peptide_table = Some(schema_table("peptide", &fields, false, line_no)?);
                        continue;
                    }
                    if protein_seen && fields.len() >= 2 && fields[0].is_empty() {
                        peptide_table =
                            Some(schema_table("peptide", &fields[1..], true, line_no)?);
                        continue;
                    }
                }

                match classify_table_line(&fields) {
                    LineKind::Blank => {
                        return Err(FilterError::Format {
                            line: line_no,
                            reason: "blank line inside table region".to_string(),
                        });
                    }
                    LineKind::TrailerStart | LineKind::Prose => {
                        trailer_lines.push(line);
                        region = Region::AfterTable;
                    }
                    LineKind::Peptide => {
                        if !protein_seen {
                            return Err(FilterError::Format {
                                line: line_no,
                                reason: "peptide row before any protein row".to_string(),
                            });
                        }
                        let table =
                            peptide_table.as_mut().ok_or_else(|| FilterError::Format {
                                line: line_no,
                                reason: "peptide row before any peptide header row".to_string(),
                            })?;
                        let values = peptide_values(table, &fields, line_no)?;
                        table.push_row(group, values)?;
                        group_has_peptides = true;
                    }
                    LineKind::Protein => {
                        let table =
                            protein_table.as_mut().ok_or_else(|| FilterError::Format {
                                line: line_no,
                                reason: "protein row before the protein header row".to_string(),
                            })?;
                        if fields.len() != table.columns().len() {
                            return Err(arity_error("protein", table, fields.len(), line_no));
                        }
                        if group_has_peptides {
                            group += 1;
                            group_has_peptides = false;
                        }
                        table.push_row(group, fields.iter().map(|s| s.to_string()).collect())?;
                        protein_seen = true;
                    }
                }
            }
        }
    }

    let protein_table = protein_table.ok_or_else(|| FilterError::Format {
        line: line_no,
        reason: "no protein table header row found before end of input".to_string(),
    })?;
    let peptide_table = match peptide_table {
        Some(table) => table,
        None => Table::new("peptide", Vec::<String>::new())?,
    };

    debug!(
        "parsed filter report: {} header line(s), {} protein row(s), {} peptide row(s), {} trailer line(s)",
        header_lines.len(),
        protein_table.len(),
        peptide_table.len(),
        trailer_lines.len()
    );

    Ok(FilterDocument {
        header_lines,
        protein_table,
        peptide_table,
        trailer_lines,
    })
}

/// Build a table from a recognized header row, mapping duplicate-column
/// schema errors to format errors at the offending line.
fn schema_table(name: &str, columns: &[&str], indent: bool, line_no: usize) -> Result<Table> {
    let mut table =
        Table::new(name, columns.iter().copied()).map_err(|err| FilterError::Format {
            line: line_no,
            reason: err.to_string(),
        })?;
    table.indent = indent;
    Ok(table)
}

/// Extract a peptide row's values, honoring the indented layout and
/// enforcing the schema arity.
fn peptide_values(table: &Table, fields: &[&str], line_no: usize) -> Result<Vec<String>> {
    let fields = if table.indent {
        if !fields.first().is_some_and(|f| f.is_empty()) {
            return Err(FilterError::Format {
                line: line_no,
                reason: "expected an indented peptide row (leading tab)".to_string(),
            });
        }
        &fields[1..]
    } else {
        fields
    };
    if fields.len() != table.columns().len() {
        return Err(arity_error("peptide", table, fields.len(), line_no));
    }
    Ok(fields.iter().map(|s| s.to_string()).collect())
}

fn arity_error(kind: &str, table: &Table, found: usize, line_no: usize) -> FilterError {
    FilterError::Format {
        line: line_no,
        reason: format!(
            "{kind} row has {found} field(s), schema has {} column(s)",
            table.columns().len()
        ),
    }
}
