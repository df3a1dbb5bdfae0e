//! Error types for dtafilter

use thiserror::Error;

/// Result type alias for dtafilter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur while reading or writing a filter report
#[derive(Debug, Error)]
pub enum FilterError {
    /// I/O error reading or writing report text
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be classified into the header/protein/peptide/trailer
    /// structure of the report
    #[error("Invalid filter format at line {line}: {reason}")]
    Format {
        /// 1-based line number where classification failed
        line: usize,
        /// What made the line unclassifiable
        reason: String,
    },

    /// A table's rows or columns are inconsistent with its declared schema
    #[error("Schema violation in {table} table{}: {reason}", row_context(.row))]
    Schema {
        /// Which table is inconsistent ("protein" or "peptide")
        table: String,
        /// Offending row index, when the violation is row-specific
        row: Option<usize>,
        /// What is inconsistent
        reason: String,
    },

    /// A peptide row's owning protein group no longer resolves to any protein
    /// row at serialization time
    #[error("Peptide row {row} references protein group {group}, which has no surviving protein row")]
    DanglingPeptide {
        /// Index of the orphaned peptide row
        row: usize,
        /// Protein group ordinal the row still points at
        group: usize,
    },
}

fn row_context(row: &Option<usize>) -> String {
    match row {
        Some(idx) => format!(" at row {idx}"),
        None => String::new(),
    }
}
