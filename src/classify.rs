//! # Line Classification
//!
//! A DTASelect filter report has no self-describing grammar: whether a line
//! is header prose, a protein row, a peptide row, or the start of the
//! trailing summary has to be judged from its tab-split token shapes. This
//! module keeps those judgements as small, pure predicates so ambiguous
//! lines can be unit-tested in isolation.
//!
//! # Row shapes
//!
//! ```text
//! DTASelect v2.1.12                          header prose
//! Locus  Sequence Count  Spectrum Count ...  protein header row
//! Unique FileName  XCorr  DeltCN ...         peptide header row
//! PROT1  2  4  ...                           protein row (non-empty locus)
//! *  sample.02001.02001.2  3.9 ...           peptide row ('*' = unique)
//!    Proteins  Peptide IDs  Spectra          trailer start (summary block)
//! ```
//!
//! Peptide rows are visually indented under their protein: the first token
//! is empty, a `*` unique marker, or a redundancy count, never a locus name.

/// First-column label of the protein header row.
pub const PROTEIN_HEADER_LABEL: &str = "Locus";

/// First-column label of the peptide header row.
pub const PEPTIDE_HEADER_LABEL: &str = "Unique";

/// Second-column token that opens the trailing summary block.
pub const TRAILER_SENTINEL: &str = "Proteins";

/// Classification of a line inside the table region, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty line: not a legal row shape inside the table region.
    Blank,
    /// First line of the trailing summary block (`Proteins` sentinel).
    TrailerStart,
    /// A line with no tabs at all: prose, ends the table region.
    Prose,
    /// A peptide record attached to the current protein group.
    Peptide,
    /// A new protein record.
    Protein,
}

/// Split a report line into its tab-delimited fields.
pub fn split_row(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

/// The protein header row: `Locus` label plus at least one data column.
pub fn is_protein_header(fields: &[&str]) -> bool {
    fields.len() >= 2 && fields[0] == PROTEIN_HEADER_LABEL
}

/// The labelled peptide header row: `Unique` plus at least one data column.
pub fn is_peptide_header(fields: &[&str]) -> bool {
    fields.len() >= 2 && fields[0] == PEPTIDE_HEADER_LABEL
}

/// The first trailer line: summary columns with `Proteins` in second place.
pub fn is_trailer_start(fields: &[&str]) -> bool {
    fields.len() > 1 && fields[1] == TRAILER_SENTINEL
}

/// Peptide row shape: the leading token is empty, carries the `*` unique
/// marker, or is a plain redundancy count. A protein locus is none of these.
pub fn is_peptide_shaped(fields: &[&str]) -> bool {
    match fields.first() {
        Some(first) => {
            first.is_empty()
                || first.contains('*')
                || first.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Classify one tab-split line inside the table region.
///
/// Predicates run in fixed priority. The trailer sentinel is tested before
/// the peptide shape because the real trailer's first line is itself
/// peptide-shaped (its leading token is empty).
pub fn classify_table_line(fields: &[&str]) -> LineKind {
    if fields.len() == 1 && fields[0].is_empty() {
        LineKind::Blank
    } else if is_trailer_start(fields) {
        LineKind::TrailerStart
    } else if fields.len() == 1 {
        LineKind::Prose
    } else if is_peptide_shaped(fields) {
        LineKind::Peptide
    } else {
        LineKind::Protein
    }
}
