//! # Filter Document
//!
//! The four artifacts a filter report decomposes into. The reader produces a
//! [`FilterDocument`], the caller edits the tables in place, and the writer
//! consumes it read-only. There is no persistence beyond the report text
//! itself; the JSON round trip exists for callers that want to stash an
//! edited document between sessions.

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A parsed filter report: verbatim header text, the two record tables, and
/// verbatim trailing summary text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDocument {
    /// Free-form lines preceding the table, preserved verbatim. Never
    /// contains the schema rows: the writer re-synthesizes those from the
    /// live column schemas.
    pub header_lines: Vec<String>,

    /// Protein records, in source order.
    pub protein_table: Table,

    /// Peptide records, in source order, each owned by a protein group.
    pub peptide_table: Table,

    /// Free-form lines following the table, preserved verbatim.
    pub trailer_lines: Vec<String>,
}

impl FilterDocument {
    /// Serialize the document to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize a document from JSON.
    ///
    /// Deserialized tables are not trusted: the writer re-validates schema
    /// consistency before emitting anything.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
