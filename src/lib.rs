//! # dtafilter - DTASelect Filter Report Round-Tripping
//!
//! `dtafilter` parses DTASelect "filter" proteomics reports into editable
//! tables and serializes them back to the exact textual layout the format
//! expects. A report interleaves three kinds of content: free-form header
//! lines, a two-level table of protein records each followed by its peptide
//! records, and free-form trailing summary lines.
//!
//! ## Key Properties
//!
//! - **Lossless round trip**: parsing and re-serializing an unedited report
//!   reproduces it byte for byte (modulo a normalized line terminator).
//! - **Explicit hierarchy**: the peptide-to-protein relation implied by line
//!   order becomes an explicit protein-group ordinal on every row, so caller
//!   edits that break it are detected instead of silently corrupting output.
//! - **Strict classification**: a line inside the table region that matches
//!   no known row shape is a typed error with its line number, never a
//!   silently skipped or truncated row.
//!
//! ## Quick Start
//!
//! ```rust
//! use dtafilter::{from_filter_text, to_filter_text};
//!
//! let report = "DTASelect v2.1.12\n\
//!     Locus\tSequence Count\n\
//!     Unique\tFileName\tXCorr\n\
//!     sp|P12345|ALBU\t2\n\
//!     *\tsample.02001.02001.2\t3.9\n\
//!     \tsample.02044.02044.3\t2.8\n\
//!     \tProteins\t1\n";
//!
//! let mut doc = from_filter_text(report)?;
//! assert_eq!(doc.protein_table.len(), 1);
//! assert_eq!(doc.peptide_table.len(), 2);
//!
//! // Edit the tables in place, then serialize.
//! doc.protein_table.set(0, "Sequence Count", "3")?;
//! let out = to_filter_text(&doc)?;
//! assert!(out.contains("sp|P12345|ALBU\t3\n"));
//! # Ok::<(), dtafilter::FilterError>(())
//! ```
//!
//! ## Editing Tables
//!
//! [`Table`] exposes ordered rows and an ordered column schema with
//! add/remove/rename/move operations; the synthesized schema rows in the
//! output always reflect the live schema, so column edits propagate. Callers
//! that remove protein rows are responsible for their peptides: the writer
//! either rejects dangling peptide rows (the default) or drops them with a
//! warning, per [`WriteOptions`].

pub mod classify;
pub mod document;
pub mod error;
pub mod reader;
pub mod scans;
pub mod table;
pub mod writer;

pub use document::FilterDocument;
pub use error::{FilterError, Result};
pub use reader::{from_filter_path, from_filter_reader, from_filter_text};
pub use scans::{merge_scan_identifiers, split_scan_identifiers};
pub use table::{Row, Table};
pub use writer::{
    to_filter_text, to_filter_text_with, to_filter_writer, DanglingPeptides, WriteOptions,
};
