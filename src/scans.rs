//! # Scan Identifier Helpers
//!
//! DTASelect encodes four facts in the peptide `FileName` column as one
//! dot-joined key: `run.lowscan.highscan.charge` (for example
//! `sample.02001.02001.2`). These helpers split that key into separate
//! `LowScan`/`HighScan`/`Charge` columns for editing and merge them back
//! before writing. They are opt-in: the core reader and writer treat
//! `FileName` as an opaque field.
//!
//! `split_scan_identifiers` followed by `merge_scan_identifiers` restores
//! the table exactly.

use crate::error::{FilterError, Result};
use crate::table::Table;

/// Peptide column holding the dot-joined scan key.
pub const FILE_NAME: &str = "FileName";
/// First scan number column added by [`split_scan_identifiers`].
pub const LOW_SCAN: &str = "LowScan";
/// Last scan number column added by [`split_scan_identifiers`].
pub const HIGH_SCAN: &str = "HighScan";
/// Precursor charge column added by [`split_scan_identifiers`].
pub const CHARGE: &str = "Charge";

/// Split every row's `FileName` value into the run base name (kept in place)
/// plus appended `LowScan`, `HighScan` and `Charge` columns.
///
/// The three trailing components are taken from the right, so dots inside
/// the run name survive. Fails with a schema error if the `FileName` column
/// is missing, one of the scan columns already exists, or a value has fewer
/// than four components; the table is left untouched on failure.
pub fn split_scan_identifiers(table: &mut Table) -> Result<()> {
    let file_col = require_column(table, FILE_NAME)?;
    for scan_col in [LOW_SCAN, HIGH_SCAN, CHARGE] {
        if table.column_index(scan_col).is_some() {
            return Err(FilterError::Schema {
                table: table.name().to_string(),
                row: None,
                reason: format!("duplicate column name: {scan_col:?}"),
            });
        }
    }

    // Parse everything before mutating anything.
    let mut parts: Vec<[String; 4]> = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().iter().enumerate() {
        let value = &row.values()[file_col];
        // rsplitn yields charge, high, low, then the remaining base name.
        let mut rev = value.rsplitn(4, '.');
        match (rev.next(), rev.next(), rev.next(), rev.next()) {
            (Some(charge), Some(high), Some(low), Some(base)) => parts.push([
                base.to_string(),
                low.to_string(),
                high.to_string(),
                charge.to_string(),
            ]),
            _ => {
                return Err(FilterError::Schema {
                    table: table.name().to_string(),
                    row: Some(idx),
                    reason: format!(
                        "{FILE_NAME} value {value:?} does not match base.lowscan.highscan.charge"
                    ),
                });
            }
        }
    }

    table.add_column(LOW_SCAN, "")?;
    table.add_column(HIGH_SCAN, "")?;
    table.add_column(CHARGE, "")?;
    for (idx, [base, low, high, charge]) in parts.into_iter().enumerate() {
        table.set(idx, FILE_NAME, base)?;
        table.set(idx, LOW_SCAN, low)?;
        table.set(idx, HIGH_SCAN, high)?;
        table.set(idx, CHARGE, charge)?;
    }
    Ok(())
}

/// Rejoin `FileName`, `LowScan`, `HighScan` and `Charge` into the dot-joined
/// key at `FileName`'s current position and remove the three scan columns.
pub fn merge_scan_identifiers(table: &mut Table) -> Result<()> {
    let file_col = require_column(table, FILE_NAME)?;
    let low_col = require_column(table, LOW_SCAN)?;
    let high_col = require_column(table, HIGH_SCAN)?;
    let charge_col = require_column(table, CHARGE)?;

    let merged: Vec<String> = table
        .rows()
        .iter()
        .map(|row| {
            let v = row.values();
            format!(
                "{}.{}.{}.{}",
                v[file_col], v[low_col], v[high_col], v[charge_col]
            )
        })
        .collect();

    for (idx, value) in merged.into_iter().enumerate() {
        table.set(idx, FILE_NAME, value)?;
    }
    table.remove_column(LOW_SCAN)?;
    table.remove_column(HIGH_SCAN)?;
    table.remove_column(CHARGE)?;
    Ok(())
}

fn require_column(table: &Table, column: &str) -> Result<usize> {
    table.column_index(column).ok_or_else(|| FilterError::Schema {
        table: table.name().to_string(),
        row: None,
        reason: format!("no such column: {column:?}"),
    })
}
