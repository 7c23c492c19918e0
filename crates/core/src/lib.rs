//! valruns-core: split-time transformation pipeline.
//!
//! Turns a validated [`SplitsDocument`] into a rectangular
//! [`SplitTable`] ready for rendering:
//!
//! 1. [`reconstruct`] rebuilds per-attempt split sequences from the
//!    segment-first history log;
//! 2. [`codec`] decodes the clock strings into milliseconds;
//! 3. [`cumulative`] turns segment times into running totals;
//! 4. [`codec`] encodes them back for display;
//! 5. [`table`] places everything under the segment columns.
//!
//! The pipeline is a pure function of the document. It performs no I/O
//! and fails fast: a single malformed time aborts the whole build.

pub mod codec;
pub mod cumulative;
pub mod error;
pub mod reconstruct;
pub mod table;

use serde::Serialize;
use valruns_interchange::SplitsDocument;

pub use error::{CoreError, TimeError};
pub use reconstruct::ReconstructedRun;
pub use table::{RowKind, SplitTable, TableRow, DATE_COLUMN, PERSONAL_BEST_LABEL};

/// Everything the dashboard shows for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// `"<game> <category>"`.
    pub title: String,
    pub game_name: String,
    pub category_name: String,
    pub attempt_count: u64,
    pub table: SplitTable,
}

/// Run the full pipeline and return the split table.
pub fn build_table(doc: &SplitsDocument) -> Result<SplitTable, CoreError> {
    let runs = reconstruct::reconstruct_all(doc);
    let table = table::assemble(&doc.segments, &doc.pb_splits, &runs)?;
    tracing::debug!(
        columns = table.columns.len(),
        rows = table.rows.len(),
        "assembled split table"
    );
    Ok(table)
}

/// Run the full pipeline and attach the document header fields.
pub fn build_dashboard(doc: &SplitsDocument) -> Result<Dashboard, CoreError> {
    let table = build_table(doc)?;
    Ok(Dashboard {
        title: format!("{} {}", doc.game_name, doc.category_name),
        game_name: doc.game_name.clone(),
        category_name: doc.category_name.clone(),
        attempt_count: doc.attempt_count,
        table,
    })
}
