//! Rectangular split table: one personal-best row followed by one row per
//! attempt, most recent first.
//!
//! Two placement rules coexist and are kept for output compatibility:
//!
//! - the personal-best row is placed **positionally**: PB split `i` goes
//!   under segment `i`;
//! - run rows are placed **by segment name**.
//!
//! If the segment list is ever reordered without reordering `PB_splits`
//! the same way, the personal-best row will show times under the wrong
//! columns while run rows stay correct.

use std::collections::HashMap;

use serde::Serialize;
use valruns_interchange::Segment;

use crate::codec;
use crate::cumulative;
use crate::error::CoreError;
use crate::reconstruct::ReconstructedRun;

/// Header of the label column.
pub const DATE_COLUMN: &str = "Date";

/// Label of the personal-best row.
pub const PERSONAL_BEST_LABEL: &str = "Personal Best";

/// Column schema: unique segment names in declaration order.
///
/// A name that appears on several segments gets a single column at its
/// first position.
#[derive(Debug, Clone)]
struct ColumnSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnSchema {
    fn from_segments(segments: &[Segment]) -> Self {
        let mut names = Vec::with_capacity(segments.len());
        let mut index = HashMap::with_capacity(segments.len());
        for segment in segments {
            if !index.contains_key(&segment.name) {
                index.insert(segment.name.clone(), names.len());
                names.push(segment.name.clone());
            }
        }
        ColumnSchema { names, index }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn blank_row(&self) -> Vec<String> {
        vec![String::new(); self.names.len()]
    }
}

/// What a row represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    PersonalBest,
    Run { attempt_id: i64 },
}

/// One table row. `cells` is aligned with [`SplitTable::columns`]; missing
/// values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub label: String,
    #[serde(flatten)]
    pub kind: RowKind,
    pub cells: Vec<String>,
}

impl TableRow {
    /// Cell under the given segment column, if that column exists.
    pub fn cell<'a>(&'a self, table: &SplitTable, column: &str) -> Option<&'a str> {
        let position = table.columns.iter().position(|c| c == column)?;
        self.cells.get(position).map(String::as_str)
    }
}

/// The assembled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitTable {
    /// Segment columns, without the label column.
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl SplitTable {
    /// Full header row: the label column followed by every segment column.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Rows for attempts only, without the personal-best row.
    pub fn run_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows
            .iter()
            .filter(|row| matches!(row.kind, RowKind::Run { .. }))
    }
}

/// Build the personal-best row: each PB split is decoded and re-encoded
/// (PB times are supplied already cumulative) and placed by position.
fn personal_best_row(
    schema: &ColumnSchema,
    segments: &[Segment],
    pb_splits: &[String],
) -> Result<TableRow, CoreError> {
    let readable = pb_splits
        .iter()
        .enumerate()
        .map(|(index, split)| {
            codec::reformat(split).map_err(|source| CoreError::PersonalBest { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut cells = schema.blank_row();
    for (i, segment) in segments.iter().enumerate() {
        if let Some(position) = schema.position(&segment.name) {
            cells[position] = readable.get(i).cloned().unwrap_or_default();
        }
    }

    Ok(TableRow {
        label: PERSONAL_BEST_LABEL.to_string(),
        kind: RowKind::PersonalBest,
        cells,
    })
}

/// Build a run row: segment times are decoded, accumulated, re-encoded
/// and placed by segment name.
fn run_row(schema: &ColumnSchema, run: &ReconstructedRun) -> Result<TableRow, CoreError> {
    let millis = run
        .splits()
        .map(|(segment, time)| {
            codec::decode(time).map_err(|source| CoreError::RunSplit {
                attempt_id: run.attempt_id,
                segment: segment.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut cells = schema.blank_row();
    for (name, total) in run.split_names.iter().zip(cumulative::aggregate(&millis)) {
        match schema.position(name) {
            Some(position) => cells[position] = codec::encode(total),
            None => tracing::warn!(
                attempt_id = run.attempt_id,
                segment = %name,
                "split references a segment outside the column schema"
            ),
        }
    }

    Ok(TableRow {
        label: run.run_start.clone(),
        kind: RowKind::Run {
            attempt_id: run.attempt_id,
        },
        cells,
    })
}

/// Assemble the table from segments, personal-best splits and
/// reconstructed runs given in provider order.
///
/// Runs are emitted most recent first (provider order reversed; equal
/// start timestamps keep their relative order, reversed once). Runs with
/// no splits are skipped. The first undecodable time aborts the build.
pub fn assemble(
    segments: &[Segment],
    pb_splits: &[String],
    runs: &[ReconstructedRun],
) -> Result<SplitTable, CoreError> {
    let schema = ColumnSchema::from_segments(segments);

    let mut rows = Vec::with_capacity(runs.len() + 1);
    rows.push(personal_best_row(&schema, segments, pb_splits)?);
    for run in runs.iter().rev().filter(|run| !run.is_empty()) {
        rows.push(run_row(&schema, run)?);
    }

    Ok(SplitTable {
        columns: schema.names,
        rows,
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
