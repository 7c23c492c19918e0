//! Typed structs representing the splits document.
//!
//! Field names follow Rust conventions; the wire names (`GameName`,
//! `SegmentHistory`, `AttemptID`, ...) are only known to the
//! deserializer.

use serde::{Deserialize, Serialize};

/// Top-level field names, in the order they are validated.
pub const TOP_LEVEL_FIELDS: [&str; 6] = [
    "GameName",
    "CategoryName",
    "AttemptCount",
    "Segments",
    "Runs",
    "PB_splits",
];

/// A validated splits document for one game/category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitsDocument {
    pub game_name: String,
    pub category_name: String,
    /// Attempt counter as reported by the timer. Not derived from `runs`.
    pub attempt_count: u64,
    /// Segments in declaration order.
    pub segments: Vec<Segment>,
    /// Attempts flattened from the nested `Runs` lists, in provider order.
    pub runs: Vec<Attempt>,
    /// Personal-best split strings, positionally aligned to `segments`.
    pub pb_splits: Vec<String>,
}

// ── Segment ─────────────────────────────────────────────────────────

/// One named checkpoint of a run (a level, a boss, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    /// Timing observations for this segment. Order is not guaranteed to
    /// follow attempt chronology.
    pub history: Vec<HistoryEntry>,
}

/// A single timing observation linking a segment to an attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub attempt_id: i64,
    /// Elapsed segment time in clock format (`H:MM:SS[.fff]`), unparsed.
    pub game_time: String,
}

// ── Attempt ─────────────────────────────────────────────────────────

/// One playthrough attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attempt {
    pub attempt_id: i64,
    /// Start timestamp exactly as exported; displayed verbatim.
    pub run_start: String,
}
