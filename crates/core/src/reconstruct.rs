//! Per-attempt split sequences rebuilt from segment histories.
//!
//! The document stores timings segment-first: each segment carries the
//! history of every attempt that reached it. Reconstruction inverts that
//! into attempt-first sequences, walking segments in declaration order.

use std::collections::HashMap;

use serde::Serialize;
use valruns_interchange::{Attempt, Segment, SplitsDocument};

/// The ordered splits recorded for one attempt.
///
/// `split_names` and `game_times` always have the same length. They are
/// shorter than the segment list when the attempt was reset early, and
/// can be longer when a segment history holds duplicate entries for the
/// same attempt (all of them are kept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconstructedRun {
    pub attempt_id: i64,
    pub run_start: String,
    pub split_names: Vec<String>,
    /// Raw elapsed segment times, not yet decoded.
    pub game_times: Vec<String>,
}

impl ReconstructedRun {
    fn new(attempt: &Attempt) -> Self {
        ReconstructedRun {
            attempt_id: attempt.attempt_id,
            run_start: attempt.run_start.clone(),
            split_names: Vec::new(),
            game_times: Vec::new(),
        }
    }

    fn push(&mut self, name: &str, game_time: &str) {
        self.split_names.push(name.to_string());
        self.game_times.push(game_time.to_string());
    }

    /// An attempt with no recorded split at all.
    pub fn is_empty(&self) -> bool {
        self.split_names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.split_names.len()
    }

    /// `(segment name, raw time)` pairs in order.
    pub fn splits(&self) -> impl Iterator<Item = (&str, &str)> {
        self.split_names
            .iter()
            .zip(&self.game_times)
            .map(|(name, time)| (name.as_str(), time.as_str()))
    }
}

/// Rebuild the split sequence of a single attempt.
pub fn reconstruct(segments: &[Segment], attempt: &Attempt) -> ReconstructedRun {
    let mut run = ReconstructedRun::new(attempt);
    for segment in segments {
        for entry in &segment.history {
            if entry.attempt_id == attempt.attempt_id {
                run.push(&segment.name, &entry.game_time);
            }
        }
    }
    run
}

/// Rebuild every attempt of the document, in provider order, dropping
/// attempts that have no recorded split.
///
/// Equivalent to calling [`reconstruct`] per attempt, but indexes the
/// histories once instead of rescanning them for every attempt.
pub fn reconstruct_all(doc: &SplitsDocument) -> Vec<ReconstructedRun> {
    let mut by_attempt: HashMap<i64, Vec<(&str, &str)>> = HashMap::new();
    for segment in &doc.segments {
        for entry in &segment.history {
            by_attempt
                .entry(entry.attempt_id)
                .or_default()
                .push((segment.name.as_str(), entry.game_time.as_str()));
        }
    }

    let runs: Vec<ReconstructedRun> = doc
        .runs
        .iter()
        .filter_map(|attempt| {
            let splits = by_attempt.get(&attempt.attempt_id)?;
            let mut run = ReconstructedRun::new(attempt);
            for (name, time) in splits {
                run.push(name, time);
            }
            Some(run)
        })
        .collect();

    tracing::debug!(
        attempts = doc.runs.len(),
        kept = runs.len(),
        "reconstructed runs from segment histories"
    );
    runs
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use valruns_interchange::HistoryEntry;

    fn entry(attempt_id: i64, time: &str) -> HistoryEntry {
        HistoryEntry {
            attempt_id,
            game_time: time.to_string(),
        }
    }

    fn attempt(attempt_id: i64) -> Attempt {
        Attempt {
            attempt_id,
            run_start: format!("2024-01-0{} 10:00:00", attempt_id),
        }
    }

    fn segments() -> Vec<Segment> {
        vec![
            Segment {
                name: "A".to_string(),
                history: vec![entry(1, "00:00:01")],
            },
            Segment {
                name: "B".to_string(),
                history: vec![entry(1, "00:00:02"), entry(2, "00:00:03")],
            },
        ]
    }

    fn document(attempt_ids: &[i64]) -> SplitsDocument {
        SplitsDocument {
            game_name: "Game".to_string(),
            category_name: "Any%".to_string(),
            attempt_count: attempt_ids.len() as u64,
            segments: segments(),
            runs: attempt_ids.iter().map(|id| attempt(*id)).collect(),
            pb_splits: vec![],
        }
    }

    #[test]
    fn full_run_follows_segment_order() {
        let run = reconstruct(&segments(), &attempt(1));
        assert_eq!(run.split_names, vec!["A", "B"]);
        assert_eq!(run.game_times, vec!["00:00:01", "00:00:02"]);
        assert_eq!(run.run_start, "2024-01-01 10:00:00");
    }

    #[test]
    fn partial_run_is_shorter() {
        let run = reconstruct(&segments(), &attempt(2));
        assert_eq!(run.split_names, vec!["B"]);
        assert_eq!(run.game_times, vec!["00:00:03"]);
        assert_eq!(run.len(), 1);
    }

    #[test]
    fn unknown_attempt_is_empty() {
        let run = reconstruct(&segments(), &attempt(3));
        assert!(run.is_empty());
        assert!(run.game_times.is_empty());
    }

    #[test]
    fn duplicate_entries_are_all_kept() {
        let mut segs = segments();
        segs[0].history.push(entry(1, "00:00:04"));
        let run = reconstruct(&segs, &attempt(1));
        assert_eq!(run.split_names, vec!["A", "A", "B"]);
        assert_eq!(run.game_times, vec!["00:00:01", "00:00:04", "00:00:02"]);
    }

    #[test]
    fn history_order_within_segment_does_not_matter_across_segments() {
        let mut segs = segments();
        segs[1].history.reverse();
        let run = reconstruct(&segs, &attempt(1));
        assert_eq!(run.split_names, vec!["A", "B"]);
    }

    #[test]
    fn reconstruct_all_drops_empty_attempts() {
        let runs = reconstruct_all(&document(&[1, 2, 3]));
        let ids: Vec<i64> = runs.iter().map(|r| r.attempt_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn reconstruct_all_matches_single_reconstruction() {
        let mut doc = document(&[2, 1]);
        doc.segments[0].history.push(entry(1, "00:00:09"));
        for (run, attempt) in reconstruct_all(&doc).iter().zip(&doc.runs) {
            assert_eq!(run, &reconstruct(&doc.segments, attempt));
        }
    }

    #[test]
    fn splits_pairs_names_with_times() {
        let run = reconstruct(&segments(), &attempt(1));
        let pairs: Vec<(&str, &str)> = run.splits().collect();
        assert_eq!(pairs, vec![("A", "00:00:01"), ("B", "00:00:02")]);
    }
}
