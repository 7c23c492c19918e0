//! Running totals over per-segment times.

/// Element `i` of the result is the sum of `segment_times[0..=i]`.
///
/// Sums saturate at `u64::MAX` instead of wrapping.
pub fn aggregate(segment_times: &[u64]) -> Vec<u64> {
    segment_times
        .iter()
        .scan(0u64, |total, &time| {
            *total = total.saturating_add(time);
            Some(*total)
        })
        .collect()
}
