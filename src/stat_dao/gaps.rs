// Hole detection over the aggregated tier.

use crate::models::{AgentStat, Range};

/// Finds sub-ranges of `range` that `stats` (ascending by timestamp) leave uncovered.
///
/// A hole is reported only when consecutive samples are more than two intervals apart, so
/// normal collection jitter does not trigger a backfill. Gaps come back in time order.
pub fn detect_gaps(stats: &[AgentStat], range: &Range, interval_ms: i64) -> Vec<Range> {
    let tolerance = interval_ms.saturating_mul(2);
    let mut gaps = Vec::new();
    let mut last = range.from();

    for stat in stats {
        if last.saturating_add(tolerance) < stat.timestamp {
            // A collect interval wider than the hole leaves nothing to fill.
            if let Ok(gap) = Range::new(last, stat.timestamp - stat.collect_interval) {
                gaps.push(gap);
            }
        }
        last = stat.timestamp;
    }

    if last.saturating_add(tolerance) < range.to()
        && let Ok(gap) = Range::new(last, range.to())
    {
        gaps.push(gap);
    }

    gaps
}
