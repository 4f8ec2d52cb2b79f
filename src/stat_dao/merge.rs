// Merging of per-partition scan results.

use crate::models::AgentStat;

/// Concatenates partitions in iteration order. Store-native order is kept as is.
pub fn flatten(partitions: Vec<Vec<AgentStat>>) -> Vec<AgentStat> {
    let total = partitions.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for each in partitions {
        merged.extend(each);
    }
    merged
}

/// Concatenates partitions, then stable-sorts ascending by timestamp.
pub fn flatten_sorted(partitions: Vec<Vec<AgentStat>>) -> Vec<AgentStat> {
    let mut merged = flatten(partitions);
    merged.sort_by_key(|s| s.timestamp);
    merged
}
