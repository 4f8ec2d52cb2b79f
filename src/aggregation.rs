// Downsampling of raw agent stats into fixed-interval summaries.
// Used by the aggregated read path to synthesize rows for periods the aggregated tier lacks.

use crate::models::{AgentStat, StatPayload};

/// Reduces time-ordered samples into one summary per `interval_ms` bucket, time-ordered.
pub trait StatAggregator: Send + Sync {
    fn aggregate(&self, stats: &[AgentStat], interval_ms: i64) -> Vec<AgentStat>;
}

/// Buckets aligned to multiples of the interval. Gauges are averaged, capacities take the max,
/// cumulative GC counters take the last value of the bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketAggregator;

impl StatAggregator for BucketAggregator {
    fn aggregate(&self, stats: &[AgentStat], interval_ms: i64) -> Vec<AgentStat> {
        if stats.is_empty() || interval_ms <= 0 {
            return stats.to_vec();
        }

        let mut out = Vec::new();
        let mut bucket: Vec<&AgentStat> = Vec::new();
        let mut bucket_start = bucket_start_of(stats[0].timestamp, interval_ms);

        for stat in stats {
            let start = bucket_start_of(stat.timestamp, interval_ms);
            if start != bucket_start {
                out.extend(aggregate_bucket(&bucket, bucket_start, interval_ms));
                bucket.clear();
                bucket_start = start;
            }
            bucket.push(stat);
        }
        out.extend(aggregate_bucket(&bucket, bucket_start, interval_ms));
        out
    }
}

fn bucket_start_of(timestamp: i64, interval_ms: i64) -> i64 {
    timestamp.div_euclid(interval_ms) * interval_ms
}

/// One summary for a bucket; `None` for an empty bucket.
pub fn aggregate_bucket(
    stats: &[&AgentStat],
    bucket_start: i64,
    interval_ms: i64,
) -> Option<AgentStat> {
    let last = stats.last()?;
    let payloads: Vec<&StatPayload> = stats.iter().map(|s| &s.payload).collect();

    let payload = StatPayload {
        jvm_cpu_usage: mean_f64(&payloads.iter().map(|p| p.jvm_cpu_usage).collect::<Vec<_>>()),
        system_cpu_usage: mean_f64(
            &payloads
                .iter()
                .map(|p| p.system_cpu_usage)
                .collect::<Vec<_>>(),
        ),
        heap_used: mean_i64(&payloads.iter().map(|p| p.heap_used).collect::<Vec<_>>()),
        heap_max: payloads.iter().map(|p| p.heap_max).max().unwrap_or(0),
        non_heap_used: mean_i64(&payloads.iter().map(|p| p.non_heap_used).collect::<Vec<_>>()),
        non_heap_max: payloads.iter().map(|p| p.non_heap_max).max().unwrap_or(0),
        gc_old_count: last.payload.gc_old_count,
        gc_old_time: last.payload.gc_old_time,
    };

    Some(AgentStat {
        agent_id: last.agent_id.clone(),
        timestamp: bucket_start,
        collect_interval: interval_ms,
        payload,
    })
}

fn mean_f64(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / (v.len() as f64)
}

fn mean_i64(v: &[i64]) -> i64 {
    if v.is_empty() {
        return 0;
    }
    v.iter().sum::<i64>() / (v.len() as i64)
}
