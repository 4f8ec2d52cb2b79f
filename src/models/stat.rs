// One agent stat sample. Raw-tier rows are at native collection granularity;
// aggregated-tier rows are one per AGGR sample interval.

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

/// Metric values carried by a sample. The read path never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct StatPayload {
    pub jvm_cpu_usage: f64,
    pub system_cpu_usage: f64,
    pub heap_used: i64,
    pub heap_max: i64,
    pub non_heap_used: i64,
    pub non_heap_max: i64,
    /// Cumulative since agent start.
    pub gc_old_count: i64,
    /// Cumulative since agent start (ms).
    pub gc_old_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SchemaRead, SchemaWrite)]
#[serde(rename_all = "camelCase")]
pub struct AgentStat {
    pub agent_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Sampling period of this record (ms).
    pub collect_interval: i64,
    pub payload: StatPayload,
}

impl AgentStat {
    pub fn new(
        agent_id: impl Into<String>,
        timestamp: i64,
        collect_interval: i64,
        payload: StatPayload,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            timestamp,
            collect_interval,
            payload,
        }
    }
}
