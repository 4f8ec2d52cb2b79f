// Shared test helpers: sample builders and an in-memory range scanner that counts its work.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agentstat::error::ScanError;
use agentstat::models::{AgentStat, StatPayload};
use agentstat::row_key;
use agentstat::scan::{AgentStatMapper, RangeScanner, RowCursor, ScanRequest, StoredRow, Tier};

pub const AGENT: &str = "agent-1";

pub fn stat(timestamp: i64, collect_interval: i64) -> AgentStat {
    AgentStat::new(AGENT, timestamp, collect_interval, StatPayload::default())
}

pub fn stat_with_cpu(timestamp: i64, collect_interval: i64, cpu: f64) -> AgentStat {
    AgentStat::new(
        AGENT,
        timestamp,
        collect_interval,
        StatPayload {
            jvm_cpu_usage: cpu,
            ..StatPayload::default()
        },
    )
}

pub fn row(stat: &AgentStat) -> StoredRow {
    StoredRow {
        key: row_key::encode(&stat.agent_id, stat.timestamp).unwrap(),
        cells: vec![AgentStatMapper::encode_cell(std::slice::from_ref(stat)).unwrap()],
    }
}

pub fn empty_row(timestamp: i64) -> StoredRow {
    StoredRow {
        key: row_key::encode(AGENT, timestamp).unwrap(),
        cells: vec![],
    }
}

pub fn timestamps(stats: &[AgentStat]) -> Vec<i64> {
    stats.iter().map(|s| s.timestamp).collect()
}

/// Partitioned rows per tier. `open` filters each partition by the request bounds and keeps
/// partition-local order, like a distributed store would.
#[derive(Default)]
pub struct FakeScanner {
    raw: Vec<Vec<StoredRow>>,
    aggregated: Vec<Vec<StoredRow>>,
    fail_tier: Option<Tier>,
    pub opens: AtomicUsize,
    pub materialized: Arc<AtomicUsize>,
    pub requests: Mutex<Vec<ScanRequest>>,
}

impl FakeScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(mut self, partitions: Vec<Vec<StoredRow>>) -> Self {
        self.raw = partitions;
        self
    }

    pub fn with_aggregated(mut self, partitions: Vec<Vec<StoredRow>>) -> Self {
        self.aggregated = partitions;
        self
    }

    pub fn failing(mut self, tier: Tier) -> Self {
        self.fail_tier = Some(tier);
        self
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn materialized_count(&self) -> usize {
        self.materialized.load(Ordering::SeqCst)
    }

    pub fn recorded_requests(&self) -> Vec<ScanRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct FakeCursor {
    rows: VecDeque<StoredRow>,
    materialized: Arc<AtomicUsize>,
}

impl RowCursor for FakeCursor {
    async fn next_row(&mut self) -> Result<Option<StoredRow>, ScanError> {
        let row = self.rows.pop_front();
        if row.is_some() {
            self.materialized.fetch_add(1, Ordering::SeqCst);
        }
        Ok(row)
    }
}

impl RangeScanner for FakeScanner {
    type Cursor = FakeCursor;

    async fn open(&self, request: &ScanRequest) -> Result<Vec<FakeCursor>, ScanError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_tier == Some(request.tier) {
            return Err(ScanError::Database(sqlx::Error::Protocol(format!(
                "{} tier down",
                request.tier
            ))));
        }
        let partitions = match request.tier {
            Tier::Raw => &self.raw,
            Tier::Aggregated => &self.aggregated,
        };
        Ok(partitions
            .iter()
            .map(|rows| FakeCursor {
                rows: rows
                    .iter()
                    .filter(|r| {
                        r.key.as_ref() >= request.bounds.start.as_ref()
                            && r.key.as_ref() < request.bounds.stop.as_ref()
                    })
                    .cloned()
                    .collect(),
                materialized: self.materialized.clone(),
            })
            .collect())
    }
}
