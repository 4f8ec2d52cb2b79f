// Range-scan store contract. The read path opens a bounded scan against one tier; the store
// may fan it out over several physical partitions and hands back one cursor per partition.

pub mod mapper;

use std::fmt;
use std::future::Future;

use bytes::Bytes;

use crate::error::ScanError;
use crate::models::AgentStat;
use crate::row_key::ScanBounds;

pub use mapper::{AgentStatMapper, RowMapper};

/// Column family holding agent stat cells.
pub const AGENT_STAT_CF_STATISTICS: &str = "S";

/// Diagnostic id attached to every agent stat scan.
pub const AGENT_STAT_SCAN_ID: &str = "AgentStatScan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Per-sample rows at native collection granularity.
    Raw,
    /// Downsampled rows, one per aggregation interval.
    Aggregated,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Raw => f.write_str("raw"),
            Tier::Aggregated => f.write_str("aggregated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub tier: Tier,
    pub bounds: ScanBounds,
    pub column_family: &'static str,
    /// Rows buffered per round trip. Performance hint only.
    pub caching: u32,
    pub scan_id: Option<&'static str>,
}

/// One stored row. A row may hold several cells, and a cell may hold several samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// Original (non-distributed) row key.
    pub key: Bytes,
    pub cells: Vec<Bytes>,
}

impl StoredRow {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Store-native ordered rows of one physical partition.
pub trait RowCursor: Send {
    /// Next row, or `None` once the partition is exhausted.
    fn next_row(&mut self) -> impl Future<Output = Result<Option<StoredRow>, ScanError>> + Send;
}

pub trait RangeScanner: Send + Sync {
    type Cursor: RowCursor;

    /// Opens the scan. The number of cursors is up to the store.
    fn open(
        &self,
        request: &ScanRequest,
    ) -> impl Future<Output = Result<Vec<Self::Cursor>, ScanError>> + Send;
}

/// Runs `request` to completion and decodes every row, one list per partition.
pub async fn find<S, M>(
    scanner: &S,
    request: &ScanRequest,
    mapper: &M,
) -> Result<Vec<Vec<AgentStat>>, ScanError>
where
    S: RangeScanner + ?Sized,
    M: RowMapper + ?Sized,
{
    let cursors = scanner.open(request).await?;
    let mut partitions = Vec::with_capacity(cursors.len());
    for mut cursor in cursors {
        let mut stats = Vec::new();
        let mut row_num = 0;
        while let Some(row) = cursor.next_row().await? {
            stats.extend(mapper.map_row(&row, row_num)?);
            row_num += 1;
        }
        partitions.push(stats);
    }
    Ok(partitions)
}
