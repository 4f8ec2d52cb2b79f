// Agent stat read path over the raw and aggregated tiers.
// Aggregated reads detect holes in the aggregated tier and fill them from raw samples on demand.

pub mod exists;
pub mod gaps;
pub mod merge;

use futures_util::future::try_join_all;
use tracing::{debug, instrument};

use crate::aggregation::{BucketAggregator, StatAggregator};
use crate::error::StatError;
use crate::models::{AgentStat, Range};
use crate::row_key::{self, ScanBounds};
use crate::scan::{
    self, AGENT_STAT_CF_STATISTICS, AGENT_STAT_SCAN_ID, AgentStatMapper, RangeScanner, RowMapper,
    ScanRequest, Tier,
};

/// Default spacing of aggregated-tier rows (ms).
pub const AGGR_SAMPLE_INTERVAL_MS: i64 = 60_000;

/// Default rows buffered per scan round trip.
pub const DEFAULT_SCAN_CACHE_SIZE: u32 = 256;

/// Read-only settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDaoConfig {
    pub scan_cache_size: u32,
    pub aggr_sample_interval_ms: i64,
}

impl Default for StatDaoConfig {
    fn default() -> Self {
        Self {
            scan_cache_size: DEFAULT_SCAN_CACHE_SIZE,
            aggr_sample_interval_ms: AGGR_SAMPLE_INTERVAL_MS,
        }
    }
}

pub struct AgentStatDao<S, A = BucketAggregator, M = AgentStatMapper> {
    scanner: S,
    aggregator: A,
    mapper: M,
    config: StatDaoConfig,
}

impl<S: RangeScanner> AgentStatDao<S> {
    pub fn new(scanner: S, config: StatDaoConfig) -> Self {
        Self::with_parts(scanner, BucketAggregator, AgentStatMapper, config)
    }
}

impl<S, A, M> AgentStatDao<S, A, M>
where
    S: RangeScanner,
    A: StatAggregator,
    M: RowMapper,
{
    pub fn with_parts(scanner: S, aggregator: A, mapper: M, config: StatDaoConfig) -> Self {
        Self {
            scanner,
            aggregator,
            mapper,
            config,
        }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Raw samples in `range`, in store-native order (not re-sorted).
    #[instrument(skip(self), fields(repo = "agent_stat", operation = "get_agent_stat_list"))]
    pub async fn get_agent_stat_list(
        &self,
        agent_id: Option<&str>,
        range: Option<&Range>,
    ) -> Result<Vec<AgentStat>, StatError> {
        let (agent_id, range) = require_args(agent_id, range)?;
        debug!(agent_id, %range, "scan agent stat");
        self.get_agent_stat_list_from_raw(agent_id, range).await
    }

    /// Aggregated samples in `range`, with holes backfilled from raw samples.
    ///
    /// The rows read from the aggregated tier come first, ascending by timestamp; synthesized
    /// rows follow, one run per gap, in gap order. A failed backfill fails the whole call.
    #[instrument(
        skip(self),
        fields(repo = "agent_stat", operation = "get_aggregated_agent_stat_list")
    )]
    pub async fn get_aggregated_agent_stat_list(
        &self,
        agent_id: Option<&str>,
        range: Option<&Range>,
    ) -> Result<Vec<AgentStat>, StatError> {
        let (agent_id, range) = require_args(agent_id, range)?;
        debug!(agent_id, %range, "scan aggregated agent stat");

        let request = self.create_scan(
            Tier::Aggregated,
            row_key::bounds_for(agent_id, range)?,
            self.config.scan_cache_size,
        );
        let partitions = scan::find(&self.scanner, &request, &self.mapper).await?;
        let mut merged = merge::flatten_sorted(partitions);

        let interval = self.config.aggr_sample_interval_ms;
        let missing = gaps::detect_gaps(&merged, range, interval);
        if missing.is_empty() {
            return Ok(merged);
        }
        debug!(agent_id, gaps = missing.len(), "aggregated tier has gaps");

        let stored: Vec<i64> = merged.iter().map(|s| s.timestamp).collect();
        let backfills = try_join_all(
            missing
                .iter()
                .map(|gap| self.backfill(agent_id, gap, &stored)),
        )
        .await?;
        for filled in backfills {
            // A stored aggregated row wins over a synthesized one for the same bucket.
            merged.extend(
                filled
                    .into_iter()
                    .filter(|s| stored.binary_search(&s.timestamp).is_err()),
            );
        }
        Ok(merged)
    }

    /// Whether the first raw row the scan yields in `range` carries data. Reads at most one row.
    #[instrument(skip(self), fields(repo = "agent_stat", operation = "agent_stat_exists"))]
    pub async fn agent_stat_exists(
        &self,
        agent_id: Option<&str>,
        range: Option<&Range>,
    ) -> Result<bool, StatError> {
        let (agent_id, range) = require_args(agent_id, range)?;
        debug!(agent_id, %range, "checking for stat data existence");

        let request = self.create_scan(Tier::Raw, row_key::bounds_for(agent_id, range)?, 1);
        let cursors = self.scanner.open(&request).await?;
        Ok(exists::first_row_has_data(cursors, &self.mapper).await?)
    }

    async fn get_agent_stat_list_from_raw(
        &self,
        agent_id: &str,
        range: &Range,
    ) -> Result<Vec<AgentStat>, StatError> {
        let request = self.create_scan(
            Tier::Raw,
            row_key::bounds_for(agent_id, range)?,
            self.config.scan_cache_size,
        );
        let partitions = scan::find(&self.scanner, &request, &self.mapper).await?;
        Ok(merge::flatten(partitions))
    }

    /// Synthesized aggregated rows for one gap; empty when raw has nothing either.
    ///
    /// `stored` holds the ascending timestamps already read from the aggregated tier.
    async fn backfill(
        &self,
        agent_id: &str,
        gap: &Range,
        stored: &[i64],
    ) -> Result<Vec<AgentStat>, StatError> {
        debug!(agent_id, gap = %gap.pretty(), "aggregated tier doesn't have range");

        let Some(window) = raw_window(gap, stored) else {
            return Ok(Vec::new());
        };
        let mut raw = self.get_agent_stat_list_from_raw(agent_id, &window).await?;
        if raw.is_empty() {
            debug!(agent_id, gap = %gap.pretty(), "raw tier doesn't have range either");
            return Ok(Vec::new());
        }
        raw.sort_by_key(|s| s.timestamp);
        Ok(self
            .aggregator
            .aggregate(&raw, self.config.aggr_sample_interval_ms))
    }

    fn create_scan(&self, tier: Tier, bounds: ScanBounds, caching: u32) -> ScanRequest {
        let request = ScanRequest {
            tier,
            bounds,
            column_family: AGENT_STAT_CF_STATISTICS,
            caching,
            scan_id: Some(AGENT_STAT_SCAN_ID),
        };
        debug!(%tier, caching, "create scan");
        request
    }
}

/// Raw re-fetch window for `gap`. A gap opening at a stored row's timestamp starts just after
/// it; a gap opening at the requested `from` keeps its inclusive start.
fn raw_window(gap: &Range, stored: &[i64]) -> Option<Range> {
    if stored.binary_search(&gap.from()).is_err() {
        return Some(*gap);
    }
    Range::new(gap.from().checked_add(1)?, gap.to()).ok()
}

fn require_args<'a>(
    agent_id: Option<&'a str>,
    range: Option<&'a Range>,
) -> Result<(&'a str, &'a Range), StatError> {
    let agent_id =
        agent_id.ok_or_else(|| StatError::InvalidArgument("agentId must not be null".into()))?;
    let range = range.ok_or_else(|| StatError::InvalidArgument("range must not be null".into()))?;
    if agent_id.is_empty() {
        return Err(StatError::InvalidArgument(
            "agentId must not be empty".into(),
        ));
    }
    Ok((agent_id, range))
}
