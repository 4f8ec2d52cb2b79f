// SQLite-backed range-scan store. One key/value table per tier, keys hash-prefix distributed.
// Uses sqlx for async + connection pooling. Cells are versioned wincode blobs (see scan::mapper).

mod cursor;

pub use cursor::SqliteCursor;

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, instrument};

use crate::error::{ScanError, StatError};
use crate::models::AgentStat;
use crate::row_key::{self, distributor::HashPrefixDistributor};
use crate::scan::{AGENT_STAT_CF_STATISTICS, AgentStatMapper, RangeScanner, ScanRequest, Tier};

pub struct SqliteStatStore {
    pool: SqlitePool,
    distributor: HashPrefixDistributor,
}

impl SqliteStatStore {
    /// Connect to SQLite at `path`, create parent dir and DB if missing, enable WAL + pragmas.
    pub async fn connect(
        path: &str,
        max_pool_size: u32,
        distributor: HashPrefixDistributor,
    ) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool, distributor })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        for tier in [Tier::Raw, Tier::Aggregated] {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    row_key BLOB PRIMARY KEY,
                    family TEXT NOT NULL,
                    data BLOB NOT NULL
                )",
                table_name(tier)
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Writes one row per sample under the agent stat column family. Replaces rows with the same key.
    #[instrument(skip(self, stats), fields(repo = "agent_stat_store", operation = "put_stats", stats_count = stats.len()))]
    pub async fn put_stats(
        &self,
        tier: Tier,
        agent_id: &str,
        stats: &[AgentStat],
    ) -> Result<(), StatError> {
        if stats.is_empty() {
            return Ok(());
        }
        let sql = format!(
            "INSERT OR REPLACE INTO {} (row_key, family, data) VALUES ($1, $2, $3)",
            table_name(tier)
        );
        let mut tx = self.pool.begin().await.map_err(ScanError::from)?;
        for stat in stats {
            let key = row_key::encode(agent_id, stat.timestamp)?;
            let cell = AgentStatMapper::encode_cell(std::slice::from_ref(stat))?;
            sqlx::query(&sql)
                .bind(self.distributor.distributed_key(&key).to_vec())
                .bind(AGENT_STAT_CF_STATISTICS)
                .bind(cell.to_vec())
                .execute(&mut *tx)
                .await
                .map_err(ScanError::from)?;
        }
        tx.commit().await.map_err(ScanError::from)?;
        Ok(())
    }
}

impl RangeScanner for SqliteStatStore {
    type Cursor = SqliteCursor;

    /// One cursor per key bucket, in bucket order.
    async fn open(&self, request: &ScanRequest) -> Result<Vec<SqliteCursor>, ScanError> {
        debug!(
            tier = %request.tier,
            caching = request.caching,
            scan_id = request.scan_id.unwrap_or_default(),
            buckets = self.distributor.buckets(),
            "open distributed scan"
        );
        Ok(self
            .distributor
            .distributed_bounds(&request.bounds)
            .into_iter()
            .map(|bounds| {
                SqliteCursor::new(
                    self.pool.clone(),
                    table_name(request.tier),
                    request.column_family,
                    bounds,
                    request.caching,
                    self.distributor,
                )
            })
            .collect())
    }
}

fn table_name(tier: Tier) -> &'static str {
    match tier {
        Tier::Raw => "agent_stat",
        Tier::Aggregated => "agent_stat_aggr",
    }
}
