use serde::Deserialize;

use crate::stat_dao::{AGGR_SAMPLE_INTERVAL_MS, DEFAULT_SCAN_CACHE_SIZE, StatDaoConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Rows buffered per scan round trip.
    #[serde(default = "default_cache_size")]
    pub cache_size: u32,
    /// Hash-prefix partitions the row keys are spread over.
    #[serde(default = "default_key_buckets")]
    pub key_buckets: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cache_size: default_cache_size(),
            key_buckets: default_key_buckets(),
        }
    }
}

fn default_cache_size() -> u32 {
    DEFAULT_SCAN_CACHE_SIZE
}

fn default_key_buckets() -> u8 {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Spacing of aggregated-tier rows; also the bucket width of backfilled rows.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: i64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
        }
    }
}

fn default_sample_interval_ms() -> i64 {
    AGGR_SAMPLE_INTERVAL_MS
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings the stat DAO is constructed with.
    pub fn stat_dao_config(&self) -> StatDaoConfig {
        StatDaoConfig {
            scan_cache_size: self.scan.cache_size,
            aggr_sample_interval_ms: self.aggregation.sample_interval_ms,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.scan.cache_size > 0,
            "scan.cache_size must be > 0, got {}",
            self.scan.cache_size
        );
        anyhow::ensure!(
            self.scan.key_buckets > 0,
            "scan.key_buckets must be between 1 and 255, got {}",
            self.scan.key_buckets
        );
        anyhow::ensure!(
            self.aggregation.sample_interval_ms > 0,
            "aggregation.sample_interval_ms must be > 0, got {}",
            self.aggregation.sample_interval_ms
        );
        Ok(())
    }
}
