// Paged cursor over one key bucket: keyset pagination, `caching` rows per round trip.

use std::collections::VecDeque;

use bytes::Bytes;
use sqlx::Row;
use sqlx::sqlite::SqlitePool;

use crate::error::ScanError;
use crate::row_key::ScanBounds;
use crate::row_key::distributor::HashPrefixDistributor;
use crate::scan::{RowCursor, StoredRow};

pub struct SqliteCursor {
    pool: SqlitePool,
    table: &'static str,
    family: &'static str,
    /// Inclusive lower bound of the next page (distributed key).
    next_start: Vec<u8>,
    stop: Vec<u8>,
    caching: u32,
    distributor: HashPrefixDistributor,
    buffer: VecDeque<StoredRow>,
    exhausted: bool,
}

impl SqliteCursor {
    pub(super) fn new(
        pool: SqlitePool,
        table: &'static str,
        family: &'static str,
        bounds: ScanBounds,
        caching: u32,
        distributor: HashPrefixDistributor,
    ) -> Self {
        Self {
            pool,
            table,
            family,
            next_start: bounds.start.to_vec(),
            stop: bounds.stop.to_vec(),
            caching: caching.max(1),
            distributor,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    async fn fetch_page(&mut self) -> Result<(), ScanError> {
        let sql = format!(
            "SELECT row_key, data FROM {}
             WHERE row_key >= $1 AND row_key < $2 AND family = $3
             ORDER BY row_key ASC LIMIT $4",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(self.next_start.clone())
            .bind(self.stop.clone())
            .bind(self.family)
            .bind(i64::from(self.caching))
            .fetch_all(&self.pool)
            .await?;

        if rows.len() < self.caching as usize {
            self.exhausted = true;
        }

        for row in rows {
            let key: Vec<u8> = row.try_get("row_key")?;
            let data: Vec<u8> = row.try_get("data")?;

            // Successor of the last key seen: resume strictly after it.
            self.next_start.clear();
            self.next_start.extend_from_slice(&key);
            self.next_start.push(0);

            let cells = if data.is_empty() {
                Vec::new()
            } else {
                vec![Bytes::from(data)]
            };
            self.buffer.push_back(StoredRow {
                key: Bytes::copy_from_slice(self.distributor.original_key(&key)),
                cells,
            });
        }
        Ok(())
    }
}

impl RowCursor for SqliteCursor {
    async fn next_row(&mut self) -> Result<Option<StoredRow>, ScanError> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }
        Ok(self.buffer.pop_front())
    }
}
