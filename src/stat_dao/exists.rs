// Latency-biased existence check: looks at the first row the scan yields and nothing more.

use tracing::debug;

use crate::error::ScanError;
use crate::scan::{RowCursor, RowMapper};

/// `true` iff the first row of the logical scan carries data.
///
/// Partitions are visited in order only until one of them yields a row; that row decides the
/// answer. A second row is never requested.
pub async fn first_row_has_data<C, M>(cursors: Vec<C>, mapper: &M) -> Result<bool, ScanError>
where
    C: RowCursor,
    M: RowMapper + ?Sized,
{
    for mut cursor in cursors {
        let Some(row) = cursor.next_row().await? else {
            continue;
        };
        if row.is_empty() {
            return Ok(false);
        }
        if tracing::enabled!(tracing::Level::DEBUG) {
            match mapper.map_row(&row, 0) {
                Ok(stats) => debug!(first_row = ?stats.first(), "stat data exists"),
                Err(e) => debug!(error = %e, "stat data exists, first row undecodable"),
            }
        }
        return Ok(true);
    }
    Ok(false)
}
