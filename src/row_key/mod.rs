// Row keys: [agent id, zero-padded to AGENT_NAME_MAX_LEN][i64::MAX - timestamp, big-endian].
// Ascending byte order is descending time, so a forward scan returns the most recent rows first.

pub mod distributor;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::StatError;
use crate::models::Range;

/// Fixed width of the agent id field.
pub const AGENT_NAME_MAX_LEN: usize = 24;

/// Encoded key length: agent id field + reversed timestamp.
pub const ROW_KEY_LEN: usize = AGENT_NAME_MAX_LEN + 8;

/// Half-open key range `[start, stop)` for one logical scan.
///
/// `stop` is the immediate successor of the key for `range.from`, so rows stamped exactly at
/// `range.from` are included and a zero-width range still selects the samples at that instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanBounds {
    pub start: Bytes,
    pub stop: Bytes,
}

/// Maps a timestamp onto a value whose big-endian bytes sort in reverse time order.
pub fn reverse_time_millis(timestamp: i64) -> i64 {
    i64::MAX - timestamp
}

/// Encodes `agent_id` and `timestamp` into a row key.
pub fn encode(agent_id: &str, timestamp: i64) -> Result<Bytes, StatError> {
    let id = validate_agent_id(agent_id)?;
    if timestamp < 0 {
        return Err(StatError::InvalidArgument(format!(
            "timestamp must be >= 0, got {timestamp}"
        )));
    }
    let mut key = BytesMut::with_capacity(ROW_KEY_LEN);
    key.put_slice(id);
    key.put_bytes(0, AGENT_NAME_MAX_LEN - id.len());
    key.put_i64(reverse_time_millis(timestamp));
    Ok(key.freeze())
}

/// Scan bounds for `range`. Time is reversed in the key, so `range.to` gives the start key.
pub fn bounds_for(agent_id: &str, range: &Range) -> Result<ScanBounds, StatError> {
    let start = encode(agent_id, range.to())?;
    let from_key = encode(agent_id, range.from())?;
    let mut stop = BytesMut::with_capacity(from_key.len() + 1);
    stop.put_slice(&from_key);
    stop.put_u8(0);
    Ok(ScanBounds {
        start,
        stop: stop.freeze(),
    })
}

fn validate_agent_id(agent_id: &str) -> Result<&[u8], StatError> {
    let id = agent_id.as_bytes();
    if id.is_empty() {
        return Err(StatError::InvalidArgument(
            "agentId must not be empty".into(),
        ));
    }
    if id.len() > AGENT_NAME_MAX_LEN {
        return Err(StatError::InvalidArgument(format!(
            "agentId must be at most {AGENT_NAME_MAX_LEN} bytes, got {}",
            id.len()
        )));
    }
    // NUL would be indistinguishable from the padding.
    if id.contains(&0) {
        return Err(StatError::InvalidArgument(
            "agentId must not contain NUL bytes".into(),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_timestamp_sorts_first() {
        let older = encode("agent-1", 1_000).unwrap();
        let newer = encode("agent-1", 2_000).unwrap();
        assert!(newer < older);
        assert_eq!(older.len(), ROW_KEY_LEN);
    }
}
