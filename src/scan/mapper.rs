// Row decoding. Cell layout: [version: u8][wincode Vec<AgentStat>]; unprefixed cells are legacy.

use bytes::Bytes;

use crate::error::ScanError;
use crate::models::AgentStat;

use super::StoredRow;

/// Current cell format version.
pub const CELL_VERSION: u8 = 1;

/// Decodes one stored row into the samples it carries.
pub trait RowMapper: Send + Sync {
    fn map_row(&self, row: &StoredRow, row_num: usize) -> Result<Vec<AgentStat>, ScanError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AgentStatMapper;

impl AgentStatMapper {
    /// Encodes samples as one versioned cell.
    pub fn encode_cell(stats: &[AgentStat]) -> Result<Bytes, ScanError> {
        let payload = wincode::serialize(&stats.to_vec())
            .map_err(|e| ScanError::Encode(format!("wincode: {e}")))?;
        let mut out = Vec::with_capacity(1 + payload.len());
        out.push(CELL_VERSION);
        out.extend_from_slice(&payload);
        Ok(Bytes::from(out))
    }
}

impl RowMapper for AgentStatMapper {
    fn map_row(&self, row: &StoredRow, row_num: usize) -> Result<Vec<AgentStat>, ScanError> {
        let mut out = Vec::new();
        for cell in &row.cells {
            let stats: Vec<AgentStat> =
                wincode::deserialize(cell_payload(cell)).map_err(|e| ScanError::Decode {
                    row: row_num,
                    message: format!("wincode: {e}"),
                })?;
            out.extend(stats);
        }
        Ok(out)
    }
}

/// Payload after the version byte; legacy cells are the whole blob.
fn cell_payload(bytes: &[u8]) -> &[u8] {
    match bytes.first() {
        Some(&CELL_VERSION) => &bytes[1..],
        _ => bytes,
    }
}
