use std::path::Path;

use crate::errors::GenerationError;
use crate::record::Record;

/// Write a record batch as a pretty-printed JSON array, preserving each
/// record's field order.
pub fn write_records_json(path: &Path, records: &[Record]) -> Result<u64, GenerationError> {
    let data = serde_json::to_vec_pretty(records)?;
    std::fs::write(path, &data)?;
    Ok(data.len() as u64)
}
