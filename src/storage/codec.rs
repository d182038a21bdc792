//! Record codec
//!
//! Layout: `checksum (u32 LE) | payload`, where the payload is the record's
//! JSON encoding and the checksum is CRC32 over the payload.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StorageError, StorageResult};

const CHECKSUM_LEN: usize = 4;

/// Encodes a record with its checksum
pub fn encode<T: Serialize>(record: &T) -> StorageResult<Vec<u8>> {
    let payload = serde_json::to_vec(record).map_err(StorageError::Encode)?;
    let mut bytes = Vec::with_capacity(CHECKSUM_LEN + payload.len());
    bytes.extend_from_slice(&compute_checksum(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Validates the checksum and decodes a record.
///
/// `bucket` only labels corruption errors.
pub fn decode<T: DeserializeOwned>(bucket: &str, bytes: &[u8]) -> StorageResult<T> {
    if bytes.len() < CHECKSUM_LEN {
        return Err(StorageError::corruption(
            bucket,
            format!("record of {} bytes is shorter than its checksum", bytes.len()),
        ));
    }
    let (header, payload) = bytes.split_at(CHECKSUM_LEN);
    let expected = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    if !verify_checksum(payload, expected) {
        return Err(StorageError::corruption(bucket, "checksum mismatch"));
    }
    serde_json::from_slice(payload).map_err(StorageError::Decode)
}
