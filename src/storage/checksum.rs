//! CRC32 checksums over encoded records
//!
//! Every stored record carries the checksum of its payload and every read
//! validates it.

use crc32fast::Hasher;

/// Computes the CRC32 (IEEE) checksum of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Returns true if `data` hashes to `expected`.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}
