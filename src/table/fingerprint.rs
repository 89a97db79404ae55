use crate::table::constants::ZERO_FINGERPRINT_SUBSTITUTE;
use xxhash_rust::xxh3::xxh3_64;

/// Computes the 32-bit fingerprint stored in a key's hash slot.
///
/// XXH3 is a high-performance, non-cryptographic hash with SIMD acceleration
/// where the hardware supports it; the low 32 bits are enough to both place
/// an entry and short-circuit key comparisons during probing.
///
/// A fingerprint of 0 marks an empty slot, so a natural hash of 0 is
/// replaced with a fixed non-zero constant. The substitution runs on every
/// call, which keeps insert and lookup in agreement by construction.
#[inline]
pub fn compute_fingerprint(key: &[u8]) -> u32 {
    let fingerprint = xxh3_64(key) as u32;
    if fingerprint == 0 {
        ZERO_FINGERPRINT_SUBSTITUTE
    } else {
        fingerprint
    }
}
