use crate::table::constants::*;

/// Byte offsets of every section within a table arena, measured from the
/// start of the arena (header included).
///
/// The serialized file stores no section boundaries; readers recompute this
/// layout from the two header fields, so the computation here is the format.
///
/// ```text
/// [ Header | Hashes | Keys | Values | KeyData ]
/// ```
///
/// - `hashes_offset` is 16 (right after the header, 4-byte aligned).
/// - `keys_offset` is rounded up to 8-byte alignment.
/// - `values_offset` follows the keys directly and is already 8-byte aligned.
/// - `key_data_offset` follows the values with no alignment requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub hashes_offset: u64,
    pub keys_offset: u64,
    pub values_offset: u64,
    pub key_data_offset: u64,
    pub total_length: u64,
}

impl TableLayout {
    /// Computes the section offsets for a table of `num_items` slots holding
    /// `value_size`-byte values and `total_key_length` bytes of raw key data.
    ///
    /// `num_items` is the realized slot count (already rounded to a power of
    /// two by the builder). `total_length` budgets one worst-case varint
    /// length prefix per slot on top of the raw key bytes.
    pub fn compute(num_items: u64, value_size: u64, total_key_length: u64) -> Self {
        let hashes_offset = HEADER_SIZE as u64;
        let keys_offset = round_up(
            hashes_offset + FINGERPRINT_SIZE as u64 * num_items,
            KEY_OFFSET_SIZE as u64,
        );
        let values_offset = keys_offset + KEY_OFFSET_SIZE as u64 * num_items;
        let key_data_offset = values_offset + value_size * num_items;
        let total_length = key_data_offset + total_key_length + KEY_LENGTH_PREFIX_BUDGET * num_items;

        Self {
            hashes_offset,
            keys_offset,
            values_offset,
            key_data_offset,
            total_length,
        }
    }
}

/// Rounds `length` up to the next multiple of `align` (a power of two).
fn round_up(length: u64, align: u64) -> u64 {
    (length + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 8), 0);
        assert_eq!(round_up(1, 8), 8);
        assert_eq!(round_up(8, 8), 8);
        assert_eq!(round_up(9, 8), 16);
        assert_eq!(round_up(20, 4), 20);
        assert_eq!(round_up(21, 4), 24);
    }
}
