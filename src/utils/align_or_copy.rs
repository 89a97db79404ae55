use std::borrow::Cow;
use std::mem;

/// Reinterprets little-endian value bytes as a slice of `T`, borrowing when
/// the memory is already aligned for `T` and copy-decoding otherwise.
///
/// The values section of a table starts 8-byte aligned, so integer payloads
/// whose width divides the value size normally take the borrowed path and
/// read straight out of the mapped file.
///
/// `N` must equal `size_of::<T>()`; `from_le_bytes` is the matching decoder
/// (e.g. `u64::from_le_bytes`).
///
/// # Panics
/// If `N != size_of::<T>()` or `bytes.len()` is not a multiple of `N`.
///
/// # Example
/// ```rust
/// use std::borrow::Cow;
/// let raw = &[0x2a, 0, 0, 0, 0, 0, 0, 0];
/// let decoded: Cow<[u64]> = static_hash_table::utils::align_or_copy(raw, u64::from_le_bytes);
/// assert_eq!(decoded[0], 42);
/// ```
pub fn align_or_copy<T, const N: usize>(
    bytes: &[u8],
    from_le_bytes: fn([u8; N]) -> T,
) -> Cow<'_, [T]>
where
    T: Copy,
{
    assert_eq!(mem::size_of::<T>(), N, "mismatched size for target type");
    assert!(
        bytes.len() % N == 0,
        "input length must be a multiple of the element size"
    );

    // SAFETY: the cast only stands when the prefix and suffix are empty,
    // i.e. the aligned middle covers the whole slice.
    let (prefix, aligned, suffix) = unsafe { bytes.align_to::<T>() };
    if prefix.is_empty() && suffix.is_empty() {
        Cow::Borrowed(aligned)
    } else {
        Cow::Owned(
            bytes
                .chunks_exact(N)
                .map(|chunk| from_le_bytes(chunk.try_into().unwrap()))
                .collect(),
        )
    }
}
