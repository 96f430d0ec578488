//! Fixed-width little-endian encoding helpers.
//!
//! Reads return `None` when the buffer is too short; callers that have
//! already validated lengths use `.expect("fixed u64 field")`.

/// Read a little-endian `u64` from the start of `buf`.
#[must_use]
pub fn read_u64_le(buf: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = buf.get(..8)?.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Write `value` as little-endian into the start of `buf`.
///
/// Returns `None` if `buf` is shorter than 8 bytes.
pub fn write_u64_le(buf: &mut [u8], value: u64) -> Option<()> {
    buf.get_mut(..8)?.copy_from_slice(&value.to_le_bytes());
    Some(())
}

/// Append `value` as little-endian to `out`.
pub fn append_u64_le(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}
