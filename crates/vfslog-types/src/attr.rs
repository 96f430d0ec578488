//! Packed file-attribute descriptor.
//!
//! The operations log stores one descriptor per attribute reference in
//! record headers, so the three logical fields are packed into a single
//! `u64` word:
//!
//! ```text
//! Bit      Width  Field
//!   0        32   version
//!  32        31   enumerated_id
//!  63         1   fixed_size
//! ```
//!
//! The layout is total over all 64 bits; any word is decodable. Identity is
//! carried by `enumerated_id` alone: equality and hashing ignore `version`
//! and `fixed_size`, which ride along as descriptive metadata.

use std::fmt;
use std::hash::{Hash, Hasher};

use vfslog_error::{Result, VfsLogError};

use crate::bitfield;
use crate::encoding::{append_u64_le, read_u64_le, write_u64_le};

const VERSION_OFFSET: u32 = 0;
const VERSION_BITS: u32 = 32;
const ENUMERATED_ID_OFFSET: u32 = VERSION_OFFSET + VERSION_BITS;
const ENUMERATED_ID_BITS: u32 = 31;
const FIXED_SIZE_OFFSET: u32 = ENUMERATED_ID_OFFSET + ENUMERATED_ID_BITS;
const FIXED_SIZE_BITS: u32 = 1;

// The three fields must tile the word exactly.
const _: () = assert!(VERSION_BITS + ENUMERATED_ID_BITS + FIXED_SIZE_BITS == u64::BITS);

/// A file-attribute descriptor packed into one `u64` word.
///
/// Immutable `Copy` value. Construct with [`AttrDescriptor::from_fields`]
/// when the three logical values come from attribute registration, or with
/// [`AttrDescriptor::from_word`] when re-reading a previously packed word
/// from a log record.
///
/// Serde serializes the bare word, so the full 64 bits round-trip verbatim
/// even though equality is scoped to the id.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct AttrDescriptor(u64);

impl AttrDescriptor {
    /// Size of the packed representation in bytes.
    ///
    /// Compatibility critical: descriptors are persisted directly inside
    /// log records, so the width and the bit layout above must not change.
    pub const SIZE_BYTES: usize = 8;

    /// Largest representable enumerated id (`2^31 - 1`).
    pub const MAX_ENUMERATED_ID: u32 = (1 << ENUMERATED_ID_BITS) - 1;

    /// Pack the three logical fields into a descriptor.
    ///
    /// Rejects `enumerated_id >= 2^31` and `version >= 2^32` with
    /// [`VfsLogError::FieldRange`]; out-of-range values are never
    /// truncated.
    pub const fn from_fields(enumerated_id: u64, version: u64, fixed_size: bool) -> Result<Self> {
        if !bitfield::fits(enumerated_id, ENUMERATED_ID_BITS) {
            return Err(VfsLogError::field_range(
                "enumerated_id",
                enumerated_id,
                bitfield::mask(ENUMERATED_ID_BITS),
            ));
        }
        if !bitfield::fits(version, VERSION_BITS) {
            return Err(VfsLogError::field_range(
                "version",
                version,
                bitfield::mask(VERSION_BITS),
            ));
        }

        let mut word = 0;
        word = bitfield::set(word, version, VERSION_OFFSET, VERSION_BITS);
        word = bitfield::set(word, enumerated_id, ENUMERATED_ID_OFFSET, ENUMERATED_ID_BITS);
        word = bitfield::set(
            word,
            fixed_size as u64,
            FIXED_SIZE_OFFSET,
            FIXED_SIZE_BITS,
        );
        Ok(Self(word))
    }

    /// Wrap a previously packed word.
    ///
    /// No validation: the layout covers all 64 bits, so every word is a
    /// legal descriptor.
    #[inline]
    #[must_use]
    pub const fn from_word(word: u64) -> Self {
        Self(word)
    }

    /// The packed word.
    #[inline]
    #[must_use]
    pub const fn word(self) -> u64 {
        self.0
    }

    /// Attribute version, bits \[0, 32).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn version(self) -> u32 {
        bitfield::get(self.0, VERSION_OFFSET, VERSION_BITS) as u32
    }

    /// Enumerated attribute id, bits \[32, 63). Always `< 2^31`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn enumerated_id(self) -> u32 {
        bitfield::get(self.0, ENUMERATED_ID_OFFSET, ENUMERATED_ID_BITS) as u32
    }

    /// Whether the attribute's payload has a fixed size, bit \[63, 64).
    #[inline]
    #[must_use]
    pub const fn is_fixed_size(self) -> bool {
        bitfield::get(self.0, FIXED_SIZE_OFFSET, FIXED_SIZE_BITS) != 0
    }

    /// Serialize the packed word as 8 little-endian bytes.
    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE_BYTES] {
        let mut buf = [0_u8; Self::SIZE_BYTES];
        write_u64_le(&mut buf, self.0).expect("fixed u64 field");
        buf
    }

    /// Decode a descriptor from the first 8 bytes of `buf` (little-endian).
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE_BYTES {
            return Err(VfsLogError::ShortRead {
                expected: Self::SIZE_BYTES,
                actual: buf.len(),
            });
        }
        let word = read_u64_le(buf).expect("fixed u64 field");
        Ok(Self(word))
    }

    /// Append the packed word to `out` as 8 little-endian bytes.
    pub fn append_to(self, out: &mut Vec<u8>) {
        append_u64_le(out, self.0);
    }
}

/// Equality is scoped to `enumerated_id`; `version` and `fixed_size` are
/// excluded. Two descriptors with equal ids but unequal words compare equal.
impl PartialEq for AttrDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.enumerated_id() == other.enumerated_id()
    }
}

impl Eq for AttrDescriptor {}

/// Hashes only `enumerated_id`, keeping hash exactly consistent with the
/// equality scoping above.
impl Hash for AttrDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.enumerated_id().hash(state);
    }
}

impl fmt::Display for AttrDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attr#{} v{} {}",
            self.enumerated_id(),
            self.version(),
            if self.is_fixed_size() {
                "fixed"
            } else {
                "variable"
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_literal_words() {
        assert_eq!(AttrDescriptor::from_fields(0, 0, false).unwrap().word(), 0);
        assert_eq!(
            AttrDescriptor::from_fields(1, 0, false).unwrap().word(),
            1 << 32
        );
        assert_eq!(
            AttrDescriptor::from_fields(0, 0, true).unwrap().word(),
            1 << 63
        );
    }

    #[test]
    fn fields_round_trip() {
        let attr = AttrDescriptor::from_fields(5, 7, true).unwrap();
        assert_eq!(attr.enumerated_id(), 5);
        assert_eq!(attr.version(), 7);
        assert!(attr.is_fixed_size());

        let reread = AttrDescriptor::from_word(attr.word());
        assert_eq!(reread.enumerated_id(), 5);
        assert_eq!(reread.version(), 7);
        assert!(reread.is_fixed_size());
        assert_eq!(reread.word(), attr.word());
    }

    #[test]
    fn max_id_reads_back_unsigned() {
        let max_id = u64::from(AttrDescriptor::MAX_ENUMERATED_ID);
        let attr = AttrDescriptor::from_fields(max_id, 0, false).unwrap();
        assert_eq!(attr.enumerated_id(), AttrDescriptor::MAX_ENUMERATED_ID);
        assert_eq!(u64::from(attr.enumerated_id()), max_id);
    }

    #[test]
    fn rejects_out_of_range_id() {
        let err = AttrDescriptor::from_fields(1 << 31, 0, false).unwrap_err();
        assert_eq!(
            err,
            VfsLogError::FieldRange {
                field: "enumerated_id",
                value: 1 << 31,
                max: (1 << 31) - 1,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_version() {
        let err = AttrDescriptor::from_fields(0, 1 << 32, false).unwrap_err();
        assert_eq!(
            err,
            VfsLogError::FieldRange {
                field: "version",
                value: 1 << 32,
                max: u64::from(u32::MAX),
            }
        );
    }

    #[test]
    fn max_version_accepted() {
        let attr = AttrDescriptor::from_fields(0, u64::from(u32::MAX), false).unwrap();
        assert_eq!(attr.version(), u32::MAX);
        assert_eq!(attr.enumerated_id(), 0);
        assert!(!attr.is_fixed_size());
    }

    #[test]
    fn all_bits_set_word_decodes() {
        let attr = AttrDescriptor::from_word(u64::MAX);
        assert_eq!(attr.version(), u32::MAX);
        assert_eq!(attr.enumerated_id(), AttrDescriptor::MAX_ENUMERATED_ID);
        assert!(attr.is_fixed_size());
    }

    #[test]
    fn equality_ignores_version_and_fixed_size() {
        let a = AttrDescriptor::from_fields(9, 1, false).unwrap();
        let b = AttrDescriptor::from_fields(9, 2, true).unwrap();
        assert_ne!(a.word(), b.word());
        assert_eq!(a, b);

        let c = AttrDescriptor::from_fields(10, 1, false).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn byte_round_trip() {
        let attr = AttrDescriptor::from_fields(5, 7, true).unwrap();
        let bytes = attr.to_bytes();
        assert_eq!(bytes.len(), AttrDescriptor::SIZE_BYTES);

        let reread = AttrDescriptor::from_bytes(&bytes).unwrap();
        assert_eq!(reread.word(), attr.word());
    }

    #[test]
    fn from_bytes_short_buffer() {
        let err = AttrDescriptor::from_bytes(&[0; 3]).unwrap_err();
        assert_eq!(
            err,
            VfsLogError::ShortRead {
                expected: 8,
                actual: 3,
            }
        );
    }

    #[test]
    fn append_matches_to_bytes() {
        let attr = AttrDescriptor::from_fields(77, 3, false).unwrap();
        let mut out = vec![0xAB];
        attr.append_to(&mut out);
        assert_eq!(out[0], 0xAB);
        assert_eq!(&out[1..], attr.to_bytes());
    }

    #[test]
    fn display_shows_all_fields() {
        let attr = AttrDescriptor::from_fields(5, 7, true).unwrap();
        assert_eq!(attr.to_string(), "attr#5 v7 fixed");

        let attr = AttrDescriptor::from_fields(5, 7, false).unwrap();
        assert_eq!(attr.to_string(), "attr#5 v7 variable");
    }
}
