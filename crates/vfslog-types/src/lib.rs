//! Core value types for the vfslog persistent VFS operations log.
//!
//! The central type is [`AttrDescriptor`], the packed file-attribute
//! descriptor stored in log record headers. The `bitfield` and `encoding`
//! modules hold the word-level and byte-level primitives it is built from.

pub mod attr;
pub mod bitfield;
pub mod encoding;

pub use attr::AttrDescriptor;
