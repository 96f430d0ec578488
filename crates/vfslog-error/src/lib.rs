use thiserror::Error;

/// Primary error type for vfslog operations.
///
/// Structured variants for the conditions callers are expected to handle;
/// display strings carry enough context to be actionable without a debugger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VfsLogError {
    /// A descriptor field value does not fit its declared bit width.
    ///
    /// Raised by field-wise construction. The offending value is reported,
    /// never silently truncated.
    #[error("{field} out of range: {value} (max {max})")]
    FieldRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// Short read (fewer bytes than expected).
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
}

impl VfsLogError {
    /// Shorthand for a [`VfsLogError::FieldRange`] rejection.
    #[must_use]
    pub const fn field_range(field: &'static str, value: u64, max: u64) -> Self {
        Self::FieldRange { field, value, max }
    }
}

/// Convenient Result alias using [`VfsLogError`].
pub type Result<T> = std::result::Result<T, VfsLogError>;
