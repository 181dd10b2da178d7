//! Error types for cursor decoding, parameter validation and page building.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when decoding (or, for the dynamic codec, encoding) a cursor.
///
/// Every variant is a client-input error: the cursor did not come from this
/// codec, or was altered on the way back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The cursor is longer than any cursor the codec produces.
    #[error("cursor is {found} bytes, longest valid cursor is {max}")]
    TooLarge {
        /// Longest cursor the codec's key types encode to.
        max: usize,
        /// Length of the rejected cursor.
        found: usize,
    },

    /// The cursor does not have the number of segments its key types require.
    #[error("cursor has {found} segment(s), expected {expected}")]
    SegmentCount {
        /// Segments required by the key types.
        expected: usize,
        /// Segments actually present.
        found: usize,
    },

    /// A segment is not valid base64url.
    #[error("invalid base64 encoding in cursor segment {segment}")]
    InvalidBase64 {
        /// Zero-based segment index.
        segment: usize,
    },

    /// A binary segment decoded to the wrong number of bytes.
    #[error("cursor segment {segment} has {found} byte(s), expected {expected}")]
    InvalidLength {
        /// Zero-based segment index.
        segment: usize,
        /// Byte width of the field type.
        expected: usize,
        /// Bytes actually decoded.
        found: usize,
    },

    /// A text segment is not valid UTF-8.
    #[error("cursor segment {segment} is not valid UTF-8")]
    InvalidUtf8 {
        /// Zero-based segment index.
        segment: usize,
    },

    /// A date segment is outside the representable range.
    #[error("cursor segment {segment} is not a representable date")]
    InvalidDate {
        /// Zero-based segment index.
        segment: usize,
    },

    /// An offset segment is not a valid UTC offset.
    #[error("cursor segment {segment} is not a valid UTC offset")]
    InvalidOffset {
        /// Zero-based segment index.
        segment: usize,
    },

    /// A composite key does not match the kinds a dynamic codec was resolved for.
    #[error("composite key is ({found}), codec expects ({expected})")]
    KindMismatch {
        /// Kinds the codec was resolved for, as `order, key`.
        expected: String,
        /// Kinds of the rejected key, as `order, key`.
        found: String,
    },
}

impl CursorError {
    /// Returns `true` if the cursor text itself could not be decoded.
    ///
    /// Includes `InvalidBase64`, `InvalidUtf8` and `SegmentCount`.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBase64 { .. } | Self::InvalidUtf8 { .. } | Self::SegmentCount { .. }
        )
    }

    /// Returns `true` if a segment decoded but its payload is not a valid value.
    ///
    /// Includes `InvalidLength`, `InvalidDate` and `InvalidOffset`.
    #[inline]
    #[must_use]
    pub const fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. } | Self::InvalidDate { .. } | Self::InvalidOffset { .. }
        )
    }
}

/// Requested codec key types that are not in the supported set.
///
/// Raised once, when a codec is resolved. This is a setup defect, not a
/// per-request condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported cursor key types: order type `{order_type}` with entity key type `{key_type}`")]
pub struct UnsupportedKeyTypes {
    /// The declared order value type name.
    pub order_type: String,
    /// The declared entity key type name.
    pub key_type: String,
}

/// A single violated pagination parameter constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Violation {
    /// `first` and `last` were both set.
    FirstWithLast,
    /// `after` and `before` were both set.
    AfterWithBefore,
    /// `first` was combined with `before`.
    FirstWithBefore,
    /// `last` was combined with `after`.
    LastWithAfter,
    /// Both output shapes were disabled.
    NoOutputShape,
    /// `first` exceeds the maximum page size.
    FirstTooLarge {
        /// The configured maximum.
        max: u32,
    },
    /// `last` exceeds the maximum page size.
    LastTooLarge {
        /// The configured maximum.
        max: u32,
    },
}

impl Violation {
    /// Wire names of the parameters involved in this violation.
    #[must_use]
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::FirstWithLast => &["first", "last"],
            Self::AfterWithBefore => &["after", "before"],
            Self::FirstWithBefore => &["first", "before"],
            Self::LastWithAfter => &["last", "after"],
            Self::NoOutputShape => &["includeNodes", "includeEdges"],
            Self::FirstTooLarge { .. } => &["first"],
            Self::LastTooLarge { .. } => &["last"],
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstWithLast => write!(f, "`first` and `last` cannot be used together"),
            Self::AfterWithBefore => write!(f, "`after` and `before` cannot be used together"),
            Self::FirstWithBefore => write!(f, "`first` cannot be combined with `before`"),
            Self::LastWithAfter => write!(f, "`last` cannot be combined with `after`"),
            Self::NoOutputShape => {
                write!(f, "at least one of `includeNodes` or `includeEdges` must be true")
            },
            Self::FirstTooLarge { max } => write!(f, "`first` must be at most {max}"),
            Self::LastTooLarge { max } => write!(f, "`last` must be at most {max}"),
        }
    }
}

/// Conflicting or insufficient pagination parameters.
///
/// Lists every violated constraint, not just the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub struct ValidationError {
    /// The violated constraints, in check order. Never empty.
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// All parameter names involved in any violation, deduplicated, in order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for name in self.violations.iter().flat_map(Violation::fields).copied() {
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
        fields
    }

    /// Returns `true` if `violation` is among the reported violations.
    #[must_use]
    pub fn contains(&self, violation: Violation) -> bool {
        self.violations.contains(&violation)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pagination parameters: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors returned by [`paginate`](crate::paginate).
///
/// No partial page is ever produced alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PageError<E> {
    /// The request parameters are invalid. The source was not called.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The `after`/`before` cursor could not be decoded.
    #[error("malformed cursor: {0}")]
    MalformedCursor(#[source] CursorError),

    /// A fetched row's key did not encode, e.g. its accessors returned
    /// values of kinds a dynamic codec was not resolved for.
    #[error("row key could not be encoded: {0}")]
    Encode(#[source] CursorError),

    /// The source's fetch or count failed. Propagated unchanged, never retried.
    #[error("source fetch failed: {0}")]
    Source(#[source] E),
}

impl<E> PageError<E> {
    /// Returns `true` if the request itself was at fault (bad parameters or cursor).
    #[inline]
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MalformedCursor(_))
    }

    /// The cursor error, if this is a malformed-cursor failure.
    #[must_use]
    pub const fn as_cursor_error(&self) -> Option<&CursorError> {
        match self {
            Self::MalformedCursor(err) => Some(err),
            _ => None,
        }
    }

    /// The validation error, if the parameters were rejected.
    #[must_use]
    pub const fn as_validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
