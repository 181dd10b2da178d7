//! Supported key field types and their per-segment encodings.
//!
//! | Kind          | Rust type                | Segments | Bytes per segment       |
//! |---------------|--------------------------|----------|-------------------------|
//! | `text`        | `String`                 | 1        | UTF-8, any length       |
//! | `int32`       | `i32`                    | 1        | 4 (LE)                  |
//! | `int64`       | `i64`                    | 1        | 8 (LE)                  |
//! | `date`        | `NaiveDateTime`          | 1        | 12 (LE secs + nanos)    |
//! | `date_offset` | `DateTime<FixedOffset>`  | 2        | 12 (UTC instant), 4     |

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use super::encoding::{base64_decode, base64_encode, encoded_len};
use crate::error::CursorError;

/// The closed set of order value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OrderKind {
    /// UTF-8 text.
    Text,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Date and time without offset.
    Date,
    /// Date and time with a fixed UTC offset.
    DateOffset,
}

impl OrderKind {
    /// All supported order kinds.
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Int32,
        Self::Int64,
        Self::Date,
        Self::DateOffset,
    ];

    /// Canonical type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Date => "date",
            Self::DateOffset => "date_offset",
        }
    }

    /// Resolve a declared type name (canonical or Rust spelling, case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "str" | "&str" => Some(Self::Text),
            "int32" | "i32" | "int" => Some(Self::Int32),
            "int64" | "i64" | "long" | "bigint" => Some(Self::Int64),
            "date" | "datetime" | "naivedatetime" | "timestamp" => Some(Self::Date),
            "date_offset" | "dateoffset" | "datetimeoffset" | "datetime<fixedoffset>"
            | "timestamptz" => Some(Self::DateOffset),
            _ => None,
        }
    }

    /// Number of cursor segments a value of this kind occupies.
    #[must_use]
    pub const fn segments(self) -> usize {
        match self {
            Self::DateOffset => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of entity key kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeyKind {
    /// 32-bit signed integer key.
    Int32,
    /// 64-bit signed integer key.
    Int64,
}

impl KeyKind {
    /// All supported key kinds.
    pub const ALL: [Self; 2] = [Self::Int32, Self::Int64];

    /// Canonical type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
        }
    }

    /// Resolve a declared type name (canonical or Rust spelling, case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "int32" | "i32" | "int" => Some(Self::Int32),
            "int64" | "i64" | "long" | "bigint" => Some(Self::Int64),
            _ => None,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primary order value of any supported kind.
///
/// Values of one kind order as their payloads do. Values of different kinds
/// order by kind, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum OrderValue {
    /// UTF-8 text.
    Text(String),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Date and time without offset.
    Date(NaiveDateTime),
    /// Date and time with a fixed UTC offset.
    DateOffset(DateTime<FixedOffset>),
}

impl OrderValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> OrderKind {
        match self {
            Self::Text(_) => OrderKind::Text,
            Self::Int32(_) => OrderKind::Int32,
            Self::Int64(_) => OrderKind::Int64,
            Self::Date(_) => OrderKind::Date,
            Self::DateOffset(_) => OrderKind::DateOffset,
        }
    }
}

/// An entity key of any supported kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum EntityKey {
    /// 32-bit signed integer key.
    Int32(i32),
    /// 64-bit signed integer key.
    Int64(i64),
}

impl EntityKey {
    /// The kind of this key.
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::Int32(_) => KeyKind::Int32,
            Self::Int64(_) => KeyKind::Int64,
        }
    }
}

/// A value that can be written to and read from cursor segments.
pub trait Segments: Sized {
    /// Number of segments this value occupies.
    const SEGMENTS: usize;

    /// Longest encoding of any value, delimiters included; `None` if unbounded.
    const MAX_ENCODED_LEN: Option<usize>;

    /// Append this value's encoded segments.
    fn write_segments(&self, out: &mut Vec<String>);

    /// Read a value from `segments`, which holds exactly [`Self::SEGMENTS`] entries.
    ///
    /// `first` is the index of `segments[0]` in the whole cursor, for error reporting.
    fn read_segments(segments: &[&str], first: usize) -> Result<Self, CursorError>;
}

/// A type usable as the primary order value of a cursor.
///
/// Implemented for `String`, `i32`, `i64`, `NaiveDateTime` and
/// `DateTime<FixedOffset>`. Other types do not compile as codec parameters.
pub trait OrderField: Segments + Clone + Ord + fmt::Debug {
    /// The kind tag of this type.
    const KIND: OrderKind;

    /// Wrap into the dynamic value enum.
    fn into_order_value(self) -> OrderValue;

    /// Unwrap from the dynamic value enum; `None` if the kind differs.
    fn from_order_value(value: OrderValue) -> Option<Self>;
}

/// A type usable as the unique entity key (tie-breaker) of a cursor.
///
/// Implemented for `i32` and `i64`.
pub trait KeyField: Segments + Copy + Ord + fmt::Debug {
    /// The kind tag of this type.
    const KIND: KeyKind;

    /// Wrap into the dynamic key enum.
    fn into_entity_key(self) -> EntityKey;

    /// Unwrap from the dynamic key enum; `None` if the kind differs.
    fn from_entity_key(key: EntityKey) -> Option<Self>;
}

fn segment_at<'a>(segments: &[&'a str], idx: usize) -> &'a str {
    segments.get(idx).copied().unwrap_or_default()
}

fn decode_bytes(segment: &str, idx: usize) -> Result<Vec<u8>, CursorError> {
    base64_decode(segment).ok_or(CursorError::InvalidBase64 { segment: idx })
}

fn decode_fixed<const N: usize>(segment: &str, idx: usize) -> Result<[u8; N], CursorError> {
    let bytes = decode_bytes(segment, idx)?;
    let found = bytes.len();
    bytes.try_into().map_err(|_| CursorError::InvalidLength {
        segment: idx,
        expected: N,
        found,
    })
}

/// Seconds (i64) then nanoseconds (u32).
const INSTANT_LEN: usize = 12;

fn encode_instant(secs: i64, nanos: u32) -> String {
    let mut bytes = [0u8; INSTANT_LEN];
    bytes[..8].copy_from_slice(&secs.to_le_bytes());
    bytes[8..].copy_from_slice(&nanos.to_le_bytes());
    base64_encode(&bytes)
}

fn decode_instant(segment: &str, idx: usize) -> Result<DateTime<chrono::Utc>, CursorError> {
    let bytes: [u8; INSTANT_LEN] = decode_fixed(segment, idx)?;
    let mut secs = [0u8; 8];
    let mut nanos = [0u8; 4];
    secs.copy_from_slice(&bytes[..8]);
    nanos.copy_from_slice(&bytes[8..]);
    DateTime::from_timestamp(i64::from_le_bytes(secs), u32::from_le_bytes(nanos))
        .ok_or(CursorError::InvalidDate { segment: idx })
}

impl Segments for String {
    const SEGMENTS: usize = 1;
    const MAX_ENCODED_LEN: Option<usize> = None;

    fn write_segments(&self, out: &mut Vec<String>) {
        out.push(base64_encode(self.as_bytes()));
    }

    fn read_segments(segments: &[&str], first: usize) -> Result<Self, CursorError> {
        let bytes = decode_bytes(segment_at(segments, 0), first)?;
        Self::from_utf8(bytes).map_err(|_| CursorError::InvalidUtf8 { segment: first })
    }
}

impl Segments for i32 {
    const SEGMENTS: usize = 1;
    const MAX_ENCODED_LEN: Option<usize> = Some(encoded_len(4));

    fn write_segments(&self, out: &mut Vec<String>) {
        out.push(base64_encode(&self.to_le_bytes()));
    }

    fn read_segments(segments: &[&str], first: usize) -> Result<Self, CursorError> {
        decode_fixed(segment_at(segments, 0), first).map(Self::from_le_bytes)
    }
}

impl Segments for i64 {
    const SEGMENTS: usize = 1;
    const MAX_ENCODED_LEN: Option<usize> = Some(encoded_len(8));

    fn write_segments(&self, out: &mut Vec<String>) {
        out.push(base64_encode(&self.to_le_bytes()));
    }

    fn read_segments(segments: &[&str], first: usize) -> Result<Self, CursorError> {
        decode_fixed(segment_at(segments, 0), first).map(Self::from_le_bytes)
    }
}

impl Segments for NaiveDateTime {
    const SEGMENTS: usize = 1;
    const MAX_ENCODED_LEN: Option<usize> = Some(encoded_len(INSTANT_LEN));

    fn write_segments(&self, out: &mut Vec<String>) {
        let utc = self.and_utc();
        out.push(encode_instant(utc.timestamp(), utc.timestamp_subsec_nanos()));
    }

    fn read_segments(segments: &[&str], first: usize) -> Result<Self, CursorError> {
        decode_instant(segment_at(segments, 0), first).map(|dt| dt.naive_utc())
    }
}

impl Segments for DateTime<FixedOffset> {
    const SEGMENTS: usize = 2;
    const MAX_ENCODED_LEN: Option<usize> = Some(encoded_len(INSTANT_LEN) + 1 + encoded_len(4));

    fn write_segments(&self, out: &mut Vec<String>) {
        out.push(encode_instant(self.timestamp(), self.timestamp_subsec_nanos()));
        out.push(base64_encode(&self.offset().local_minus_utc().to_le_bytes()));
    }

    fn read_segments(segments: &[&str], first: usize) -> Result<Self, CursorError> {
        let instant = decode_instant(segment_at(segments, 0), first)?;
        let offset_secs = decode_fixed(segment_at(segments, 1), first + 1).map(i32::from_le_bytes)?;
        let offset = FixedOffset::east_opt(offset_secs)
            .ok_or(CursorError::InvalidOffset { segment: first + 1 })?;
        Ok(instant.with_timezone(&offset))
    }
}

impl OrderField for String {
    const KIND: OrderKind = OrderKind::Text;

    fn into_order_value(self) -> OrderValue {
        OrderValue::Text(self)
    }

    fn from_order_value(value: OrderValue) -> Option<Self> {
        match value {
            OrderValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl OrderField for i32 {
    const KIND: OrderKind = OrderKind::Int32;

    fn into_order_value(self) -> OrderValue {
        OrderValue::Int32(self)
    }

    fn from_order_value(value: OrderValue) -> Option<Self> {
        match value {
            OrderValue::Int32(v) => Some(v),
            _ => None,
        }
    }
}

impl OrderField for i64 {
    const KIND: OrderKind = OrderKind::Int64;

    fn into_order_value(self) -> OrderValue {
        OrderValue::Int64(self)
    }

    fn from_order_value(value: OrderValue) -> Option<Self> {
        match value {
            OrderValue::Int64(v) => Some(v),
            _ => None,
        }
    }
}

impl OrderField for NaiveDateTime {
    const KIND: OrderKind = OrderKind::Date;

    fn into_order_value(self) -> OrderValue {
        OrderValue::Date(self)
    }

    fn from_order_value(value: OrderValue) -> Option<Self> {
        match value {
            OrderValue::Date(v) => Some(v),
            _ => None,
        }
    }
}

impl OrderField for DateTime<FixedOffset> {
    const KIND: OrderKind = OrderKind::DateOffset;

    fn into_order_value(self) -> OrderValue {
        OrderValue::DateOffset(self)
    }

    fn from_order_value(value: OrderValue) -> Option<Self> {
        match value {
            OrderValue::DateOffset(v) => Some(v),
            _ => None,
        }
    }
}

impl KeyField for i32 {
    const KIND: KeyKind = KeyKind::Int32;

    fn into_entity_key(self) -> EntityKey {
        EntityKey::Int32(self)
    }

    fn from_entity_key(key: EntityKey) -> Option<Self> {
        match key {
            EntityKey::Int32(v) => Some(v),
            EntityKey::Int64(_) => None,
        }
    }
}

impl KeyField for i64 {
    const KIND: KeyKind = KeyKind::Int64;

    fn into_entity_key(self) -> EntityKey {
        EntityKey::Int64(self)
    }

    fn from_entity_key(key: EntityKey) -> Option<Self> {
        match key {
            EntityKey::Int64(v) => Some(v),
            EntityKey::Int32(_) => None,
        }
    }
}
