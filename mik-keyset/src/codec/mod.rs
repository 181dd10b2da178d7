//! Opaque cursor codec for `(order value, entity key)` composite keys.
//!
//! A cursor is the order value's segment(s) followed by the key's segment,
//! each base64url-encoded and joined with `|`:
//!
//! ```text
//! <order>|<key>                 text, int32, int64, date
//! <instant>|<offset>|<key>      date_offset
//! ```
//!
//! The layout is not a contract. Clients must treat cursors as opaque and
//! only hand them back; the one guarantee is an exact round-trip.
//!
//! # Size
//!
//! Fixed-width pairs have a longest possible cursor (23 bytes for
//! `int64`/`int64`), and [`decode`](CursorCodec::decode) rejects anything
//! longer before touching it. Text order values are not truncated, so text
//! cursors have no such bound: any cursor `encode` produced decodes. Cap
//! request sizes at the transport if text keys can be large.
//!
//! # Selecting a codec
//!
//! When the key types are known statically, use [`CursorCodec`]: unsupported
//! pairs fail to compile.
//!
//! ```
//! use mik_keyset::CursorCodec;
//!
//! let codec = CursorCodec::<i64, i32>::new();
//! let cursor = codec.encode(&1_700_000_000, &42);
//! assert_eq!(codec.decode(&cursor).unwrap(), (1_700_000_000, 42));
//! ```
//!
//! When they come from configuration, resolve a [`KeyCodec`] once at setup:
//!
//! ```
//! use mik_keyset::{CompositeKey, EntityKey, KeyCodec, OrderValue};
//!
//! let codec = KeyCodec::resolve("text", "int64").unwrap();
//! let key = CompositeKey::new(OrderValue::Text("alice".into()), EntityKey::Int64(7));
//! let cursor = codec.encode(&key).unwrap();
//! assert_eq!(codec.decode(&cursor).unwrap(), key);
//!
//! assert!(KeyCodec::resolve("decimal", "int64").is_err());
//! ```

mod encoding;
mod field;

use std::fmt;
use std::marker::PhantomData;

pub use field::{EntityKey, KeyField, KeyKind, OrderField, OrderKind, OrderValue, Segments};

use crate::error::{CursorError, UnsupportedKeyTypes};

/// Separator between cursor segments. Never produced by base64url.
pub const DELIMITER: char = '|';

/// A composite key of any supported kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CompositeKey {
    /// The primary order value.
    pub order: OrderValue,
    /// The unique tie-breaker.
    pub key: EntityKey,
}

impl CompositeKey {
    /// Create a composite key.
    #[must_use]
    pub const fn new(order: OrderValue, key: EntityKey) -> Self {
        Self { order, key }
    }
}

fn max_cursor_len<O: Segments, K: Segments>() -> Option<usize> {
    match (O::MAX_ENCODED_LEN, K::MAX_ENCODED_LEN) {
        (Some(order), Some(key)) => Some(order + 1 + key),
        _ => None,
    }
}

fn split_segments(
    cursor: &str,
    expected: usize,
    max_len: Option<usize>,
) -> Result<Vec<&str>, CursorError> {
    if let Some(max) = max_len.filter(|max| cursor.len() > *max) {
        return Err(CursorError::TooLarge {
            max,
            found: cursor.len(),
        });
    }
    let segments: Vec<&str> = cursor.split(DELIMITER).collect();
    if segments.len() != expected {
        return Err(CursorError::SegmentCount {
            expected,
            found: segments.len(),
        });
    }
    Ok(segments)
}

fn encode_pair<O: OrderField, K: KeyField>(order: &O, key: &K) -> String {
    let mut segments = Vec::with_capacity(O::SEGMENTS + K::SEGMENTS);
    order.write_segments(&mut segments);
    key.write_segments(&mut segments);
    segments.join("|")
}

fn decode_pair<O: OrderField, K: KeyField>(cursor: &str) -> Result<(O, K), CursorError> {
    let segments = split_segments(cursor, O::SEGMENTS + K::SEGMENTS, max_cursor_len::<O, K>())?;
    let (order_segments, key_segments) = segments.split_at(O::SEGMENTS);
    let order = O::read_segments(order_segments, 0)?;
    let key = K::read_segments(key_segments, O::SEGMENTS)?;
    Ok((order, key))
}

/// Statically typed cursor codec.
///
/// Zero-sized: the encode/decode pair is chosen by monomorphization, so
/// there is no per-row dispatch at all.
pub struct CursorCodec<O, K> {
    _marker: PhantomData<fn() -> (O, K)>,
}

impl<O: OrderField, K: KeyField> CursorCodec<O, K> {
    /// Create the codec for this type pair.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// The order value kind this codec handles.
    #[must_use]
    pub const fn order_kind(&self) -> OrderKind {
        O::KIND
    }

    /// The entity key kind this codec handles.
    #[must_use]
    pub const fn key_kind(&self) -> KeyKind {
        K::KIND
    }

    /// Longest cursor this codec produces; `None` for text order values.
    #[must_use]
    pub fn max_cursor_len(&self) -> Option<usize> {
        max_cursor_len::<O, K>()
    }

    /// Encode a composite key. Never fails.
    #[must_use]
    pub fn encode(&self, order: &O, key: &K) -> String {
        encode_pair(order, key)
    }

    /// Decode a cursor produced by [`encode`](Self::encode).
    pub fn decode(&self, cursor: &str) -> Result<(O, K), CursorError> {
        decode_pair(cursor)
    }

    /// The equivalent dynamic codec.
    #[must_use]
    pub fn to_dynamic(&self) -> KeyCodec {
        KeyCodec::of::<O, K>()
    }
}

impl<O: OrderField, K: KeyField> Default for CursorCodec<O, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, K> Clone for CursorCodec<O, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, K> Copy for CursorCodec<O, K> {}

impl<O: OrderField, K: KeyField> fmt::Debug for CursorCodec<O, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorCodec")
            .field("order", &O::KIND)
            .field("key", &K::KIND)
            .finish()
    }
}

/// Encodes and decodes the composite key of a row.
///
/// The engine pages with any implementation: [`CursorCodec`] over Rust
/// types, or [`KeyCodec`] over [`OrderValue`] and [`EntityKey`] when the
/// key types are only known at runtime.
pub trait CompositeCodec<O, K> {
    /// Encode a row's position.
    fn encode_key(&self, order: &O, key: &K) -> Result<String, CursorError>;

    /// Decode a boundary cursor.
    fn decode_key(&self, cursor: &str) -> Result<(O, K), CursorError>;
}

impl<O: OrderField, K: KeyField> CompositeCodec<O, K> for CursorCodec<O, K> {
    fn encode_key(&self, order: &O, key: &K) -> Result<String, CursorError> {
        Ok(self.encode(order, key))
    }

    fn decode_key(&self, cursor: &str) -> Result<(O, K), CursorError> {
        self.decode(cursor)
    }
}

impl CompositeCodec<OrderValue, EntityKey> for KeyCodec {
    fn encode_key(&self, order: &OrderValue, key: &EntityKey) -> Result<String, CursorError> {
        self.encode(&CompositeKey::new(order.clone(), *key))
    }

    fn decode_key(&self, cursor: &str) -> Result<(OrderValue, EntityKey), CursorError> {
        self.decode(cursor).map(|composite| (composite.order, composite.key))
    }
}

type EncodeFn = fn(&CompositeKey) -> Option<String>;
type DecodeFn = fn(&str) -> Result<CompositeKey, CursorError>;

fn encode_dyn<O: OrderField, K: KeyField>(key: &CompositeKey) -> Option<String> {
    let order = O::from_order_value(key.order.clone())?;
    let entity = K::from_entity_key(key.key)?;
    Some(encode_pair(&order, &entity))
}

fn decode_dyn<O: OrderField, K: KeyField>(cursor: &str) -> Result<CompositeKey, CursorError> {
    let (order, key) = decode_pair::<O, K>(cursor)?;
    Ok(CompositeKey::new(order.into_order_value(), key.into_entity_key()))
}

fn fn_pair<O: OrderField, K: KeyField>() -> (EncodeFn, DecodeFn, Option<usize>) {
    (encode_dyn::<O, K>, decode_dyn::<O, K>, max_cursor_len::<O, K>())
}

fn lookup(order: OrderKind, key: KeyKind) -> (EncodeFn, DecodeFn, Option<usize>) {
    use chrono::{DateTime, FixedOffset, NaiveDateTime};

    match (order, key) {
        (OrderKind::Text, KeyKind::Int32) => fn_pair::<String, i32>(),
        (OrderKind::Text, KeyKind::Int64) => fn_pair::<String, i64>(),
        (OrderKind::Int32, KeyKind::Int32) => fn_pair::<i32, i32>(),
        (OrderKind::Int32, KeyKind::Int64) => fn_pair::<i32, i64>(),
        (OrderKind::Int64, KeyKind::Int32) => fn_pair::<i64, i32>(),
        (OrderKind::Int64, KeyKind::Int64) => fn_pair::<i64, i64>(),
        (OrderKind::Date, KeyKind::Int32) => fn_pair::<NaiveDateTime, i32>(),
        (OrderKind::Date, KeyKind::Int64) => fn_pair::<NaiveDateTime, i64>(),
        (OrderKind::DateOffset, KeyKind::Int32) => fn_pair::<DateTime<FixedOffset>, i32>(),
        (OrderKind::DateOffset, KeyKind::Int64) => fn_pair::<DateTime<FixedOffset>, i64>(),
    }
}

/// Dynamically selected cursor codec.
///
/// Holds the `(encode, decode)` function pair for one supported kind pair,
/// looked up once when the codec is resolved.
#[derive(Clone, Copy)]
pub struct KeyCodec {
    order: OrderKind,
    key: KeyKind,
    encode_fn: EncodeFn,
    decode_fn: DecodeFn,
    max_len: Option<usize>,
}

impl KeyCodec {
    /// Resolve the codec for a declared pair of type names.
    ///
    /// Accepts canonical names (`text`, `int32`, `int64`, `date`,
    /// `date_offset`) and common Rust spellings (`String`, `i64`,
    /// `NaiveDateTime`, `DateTime<FixedOffset>`).
    pub fn resolve(order_type: &str, key_type: &str) -> Result<Self, UnsupportedKeyTypes> {
        match (OrderKind::from_name(order_type), KeyKind::from_name(key_type)) {
            (Some(order), Some(key)) => Ok(Self::for_kinds(order, key)),
            _ => Err(UnsupportedKeyTypes {
                order_type: order_type.to_string(),
                key_type: key_type.to_string(),
            }),
        }
    }

    /// The codec for a pair of kinds. Every kind pair is supported.
    #[must_use]
    pub fn for_kinds(order: OrderKind, key: KeyKind) -> Self {
        let (encode_fn, decode_fn, max_len) = lookup(order, key);
        tracing::trace!(order = %order, key = %key, ?max_len, "resolved cursor codec");
        Self {
            order,
            key,
            encode_fn,
            decode_fn,
            max_len,
        }
    }

    /// The codec for a pair of Rust types.
    #[must_use]
    pub fn of<O: OrderField, K: KeyField>() -> Self {
        Self::for_kinds(O::KIND, K::KIND)
    }

    /// The order value kind this codec handles.
    #[must_use]
    pub const fn order_kind(&self) -> OrderKind {
        self.order
    }

    /// The entity key kind this codec handles.
    #[must_use]
    pub const fn key_kind(&self) -> KeyKind {
        self.key
    }

    /// Longest cursor this codec produces; `None` for text order values.
    #[must_use]
    pub const fn max_cursor_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Encode a composite key.
    ///
    /// Fails only if the key's variants differ from the codec's kinds; such a
    /// key is never coerced.
    pub fn encode(&self, key: &CompositeKey) -> Result<String, CursorError> {
        (self.encode_fn)(key).ok_or_else(|| CursorError::KindMismatch {
            expected: format!("{}, {}", self.order, self.key),
            found: format!("{}, {}", key.order.kind(), key.key.kind()),
        })
    }

    /// Decode a cursor into a composite key of this codec's kinds.
    pub fn decode(&self, cursor: &str) -> Result<CompositeKey, CursorError> {
        (self.decode_fn)(cursor)
    }
}

impl fmt::Debug for KeyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCodec")
            .field("order", &self.order)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyCodec {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.key == other.key
    }
}

impl Eq for KeyCodec {}
