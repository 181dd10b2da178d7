//! Conversions from cursor values to SQL parameters.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use super::types::Value;
use crate::codec::{EntityKey, OrderValue};

/// Fixed-width text form for dates, so stored values compare as strings.
pub const SQL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::String(v.format(SQL_DATE_FORMAT).to_string())
    }
}

/// Offset dates bind as their UTC instant.
impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Self::from(v.naive_utc())
    }
}

impl From<OrderValue> for Value {
    fn from(v: OrderValue) -> Self {
        match v {
            OrderValue::Text(s) => Self::String(s),
            OrderValue::Int32(n) => Self::from(n),
            OrderValue::Int64(n) => Self::Int(n),
            OrderValue::Date(d) => Self::from(d),
            OrderValue::DateOffset(d) => Self::from(d),
        }
    }
}

impl From<EntityKey> for Value {
    fn from(v: EntityKey) -> Self {
        match v {
            EntityKey::Int32(n) => Self::from(n),
            EntityKey::Int64(n) => Self::Int(n),
        }
    }
}
