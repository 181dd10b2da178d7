//! Parameterized SQL for seek queries.
//!
//! A small builder covering what keyset pagination needs: filtered
//! `SELECT ... ORDER BY ... LIMIT`, the expanded keyset predicate, and
//! `SELECT COUNT(*)`, for Postgres (`$1`) and `SQLite` (`?1`) placeholders.
//!
//! ```
//! use mik_keyset::sql::{sqlite, Operator, Value};
//! use mik_keyset::SortDir;
//!
//! let query = sqlite("posts")
//!     .fields(&["id", "title"])
//!     .filter("published", Operator::Eq, Value::Bool(true))
//!     .sort("id", SortDir::Asc)
//!     .limit(21)
//!     .build();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT id, title FROM posts WHERE published = ?1 ORDER BY id ASC LIMIT 21"
//! );
//! ```

mod dialect;
mod filter;
mod ident;
mod keyset;
mod select;
mod types;
mod value_conv;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use ident::{assert_valid_sql_identifier, is_valid_sql_identifier};
pub use keyset::KeysetCondition;
pub use select::QueryBuilder;
pub use types::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, QueryResult, SortField, Value, and,
    not, or, simple,
};
pub use value_conv::SQL_DATE_FORMAT;

/// Build a query for Postgres.
///
/// # Panics
///
/// Panics if the table name is not a valid SQL identifier.
#[must_use]
pub fn postgres(table: &str) -> QueryBuilder<Postgres> {
    QueryBuilder::new(Postgres, table)
}

/// Build a query for `SQLite`.
///
/// # Panics
///
/// Panics if the table name is not a valid SQL identifier.
#[must_use]
pub fn sqlite(table: &str) -> QueryBuilder<Sqlite> {
    QueryBuilder::new(Sqlite, table)
}
