//! Where page rows come from.

mod slice;
mod sql;

pub use slice::SliceSource;
pub use sql::SqlSeek;

use crate::seek::{SeekQuery, SortDir};

/// An ordered collection the engine can seek through.
///
/// Implementations answer one [`SeekQuery`] per page and, when totals are
/// requested, one count. The engine never asks for an offset.
pub trait PageSource<T, O, K> {
    /// Failure reported by the backing store.
    type Error: std::error::Error + 'static;

    /// Declared direction of the order value.
    fn sort_dir(&self) -> SortDir;

    /// Rows admitted by `query`, in fetch order, at most `query.limit()` of them.
    fn fetch(&self, query: &SeekQuery<'_, T, O, K>) -> Result<Vec<T>, Self::Error>;

    /// Size of the whole collection.
    fn count(&self) -> Result<u64, Self::Error>;
}
