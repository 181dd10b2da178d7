//! In-memory source over a borrowed slice.

use std::convert::Infallible;

use super::PageSource;
use crate::seek::{SeekQuery, SortDir};

/// Pages through rows held in memory.
///
/// The slice need not be sorted; every fetch filters and orders it.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a, T> {
    rows: &'a [T],
    dir: SortDir,
}

impl<'a, T> SliceSource<'a, T> {
    /// A source ordered by its order value in `dir`.
    #[must_use]
    pub const fn new(rows: &'a [T], dir: SortDir) -> Self {
        Self { rows, dir }
    }

    /// An ascending source.
    #[must_use]
    pub const fn ascending(rows: &'a [T]) -> Self {
        Self::new(rows, SortDir::Asc)
    }

    /// A descending source.
    #[must_use]
    pub const fn descending(rows: &'a [T]) -> Self {
        Self::new(rows, SortDir::Desc)
    }
}

impl<T: Clone, O: Ord, K: Ord> PageSource<T, O, K> for SliceSource<'_, T> {
    type Error = Infallible;

    fn sort_dir(&self) -> SortDir {
        self.dir
    }

    fn fetch(&self, query: &SeekQuery<'_, T, O, K>) -> Result<Vec<T>, Infallible> {
        let mut admitted: Vec<&T> = self.rows.iter().filter(|row| query.admits(row)).collect();
        admitted.sort_by(|a, b| query.cmp_fetch(a, b));
        Ok(admitted
            .into_iter()
            .take(query.limit())
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<u64, Infallible> {
        Ok(self.rows.len() as u64)
    }
}
