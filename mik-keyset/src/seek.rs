//! Seek queries: the bounded, ordered, limited fetch a source answers.

use std::cmp::Ordering;
use std::fmt;

/// Sort direction of the order value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDir {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortDir {
    /// The opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Orient an ascending comparison in this direction.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Which side of the boundary a seek selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seek {
    /// Rows strictly after the boundary in display order.
    After,
    /// Rows strictly before the boundary in display order.
    Before,
}

/// A decoded boundary cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekBound<O, K> {
    /// Side of the boundary to keep.
    pub side: Seek,
    /// Order value of the boundary row.
    pub order: O,
    /// Key of the boundary row.
    pub key: K,
}

/// The fetch a [`PageSource`](crate::PageSource) must answer.
///
/// A source returns at most [`limit`](Self::limit) rows that satisfy
/// [`admits`](Self::admits), sorted by [`cmp_fetch`](Self::cmp_fetch).
/// Rows compare by order value in [`sort_dir`](Self::sort_dir), then by
/// key ascending.
pub struct SeekQuery<'a, T, O, K> {
    bound: Option<SeekBound<O, K>>,
    dir: SortDir,
    reverse: bool,
    limit: usize,
    order_of: &'a dyn Fn(&T) -> O,
    key_of: &'a dyn Fn(&T) -> K,
}

impl<'a, T, O: Ord, K: Ord> SeekQuery<'a, T, O, K> {
    /// An unbounded forward query.
    pub fn new(
        dir: SortDir,
        limit: usize,
        order_of: &'a dyn Fn(&T) -> O,
        key_of: &'a dyn Fn(&T) -> K,
    ) -> Self {
        Self {
            bound: None,
            dir,
            reverse: false,
            limit,
            order_of,
            key_of,
        }
    }

    /// Restrict to one side of a boundary.
    #[must_use]
    pub fn with_bound(mut self, bound: SeekBound<O, K>) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Fetch from the end of the collection backwards.
    #[must_use]
    pub const fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// The boundary, if a cursor was supplied.
    pub const fn bound(&self) -> Option<&SeekBound<O, K>> {
        self.bound.as_ref()
    }

    /// Declared direction of the order value.
    pub const fn sort_dir(&self) -> SortDir {
        self.dir
    }

    /// Whether rows come back last-first.
    pub const fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Maximum rows to return.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Order value of a row.
    pub fn order_of(&self, row: &T) -> O {
        (self.order_of)(row)
    }

    /// Key of a row.
    pub fn key_of(&self, row: &T) -> K {
        (self.key_of)(row)
    }

    /// Compare two positions in display order. Keys always break ties ascending.
    pub fn compare(&self, a: (&O, &K), b: (&O, &K)) -> Ordering {
        self.dir.apply(a.0.cmp(b.0)).then_with(|| a.1.cmp(b.1))
    }

    /// Compare two rows in display order.
    pub fn cmp_rows(&self, a: &T, b: &T) -> Ordering {
        let (ao, ak) = (self.order_of(a), self.key_of(a));
        let (bo, bk) = (self.order_of(b), self.key_of(b));
        self.compare((&ao, &ak), (&bo, &bk))
    }

    /// Compare two rows in the order the source must return them.
    pub fn cmp_fetch(&self, a: &T, b: &T) -> Ordering {
        let ordering = self.cmp_rows(a, b);
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Whether a row lies on the requested side of the boundary.
    pub fn admits(&self, row: &T) -> bool {
        let Some(bound) = &self.bound else {
            return true;
        };
        let order = self.order_of(row);
        let key = self.key_of(row);
        let ordering = self.compare((&order, &key), (&bound.order, &bound.key));
        match bound.side {
            Seek::After => ordering == Ordering::Greater,
            Seek::Before => ordering == Ordering::Less,
        }
    }
}

impl<T, O: fmt::Debug, K: fmt::Debug> fmt::Debug for SeekQuery<'_, T, O, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeekQuery")
            .field("bound", &self.bound)
            .field("dir", &self.dir)
            .field("reverse", &self.reverse)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Row = (i32, i32);

    fn order(row: &Row) -> i32 {
        row.0
    }

    fn key(row: &Row) -> i32 {
        row.1
    }

    #[test]
    fn test_sort_dir_reverse_and_apply() {
        assert_eq!(SortDir::Asc.reverse(), SortDir::Desc);
        assert_eq!(SortDir::Desc.reverse(), SortDir::Asc);
        assert_eq!(SortDir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDir::Asc.apply(Ordering::Less), Ordering::Less);
    }

    #[test]
    fn test_unbounded_admits_everything() {
        let query = SeekQuery::<Row, i32, i32>::new(SortDir::Asc, 3, &order, &key);
        assert!(query.admits(&(i32::MIN, i32::MIN)));
        assert!(query.bound().is_none());
    }

    #[test]
    fn test_after_bound_ascending() {
        let query = SeekQuery::<Row, i32, i32>::new(SortDir::Asc, 3, &order, &key)
            .with_bound(SeekBound {
                side: Seek::After,
                order: 2,
                key: 3,
            });
        assert!(!query.admits(&(1, 5)));
        assert!(!query.admits(&(2, 3)));
        assert!(query.admits(&(2, 9)));
        assert!(query.admits(&(3, 1)));
    }

    #[test]
    fn test_after_bound_descending_keeps_key_ascending() {
        let query = SeekQuery::<Row, i32, i32>::new(SortDir::Desc, 3, &order, &key)
            .with_bound(SeekBound {
                side: Seek::After,
                order: 2,
                key: 3,
            });
        assert!(query.admits(&(1, 0)));
        assert!(query.admits(&(2, 9)));
        assert!(!query.admits(&(2, 1)));
        assert!(!query.admits(&(3, 1)));
    }

    #[test]
    fn test_before_bound() {
        let query = SeekQuery::<Row, i32, i32>::new(SortDir::Asc, 3, &order, &key)
            .with_bound(SeekBound {
                side: Seek::Before,
                order: 2,
                key: 9,
            });
        assert!(query.admits(&(2, 3)));
        assert!(!query.admits(&(2, 9)));
        assert!(!query.admits(&(3, 1)));
    }

    #[test]
    fn test_cmp_fetch_follows_reverse() {
        let forward = SeekQuery::<Row, i32, i32>::new(SortDir::Asc, 3, &order, &key);
        let backward = SeekQuery::<Row, i32, i32>::new(SortDir::Asc, 3, &order, &key)
            .reversed(true);
        assert_eq!(forward.cmp_fetch(&(1, 5), &(2, 3)), Ordering::Less);
        assert_eq!(backward.cmp_fetch(&(1, 5), &(2, 3)), Ordering::Greater);
        assert!(backward.is_reversed());
    }
}
