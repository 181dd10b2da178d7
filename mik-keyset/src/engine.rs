//! The pagination engine.
//!
//! One call answers one page request: validate, decode the boundary, seek
//! `limit + 1` rows, trim, restore display order, encode per-row cursors.

use tracing::{debug, warn};

use crate::codec::CompositeCodec;
use crate::config::PageConfig;
use crate::error::{CursorError, PageError};
use crate::page::{Page, PageInfo};
use crate::params::{Direction, PageParams};
use crate::seek::{Seek, SeekBound, SeekQuery};
use crate::source::PageSource;

/// Paginate `source` using the process-wide [`PageConfig`].
///
/// `order_of` and `key_of` extract a row's order value and unique key; they
/// must agree with the order the source sorts by. `codec` is a
/// [`CursorCodec`](crate::CursorCodec) for Rust key types, or a resolved
/// [`KeyCodec`](crate::KeyCodec) with accessors returning
/// [`OrderValue`](crate::OrderValue) and [`EntityKey`](crate::EntityKey).
///
/// # Errors
///
/// - [`PageError::Validation`] for conflicting or out-of-range parameters.
///   The source is not called.
/// - [`PageError::MalformedCursor`] when `after`/`before` does not decode.
/// - [`PageError::Source`] when the source fails.
/// - [`PageError::Encode`] when a row's key does not fit a dynamic codec.
///
/// # Example
///
/// ```
/// use mik_keyset::{paginate, CursorCodec, PageParams, SliceSource};
///
/// let rows = [(1, 5), (2, 3), (2, 9), (3, 1)];
/// let codec = CursorCodec::<i32, i32>::new();
///
/// let page = paginate(
///     &SliceSource::ascending(&rows),
///     |r: &(i32, i32)| r.0,
///     |r: &(i32, i32)| r.1,
///     &codec,
///     &PageParams::new().first(2),
/// )?;
///
/// assert_eq!(page.rows(), vec![&(1, 5), &(2, 3)]);
/// assert!(page.page_info.has_next_page);
/// assert_eq!(page.page_info.end_cursor.as_deref(), Some(codec.encode(&2, &3).as_str()));
/// # Ok::<(), mik_keyset::PageError<std::convert::Infallible>>(())
/// ```
pub fn paginate<T, O, K, S, C>(
    source: &S,
    order_of: impl Fn(&T) -> O,
    key_of: impl Fn(&T) -> K,
    codec: &C,
    params: &PageParams,
) -> Result<Page<T>, PageError<S::Error>>
where
    T: Clone,
    O: Ord,
    K: Ord,
    S: PageSource<T, O, K> + ?Sized,
    C: CompositeCodec<O, K> + ?Sized,
{
    paginate_with(PageConfig::global(), source, order_of, key_of, codec, params)
}

/// Paginate `source` with explicit limits.
///
/// # Errors
///
/// Same as [`paginate`].
pub fn paginate_with<T, O, K, S, C>(
    config: &PageConfig,
    source: &S,
    order_of: impl Fn(&T) -> O,
    key_of: impl Fn(&T) -> K,
    codec: &C,
    params: &PageParams,
) -> Result<Page<T>, PageError<S::Error>>
where
    T: Clone,
    O: Ord,
    K: Ord,
    S: PageSource<T, O, K> + ?Sized,
    C: CompositeCodec<O, K> + ?Sized,
{
    let resolved = params.validate(config)?;
    let backward = resolved.direction == Direction::Backward;
    let limit = resolved.limit as usize;

    let bound = resolved
        .cursor
        .map(|cursor| codec.decode_key(cursor))
        .transpose()
        .map_err(PageError::MalformedCursor)?
        .map(|(order, key)| SeekBound {
            side: if backward { Seek::Before } else { Seek::After },
            order,
            key,
        });
    let bounded = bound.is_some();

    // One extra row tells whether another page exists
    let fetch_limit = limit.saturating_add(1);
    let mut query =
        SeekQuery::new(source.sort_dir(), fetch_limit, &order_of, &key_of).reversed(backward);
    if let Some(bound) = bound {
        query = query.with_bound(bound);
    }

    debug!(
        direction = ?resolved.direction,
        limit,
        bounded,
        sort = ?query.sort_dir(),
        "seeking page"
    );

    let mut rows = source.fetch(&query).map_err(PageError::Source)?;

    if rows.len() > fetch_limit {
        warn!(
            returned = rows.len(),
            requested = fetch_limit,
            "page source returned more rows than requested; dropping the excess"
        );
        rows.truncate(fetch_limit);
    }

    let fetched = rows.len();
    let has_more = fetched > limit;
    rows.truncate(limit);
    if backward {
        rows.reverse();
    }

    // A boundary cursor means rows exist on its other side
    let (has_next, has_previous) = if backward {
        (bounded, has_more)
    } else {
        (has_more, bounded)
    };

    let rows = rows
        .into_iter()
        .map(|row| {
            codec
                .encode_key(&order_of(&row), &key_of(&row))
                .map(|cursor| (cursor, row))
        })
        .collect::<Result<Vec<(String, T)>, CursorError>>()
        .map_err(PageError::Encode)?;

    let mut info = PageInfo::new(rows.len())
        .with_has_next(has_next)
        .with_has_previous(has_previous);
    if resolved.include_total {
        info = info.with_total(source.count().map_err(PageError::Source)?);
    }

    debug!(
        fetched,
        page_count = rows.len(),
        has_next,
        has_previous,
        total = ?info.total_count,
        "page built"
    );

    Ok(Page::from_rows(
        rows,
        info,
        resolved.include_nodes,
        resolved.include_edges,
    ))
}
