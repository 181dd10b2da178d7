// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::cast_possible_truncation)] // Limits are u32, rows are counted in usize
#![allow(clippy::exhaustive_enums)] // Closed sets: sort direction, seek side, value kinds
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # mik-keyset - Keyset (Cursor) Pagination
//!
//! Page forward and backward through an ordered collection with opaque
//! cursors instead of offsets. Each row's position is its composite key:
//! an order value (text, integer, or date) plus a unique entity key that
//! breaks ties. Cursors encode that key; the next page starts strictly
//! after it.
//!
//! ## Quick Start
//!
//! ```
//! use mik_keyset::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Post { id: i64, score: i32 }
//!
//! let posts = vec![
//!     Post { id: 5, score: 1 },
//!     Post { id: 3, score: 2 },
//!     Post { id: 9, score: 2 },
//!     Post { id: 1, score: 3 },
//! ];
//! let codec = CursorCodec::<i32, i64>::new();
//! let source = SliceSource::ascending(&posts);
//!
//! let first = paginate(&source, |p: &Post| p.score, |p: &Post| p.id, &codec,
//!     &PageParams::new().first(2))?;
//! assert_eq!(first.len(), 2);
//! assert!(first.page_info.has_next_page);
//!
//! let after = first.page_info.end_cursor.clone().unwrap_or_default();
//! let second = paginate(&source, |p: &Post| p.score, |p: &Post| p.id, &codec,
//!     &PageParams::new().first(2).after(after))?;
//! assert_eq!(second.rows(), vec![&posts[2], &posts[3]]);
//! assert!(!second.page_info.has_next_page);
//! assert!(second.page_info.has_previous_page);
//! # Ok::<(), PageError<std::convert::Infallible>>(())
//! ```
//!
//! ## Request Parameters
//!
//! | Parameter | Meaning |
//! |-----------|---------|
//! | `first` | Page size, forward |
//! | `after` | Cursor to start after |
//! | `last` | Page size, backward |
//! | `before` | Cursor to end before |
//! | `includeTotal` | Also count the whole collection |
//! | `includeNodes` | Return bare rows (default on) |
//! | `includeEdges` | Return `{cursor, node}` pairs |
//!
//! `first` excludes `last` and `before`; `last` excludes `after`. Page sizes
//! above [`PageConfig::max_limit`] are rejected, never clamped.
//!
//! ## SQL Sources
//!
//! [`SqlSeek`] renders the seek query and the count for a table, with
//! Postgres or `SQLite` placeholders:
//!
//! ```
//! use mik_keyset::prelude::*;
//!
//! struct Post { id: i64, score: i32 }
//!
//! let seek = SqlSeek::new(Postgres, "posts", "score", "id").dir(SortDir::Desc);
//! let order = |p: &Post| p.score;
//! let key = |p: &Post| p.id;
//! let query = SeekQuery::<Post, i32, i64>::new(seek.sort_dir(), 21, &order, &key);
//!
//! assert_eq!(
//!     seek.select(&query).sql,
//!     "SELECT * FROM posts ORDER BY score DESC, id ASC LIMIT 21"
//! );
//! ```

mod codec;
mod config;
mod engine;
mod error;
mod page;
mod params;
mod seek;
mod source;

pub mod sql;

pub use codec::{
    CompositeCodec, CompositeKey, CursorCodec, DELIMITER, EntityKey, KeyCodec, KeyField, KeyKind,
    OrderField, OrderKind, OrderValue, Segments,
};
pub use config::{DEFAULT_MAX_PAGE_LIMIT, DEFAULT_PAGE_LIMIT, PageConfig};
pub use engine::{paginate, paginate_with};
pub use error::{CursorError, PageError, UnsupportedKeyTypes, ValidationError, Violation};
pub use page::{Edge, Page, PageInfo};
pub use params::{Direction, PageParams, ResolvedParams};
pub use seek::{Seek, SeekBound, SeekQuery, SortDir};
pub use source::{PageSource, SliceSource, SqlSeek};

/// Prelude module for convenient imports.
///
/// ```
/// use mik_keyset::prelude::*;
/// let codec = CursorCodec::<i32, i32>::new();
/// assert_eq!(codec.encode(&2, &3), "AgAAAA|AwAAAA");
/// ```
pub mod prelude {
    pub use crate::sql::{Postgres, Sqlite};
    pub use crate::{
        CompositeCodec, CompositeKey, CursorCodec, CursorError, Edge, EntityKey, KeyCodec,
        OrderValue, Page, PageConfig, PageError, PageInfo, PageParams, PageSource, SeekQuery,
        SliceSource, SortDir, SqlSeek, ValidationError, paginate, paginate_with,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
