//! Seek queries executed against a real SQLite database.
//!
//! Every page is cross-checked against the in-memory source over the same rows.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use mik_keyset::prelude::*;
use mik_keyset::{OrderField, OrderValue};
use mik_keyset::sql::{FilterExpr, Operator, SQL_DATE_FORMAT, Value, simple};
use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};

#[derive(Debug, Clone, PartialEq)]
struct Post {
    id: i64,
    score: i32,
    title: String,
    created_at: NaiveDateTime,
    author_id: i64,
}

fn bind(value: &Value) -> SqlValue {
    match value {
        Value::Null | Value::Array(_) => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(n) => SqlValue::Integer(*n),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
    }
}

fn posts() -> Vec<Post> {
    let epoch = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (1..=25)
        .map(|id: i64| Post {
            id,
            score: i32::try_from(id % 4).unwrap(),
            title: format!("post-{id:02}"),
            // Runs of three posts share a timestamp
            created_at: epoch + Duration::milliseconds((id / 3) * 1500),
            author_id: id % 2,
        })
        .collect()
}

struct Posts {
    conn: Connection,
    seek: SqlSeek<Sqlite>,
}

impl Posts {
    fn open(rows: &[Post], seek: SqlSeek<Sqlite>) -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE posts (
                id INTEGER PRIMARY KEY,
                score INTEGER NOT NULL,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL,
                author_id INTEGER NOT NULL
            )",
        )
        .unwrap();
        for post in rows {
            conn.execute(
                "INSERT INTO posts (id, score, title, created_at, author_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    post.id,
                    post.score,
                    post.title,
                    post.created_at.format(SQL_DATE_FORMAT).to_string(),
                    post.author_id,
                ],
            )
            .unwrap();
        }
        Self { conn, seek }
    }
}

impl<O, K> PageSource<Post, O, K> for Posts
where
    O: Ord + Clone + Into<Value>,
    K: Ord + Clone + Into<Value>,
{
    type Error = rusqlite::Error;

    fn sort_dir(&self) -> SortDir {
        self.seek.sort_dir()
    }

    fn fetch(&self, query: &SeekQuery<'_, Post, O, K>) -> rusqlite::Result<Vec<Post>> {
        let q = self.seek.select(query);
        let mut stmt = self.conn.prepare(&q.sql)?;
        let rows = stmt.query_map(params_from_iter(q.params.iter().map(bind)), |r| {
            let created_at: String = r.get(3)?;
            Ok(Post {
                id: r.get(0)?,
                score: r.get(1)?,
                title: r.get(2)?,
                created_at: NaiveDateTime::parse_from_str(&created_at, SQL_DATE_FORMAT)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                author_id: r.get(4)?,
            })
        })?;
        rows.collect()
    }

    fn count(&self) -> rusqlite::Result<u64> {
        let q = self.seek.count();
        let n: i64 = self.conn.query_row(
            &q.sql,
            params_from_iter(q.params.iter().map(bind)),
            |r| r.get(0),
        )?;
        Ok(n.unsigned_abs())
    }
}

fn seek(order_column: &str, dir: SortDir) -> SqlSeek<Sqlite> {
    SqlSeek::new(Sqlite, "posts", order_column, "id")
        .dir(dir)
        .fields(&["id", "score", "title", "created_at", "author_id"])
}

/// Walk both sources page by page and require identical pages.
fn assert_same_walk<O: OrderField + Into<Value>>(
    db: &Posts,
    memory: &[Post],
    order_of: fn(&Post) -> O,
    size: u32,
    backward: bool,
) -> usize {
    let codec = CursorCodec::<O, i64>::new();
    let config = PageConfig::default();
    let slice = SliceSource::new(memory, PageSource::<Post, O, i64>::sort_dir(db));
    let key_of = |p: &Post| p.id;
    let mut cursor: Option<String> = None;
    let mut visited = 0;

    loop {
        let params = match (backward, cursor.take()) {
            (false, None) => PageParams::new().first(size),
            (false, Some(c)) => PageParams::new().first(size).after(c),
            (true, None) => PageParams::new().last(size),
            (true, Some(c)) => PageParams::new().last(size).before(c),
        };
        let params = params.with_edges(true).with_total(true);

        let from_db = paginate_with(&config, db, order_of, key_of, &codec, &params).unwrap();
        let from_memory =
            paginate_with(&config, &slice, order_of, key_of, &codec, &params).unwrap();
        assert_eq!(from_db, from_memory, "pages differ for {params:?}");

        visited += from_db.len();
        let info = from_db.page_info;
        let more = if backward {
            info.has_previous_page
        } else {
            info.has_next_page
        };
        if !more {
            return visited;
        }
        cursor = if backward {
            info.start_cursor
        } else {
            info.end_cursor
        };
    }
}

#[test]
fn integer_order_matches_memory() {
    let rows = posts();
    let db = Posts::open(&rows, seek("score", SortDir::Asc));
    for size in [1, 4, 7, 25, 30] {
        assert_eq!(assert_same_walk(&db, &rows, |p| p.score, size, false), 25);
        assert_eq!(assert_same_walk(&db, &rows, |p| p.score, size, true), 25);
    }
}

#[test]
fn descending_dates_match_memory() {
    let rows = posts();
    let db = Posts::open(&rows, seek("created_at", SortDir::Desc));
    for size in [2, 3, 10] {
        assert_eq!(assert_same_walk(&db, &rows, |p| p.created_at, size, false), 25);
        assert_eq!(assert_same_walk(&db, &rows, |p| p.created_at, size, true), 25);
    }
}

#[test]
fn text_order_matches_memory() {
    let rows = posts();
    let db = Posts::open(&rows, seek("title", SortDir::Desc));
    assert_eq!(assert_same_walk(&db, &rows, |p| p.title.clone(), 6, false), 25);
}

#[test]
fn resolved_codec_pages_long_titles() {
    // Titles long enough that their cursors run past a few kilobytes
    let rows: Vec<Post> = posts()
        .into_iter()
        .map(|p| Post {
            title: format!("{}-{}", "t".repeat(4_000), p.title),
            ..p
        })
        .collect();
    let db = Posts::open(&rows, seek("title", SortDir::Asc));
    let codec = KeyCodec::resolve("text", "int64").unwrap();
    let order_of = |p: &Post| OrderValue::Text(p.title.clone());
    let key_of = |p: &Post| EntityKey::Int64(p.id);
    let config = PageConfig::default();

    let mut cursor: Option<String> = None;
    let mut titles = Vec::new();
    loop {
        let params = match cursor.take() {
            None => PageParams::new().first(4),
            Some(c) => PageParams::new().first(4).after(c),
        };
        let page = paginate_with(&config, &db, order_of, key_of, &codec, &params).unwrap();
        titles.extend(page.rows().into_iter().map(|p| p.title.clone()));
        if !page.page_info.has_next_page {
            break;
        }
        let end = page.page_info.end_cursor.unwrap();
        assert!(end.len() > 5_000);
        cursor = Some(end);
    }

    let mut expected: Vec<String> = rows.iter().map(|p| p.title.clone()).collect();
    expected.sort();
    assert_eq!(titles, expected);
}

#[test]
fn host_filter_restricts_page_and_total() {
    let rows = posts();
    let filter: FilterExpr = simple("author_id", Operator::Eq, Value::Int(1));
    let db = Posts::open(&rows, seek("score", SortDir::Asc).filter(filter));
    let codec = CursorCodec::<i32, i64>::new();

    let page = paginate_with(
        &PageConfig::default(),
        &db,
        |p: &Post| p.score,
        |p: &Post| p.id,
        &codec,
        &PageParams::new().first(50).with_total(true),
    )
    .unwrap();

    assert_eq!(page.len(), 13);
    assert!(page.rows().iter().all(|p| p.author_id == 1));
    assert_eq!(page.page_info.total_count, Some(13));
    assert!(!page.page_info.has_next_page);
}
