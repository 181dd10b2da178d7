//! SQL statements for a table-backed source.

use crate::sql::{
    Dialect, FilterExpr, KeysetCondition, QueryBuilder, QueryResult, SortField, Value,
    assert_valid_sql_identifier,
};
use crate::seek::{Seek, SeekQuery, SortDir};

/// Builds the seek `SELECT` and the `COUNT(*)` for one table.
///
/// `SqlSeek` only renders SQL; the host executes it and maps rows back,
/// typically from inside its own [`PageSource`](crate::PageSource) impl.
///
/// ```
/// use mik_keyset::sql::Sqlite;
/// use mik_keyset::{SeekQuery, SortDir, SqlSeek};
///
/// struct Post { id: i64, score: i32 }
///
/// let seek = SqlSeek::new(Sqlite, "posts", "score", "id").fields(&["id", "score"]);
/// let order = |p: &Post| p.score;
/// let key = |p: &Post| p.id;
/// let query = SeekQuery::<Post, i32, i64>::new(SortDir::Asc, 11, &order, &key);
///
/// assert_eq!(
///     seek.select(&query).sql,
///     "SELECT id, score FROM posts ORDER BY score ASC, id ASC LIMIT 11"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlSeek<D: Dialect> {
    dialect: D,
    table: String,
    order_column: String,
    key_column: String,
    fields: Vec<String>,
    dir: SortDir,
    filter: Option<FilterExpr>,
}

impl<D: Dialect> SqlSeek<D> {
    /// Seek through `table` ordered by `order_column`, ties broken by `key_column`.
    ///
    /// # Panics
    ///
    /// Panics if any name is not a valid SQL identifier.
    pub fn new(
        dialect: D,
        table: impl Into<String>,
        order_column: impl Into<String>,
        key_column: impl Into<String>,
    ) -> Self {
        let table = table.into();
        let order_column = order_column.into();
        let key_column = key_column.into();
        assert_valid_sql_identifier(&table, "table");
        assert_valid_sql_identifier(&order_column, "order column");
        assert_valid_sql_identifier(&key_column, "key column");
        Self {
            dialect,
            table,
            order_column,
            key_column,
            fields: Vec::new(),
            dir: SortDir::Asc,
            filter: None,
        }
    }

    /// Declared direction of the order column.
    #[must_use]
    pub const fn dir(mut self, dir: SortDir) -> Self {
        self.dir = dir;
        self
    }

    /// Columns to select. Empty selects `*`.
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid SQL identifier.
    #[must_use]
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Restrict the collection. Applies to both the page and the count.
    #[must_use]
    pub fn filter(mut self, expr: FilterExpr) -> Self {
        self.filter = Some(expr);
        self
    }

    /// Declared direction of the order column.
    pub const fn sort_dir(&self) -> SortDir {
        self.dir
    }

    fn builder(&self) -> QueryBuilder<D> {
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        let builder = QueryBuilder::new(self.dialect, self.table.as_str()).fields(&fields);
        match &self.filter {
            Some(expr) => builder.filter_expr(expr.clone()),
            None => builder,
        }
    }

    /// The page query for `query`: keyset predicate, fetch order, `LIMIT`.
    ///
    /// Bound values bind through their [`Value`] conversion, which covers
    /// every order and key type as well as [`OrderValue`](crate::OrderValue)
    /// and [`EntityKey`](crate::EntityKey).
    pub fn select<T, O, K>(&self, query: &SeekQuery<'_, T, O, K>) -> QueryResult
    where
        O: Ord + Clone + Into<Value>,
        K: Ord + Clone + Into<Value>,
    {
        let display = [
            SortField::new(self.order_column.as_str(), query.sort_dir()),
            SortField::new(self.key_column.as_str(), SortDir::Asc),
        ];

        let mut builder = self.builder();

        if let Some(bound) = query.bound() {
            let values = vec![bound.order.clone().into(), bound.key.clone().into()];
            let condition = match bound.side {
                Seek::After => KeysetCondition::after(&display, values),
                Seek::Before => KeysetCondition::before(&display, values),
            };
            if let Some(condition) = condition {
                builder = builder.keyset(condition);
            }
        }

        let order_by: Vec<SortField> = if query.is_reversed() {
            display.iter().map(SortField::reversed).collect()
        } else {
            display.to_vec()
        };

        let limit = u32::try_from(query.limit()).unwrap_or(u32::MAX);
        builder.sorts(&order_by).limit(limit).build()
    }

    /// `SELECT COUNT(*)` over the filtered collection.
    pub fn count(&self) -> QueryResult {
        self.builder().count().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seek::SeekBound;
    use crate::sql::{Operator, Postgres, Sqlite, simple};

    struct Post {
        id: i64,
        score: i32,
    }

    fn order(p: &Post) -> i32 {
        p.score
    }

    fn key(p: &Post) -> i64 {
        p.id
    }

    #[test]
    fn test_select_forward_after() {
        let seek = SqlSeek::new(Postgres, "posts", "score", "id");
        let query = SeekQuery::<Post, i32, i64>::new(SortDir::Asc, 3, &order, &key)
            .with_bound(SeekBound {
                side: Seek::After,
                order: 2,
                key: 3,
            });
        let result = seek.select(&query);
        assert_eq!(
            result.sql,
            "SELECT * FROM posts WHERE (score > $1 OR (score = $2 AND id > $3)) \
             ORDER BY score ASC, id ASC LIMIT 3"
        );
        assert_eq!(result.params, vec![Value::Int(2), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_select_backward_descending_reverses_order_by() {
        let seek = SqlSeek::new(Sqlite, "posts", "score", "id")
            .dir(SortDir::Desc)
            .fields(&["id", "score"]);
        let query = SeekQuery::<Post, i32, i64>::new(seek.sort_dir(), 2, &order, &key)
            .with_bound(SeekBound {
                side: Seek::Before,
                order: 5,
                key: 10,
            })
            .reversed(true);
        assert_eq!(
            seek.select(&query).sql,
            "SELECT id, score FROM posts WHERE (score > ?1 OR (score = ?2 AND id < ?3)) \
             ORDER BY score ASC, id DESC LIMIT 2"
        );
    }

    #[test]
    fn test_filter_applies_to_select_and_count() {
        let seek = SqlSeek::new(Sqlite, "posts", "score", "id").filter(simple(
            "author_id",
            Operator::Eq,
            Value::Int(4),
        ));
        let query = SeekQuery::<Post, i32, i64>::new(SortDir::Asc, 1, &order, &key)
            .with_bound(SeekBound {
                side: Seek::After,
                order: 1,
                key: 1,
            });

        let select = seek.select(&query);
        assert!(select.sql.starts_with("SELECT * FROM posts WHERE author_id = ?1 AND (score > ?2"));
        assert_eq!(select.params.len(), 4);

        let count = seek.count();
        assert_eq!(count.sql, "SELECT COUNT(*) FROM posts WHERE author_id = ?1");
        assert_eq!(count.params, vec![Value::Int(4)]);
    }

    #[test]
    fn test_select_binds_dynamic_keys() {
        use crate::codec::{EntityKey, OrderValue};

        let order = |p: &Post| OrderValue::Int32(p.score);
        let key = |p: &Post| EntityKey::Int64(p.id);
        let seek = SqlSeek::new(Postgres, "posts", "score", "id");
        let query = SeekQuery::<Post, OrderValue, EntityKey>::new(SortDir::Asc, 3, &order, &key)
            .with_bound(SeekBound {
                side: Seek::After,
                order: OrderValue::Int32(2),
                key: EntityKey::Int64(3),
            });
        assert_eq!(
            seek.select(&query).params,
            vec![Value::Int(2), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    #[should_panic(expected = "Invalid SQL order column name")]
    fn test_rejects_bad_order_column() {
        let _ = SqlSeek::new(Postgres, "posts", "score desc", "id");
    }
}
