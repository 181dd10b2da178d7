//! SELECT query builder.

use super::dialect::Dialect;
use super::filter::{build_condition_impl, build_filter_expr_impl};
use super::ident::assert_valid_sql_identifier;
use super::keyset::KeysetCondition;
use super::types::{Filter, FilterExpr, Operator, QueryResult, SortField, Value};
use crate::seek::SortDir;

/// SQL query builder with dialect support.
#[derive(Debug)]
pub struct QueryBuilder<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
    count_only: bool,
    filters: Vec<Filter>,
    filter_expr: Option<FilterExpr>,
    keyset: Option<KeysetCondition>,
    sorts: Vec<SortField>,
    limit: Option<u32>,
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a new query builder for the given table.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
            count_only: false,
            filters: Vec::new(),
            filter_expr: None,
            keyset: None,
            sorts: Vec::new(),
            limit: None,
        }
    }

    /// Set the fields to SELECT.
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

    /// Select `COUNT(*)` instead of rows. Sorts, keyset and limit are ignored.
    #[must_use]
    pub const fn count(mut self) -> Self {
        self.count_only = true;
        self
    }

    /// Add a filter condition.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid SQL identifier.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, op: Operator, value: Value) -> Self {
        let field = field.into();
        assert_valid_sql_identifier(&field, "filter field");
        self.filters.push(Filter { field, op, value });
        self
    }

    /// Set a compound filter expression, rendered before any simple filters.
    #[must_use]
    pub fn filter_expr(mut self, expr: FilterExpr) -> Self {
        self.filter_expr = Some(expr);
        self
    }

    /// Add a sort field.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid SQL identifier.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        let field = field.into();
        assert_valid_sql_identifier(&field, "sort field");
        self.sorts.push(SortField::new(field, dir));
        self
    }

    /// Add multiple sort fields.
    #[must_use]
    pub fn sorts(mut self, sorts: &[SortField]) -> Self {
        for sort in sorts {
            assert_valid_sql_identifier(&sort.field, "sort field");
        }
        self.sorts.extend(sorts.iter().cloned());
        self
    }

    /// Restrict to rows on one side of a keyset boundary.
    ///
    /// The condition's fields are validated here since they become SQL text.
    #[must_use]
    pub fn keyset(mut self, condition: KeysetCondition) -> Self {
        for sort in &condition.sort_fields {
            assert_valid_sql_identifier(&sort.field, "keyset field");
        }
        self.keyset = Some(condition);
        self
    }

    /// Set a limit.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the SQL query and parameters.
    pub fn build(self) -> QueryResult {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_idx = 1usize;

        let select_str = if self.count_only {
            "COUNT(*)".to_string()
        } else if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };

        sql.push_str(&format!("SELECT {} FROM {}", select_str, self.table));

        // WHERE clause - filter_expr, simple filters, then the keyset
        let keyset = if self.count_only { None } else { self.keyset.as_ref() };
        let mut all_conditions = Vec::new();

        if let Some(ref expr) = self.filter_expr {
            let (condition, new_params, new_idx) =
                build_filter_expr_impl(&self.dialect, expr, param_idx);
            all_conditions.push(condition);
            params.extend(new_params);
            param_idx = new_idx;
        }

        for filter in &self.filters {
            let (condition, new_params, new_idx) =
                build_condition_impl(&self.dialect, filter, param_idx);
            all_conditions.push(condition);
            params.extend(new_params);
            param_idx = new_idx;
        }

        if let Some(keyset) = keyset {
            // Note: new_idx unused - nothing after the keyset takes parameters
            let (condition, new_params, _new_idx) =
                build_filter_expr_impl(&self.dialect, &keyset.to_filter_expr(), param_idx);
            all_conditions.push(condition);
            params.extend(new_params);
        }

        if !all_conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&all_conditions.join(" AND "));
        }

        if self.count_only {
            return QueryResult { sql, params };
        }

        // ORDER BY clause
        if !self.sorts.is_empty() {
            sql.push_str(" ORDER BY ");
            let sort_parts: Vec<String> = self
                .sorts
                .iter()
                .map(|s| {
                    let dir = match s.dir {
                        SortDir::Asc => "ASC",
                        SortDir::Desc => "DESC",
                    };
                    format!("{} {}", s.field, dir)
                })
                .collect();
            sql.push_str(&sort_parts.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        QueryResult { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{Postgres, Sqlite};

    #[test]
    fn test_simple_select() {
        let result = QueryBuilder::new(Postgres, "users")
            .fields(&["id", "name"])
            .build();
        assert_eq!(result.sql, "SELECT id, name FROM users");
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_select_star_with_filter_sort_limit() {
        let result = QueryBuilder::new(Sqlite, "posts")
            .filter("published", Operator::Eq, Value::Bool(true))
            .sort("created_at", SortDir::Desc)
            .sort("id", SortDir::Asc)
            .limit(11)
            .build();
        assert_eq!(
            result.sql,
            "SELECT * FROM posts WHERE published = ?1 ORDER BY created_at DESC, id ASC LIMIT 11"
        );
        assert_eq!(result.params, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_keyset_after_filters() {
        let sorts = [
            SortField::new("created_at", SortDir::Desc),
            SortField::new("id", SortDir::Asc),
        ];
        let keyset =
            KeysetCondition::after(&sorts, vec![Value::from("2024-01-01"), Value::Int(7)]).unwrap();

        let result = QueryBuilder::new(Postgres, "posts")
            .fields(&["id", "created_at"])
            .filter("author_id", Operator::Eq, Value::Int(3))
            .keyset(keyset)
            .sorts(&sorts)
            .limit(3)
            .build();

        assert_eq!(
            result.sql,
            "SELECT id, created_at FROM posts WHERE author_id = $1 AND \
             (created_at < $2 OR (created_at = $3 AND id > $4)) \
             ORDER BY created_at DESC, id ASC LIMIT 3"
        );
        assert_eq!(
            result.params,
            vec![
                Value::Int(3),
                Value::from("2024-01-01"),
                Value::from("2024-01-01"),
                Value::Int(7),
            ]
        );
    }

    #[test]
    fn test_count_ignores_keyset_and_limit() {
        let keyset =
            KeysetCondition::after(&[SortField::new("id", SortDir::Asc)], vec![Value::Int(5)])
                .unwrap();
        let result = QueryBuilder::new(Sqlite, "posts")
            .filter_expr(crate::sql::simple("status", Operator::Ne, Value::Null))
            .keyset(keyset)
            .sort("id", SortDir::Asc)
            .limit(10)
            .count()
            .build();
        assert_eq!(result.sql, "SELECT COUNT(*) FROM posts WHERE status IS NOT NULL");
        assert!(result.params.is_empty());
    }

    #[test]
    #[should_panic(expected = "Invalid SQL table name")]
    fn test_rejects_bad_table() {
        let _ = QueryBuilder::new(Postgres, "users; DROP TABLE users");
    }

    #[test]
    #[should_panic(expected = "Invalid SQL sort field name")]
    fn test_rejects_bad_sort_field() {
        let _ = QueryBuilder::new(Postgres, "users").sort("id DESC", SortDir::Asc);
    }
}
