//! Shared filter building functions.

use super::dialect::Dialect;
use super::types::{CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, Value};

/// Build a filter expression (simple or compound).
pub(super) fn build_filter_expr_impl<D: Dialect>(
    dialect: &D,
    expr: &FilterExpr,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    match expr {
        FilterExpr::Simple(filter) => build_condition_impl(dialect, filter, start_idx),
        FilterExpr::Compound(compound) => build_compound_filter_impl(dialect, compound, start_idx),
    }
}

/// Build a compound filter (AND, OR, NOT).
pub(super) fn build_compound_filter_impl<D: Dialect>(
    dialect: &D,
    compound: &CompoundFilter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let mut idx = start_idx;
    let mut all_params = Vec::new();
    let mut conditions = Vec::new();

    for filter_expr in &compound.filters {
        let (condition, params, new_idx) = build_filter_expr_impl(dialect, filter_expr, idx);
        conditions.push(condition);
        all_params.extend(params);
        idx = new_idx;
    }

    let sql = match (compound.op, conditions.len()) {
        // Empty AND is vacuously true, empty OR vacuously false
        (LogicalOp::And, 0) => "1=1".to_string(),
        (LogicalOp::Or, 0) => "1=0".to_string(),
        (LogicalOp::And | LogicalOp::Or, 1) => conditions.concat(),
        (LogicalOp::And, _) => format!("({})", conditions.join(" AND ")),
        (LogicalOp::Or, _) => format!("({})", conditions.join(" OR ")),
        (LogicalOp::Not, _) => {
            let inner = conditions.into_iter().next().unwrap_or_else(|| "1=0".to_string());
            format!("NOT ({inner})")
        },
    };

    (sql, all_params, idx)
}

/// Build a single filter condition.
pub(super) fn build_condition_impl<D: Dialect>(
    dialect: &D,
    filter: &Filter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = &filter.field;
    let idx = start_idx;

    match (&filter.op, &filter.value) {
        // NULL handling
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),

        // Empty sets: nothing is IN, everything is NOT IN
        (Operator::In, Value::Array(values)) if values.is_empty() => ("1=0".to_string(), vec![], idx),
        (Operator::NotIn, Value::Array(values)) if values.is_empty() => {
            ("1=1".to_string(), vec![], idx)
        },

        (Operator::In, Value::Array(values)) => {
            let (sql, params) = dialect.in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },
        (Operator::NotIn, Value::Array(values)) => {
            let (sql, params) = dialect.not_in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },

        // Standard comparisons
        (op, value) => {
            let sql = format!("{} {} {}", field, op.as_sql(), dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    }
}
