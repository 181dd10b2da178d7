//! Keyset predicate generation.

use super::types::{CompoundFilter, Filter, FilterExpr, Operator, SortField, Value};
use crate::seek::SortDir;

/// Keyset pagination condition.
///
/// Expands a row-value comparison `(a, b) > ($1, $2)` into the portable
/// `(a > $1) OR (a = $2 AND b > $3)` form, honoring each field's direction.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetCondition {
    /// The sort fields and their directions, in display order.
    pub sort_fields: Vec<SortField>,
    /// The boundary value for each sort field.
    pub values: Vec<Value>,
    /// `true` selects rows after the boundary, `false` rows before it.
    pub forward: bool,
}

impl KeysetCondition {
    /// Rows strictly after `values` in the order given by `sorts`.
    ///
    /// Returns `None` when `sorts` is empty or the value count does not match.
    #[must_use]
    pub fn after(sorts: &[SortField], values: Vec<Value>) -> Option<Self> {
        Self::new(sorts, values, true)
    }

    /// Rows strictly before `values` in the order given by `sorts`.
    #[must_use]
    pub fn before(sorts: &[SortField], values: Vec<Value>) -> Option<Self> {
        Self::new(sorts, values, false)
    }

    fn new(sorts: &[SortField], values: Vec<Value>, forward: bool) -> Option<Self> {
        if sorts.is_empty() || sorts.len() != values.len() {
            return None;
        }
        Some(Self {
            sort_fields: sorts.to_vec(),
            values,
            forward,
        })
    }

    /// Convert to a filter expression for the query builder.
    ///
    /// For 3 fields: `(a > 1) OR (a = 1 AND b > 2) OR (a = 1 AND b = 2 AND c > 3)`.
    #[must_use]
    pub fn to_filter_expr(&self) -> FilterExpr {
        let mut or_conditions: Vec<FilterExpr> = Vec::with_capacity(self.sort_fields.len());

        for (i, (sort, value)) in self.sort_fields.iter().zip(&self.values).enumerate() {
            // Equality on every preceding field, then the strict comparison
            let mut and_conditions: Vec<FilterExpr> = self.sort_fields[..i]
                .iter()
                .zip(&self.values)
                .map(|(prev, prev_value)| Self::condition(&prev.field, Operator::Eq, prev_value))
                .collect();
            and_conditions.push(Self::condition(
                &sort.field,
                self.get_operator(sort.dir),
                value,
            ));

            or_conditions.push(collapse(and_conditions, CompoundFilter::and));
        }

        collapse(or_conditions, CompoundFilter::or)
    }

    fn condition(field: &str, op: Operator, value: &Value) -> FilterExpr {
        FilterExpr::Simple(Filter {
            field: field.to_string(),
            op,
            value: value.clone(),
        })
    }

    const fn get_operator(&self, dir: SortDir) -> Operator {
        match (self.forward, dir) {
            (true, SortDir::Asc) | (false, SortDir::Desc) => Operator::Gt,
            (true, SortDir::Desc) | (false, SortDir::Asc) => Operator::Lt,
        }
    }
}

/// A lone expression stays bare; several combine under `wrap`.
fn collapse(mut exprs: Vec<FilterExpr>, wrap: fn(Vec<FilterExpr>) -> CompoundFilter) -> FilterExpr {
    if exprs.len() == 1 {
        if let Some(only) = exprs.pop() {
            return only;
        }
    }
    FilterExpr::Compound(wrap(exprs))
}
