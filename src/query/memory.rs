//! In-memory queryable
//!
//! Evaluates composed queries over the `serde_json` projection of each
//! entity, so any `Serialize` type can be queried with the member names it
//! serializes to.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use super::expr::{CompareOp, Comparison, Expr, Filter, MemberPath, SortDirection, SortKey};
use super::queryable::Queryable;
use super::value::{QueryValue, parse_datetime};
use crate::error::QueryError;

static NULL: Value = Value::Null;

#[derive(Debug, Clone)]
enum Operation {
    Filter(Filter),
    OrderBy(Vec<SortKey>),
    Skip(u64),
    Take(u64),
}

/// Queryable over an owned collection.
#[derive(Debug, Clone)]
pub struct MemoryQueryable<T> {
    items: Vec<T>,
    operations: Vec<Operation>,
    none: bool,
}

impl<T> MemoryQueryable<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            operations: Vec::new(),
            none: false,
        }
    }

    /// True once [`Queryable::none`] has been applied.
    pub fn is_none(&self) -> bool {
        self.none
    }
}

impl<T: Serialize + Clone> MemoryQueryable<T> {
    /// Evaluate the composed operations.
    pub fn to_vec(&self) -> Result<Vec<T>, QueryError> {
        if self.none {
            return Ok(Vec::new());
        }

        let mut rows = self
            .items
            .iter()
            .map(|item| Ok((serde_json::to_value(item)?, item)))
            .collect::<Result<Vec<_>, QueryError>>()?;

        for operation in &self.operations {
            rows = match operation {
                Operation::Filter(filter) => {
                    let mut kept = Vec::with_capacity(rows.len());
                    for row in rows {
                        if eval(&filter.expr, &row.0, &filter.params)? {
                            kept.push(row);
                        }
                    }
                    kept
                }
                Operation::OrderBy(keys) => {
                    rows.sort_by(|a, b| compare_rows(&a.0, &b.0, keys));
                    rows
                }
                Operation::Skip(count) => rows.into_iter().skip(to_usize(*count)).collect(),
                Operation::Take(count) => rows.into_iter().take(to_usize(*count)).collect(),
            };
        }

        Ok(rows.into_iter().map(|(_, item)| item.clone()).collect())
    }

    pub fn count(&self) -> Result<usize, QueryError> {
        Ok(self.to_vec()?.len())
    }
}

impl<T> Queryable for MemoryQueryable<T> {
    fn filter(mut self, filter: Filter) -> Self {
        self.operations.push(Operation::Filter(filter));
        self
    }

    fn order_by(mut self, keys: Vec<SortKey>) -> Self {
        self.operations.push(Operation::OrderBy(keys));
        self
    }

    fn skip(mut self, count: u64) -> Self {
        self.operations.push(Operation::Skip(count));
        self
    }

    fn take(mut self, count: u64) -> Self {
        self.operations.push(Operation::Take(count));
        self
    }

    fn none(mut self) -> Self {
        self.none = true;
        self
    }
}

fn to_usize(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

fn eval(expr: &Expr, scope: &Value, params: &[QueryValue]) -> Result<bool, QueryError> {
    match expr {
        Expr::Compare(comparison) => eval_comparison(comparison, scope, params),
        Expr::Any {
            collection,
            null_propagating,
            predicate,
        } => match access(scope, collection, *null_propagating)? {
            Value::Null => Ok(false),
            Value::Array(elements) => {
                for element in elements {
                    if eval(predicate, element, params)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Err(QueryError::NotACollection {
                path: collection.to_string(),
            }),
        },
        Expr::And(exprs) => {
            for expr in exprs {
                if !eval(expr, scope, params)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

fn eval_comparison(comparison: &Comparison, scope: &Value, params: &[QueryValue]) -> Result<bool, QueryError> {
    let param = params
        .get(comparison.param)
        .ok_or(QueryError::UnboundParameter(comparison.param))?;
    let value = access(scope, &comparison.member, comparison.null_propagating)?;

    Ok(match comparison.op {
        CompareOp::Eq => match (value, param) {
            (Value::Null, QueryValue::Null) => true,
            _ => compare(value, param) == Some(Ordering::Equal),
        },
        CompareOp::Ge => matches!(compare(value, param), Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::Lt => compare(value, param) == Some(Ordering::Less),
    })
}

/// Follow `path` from `scope`.
///
/// A member missing from an object reads as null. Reading through a null
/// intermediate fails unless `null_propagating` is set, in which case the
/// whole access reads as null.
fn access<'v>(scope: &'v Value, path: &MemberPath, null_propagating: bool) -> Result<&'v Value, QueryError> {
    let mut current = scope;
    for (i, member) in path.members().iter().enumerate() {
        if current.is_null() {
            if null_propagating {
                return Ok(&NULL);
            }
            return Err(QueryError::NullReference {
                path: path.members()[..=i].join("."),
            });
        }
        current = current.get(member.as_str()).unwrap_or(&NULL);
    }
    Ok(current)
}

/// Order a stored value against a parameter; `None` when incomparable.
fn compare(value: &Value, param: &QueryValue) -> Option<Ordering> {
    match (value, param) {
        (Value::Bool(a), QueryValue::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(n), QueryValue::Int(i)) => match n.as_i64() {
            Some(a) => Some(a.cmp(i)),
            None => n.as_f64()?.partial_cmp(&(*i as f64)),
        },
        (Value::Number(n), QueryValue::Float(f)) => n.as_f64()?.partial_cmp(f),
        (Value::String(a), QueryValue::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::String(a), QueryValue::DateTime(b)) => Some(parse_datetime(a)?.cmp(b)),
        (Value::Array(a), QueryValue::List(b)) => {
            let equal = a.len() == b.len()
                && a.iter().zip(b).all(|(a, b)| compare(a, b) == Some(Ordering::Equal));
            equal.then_some(Ordering::Equal)
        }
        _ => None,
    }
}

fn compare_rows(a: &Value, b: &Value, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = access(a, &key.member, true).unwrap_or(&NULL);
        let right = access(b, &key.member, true).unwrap_or(&NULL);
        let ordering = match key.direction {
            SortDirection::Ascending => order_values(left, right),
            SortDirection::Descending => order_values(right, left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Total order used for sorting: nulls first, then booleans, numbers,
/// strings, arrays and objects.
fn order_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .partial_cmp(&b.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Detail {
        beds: i32,
    }

    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Room {
        number: i32,
        name: Option<String>,
        detail: Option<Detail>,
    }

    fn room(number: i32, name: Option<&str>, beds: Option<i32>) -> Room {
        Room {
            number,
            name: name.map(str::to_string),
            detail: beds.map(|beds| Detail { beds }),
        }
    }

    fn rooms() -> MemoryQueryable<Room> {
        MemoryQueryable::new(vec![
            room(3, Some("Garden"), Some(2)),
            room(1, None, None),
            room(2, Some("Attic"), Some(1)),
        ])
    }

    fn numbers(rooms: &[Room]) -> Vec<i32> {
        rooms.iter().map(|r| r.number).collect()
    }

    #[test]
    fn test_equality_filter() {
        let filter = Filter::new(
            Expr::compare(MemberPath::new(["Number"]), CompareOp::Eq, 0, false),
            vec![QueryValue::Int(2)],
        );
        let result = rooms().filter(filter).to_vec().unwrap();
        assert_eq!(numbers(&result), vec![2]);
    }

    #[test]
    fn test_null_propagation_through_missing_intermediate() {
        let filter = Filter::new(
            Expr::compare(MemberPath::new(["Detail", "Beds"]), CompareOp::Eq, 0, true),
            vec![QueryValue::Int(2)],
        );
        let result = rooms().filter(filter).to_vec().unwrap();
        assert_eq!(numbers(&result), vec![3]);
    }

    #[test]
    fn test_missing_intermediate_without_propagation_fails() {
        let filter = Filter::new(
            Expr::compare(MemberPath::new(["Detail", "Beds"]), CompareOp::Eq, 0, false),
            vec![QueryValue::Int(2)],
        );
        assert_matches!(
            rooms().filter(filter).to_vec(),
            Err(QueryError::NullReference { path }) if path == "Detail.Beds"
        );
    }

    #[test]
    fn test_unbound_parameter() {
        let filter = Filter::new(
            Expr::compare(MemberPath::new(["Number"]), CompareOp::Eq, 1, false),
            vec![QueryValue::Int(2)],
        );
        assert_matches!(rooms().filter(filter).to_vec(), Err(QueryError::UnboundParameter(1)));
    }

    #[test]
    fn test_order_by_puts_nulls_first() {
        let result = rooms()
            .order_by(vec![SortKey::ascending(MemberPath::new(["Name"]))])
            .to_vec()
            .unwrap();
        assert_eq!(numbers(&result), vec![1, 2, 3]);

        let result = rooms()
            .order_by(vec![SortKey::descending(MemberPath::new(["Name"]))])
            .to_vec()
            .unwrap();
        assert_eq!(numbers(&result), vec![3, 2, 1]);
    }

    #[test]
    fn test_operations_apply_in_order() {
        let result = rooms()
            .order_by(vec![SortKey::ascending(MemberPath::new(["Number"]))])
            .skip(1)
            .take(1)
            .to_vec()
            .unwrap();
        assert_eq!(numbers(&result), vec![2]);
    }

    #[test]
    fn test_none_discards_everything() {
        let query = rooms().skip(1).none();
        assert!(query.is_none());
        assert_eq!(query.count().unwrap(), 0);
    }

    #[test]
    fn test_temporal_parameters_compare_with_iso_strings() {
        let docs = vec![
            serde_json::json!({ "At": "2019-02-03T10:00:00" }),
            serde_json::json!({ "At": "2019-02-04T00:00:00" }),
        ];
        let start = parse_datetime("2019-02-03").unwrap();
        let end = parse_datetime("2019-02-04").unwrap();
        let filter = Filter::new(
            Expr::and(vec![
                Expr::compare(MemberPath::new(["At"]), CompareOp::Ge, 0, false),
                Expr::compare(MemberPath::new(["At"]), CompareOp::Lt, 1, false),
            ]),
            vec![QueryValue::DateTime(start), QueryValue::DateTime(end)],
        );

        let result = MemoryQueryable::new(docs).filter(filter).to_vec().unwrap();
        assert_eq!(result, vec![serde_json::json!({ "At": "2019-02-03T10:00:00" })]);
    }
}
