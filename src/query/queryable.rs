use super::expr::{Filter, SortKey};

/// Largest row count a back end is asked to skip or take; SQLite integers are `i64`.
pub const MAX_ROWS: u64 = i64::MAX as u64;

/// A lazily composed query over a collection of entities.
///
/// Operations only record intent; a back end evaluates them when the
/// result is materialized. They apply in call order, so `skip` after
/// `take` pages within the taken window.
pub trait Queryable: Sized {
    /// Keep entities matching `filter`. Repeated calls combine with AND.
    fn filter(self, filter: Filter) -> Self;

    /// Sort by `keys`, first key first. Replaces any earlier ordering.
    fn order_by(self, keys: Vec<SortKey>) -> Self;

    fn skip(self, count: u64) -> Self;

    fn take(self, count: u64) -> Self;

    /// The empty result, whatever was composed before.
    fn none(self) -> Self;
}
