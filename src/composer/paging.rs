//! Paging phase
//!
//! Pages are zero-based: page `p` of size `n` skips `p * n` rows and takes `n`.

use async_graphql::Value;

use crate::arguments::{ArgumentKind, ArgumentList};
use crate::error::QueryError;
use crate::query::MAX_ROWS;
use crate::request::RequestArguments;

/// Rows to skip and take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub skip: u64,
    pub take: u64,
}

/// Paging requested through the page arguments; `None` when neither is supplied.
pub(crate) fn build_paging(
    arguments: &ArgumentList,
    values: &RequestArguments,
) -> Result<Option<Paging>, QueryError> {
    let (Some(page), Some(page_size)) = (
        arguments.first_of(ArgumentKind::Page),
        arguments.first_of(ArgumentKind::PageSize),
    ) else {
        return Ok(None);
    };

    let supplied = |name: &str| values.get(name).filter(|v| !matches!(v, Value::Null));

    match (supplied(page.name()), supplied(page_size.name())) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(QueryError::IncompletePaging {
            missing: page_size.name().to_string(),
            present: page.name().to_string(),
        }),
        (None, Some(_)) => Err(QueryError::IncompletePaging {
            missing: page.name().to_string(),
            present: page_size.name().to_string(),
        }),
        (Some(page_value), Some(size_value)) => {
            let index = non_negative(page.name(), page_value)?;
            let size = non_negative(page_size.name(), size_value)?;
            let skip = index
                .checked_mul(size)
                .filter(|skip| *skip <= MAX_ROWS)
                .ok_or_else(|| QueryError::PagingOverflow {
                page: page.name().to_string(),
                page_size: page_size.name().to_string(),
            })?;
            Ok(Some(Paging { skip, take: size }))
        }
    }
}

fn non_negative(argument: &str, value: &Value) -> Result<u64, QueryError> {
    let invalid = |shown: String| QueryError::InvalidPagingValue {
        argument: argument.to_string(),
        value: shown,
    };

    match value {
        Value::Number(n) => n
            .as_u64()
            .filter(|n| *n <= MAX_ROWS)
            .ok_or_else(|| invalid(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n <= MAX_ROWS)
            .ok_or_else(|| invalid(s.clone())),
        other => Err(invalid(other.to_string())),
    }
}
