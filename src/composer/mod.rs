//! Query composition
//!
//! A [`QueryComposer`] turns the argument values of one field resolution
//! into filter, order-by and paging operations on a [`Queryable`], applied
//! in that order.
//!
//! # Failure handling
//!
//! The first error stops composition. It is appended once to the caller's
//! [`QueryErrors`] and the source's empty form is returned, so a field never
//! resolves to rows that ignore part of the request.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut errors = QueryErrors::new();
//! let rooms = QueryComposer::new(MemoryQueryable::new(rooms), &arguments, values)
//!     .build(&mut errors)
//!     .to_vec()?;
//! ```

mod filter;
mod order_by;
mod paging;

pub use paging::Paging;

use crate::arguments::ArgumentList;
use crate::error::{QueryError, QueryErrors};
use crate::query::{Filter, Queryable, SortKey};
use crate::request::RequestArguments;

/// Everything a request asks for, resolved against the argument list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    pub filter: Option<Filter>,
    pub order_by: Vec<SortKey>,
    pub paging: Option<Paging>,
}

impl QueryPlan {
    /// Apply filter, then ordering, then paging.
    pub fn apply<Q: Queryable>(self, mut source: Q) -> Q {
        if let Some(filter) = self.filter {
            source = source.filter(filter);
        }
        if !self.order_by.is_empty() {
            source = source.order_by(self.order_by);
        }
        if let Some(paging) = self.paging {
            source = source.skip(paging.skip).take(paging.take);
        }
        source
    }
}

/// Composes one field resolution's query.
pub struct QueryComposer<'a, Q> {
    source: Q,
    arguments: &'a ArgumentList,
    values: RequestArguments,
}

impl<'a, Q: Queryable> QueryComposer<'a, Q> {
    pub fn new(source: Q, arguments: &'a ArgumentList, values: RequestArguments) -> Self {
        Self {
            source,
            arguments,
            values,
        }
    }

    /// Resolve the request without touching the source.
    pub fn plan(&self) -> Result<QueryPlan, QueryError> {
        self.log_unknown_arguments();

        let filter = filter::build_filter(self.arguments, &self.values)?;
        if let Some(ref filter) = filter {
            tracing::debug!(filter = %filter, params = filter.params.len(), "Composed filter");
        }

        let order_by = order_by::build_order_by(self.arguments, &self.values)?;
        if !order_by.is_empty() {
            let keys = order_by.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            tracing::debug!(order_by = %keys, "Composed ordering");
        }

        let paging = paging::build_paging(self.arguments, &self.values)?;
        if let Some(paging) = paging {
            tracing::debug!(skip = paging.skip, take = paging.take, "Composed paging");
        }

        Ok(QueryPlan {
            filter,
            order_by,
            paging,
        })
    }

    /// Compose the query, returning the first error instead of reporting it.
    pub fn try_build(self) -> Result<Q, QueryError> {
        let plan = self.plan()?;
        Ok(plan.apply(self.source))
    }

    /// Compose the query. On error, report it to `errors` and return the
    /// empty query.
    pub fn build(self, errors: &mut QueryErrors) -> Q {
        match self.plan() {
            Ok(plan) => plan.apply(self.source),
            Err(e) => {
                tracing::warn!(error = %e, "Query composition failed, returning no rows");
                errors.push(e);
                self.source.none()
            }
        }
    }

    fn log_unknown_arguments(&self) {
        for (name, _) in self.values.iter() {
            if !self.arguments.iter().any(|d| d.name().eq_ignore_ascii_case(name)) {
                tracing::trace!(argument = %name, "Ignoring argument without descriptor");
            }
        }
    }
}
