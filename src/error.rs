//! Errors raised while building argument lists and composing queries

use thiserror::Error;

/// Errors produced by discovery contracts, query composition and query
/// evaluation.
///
/// Composition errors are reported to the caller through [`QueryErrors`]
/// rather than returned; see [`QueryComposer::build`](crate::QueryComposer::build).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("The \"{argument}\" field is empty.")]
    EmptyOrderBy { argument: String },

    #[error("The \"{argument}\" field must be a string.")]
    InvalidOrderBy { argument: String },

    #[error("The \"{argument}\" field with value \"{token}\" cannot be used without a query field.")]
    DanglingDirection { argument: String, token: String },

    #[error("The \"{argument}\" field uses an unknown field \"{field}\".")]
    UnknownOrderByField { argument: String, field: String },

    #[error("The \"{argument}\" field uses the collection field \"{field}\", which cannot be sorted.")]
    CollectionOrderByField { argument: String, field: String },

    #[error("The \"{missing}\" field is required when \"{present}\" is supplied.")]
    IncompletePaging { missing: String, present: String },

    #[error("The \"{argument}\" field must be a non-negative integer, got \"{value}\".")]
    InvalidPagingValue { argument: String, value: String },

    #[error("The \"{page}\" and \"{page_size}\" fields overflow the skip count.")]
    PagingOverflow { page: String, page_size: String },

    #[error("The \"{argument}\" argument has an unsupported value: {reason}.")]
    UnsupportedValue { argument: String, reason: String },

    #[error("Null reference while evaluating \"{path}\".")]
    NullReference { path: String },

    #[error("Expected a collection at \"{path}\".")]
    NotACollection { path: String },

    #[error("Parameter @{0} is not bound.")]
    UnboundParameter(usize),

    #[error("Failed to project entity for evaluation: {0}")]
    Projection(#[from] serde_json::Error),

    #[error("The filter argument \"{0}\" requires a non-empty entity path.")]
    EmptyEntityPath(String),

    #[error("Invalid wildcard pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Ordered, append-only collection of errors for one field resolution.
#[derive(Debug, Default)]
pub struct QueryErrors {
    errors: Vec<QueryError>,
}

impl QueryErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: QueryError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryError> {
        self.errors.iter()
    }

    /// Human-readable messages, in the order the errors were recorded.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl IntoIterator for QueryErrors {
    type Item = QueryError;
    type IntoIter = std::vec::IntoIter<QueryError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryErrors {
    type Item = &'a QueryError;
    type IntoIter = std::slice::Iter<'a, QueryError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
