//! The ordered argument collection attached to one GraphQL field

use async_graphql::dynamic::InputValue;

use super::descriptor::{ArgumentDescriptor, ArgumentKind};
use crate::config::{
    DEFAULT_ORDER_BY_ARGUMENT, DEFAULT_PAGE_ARGUMENT, DEFAULT_PAGE_SIZE_ARGUMENT, QueryArgsConfig,
};
use crate::error::QueryError;
use crate::matcher::{MatchBehaviour, WildcardMatcher};

/// Names used when pseudo-arguments are added without explicit names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoArgumentNames {
    pub order_by: String,
    pub page: String,
    pub page_size: String,
}

impl Default for PseudoArgumentNames {
    fn default() -> Self {
        Self {
            order_by: DEFAULT_ORDER_BY_ARGUMENT.to_string(),
            page: DEFAULT_PAGE_ARGUMENT.to_string(),
            page_size: DEFAULT_PAGE_SIZE_ARGUMENT.to_string(),
        }
    }
}

impl From<&QueryArgsConfig> for PseudoArgumentNames {
    fn from(config: &QueryArgsConfig) -> Self {
        Self {
            order_by: config.order_by_argument.clone(),
            page: config.page_argument.clone(),
            page_size: config.page_size_argument.clone(),
        }
    }
}

/// Ordered collection of argument descriptors.
///
/// Built once per field at schema construction time. Filtering operations
/// return new collections; only [`support_order_by`](Self::support_order_by)
/// and [`support_paging`](Self::support_paging) append, and both are
/// idempotent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    descriptors: Vec<ArgumentDescriptor>,
    names: PseudoArgumentNames,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: PseudoArgumentNames) -> Self {
        Self {
            descriptors: Vec::new(),
            names,
        }
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ArgumentDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().collect(),
            names: PseudoArgumentNames::default(),
        }
    }

    pub(crate) fn push(&mut self, descriptor: ArgumentDescriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn names(&self) -> &PseudoArgumentNames {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArgumentDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ArgumentDescriptor> {
        self.descriptors.get(index)
    }

    /// First descriptor of the given kind.
    pub fn first_of(&self, kind: ArgumentKind) -> Option<&ArgumentDescriptor> {
        self.descriptors.iter().find(|d| d.kind() == kind)
    }

    /// Filter descriptor whose graph path matches, ignoring case.
    pub fn find_by_graphql_path(&self, path: &str) -> Option<&ArgumentDescriptor> {
        self.descriptors.iter().find(|d| {
            d.kind() == ArgumentKind::Filter
                && d.graphql_path().is_some_and(|p| p.eq_ignore_ascii_case(path))
        })
    }

    pub fn filter_by_kind(&self, kind: ArgumentKind) -> ArgumentList {
        self.retain(|d| d.kind() == kind)
    }

    pub fn has_order_by(&self) -> bool {
        !self.filter_by_kind(ArgumentKind::OrderBy).is_empty()
    }

    pub fn has_paging(&self) -> bool {
        !self.filter_by_kind(ArgumentKind::Page).is_empty()
            && !self.filter_by_kind(ArgumentKind::PageSize).is_empty()
    }

    /// Add an order-by argument under the configured name, unless one exists.
    pub fn support_order_by(self) -> Self {
        let name = self.names.order_by.clone();
        self.support_order_by_as(name)
    }

    /// Add an order-by argument under `name`, unless one exists under any name.
    pub fn support_order_by_as(mut self, name: impl Into<String>) -> Self {
        if !self.has_order_by() {
            self.push(ArgumentDescriptor::order_by(name));
        }
        self
    }

    /// Add page and page size arguments under the configured names, unless present.
    pub fn support_paging(self) -> Self {
        let page = self.names.page.clone();
        let page_size = self.names.page_size.clone();
        self.support_paging_as(page, page_size)
    }

    /// Add page and page size arguments as a pair, unless paging is present.
    pub fn support_paging_as(
        mut self,
        page: impl Into<String>,
        page_size: impl Into<String>,
    ) -> Self {
        if !self.has_paging() {
            self.descriptors
                .retain(|d| !matches!(d.kind(), ArgumentKind::Page | ArgumentKind::PageSize));
            self.push(ArgumentDescriptor::page(page));
            self.push(ArgumentDescriptor::page_size(page_size));
        }
        self
    }

    /// Keep descriptors whose graph path matches any wildcard pattern.
    ///
    /// Pseudo-arguments are matched by their name.
    pub fn include<S: AsRef<str>>(&self, patterns: &[S]) -> Result<ArgumentList, QueryError> {
        let matcher = WildcardMatcher::new(MatchBehaviour::AcceptOnMatch, patterns)?;
        Ok(self.retain(|d| matcher.is_match(d.match_key())))
    }

    /// Drop descriptors whose graph path matches any wildcard pattern.
    pub fn exclude<S: AsRef<str>>(&self, patterns: &[S]) -> Result<ArgumentList, QueryError> {
        let matcher = WildcardMatcher::new(MatchBehaviour::RejectOnMatch, patterns)?;
        Ok(self.retain(|d| matcher.is_match(d.match_key())))
    }

    /// Keep descriptors whose graph path (or pseudo-argument name) satisfies `predicate`.
    pub fn filter<P>(&self, predicate: P) -> ArgumentList
    where
        P: Fn(&str) -> bool,
    {
        self.retain(|d| predicate(d.match_key()))
    }

    /// Argument definitions for a field's public argument list.
    pub fn to_query_arguments(&self) -> Vec<InputValue> {
        self.descriptors
            .iter()
            .map(ArgumentDescriptor::to_input_value)
            .collect()
    }

    fn retain<P>(&self, predicate: P) -> ArgumentList
    where
        P: Fn(&ArgumentDescriptor) -> bool,
    {
        ArgumentList {
            descriptors: self
                .descriptors
                .iter()
                .filter(|d| predicate(*d))
                .cloned()
                .collect(),
            names: self.names.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a ArgumentDescriptor;
    type IntoIter = std::slice::Iter<'a, ArgumentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl FromIterator<ArgumentDescriptor> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = ArgumentDescriptor>>(iter: I) -> Self {
        Self::from_descriptors(iter)
    }
}
