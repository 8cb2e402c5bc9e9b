//! Argument descriptors
//!
//! One descriptor exists per discoverable leaf field (a filter argument) and
//! per pseudo-argument (order-by, page, page size).

use std::fmt;

use async_graphql::dynamic::InputValue;

use crate::error::QueryError;
use crate::schema::{GraphType, ScalarKind};

const ORDER_BY_DESCRIPTION: &str =
    "Sorts the elements of a sequence in ascending or descending order according to a key.";
const PAGE_DESCRIPTION: &str = "Zero-based index of the page to return.";
const PAGE_SIZE_DESCRIPTION: &str = "Number of elements per page.";

/// Disjoint categories of arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// Argument backed by a schema leaf; carries an entity path
    Filter,
    OrderBy,
    Page,
    PageSize,
}

/// One member step on the backing entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPathSegment {
    /// Member name; may be dotted when the path resolver flattens members
    pub path: String,
    /// The member is a collection and must be traversed existentially
    pub is_list: bool,
    /// The member may be absent
    pub is_nullable: bool,
}

impl EntityPathSegment {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_list: false,
            is_nullable: false,
        }
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Member names of this segment, split on dots.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|m| !m.is_empty())
    }
}

/// Ordered member steps from the root entity to a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPath {
    segments: Vec<EntityPathSegment>,
}

impl EntityPath {
    pub fn new(segments: Vec<EntityPathSegment>) -> Self {
        Self { segments }
    }

    /// Path without collection or nullability flags, from `A.B.C` notation.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.').map(EntityPathSegment::new).collect())
    }

    pub fn segments(&self) -> &[EntityPathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_list(&self) -> bool {
        self.segments.iter().any(|s| s.is_list)
    }

    /// New path with one more segment appended.
    pub fn child(&self, segment: EntityPathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.path)?;
        }
        Ok(())
    }
}

/// How the leaf is reached relative to its nearest collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Container {
    /// No list-valued segment on the path
    #[default]
    Direct,
    /// The segment at this index is the nearest list-valued ancestor
    Collection { segment: usize },
}

impl Container {
    /// Nearest list-valued segment of `segments`.
    pub fn of(segments: &[EntityPathSegment]) -> Self {
        segments
            .iter()
            .rposition(|s| s.is_list)
            .map(|segment| Container::Collection { segment })
            .unwrap_or_default()
    }
}

/// A single discoverable argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptor {
    kind: ArgumentKind,
    name: String,
    graphql_path: Option<String>,
    entity_path: EntityPath,
    argument_type: GraphType,
    is_required: bool,
    container: Container,
    description: Option<String>,
}

impl ArgumentDescriptor {
    /// Filter argument named after its graph path.
    ///
    /// `argument_type` is the GraphQL type of the exposed argument;
    /// `is_required` records whether the leaf field itself is non-null.
    pub fn filter(
        graphql_path: impl Into<String>,
        entity_path: EntityPath,
        argument_type: GraphType,
        is_required: bool,
    ) -> Result<Self, QueryError> {
        let graphql_path = graphql_path.into();
        if entity_path.is_empty() {
            return Err(QueryError::EmptyEntityPath(graphql_path));
        }

        Ok(Self {
            kind: ArgumentKind::Filter,
            name: graphql_path.clone(),
            container: Container::of(entity_path.segments()),
            graphql_path: Some(graphql_path),
            entity_path,
            argument_type,
            is_required,
            description: None,
        })
    }

    pub fn order_by(name: impl Into<String>) -> Self {
        Self::pseudo(ArgumentKind::OrderBy, name.into(), ScalarKind::String, ORDER_BY_DESCRIPTION)
    }

    pub fn page(name: impl Into<String>) -> Self {
        Self::pseudo(ArgumentKind::Page, name.into(), ScalarKind::Int, PAGE_DESCRIPTION)
    }

    pub fn page_size(name: impl Into<String>) -> Self {
        Self::pseudo(ArgumentKind::PageSize, name.into(), ScalarKind::Int, PAGE_SIZE_DESCRIPTION)
    }

    fn pseudo(kind: ArgumentKind, name: String, scalar: ScalarKind, description: &str) -> Self {
        Self {
            kind,
            name,
            graphql_path: None,
            entity_path: EntityPath::default(),
            argument_type: GraphType::scalar(scalar),
            is_required: false,
            container: Container::Direct,
            description: Some(description.to_string()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    /// External argument name, matched case-insensitively against requests.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concatenated graph path; `None` for pseudo-arguments.
    pub fn graphql_path(&self) -> Option<&str> {
        self.graphql_path.as_deref()
    }

    /// The graph path, or the argument name for pseudo-arguments.
    pub fn match_key(&self) -> &str {
        self.graphql_path.as_deref().unwrap_or(&self.name)
    }

    /// Empty for pseudo-arguments.
    pub fn entity_path(&self) -> &EntityPath {
        &self.entity_path
    }

    pub fn argument_type(&self) -> &GraphType {
        &self.argument_type
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// GraphQL argument definition for attaching to a field.
    pub fn to_input_value(&self) -> InputValue {
        let input = InputValue::new(self.name.clone(), self.argument_type.type_ref());
        match &self.description {
            Some(description) => input.description(description.clone()),
            None => input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_filter_requires_entity_path() {
        let result = ArgumentDescriptor::filter(
            "Id",
            EntityPath::default(),
            GraphType::scalar(ScalarKind::Int),
            true,
        );
        assert_matches!(result, Err(QueryError::EmptyEntityPath(path)) if path == "Id");
    }

    #[test]
    fn test_container_is_nearest_list() {
        let path = EntityPath::new(vec![
            EntityPathSegment::new("Rooms").list(),
            EntityPathSegment::new("RoomDetail").nullable(),
            EntityPathSegment::new("Beds"),
        ]);
        let descriptor = ArgumentDescriptor::filter(
            "RoomsRoomDetailBeds",
            path,
            GraphType::scalar(ScalarKind::Int),
            true,
        )
        .unwrap();

        assert_eq!(descriptor.container(), Container::Collection { segment: 0 });
        assert_eq!(descriptor.entity_path().to_string(), "Rooms.RoomDetail.Beds");
    }

    #[test]
    fn test_pseudo_arguments_have_no_paths() {
        let order_by = ArgumentDescriptor::order_by("Sort");
        assert_eq!(order_by.kind(), ArgumentKind::OrderBy);
        assert_eq!(order_by.graphql_path(), None);
        assert_eq!(order_by.match_key(), "Sort");
        assert!(order_by.entity_path().is_empty());
        assert_eq!(order_by.argument_type(), &GraphType::scalar(ScalarKind::String));
    }

    #[test]
    fn test_dotted_segment_members() {
        let segment = EntityPathSegment::new("RoomDetail.Beds");
        assert_eq!(segment.members().collect::<Vec<_>>(), vec!["RoomDetail", "Beds"]);
    }
}
