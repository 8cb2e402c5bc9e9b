//! Leaf-path discovery
//!
//! Walks an object graph type depth-first and emits one filter argument per
//! scalar leaf reachable within the configured recursion level. Each leaf
//! gets a graph path (parent field names concatenated without a separator,
//! e.g. `RoomRoomDetailBeds`) and an entity path (resolved member names,
//! e.g. `Room.RoomDetail.Beds`).
//!
//! Repeated visits of the same type are not de-duplicated: self-referential
//! schemas (`Order -> Customer -> Orders`) are bounded by the recursion level
//! alone.
//!
//! # Usage
//!
//! ```rust,ignore
//! let builder = ArgumentListBuilder::new(Arc::new(registry))
//!     .with_config(QueryArgsConfig::default().with_list_graph_type_support(true));
//!
//! let arguments = builder.build::<BuildingType>().support_order_by().support_paging();
//! ```

use std::sync::Arc;

use crate::arguments::{
    ArgumentDescriptor, ArgumentList, EntityPath, EntityPathSegment, PseudoArgumentNames,
};
use crate::config::QueryArgsConfig;
use crate::resolver::{DefaultPathResolver, PathResolver};
use crate::schema::{FieldDef, GraphObject, GraphType, TypeRegistry};

/// How a field participates in discovery
enum FieldShape<'a> {
    Object(&'a str),
    ListOfObject(&'a str),
    Leaf,
}

/// Builds [`ArgumentList`]s from registered graph types.
#[derive(Debug, Clone)]
pub struct ArgumentListBuilder<R = DefaultPathResolver> {
    registry: Arc<TypeRegistry>,
    resolver: R,
    config: QueryArgsConfig,
}

impl ArgumentListBuilder<DefaultPathResolver> {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            resolver: DefaultPathResolver,
            config: QueryArgsConfig::default(),
        }
    }
}

impl<R: PathResolver> ArgumentListBuilder<R> {
    /// Replace the path resolver.
    pub fn with_resolver<R2: PathResolver>(self, resolver: R2) -> ArgumentListBuilder<R2> {
        ArgumentListBuilder {
            registry: self.registry,
            resolver,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: QueryArgsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QueryArgsConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Discover the arguments of a [`GraphObject`] type.
    pub fn build<T: GraphObject>(&self) -> ArgumentList {
        self.build_named(T::TYPE_NAME)
    }

    /// Discover the arguments of a registered type.
    ///
    /// Returns an empty list if `type_name` is not a registered object type.
    pub fn build_named(&self, type_name: &str) -> ArgumentList {
        let mut list = self.empty_list();
        self.populate(type_name, "", &EntityPath::default(), 0, &mut list);

        tracing::debug!(
            type_name = %type_name,
            arguments = list.len(),
            max_recursion_level = self.config.max_recursion_level,
            "Built argument list"
        );

        list
    }

    /// Discover the arguments of a single field declared on `model`.
    pub fn build_field(&self, model: &str, field: &FieldDef) -> ArgumentList {
        let mut list = self.empty_list();
        self.add_field(model, field, "", &EntityPath::default(), 0, &mut list);
        list
    }

    fn empty_list(&self) -> ArgumentList {
        ArgumentList::with_names(PseudoArgumentNames::from(&self.config))
    }

    fn populate(
        &self,
        type_name: &str,
        parent_graph_path: &str,
        parent_entity_path: &EntityPath,
        level: usize,
        list: &mut ArgumentList,
    ) {
        let Some(object) = self.registry.resolve(type_name) else {
            return;
        };

        tracing::trace!(type_name = %type_name, level, path = %parent_graph_path, "Visiting object type");

        for field in &object.fields {
            self.add_field(&object.model, field, parent_graph_path, parent_entity_path, level, list);
        }
    }

    fn add_field(
        &self,
        model: &str,
        field: &FieldDef,
        parent_graph_path: &str,
        parent_entity_path: &EntityPath,
        level: usize,
        list: &mut ArgumentList,
    ) {
        let graph_path = format!("{parent_graph_path}{}", field.name);
        let is_required = field.ty.is_non_null();
        let field_type = field.ty.unwrap_non_null();

        let mut segment = EntityPathSegment::new(self.resolver.resolve(model, &field.name, None));
        if !is_required {
            segment = segment.nullable();
        }

        match self.classify(field_type) {
            FieldShape::Object(type_name) => {
                if level >= self.config.max_recursion_level {
                    tracing::trace!(path = %graph_path, level, "Recursion level reached, skipping object field");
                    return;
                }
                let entity_path = parent_entity_path.child(segment);
                self.populate(type_name, &graph_path, &entity_path, level + 1, list);
            }
            FieldShape::ListOfObject(type_name) => {
                if !self.config.support_list_graph_type {
                    tracing::trace!(path = %graph_path, "List traversal disabled, skipping list field");
                    return;
                }
                if level >= self.config.max_recursion_level {
                    tracing::trace!(path = %graph_path, level, "Recursion level reached, skipping list field");
                    return;
                }
                let entity_path = parent_entity_path.child(segment.list());
                self.populate(type_name, &graph_path, &entity_path, level + 1, list);
            }
            FieldShape::Leaf => {
                let entity_path = parent_entity_path.child(segment);
                match ArgumentDescriptor::filter(graph_path, entity_path, field_type.clone(), is_required) {
                    Ok(descriptor) => list.push(match &field.description {
                        Some(description) => descriptor.with_description(description.clone()),
                        None => descriptor,
                    }),
                    Err(e) => tracing::warn!(error = %e, "Skipping field without entity path"),
                }
            }
        }
    }

    fn classify<'t>(&self, ty: &'t GraphType) -> FieldShape<'t> {
        match ty {
            GraphType::Object(name) if self.registry.contains(name) => FieldShape::Object(name),
            GraphType::List(element) => match element.unwrap_non_null() {
                GraphType::Object(name) if self.registry.contains(name) => {
                    FieldShape::ListOfObject(name)
                }
                GraphType::Object(name) => {
                    tracing::warn!(type_name = %name, "List element type is not registered, treating as leaf");
                    FieldShape::Leaf
                }
                _ => FieldShape::Leaf,
            },
            GraphType::Object(name) => {
                tracing::warn!(type_name = %name, "Object type is not registered, treating as leaf");
                FieldShape::Leaf
            }
            _ => FieldShape::Leaf,
        }
    }
}
