//! Type-to-factory registry for object graph types

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::types::{GraphObject, ObjectType};

/// Factory producing the description of one object type.
pub type ObjectTypeFactory = Arc<dyn Fn() -> ObjectType + Send + Sync>;

/// Registry of object types, keyed by their graph type name.
///
/// Discovery never instantiates graph types on its own; every object it
/// walks into must be registered here first.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    factories: HashMap<String, ObjectTypeFactory>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type implementing [`GraphObject`].
    pub fn register<T: GraphObject + 'static>(&mut self) -> &mut Self {
        self.register_with(T::TYPE_NAME, T::object_type)
    }

    /// Register a prebuilt description under its own name.
    pub fn register_object(&mut self, object: ObjectType) -> &mut Self {
        let name = object.name.clone();
        self.register_with(name, move || object.clone())
    }

    /// Register a factory under the given name, replacing any earlier one.
    pub fn register_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> ObjectType + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(type_name = %name, "Replaced registered graph type");
        }
        self
    }

    /// Build the description of a registered object type.
    pub fn resolve(&self, name: &str) -> Option<ObjectType> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GraphType, ScalarKind};

    struct GuestType;

    impl GraphObject for GuestType {
        const TYPE_NAME: &'static str = "Guest";

        fn object_type() -> ObjectType {
            ObjectType::new("Guest", "Guest")
                .field("Id", GraphType::non_null(GraphType::scalar(ScalarKind::Int)))
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = TypeRegistry::new();
        registry.register::<GuestType>();

        let guest = registry.resolve("Guest").unwrap();
        assert_eq!(guest.fields.len(), 1);
        assert!(registry.contains("Guest"));
        assert!(registry.resolve("Room").is_none());
    }

    #[test]
    fn test_register_object_replaces_previous() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<GuestType>()
            .register_object(ObjectType::new("Guest", "GuestModel"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("Guest").unwrap().model, "GuestModel");
    }
}
