//! Graph type descriptions consumed by argument discovery.

mod registry;
mod types;

pub use registry::{ObjectTypeFactory, TypeRegistry};
pub use types::{FieldDef, GraphObject, GraphType, ObjectType, ScalarKind};
