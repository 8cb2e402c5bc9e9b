//! Static description of graph types
//!
//! These types describe one node of the exposed query schema: a scalar,
//! an enumeration, an object, or a list / non-null wrapper around another
//! node. Object types are referenced by name and looked up through the
//! [`TypeRegistry`](super::TypeRegistry) during discovery.

use std::fmt;

use async_graphql::dynamic::TypeRef;

/// Built-in and custom scalar kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
    /// Calendar date; filters on it match a whole day.
    Date,
    DateTime,
    /// Any other named scalar (e.g. `Decimal`).
    Custom(String),
}

impl ScalarKind {
    /// GraphQL name of this scalar
    pub fn name(&self) -> &str {
        match self {
            ScalarKind::Int => TypeRef::INT,
            ScalarKind::Float => TypeRef::FLOAT,
            ScalarKind::String => TypeRef::STRING,
            ScalarKind::Boolean => TypeRef::BOOLEAN,
            ScalarKind::Id => TypeRef::ID,
            ScalarKind::Date => "Date",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::Custom(name) => name,
        }
    }

    /// Parse a scalar name, mapping unknown names to [`ScalarKind::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Int" => ScalarKind::Int,
            "Float" => ScalarKind::Float,
            "String" => ScalarKind::String,
            "Boolean" => ScalarKind::Boolean,
            "ID" => ScalarKind::Id,
            "Date" => ScalarKind::Date,
            "DateTime" => ScalarKind::DateTime,
            other => ScalarKind::Custom(other.to_string()),
        }
    }
}

/// A (possibly wrapped) graph type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphType {
    Scalar(ScalarKind),
    Enum(String),
    /// Reference to an object type by its registered name
    Object(String),
    List(Box<GraphType>),
    NonNull(Box<GraphType>),
}

impl GraphType {
    pub fn scalar(kind: ScalarKind) -> Self {
        GraphType::Scalar(kind)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        GraphType::Enum(name.into())
    }

    pub fn object(name: impl Into<String>) -> Self {
        GraphType::Object(name.into())
    }

    pub fn list(inner: GraphType) -> Self {
        GraphType::List(Box::new(inner))
    }

    /// Wrap in non-null. Wrapping twice is a no-op.
    pub fn non_null(inner: GraphType) -> Self {
        match inner {
            GraphType::NonNull(_) => inner,
            other => GraphType::NonNull(Box::new(other)),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, GraphType::NonNull(_))
    }

    /// The type with one non-null wrapper removed, if present.
    pub fn unwrap_non_null(&self) -> &GraphType {
        match self {
            GraphType::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self.unwrap_non_null(), GraphType::Scalar(ScalarKind::Date))
    }

    /// Name of the object this type refers to, looking through non-null.
    pub fn object_name(&self) -> Option<&str> {
        match self.unwrap_non_null() {
            GraphType::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Element type of a list, looking through non-null on the list itself.
    pub fn list_element(&self) -> Option<&GraphType> {
        match self.unwrap_non_null() {
            GraphType::List(element) => Some(element),
            _ => None,
        }
    }

    /// Convert to an async-graphql type reference.
    pub fn type_ref(&self) -> TypeRef {
        match self {
            GraphType::Scalar(kind) => TypeRef::named(kind.name().to_string()),
            GraphType::Enum(name) | GraphType::Object(name) => TypeRef::named(name.clone()),
            GraphType::List(inner) => TypeRef::List(Box::new(inner.type_ref())),
            GraphType::NonNull(inner) => TypeRef::NonNull(Box::new(inner.type_ref())),
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphType::Scalar(kind) => f.write_str(kind.name()),
            GraphType::Enum(name) | GraphType::Object(name) => f.write_str(name),
            GraphType::List(inner) => write!(f, "[{inner}]"),
            GraphType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A declared field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: GraphType,
    pub description: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: GraphType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An object ("complex") graph type.
///
/// `model` names the type backing this object on the data side; it is
/// handed to the path resolver as the source type of every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: String,
    pub model: String,
    pub fields: Vec<FieldDef>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, keeping declaration order.
    pub fn field(mut self, name: impl Into<String>, ty: GraphType) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }

    pub fn field_def(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// Implemented by `#[derive(GraphObject)]`.
pub trait GraphObject {
    /// Registered name of the object type
    const TYPE_NAME: &'static str;

    /// Build the description of this object type.
    fn object_type() -> ObjectType;
}
