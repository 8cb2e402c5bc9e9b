//! async-graphql dynamic schema integration
//!
//! Attach discovered arguments to a field, compose the field's query from
//! the arguments it was called with, and surface composition errors in the
//! response's `errors` array next to the (empty) data.
//!
//! ```rust,ignore
//! let arguments = builder.build::<RoomType>().support_order_by().support_paging();
//!
//! let rooms = with_query_arguments(
//!     Field::new("rooms", TypeRef::named_nn_list_nn("Room"), move |ctx| {
//!         let arguments = arguments.clone();
//!         FieldFuture::new(async move {
//!             let query = apply_query_arguments(&ctx, MemoryQueryable::new(load_rooms()), &arguments);
//!             // materialize `query` ...
//!         })
//!     }),
//!     &arguments,
//! );
//! ```

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, ResolverContext};
use async_graphql::{Name, ServerError, Value};

use crate::arguments::ArgumentList;
use crate::composer::QueryComposer;
use crate::error::QueryErrors;
use crate::query::Queryable;
use crate::request::RequestArguments;
use crate::schema::{GraphType, ObjectType};

/// Add every argument in `arguments` to `field`.
pub fn with_query_arguments(field: Field, arguments: &ArgumentList) -> Field {
    arguments
        .to_query_arguments()
        .into_iter()
        .fold(field, Field::argument)
}

/// Compose `source` from the arguments the field was called with.
///
/// Composition errors are added to the response; the returned query is then
/// empty.
pub fn apply_query_arguments<Q: Queryable>(
    ctx: &ResolverContext<'_>,
    source: Q,
    arguments: &ArgumentList,
) -> Q {
    let values = RequestArguments::from_accessor(&ctx.args);
    let mut errors = QueryErrors::new();
    let query = QueryComposer::new(source, arguments, values).build(&mut errors);

    for error in errors {
        ctx.ctx.add_error(ServerError::new(error.to_string(), None));
    }
    query
}

/// Output object whose fields read from a `serde_json::Value` parent.
///
/// Resolvers returning entities of this type hand them over as
/// `FieldValue::owned_any(serde_json::Value)`; nested objects and lists of
/// objects are passed down the same way.
pub fn json_object(object: &ObjectType) -> Object {
    object.fields.iter().fold(Object::new(object.name.clone()), |output, field| {
        let name = field.name.clone();
        let ty = field.ty.clone();
        let mut definition = Field::new(field.name.clone(), field.ty.type_ref(), move |ctx| {
            let name = name.clone();
            let ty = ty.clone();
            FieldFuture::new(async move {
                let parent = ctx.parent_value.try_downcast_ref::<serde_json::Value>()?;
                let value = parent.get(&name).cloned().unwrap_or_default();
                Ok(json_field_value(value, &ty))
            })
        });
        if let Some(ref description) = field.description {
            definition = definition.description(description.clone());
        }
        output.field(definition)
    })
}

fn json_field_value<'a>(value: serde_json::Value, ty: &GraphType) -> Option<FieldValue<'a>> {
    if value.is_null() {
        return None;
    }

    match ty.unwrap_non_null() {
        GraphType::Object(_) => Some(FieldValue::owned_any(value)),
        GraphType::List(element) => match value {
            serde_json::Value::Array(items) => Some(FieldValue::list(
                items
                    .into_iter()
                    .map(|item| json_field_value(item, element).unwrap_or(FieldValue::NULL)),
            )),
            _ => None,
        },
        GraphType::Enum(_) => match value {
            serde_json::Value::String(s) => Some(FieldValue::value(Value::Enum(Name::new(s)))),
            _ => None,
        },
        GraphType::Scalar(_) => Value::from_json(value).ok().map(FieldValue::value),
        GraphType::NonNull(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarKind;

    #[test]
    fn test_scalars_and_nulls() {
        let int = GraphType::scalar(ScalarKind::Int);
        assert!(json_field_value(serde_json::Value::Null, &int).is_none());
        assert!(json_field_value(serde_json::json!(3), &int).is_some());
    }

    #[test]
    fn test_enum_requires_string() {
        let status = GraphType::enumeration("RoomStatus");
        assert!(json_field_value(serde_json::json!("Available"), &status).is_some());
        assert!(json_field_value(serde_json::json!(1), &status).is_none());
    }
}
