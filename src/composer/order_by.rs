//! Order-by phase
//!
//! The order-by argument holds a sequence of word tokens separated by
//! whitespace or commas. A token is either the graph path of a filter
//! argument, which starts a new ascending sort key, or `asc` / `desc`,
//! which sets the direction of the key immediately before it:
//!
//! ```text
//! "Name desc, Number"   ->  Name descending, then Number ascending
//! ```

use async_graphql::Value;

use crate::arguments::{ArgumentKind, ArgumentList};
use crate::error::QueryError;
use crate::query::{MemberPath, SortDirection, SortKey};
use crate::request::RequestArguments;

/// Sort keys requested through the order-by argument, empty when not supplied.
pub(crate) fn build_order_by(
    arguments: &ArgumentList,
    values: &RequestArguments,
) -> Result<Vec<SortKey>, QueryError> {
    let Some(order_by) = arguments.first_of(ArgumentKind::OrderBy) else {
        return Ok(Vec::new());
    };
    let argument = order_by.name();
    let Some(value) = values.get(argument) else {
        return Ok(Vec::new());
    };

    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Enum(name) => name.as_str(),
        Value::Null => "",
        _ => {
            return Err(QueryError::InvalidOrderBy {
                argument: argument.to_string(),
            });
        }
    };

    let mut keys: Vec<SortKey> = Vec::new();
    let mut after_key = false;

    for token in tokens(text) {
        if let Some(direction) = SortDirection::parse(token) {
            match keys.last_mut() {
                Some(key) if after_key => key.direction = direction,
                _ => {
                    return Err(QueryError::DanglingDirection {
                        argument: argument.to_string(),
                        token: token.to_string(),
                    });
                }
            }
            after_key = false;
            continue;
        }

        let descriptor = arguments.find_by_graphql_path(token).ok_or_else(|| {
            QueryError::UnknownOrderByField {
                argument: argument.to_string(),
                field: token.to_string(),
            }
        })?;
        if descriptor.entity_path().has_list() {
            return Err(QueryError::CollectionOrderByField {
                argument: argument.to_string(),
                field: token.to_string(),
            });
        }

        keys.push(SortKey::ascending(MemberPath::from_entity_path(descriptor.entity_path())));
        after_key = true;
    }

    if keys.is_empty() {
        return Err(QueryError::EmptyOrderBy {
            argument: argument.to_string(),
        });
    }
    Ok(keys)
}

/// Runs of word characters (letters, digits, underscore).
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::{ArgumentDescriptor, EntityPath, EntityPathSegment};
    use crate::schema::{GraphType, ScalarKind};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn arguments() -> ArgumentList {
        let string = GraphType::scalar(ScalarKind::String);
        ArgumentList::from_descriptors(vec![
            ArgumentDescriptor::filter("Name", EntityPath::parse("Name"), string.clone(), true).unwrap(),
            ArgumentDescriptor::filter("Number", EntityPath::parse("Number"), string.clone(), true).unwrap(),
            ArgumentDescriptor::filter(
                "RoomsNumber",
                EntityPath::new(vec![EntityPathSegment::new("Rooms").list(), EntityPathSegment::new("Number")]),
                string,
                true,
            )
            .unwrap(),
        ])
        .support_order_by()
    }

    fn order(text: &str) -> Result<Vec<SortKey>, QueryError> {
        let values: RequestArguments = [("OrderBy", Value::from(text))].into_iter().collect();
        build_order_by(&arguments(), &values)
    }

    #[test]
    fn test_tokens_split_on_non_word_characters() {
        assert_eq!(tokens(" Name desc,Number\tasc ").collect::<Vec<_>>(), vec!["Name", "desc", "Number", "asc"]);
    }

    #[test]
    fn test_composite_sort() {
        assert_eq!(
            order("Name desc, Number asc").unwrap(),
            vec![
                SortKey::descending(MemberPath::new(["Name"])),
                SortKey::ascending(MemberPath::new(["Number"])),
            ]
        );
    }

    #[test]
    fn test_keys_default_to_ascending() {
        assert_eq!(
            order("number NAME").unwrap(),
            vec![
                SortKey::ascending(MemberPath::new(["Number"])),
                SortKey::ascending(MemberPath::new(["Name"])),
            ]
        );
    }

    #[test]
    fn test_empty_value() {
        assert_matches!(order(""), Err(QueryError::EmptyOrderBy { argument }) if argument == "OrderBy");
        assert_matches!(order(" , "), Err(QueryError::EmptyOrderBy { .. }));
    }

    #[test]
    fn test_direction_without_key() {
        assert_matches!(
            order("asc"),
            Err(QueryError::DanglingDirection { token, .. }) if token == "asc"
        );
        assert_matches!(
            order("Name asc desc"),
            Err(QueryError::DanglingDirection { token, .. }) if token == "desc"
        );
    }

    #[test]
    fn test_unknown_field() {
        assert_matches!(
            order("Name Foo"),
            Err(QueryError::UnknownOrderByField { field, .. }) if field == "Foo"
        );
    }

    #[test]
    fn test_collection_field_is_rejected() {
        assert_matches!(
            order("RoomsNumber"),
            Err(QueryError::CollectionOrderByField { field, .. }) if field == "RoomsNumber"
        );
    }

    #[test]
    fn test_absent_argument_is_no_order() {
        assert_eq!(build_order_by(&arguments(), &RequestArguments::new()).unwrap(), vec![]);
    }

    #[test]
    fn test_non_string_value() {
        let values: RequestArguments = [("OrderBy", Value::from(1))].into_iter().collect();
        assert_matches!(build_order_by(&arguments(), &values), Err(QueryError::InvalidOrderBy { .. }));
    }
}
