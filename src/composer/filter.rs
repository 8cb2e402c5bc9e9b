//! Filter phase: one predicate fragment per supplied filter argument

use async_graphql::Value;
use chrono::TimeDelta;

use crate::arguments::{ArgumentDescriptor, ArgumentKind, ArgumentList, Container, EntityPathSegment};
use crate::error::QueryError;
use crate::query::{CompareOp, Expr, Filter, MemberPath, QueryValue, parse_datetime};
use crate::request::RequestArguments;

/// Comparison applied at the leaf of a path
enum Leaf {
    Equal(usize),
    /// `[start, end)`
    Range(usize, usize),
}

/// AND of every fragment, or `None` when no filter argument was supplied.
pub(crate) fn build_filter(
    arguments: &ArgumentList,
    values: &RequestArguments,
) -> Result<Option<Filter>, QueryError> {
    let mut params = Vec::new();
    let mut fragments = Vec::new();

    for descriptor in arguments.iter().filter(|d| d.kind() == ArgumentKind::Filter) {
        let Some(value) = values.get(descriptor.name()) else {
            continue;
        };
        if matches!(value, Value::Null) {
            tracing::trace!(argument = %descriptor.name(), "Ignoring null filter value");
            continue;
        }
        fragments.push(fragment(descriptor, value, &mut params)?);
    }

    if fragments.is_empty() {
        return Ok(None);
    }
    Ok(Some(Filter::new(Expr::and(fragments), params)))
}

fn fragment(
    descriptor: &ArgumentDescriptor,
    value: &Value,
    params: &mut Vec<QueryValue>,
) -> Result<Expr, QueryError> {
    let leaf = match date_range(descriptor, value)? {
        Some((start, end)) => {
            params.push(QueryValue::DateTime(start));
            params.push(QueryValue::DateTime(end));
            Leaf::Range(params.len() - 2, params.len() - 1)
        }
        None => {
            params.push(QueryValue::from_graphql(descriptor.name(), value)?);
            Leaf::Equal(params.len() - 1)
        }
    };

    let segments = descriptor.entity_path().segments();
    Ok(match descriptor.container() {
        Container::Direct => compare(segments, descriptor.is_required(), &leaf),
        Container::Collection { segment } => {
            let (outer, inner) = segments.split_at(segment + 1);
            existential(outer, compare(inner, descriptor.is_required(), &leaf))
        }
    })
}

/// The day `value` falls on, if the argument is a date.
fn date_range(
    descriptor: &ArgumentDescriptor,
    value: &Value,
) -> Result<Option<(chrono::NaiveDateTime, chrono::NaiveDateTime)>, QueryError> {
    if !descriptor.argument_type().is_date() {
        return Ok(None);
    }
    let Value::String(text) = value else {
        return Ok(None);
    };
    let Some(start) = parse_datetime(text) else {
        return Ok(None);
    };

    let end = start
        .checked_add_signed(TimeDelta::days(1))
        .ok_or_else(|| QueryError::UnsupportedValue {
            argument: descriptor.name().to_string(),
            reason: "date out of range".to_string(),
        })?;
    Ok(Some((start, end)))
}

/// Wrap `predicate` in an `Any` over the collection `outer` ends with, and
/// again for every collection enclosing that one.
///
/// The collection member is null-propagating when a segment between the
/// enclosing scope and the collection is nullable.
fn existential(outer: &[EntityPathSegment], predicate: Expr) -> Expr {
    let Some((_, enclosing)) = outer.split_last() else {
        return predicate;
    };
    let (scope, collection) = match Container::of(enclosing) {
        Container::Direct => outer.split_at(0),
        Container::Collection { segment } => outer.split_at(segment + 1),
    };

    let any = Expr::Any {
        collection: MemberPath::from_segments(collection),
        null_propagating: collection[..collection.len() - 1].iter().any(|s| s.is_nullable),
        predicate: Box::new(predicate),
    };
    if scope.is_empty() { any } else { existential(scope, any) }
}

/// Leaf comparison for a path with no collection on it.
///
/// Null propagation is used when the leaf is nullable or any intermediate
/// segment is nullable.
fn compare(segments: &[EntityPathSegment], is_required: bool, leaf: &Leaf) -> Expr {
    let intermediate = segments.len().saturating_sub(1);
    let null_propagating = !is_required || segments[..intermediate].iter().any(|s| s.is_nullable);
    let member = MemberPath::from_segments(segments);

    match *leaf {
        Leaf::Equal(param) => Expr::compare(member, CompareOp::Eq, param, null_propagating),
        Leaf::Range(start, end) => Expr::And(vec![
            Expr::compare(member.clone(), CompareOp::Ge, start, null_propagating),
            Expr::compare(member, CompareOp::Lt, end, null_propagating),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::EntityPath;
    use crate::schema::{GraphType, ScalarKind};
    use pretty_assertions::assert_eq;

    fn descriptor(path: &str, segments: Vec<EntityPathSegment>, ty: GraphType, required: bool) -> ArgumentDescriptor {
        ArgumentDescriptor::filter(path, EntityPath::new(segments), ty, required).unwrap()
    }

    fn int() -> GraphType {
        GraphType::scalar(ScalarKind::Int)
    }

    #[test]
    fn test_no_supplied_arguments_is_no_filter() {
        let list = ArgumentList::from_descriptors(vec![descriptor(
            "Id",
            vec![EntityPathSegment::new("Id")],
            int(),
            true,
        )]);
        let values: RequestArguments = [("Other", Value::from(1))].into_iter().collect();

        assert_eq!(build_filter(&list, &values).unwrap(), None);
    }

    #[test]
    fn test_fragments_are_joined_in_declaration_order() {
        let list = ArgumentList::from_descriptors(vec![
            descriptor("Id", vec![EntityPathSegment::new("Id")], int(), true),
            descriptor(
                "GuestNullableInt",
                vec![EntityPathSegment::new("Guest").nullable(), EntityPathSegment::new("NullableInt").nullable()],
                int(),
                false,
            ),
        ]);
        let values: RequestArguments = [("guestnullableint", Value::from(7)), ("ID", Value::from(1))]
            .into_iter()
            .collect();

        let filter = build_filter(&list, &values).unwrap().unwrap();
        assert_eq!(filter.to_string(), "(Id == @0) && (np(Guest.NullableInt) == @1)");
        assert_eq!(filter.params, vec![QueryValue::Int(1), QueryValue::Int(7)]);
    }

    #[test]
    fn test_nullable_intermediate_propagates_nulls() {
        let list = ArgumentList::from_descriptors(vec![descriptor(
            "GuestId",
            vec![EntityPathSegment::new("Guest").nullable(), EntityPathSegment::new("Id")],
            int(),
            true,
        )]);
        let values: RequestArguments = [("GuestId", Value::from(1))].into_iter().collect();

        let filter = build_filter(&list, &values).unwrap().unwrap();
        assert_eq!(filter.to_string(), "np(Guest.Id) == @0");
    }

    #[test]
    fn test_nested_lists_nest_existential_scopes() {
        let list = ArgumentList::from_descriptors(vec![descriptor(
            "RoomsGuestsName",
            vec![
                EntityPathSegment::new("Rooms").list().nullable(),
                EntityPathSegment::new("Guests").list().nullable(),
                EntityPathSegment::new("Name"),
            ],
            GraphType::scalar(ScalarKind::String),
            true,
        )]);
        let values: RequestArguments = [("RoomsGuestsName", Value::from("Ann"))].into_iter().collect();

        let filter = build_filter(&list, &values).unwrap().unwrap();
        assert_eq!(
            filter.to_string(),
            "(Rooms != null && Rooms.Any((Guests != null && Guests.Any(Name == @0))))"
        );
    }

    #[test]
    fn test_collection_under_nullable_object_follows_container() {
        let descriptor = descriptor(
            "ReservationRoomsNumber",
            vec![
                EntityPathSegment::new("Reservation").nullable(),
                EntityPathSegment::new("Rooms").list(),
                EntityPathSegment::new("RoomDetail"),
                EntityPathSegment::new("Beds").nullable(),
            ],
            int(),
            false,
        );
        assert_eq!(descriptor.container(), Container::Collection { segment: 1 });

        let list = ArgumentList::from_descriptors(vec![descriptor]);
        let values: RequestArguments = [("ReservationRoomsNumber", Value::from(2))].into_iter().collect();

        let filter = build_filter(&list, &values).unwrap().unwrap();
        assert_eq!(
            filter.to_string(),
            "(np(Reservation.Rooms) != null && np(Reservation.Rooms).Any(np(RoomDetail.Beds) == @0))"
        );
    }

    #[test]
    fn test_unparseable_date_falls_back_to_equality() {
        let list = ArgumentList::from_descriptors(vec![descriptor(
            "CheckinDate",
            vec![EntityPathSegment::new("CheckinDate")],
            GraphType::scalar(ScalarKind::Date),
            true,
        )]);
        let values: RequestArguments = [("CheckinDate", Value::from("someday"))].into_iter().collect();

        let filter = build_filter(&list, &values).unwrap().unwrap();
        assert_eq!(filter.to_string(), "CheckinDate == @0");
        assert_eq!(filter.params, vec![QueryValue::String("someday".into())]);
    }
}
