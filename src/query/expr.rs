//! Filter and sort expressions
//!
//! Expressions reference entity members by path and parameter values by
//! index; values never appear in the expression itself. The `Display`
//! impls render Dynamic-LINQ style text for logging:
//!
//! ```text
//! Number == @0
//! np(Guest.NullableInt) == @0
//! (Rooms != null && Rooms.Any(Number == @0))
//! (CheckinDate >= @0) && (CheckinDate < @1)
//! ```

use std::fmt;

use crate::arguments::{EntityPath, EntityPathSegment};

use super::value::QueryValue;

/// Dotted member access relative to the current scope.
///
/// An empty path refers to the scope itself (`it`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPath {
    members: Vec<String>,
}

impl MemberPath {
    pub fn new<S: Into<String>>(members: impl IntoIterator<Item = S>) -> Self {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Flatten segments, splitting dotted segment paths into members.
    pub fn from_segments(segments: &[EntityPathSegment]) -> Self {
        Self::new(segments.iter().flat_map(EntityPathSegment::members))
    }

    pub fn from_entity_path(path: &EntityPath) -> Self {
        Self::from_segments(path.segments())
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() {
            return f.write_str("it");
        }
        f.write_str(&self.members.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ge,
    Lt,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Eq => "==",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
        })
    }
}

/// `member op @param`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub member: MemberPath,
    pub op: CompareOp,
    /// Index into [`Filter::params`]
    pub param: usize,
    /// A missing intermediate member compares as not-equal instead of failing
    pub null_propagating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Compare(Comparison),
    /// True if any element of `collection` satisfies `predicate`; false if
    /// the collection itself is absent.
    Any {
        collection: MemberPath,
        null_propagating: bool,
        predicate: Box<Expr>,
    },
    And(Vec<Expr>),
}

impl Expr {
    pub fn compare(member: MemberPath, op: CompareOp, param: usize, null_propagating: bool) -> Self {
        Expr::Compare(Comparison {
            member,
            op,
            param,
            null_propagating,
        })
    }

    /// Conjunction of `exprs`; a single expression is returned unwrapped.
    pub fn and(mut exprs: Vec<Expr>) -> Self {
        if exprs.len() == 1 {
            if let Some(expr) = exprs.pop() {
                return expr;
            }
        }
        Expr::And(exprs)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare(c) if c.null_propagating => {
                write!(f, "np({}) {} @{}", c.member, c.op, c.param)
            }
            Expr::Compare(c) => write!(f, "{} {} @{}", c.member, c.op, c.param),
            Expr::Any {
                collection,
                null_propagating,
                predicate,
            } => {
                let collection = if *null_propagating {
                    format!("np({collection})")
                } else {
                    collection.to_string()
                };
                write!(f, "({collection} != null && {collection}.Any({predicate}))")
            }
            Expr::And(exprs) => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" && ")?;
                    }
                    write!(f, "({expr})")?;
                }
                Ok(())
            }
        }
    }
}

/// A predicate with its bound parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub expr: Expr,
    pub params: Vec<QueryValue>,
}

impl Filter {
    pub fn new(expr: Expr, params: Vec<QueryValue>) -> Self {
        Self { expr, params }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse an `asc` / `desc` token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Ascending)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Descending)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub member: MemberPath,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(member: MemberPath) -> Self {
        Self {
            member,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(member: MemberPath) -> Self {
        Self {
            member,
            direction: SortDirection::Descending,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{} asc", self.member),
            SortDirection::Descending => write!(f, "{} desc", self.member),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_comparisons() {
        let plain = Expr::compare(MemberPath::new(["Number"]), CompareOp::Eq, 0, false);
        let np = Expr::compare(MemberPath::new(["Guest", "NullableInt"]), CompareOp::Eq, 0, true);

        assert_eq!(plain.to_string(), "Number == @0");
        assert_eq!(np.to_string(), "np(Guest.NullableInt) == @0");
    }

    #[test]
    fn test_render_any_and_conjunction() {
        let any = Expr::Any {
            collection: MemberPath::new(["Rooms"]),
            null_propagating: false,
            predicate: Box::new(Expr::compare(MemberPath::new(["Number"]), CompareOp::Eq, 0, false)),
        };
        assert_eq!(any.to_string(), "(Rooms != null && Rooms.Any(Number == @0))");

        let range = Expr::and(vec![
            Expr::compare(MemberPath::new(["CheckinDate"]), CompareOp::Ge, 0, true),
            Expr::compare(MemberPath::new(["CheckinDate"]), CompareOp::Lt, 1, true),
        ]);
        assert_eq!(
            range.to_string(),
            "(np(CheckinDate) >= @0) && (np(CheckinDate) < @1)"
        );
    }

    #[test]
    fn test_and_of_one_is_unwrapped() {
        let expr = Expr::and(vec![Expr::compare(MemberPath::new(["Id"]), CompareOp::Eq, 0, false)]);
        assert!(matches!(expr, Expr::Compare(_)));
    }

    #[test]
    fn test_member_path_flattens_dotted_segments() {
        let path = MemberPath::from_segments(&[
            EntityPathSegment::new("Room"),
            EntityPathSegment::new("RoomDetail.Beds"),
        ]);
        assert_eq!(path.members(), ["Room", "RoomDetail", "Beds"]);
        assert_eq!(MemberPath::default().to_string(), "it");
    }

    #[test]
    fn test_sort_direction_tokens() {
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::parse("Name"), None);
    }
}
