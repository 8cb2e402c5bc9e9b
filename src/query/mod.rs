//! Queryable data sources and the expressions composed against them.

mod expr;
mod memory;
mod queryable;
#[cfg(feature = "sqlite")]
mod sqlite;
mod value;

pub use expr::{CompareOp, Comparison, Expr, Filter, MemberPath, SortDirection, SortKey};
pub use memory::MemoryQueryable;
pub use queryable::{MAX_ROWS, Queryable};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDocuments;
pub use value::{QueryValue, parse_datetime};
