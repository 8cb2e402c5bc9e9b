//! Dynamic filter, order-by and paging arguments for GraphQL fields
//!
//! The crate walks an object graph type, emits one filter argument per
//! scalar leaf it can reach, and at request time composes the supplied
//! argument values into a lazily evaluated query:
//!
//! ```rust,ignore
//! use graphql_query_args::{ArgumentListBuilder, GraphObject, QueryComposer, QueryErrors, TypeRegistry};
//!
//! #[derive(GraphObject)]
//! struct RoomType {
//!     id: i32,
//!     name: Option<String>,
//!     #[graph(enumeration = "RoomStatus")]
//!     status: RoomStatus,
//!     room_detail: RoomDetailType,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<RoomType>().register::<RoomDetailType>();
//!
//! let arguments = ArgumentListBuilder::new(Arc::new(registry))
//!     .build::<RoomType>()
//!     .support_order_by()
//!     .support_paging();
//!
//! // Per request
//! let mut errors = QueryErrors::new();
//! let rooms = QueryComposer::new(MemoryQueryable::new(rooms), &arguments, values)
//!     .build(&mut errors)
//!     .to_vec()?;
//! ```

extern crate self as graphql_query_args;

pub mod arguments;
pub mod composer;
pub mod config;
pub mod discovery;
pub mod error;
pub mod graphql;
pub mod matcher;
pub mod query;
pub mod request;
pub mod resolver;
pub mod schema;
pub mod telemetry;

pub use arguments::{ArgumentDescriptor, ArgumentKind, ArgumentList, EntityPath, EntityPathSegment};
pub use composer::{Paging, QueryComposer, QueryPlan};
pub use config::QueryArgsConfig;
pub use discovery::ArgumentListBuilder;
pub use error::{QueryError, QueryErrors};
pub use graphql_query_args_macros::GraphObject;
pub use query::{MemoryQueryable, Queryable};
#[cfg(feature = "sqlite")]
pub use query::SqliteDocuments;
pub use request::RequestArguments;
pub use resolver::{DefaultPathResolver, MappedPathResolver, MappingProfile, PathResolver};
pub use schema::{GraphObject, GraphType, ObjectType, ScalarKind, TypeRegistry};
