//! Argument descriptors and the metadata collection built from them.

mod descriptor;
mod list;

pub use descriptor::{ArgumentDescriptor, ArgumentKind, Container, EntityPath, EntityPathSegment};
pub use list::{ArgumentList, PseudoArgumentNames};
