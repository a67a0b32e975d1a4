//! Named, path-bound properties over nested documents.
//!
//! Declare a table of properties, each bound to a lookup path, build it once
//! into a [`Schema`], and wrap documents with it. Reads, writes and deletes
//! through a property name resolve the path against the wrapped document,
//! while the document itself stays a plain, directly usable container.

pub use crate::errors::{ConfigError, PathError, PathParseError, PropertyError, PropertyResult};
pub use crate::path::{Path, PathSegment};
pub use crate::property::{prop, Access, Operation, PropertySpec};
pub use crate::schema::{BoundProperty, Schema, SchemaBuilder};
pub use crate::value::Value;
pub use crate::wrapper::Wrapped;

pub mod cli;
pub mod config;
pub mod container;
pub mod declare;
pub mod errors;
pub mod path;
pub mod property;
pub mod resolver;
pub mod schema;
pub mod value;
pub mod wrapper;
