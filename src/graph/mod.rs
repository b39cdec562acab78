//! Object graph construction from resolved documents.

mod builder;
mod registry;
mod value;

pub use self::builder::{BuildReport, BuildStats, ObjectGraphBuilder};
pub use self::registry::{Arguments, BoundArguments, Constructor, ConstructorFn, Param, Registry, Signature};
pub use self::value::{Component, Instance, Object, Partial, Value};
