//! Document loading: YAML text to a resolved, acyclic tree of shared nodes.

mod loader;
mod node;
mod scalar;

pub use self::loader::{load_str, DocumentLoader};
pub use self::node::{Mapping, Node, NodeRef};
pub use self::scalar::resolve_plain;

pub(crate) use self::node::{display_path, join_path};
