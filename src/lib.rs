//! Loads ESRGAN-style configuration documents and builds the object graphs they declare.
//!
//! A document is YAML with anchors, aliases and `<<` merge keys. The
//! [`document`] module resolves it into a tree of shared [`Node`]s, and the
//! [`graph`] module instantiates every mapping carrying a `_target_` key
//! through a [`Registry`] of constructors, children first.
//!
//! ```no_run
//! use srgan_config::{instantiate, Registry};
//!
//! let registry = Registry::with_builtins();
//! let value = instantiate("_target_: esrgan.models.LinearHead\nin_channels: 512\nout_channels: 1\n", &registry)?;
//! println!("{}", value.to_json());
//! # Ok::<(), srgan_config::error::ConfigError>(())
//! ```

extern crate clap;
extern crate indexmap;
extern crate serde;

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_file;
pub mod constants;
pub mod document;
pub mod error;
pub mod graph;
pub mod logging;
pub mod models;
pub mod utils;
pub mod validation;

pub use config::{BuildConfig, LoaderConfig};
pub use document::{load_str, DocumentLoader, Node, NodeRef};
pub use error::{BuildError, ConfigError, LoadError, Result};
pub use graph::{Arguments, Object, ObjectGraphBuilder, Partial, Registry, Signature, Value};

/// Loads `text` with the default loader settings and builds it against `registry`.
pub fn instantiate(text: &str, registry: &Registry) -> Result<Value> {
	let root = load_str(text)?;
	Ok(ObjectGraphBuilder::new(registry).build(&root)?)
}
