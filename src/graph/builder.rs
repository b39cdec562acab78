use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::registry::{Arguments, Registry};
use super::value::{Partial, Value};
use crate::config::BuildConfig;
use crate::document::{display_path, join_path, Mapping, Node, NodeRef};
use crate::error::BuildError;

/// Counters collected while building one document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuildStats {
	/// Constructors invoked
	pub instantiated: usize,
	/// Deferred calls created
	pub partials: usize,
	/// Target mappings reached again through an alias and reused
	pub reused: usize,
}

#[derive(Debug)]
pub struct BuildReport {
	pub value: Value,
	pub stats: BuildStats,
}

/// Walks a resolved tree and instantiates its target mappings children-first.
pub struct ObjectGraphBuilder<'r> {
	registry: &'r Registry,
	config: BuildConfig,
}

/// Reserved-key view of one target mapping
struct TargetSpec<'n> {
	name: &'n str,
	partial: bool,
	recursive: bool,
	positional: &'n [NodeRef],
}

#[derive(Default)]
struct BuildState {
	// keyed by node address; the root keeps every node alive for the whole build
	memo: HashMap<usize, Value>,
	stats: BuildStats,
}

impl<'r> ObjectGraphBuilder<'r> {
	pub fn new(registry: &'r Registry) -> Self {
		Self::with_config(registry, BuildConfig::default())
	}

	pub fn with_config(registry: &'r Registry, config: BuildConfig) -> Self {
		ObjectGraphBuilder { registry, config }
	}

	pub fn registry(&self) -> &Registry {
		self.registry
	}

	pub fn build(&self, root: &NodeRef) -> Result<Value, BuildError> {
		self.build_report(root).map(|report| report.value)
	}

	pub fn build_report(&self, root: &NodeRef) -> Result<BuildReport, BuildError> {
		let mut state = BuildState::default();
		let value = self.build_node(root, "", &mut state)?;
		debug!(
			instantiated = state.stats.instantiated,
			partials = state.stats.partials,
			reused = state.stats.reused,
			"object graph built"
		);
		Ok(BuildReport {
			value,
			stats: state.stats,
		})
	}

	fn build_node(&self, node: &NodeRef, path: &str, state: &mut BuildState) -> Result<Value, BuildError> {
		if node.is_scalar() {
			return Ok(Value::from_node(node));
		}

		let address = Rc::as_ptr(node) as usize;
		if let Some(value) = state.memo.get(&address) {
			if matches!(value, Value::Object(_) | Value::Partial(_)) {
				state.stats.reused += 1;
			}
			return Ok(value.clone());
		}

		let value = match &**node {
			Node::Map(map) if map.contains_key(&self.config.target_key) => self.build_target(map, path, state)?,
			Node::Map(map) => {
				let mut built = IndexMap::with_capacity(map.len());
				for (key, child) in map {
					built.insert(key.clone(), self.build_node(child, &join_path(path, key), state)?);
				}
				Value::Dict(built)
			}
			Node::Seq(items) => {
				let mut built = Vec::with_capacity(items.len());
				for (index, child) in items.iter().enumerate() {
					built.push(self.build_node(child, &join_path(path, &index.to_string()), state)?);
				}
				Value::List(built)
			}
			_ => Value::from_node(node),
		};

		state.memo.insert(address, value.clone());
		Ok(value)
	}

	fn build_target(&self, map: &Mapping, path: &str, state: &mut BuildState) -> Result<Value, BuildError> {
		let spec = self.target_spec(map, path)?;
		let shown = display_path(path);
		let constructor = self.registry.get(spec.name).ok_or_else(|| BuildError::UnknownTarget {
			target: spec.name.to_string(),
			path: shown.clone(),
		})?;

		let mut arguments = Arguments::new();
		let args_path = join_path(path, &self.config.args_key);
		for (index, item) in spec.positional.iter().enumerate() {
			let item_path = join_path(&args_path, &index.to_string());
			arguments.positional.push(self.argument(item, &item_path, spec.recursive, state)?);
		}
		for (key, child) in map.iter().filter(|(key, _)| !self.config.is_reserved(key)) {
			let value = self.argument(child, &join_path(path, key), spec.recursive, state)?;
			arguments.keyword.insert(key.clone(), value);
		}

		if spec.partial {
			constructor
				.signature()
				.bind(arguments.clone(), true)
				.map_err(|kind| BuildError::Argument {
					target: spec.name.to_string(),
					path: shown.clone(),
					kind,
				})?;
			trace!(constructor = spec.name, path = %shown, "deferring call");
			state.stats.partials += 1;
			return Ok(Value::Partial(Rc::new(Partial::new(
				spec.name,
				&shown,
				constructor.clone(),
				arguments,
			))));
		}

		trace!(constructor = spec.name, path = %shown, "instantiating");
		let value = constructor.invoke(spec.name, &shown, arguments)?;
		state.stats.instantiated += 1;
		Ok(value)
	}

	fn argument(&self, node: &NodeRef, path: &str, recursive: bool, state: &mut BuildState) -> Result<Value, BuildError> {
		if recursive {
			self.build_node(node, path, state)
		} else {
			Ok(Value::from_node(node))
		}
	}

	fn target_spec<'n>(&self, map: &'n Mapping, path: &str) -> Result<TargetSpec<'n>, BuildError> {
		let malformed = |message: String| BuildError::MalformedTarget {
			path: display_path(path),
			message,
		};
		let flag = |key: &str, default: bool| -> Result<bool, BuildError> {
			match map.get(key).map(|node| &**node) {
				None => Ok(default),
				Some(Node::Bool(b)) => Ok(*b),
				Some(other) => Err(malformed(format!("'{}' must be a bool, found a {}", key, other.type_name()))),
			}
		};

		let name = match map.get(&self.config.target_key).map(|node| &**node) {
			Some(Node::Str(name)) => name.as_str(),
			Some(other) => {
				return Err(malformed(format!(
					"'{}' must be a string, found a {}",
					self.config.target_key,
					other.type_name()
				)))
			}
			None => return Err(malformed(format!("missing '{}'", self.config.target_key))),
		};
		let positional: &[NodeRef] = match map.get(&self.config.args_key).map(|node| &**node) {
			None | Some(Node::Null) => &[],
			Some(Node::Seq(items)) => items,
			Some(other) => {
				return Err(malformed(format!(
					"'{}' must be a sequence, found a {}",
					self.config.args_key,
					other.type_name()
				)))
			}
		};

		Ok(TargetSpec {
			name,
			partial: flag(&self.config.partial_key, false)?,
			recursive: flag(&self.config.recursive_key, true)?,
			positional,
		})
	}

	/// Reports every problem in the document without invoking any constructor.
	/// Shared subtrees are checked once.
	pub fn validate(&self, root: &NodeRef) -> Vec<BuildError> {
		let mut visited = HashSet::new();
		let mut errors = Vec::new();
		self.check_node(root, "", &mut visited, &mut errors);
		errors
	}

	fn check_node(&self, node: &NodeRef, path: &str, visited: &mut HashSet<usize>, errors: &mut Vec<BuildError>) {
		if node.is_scalar() || !visited.insert(Rc::as_ptr(node) as usize) {
			return;
		}
		match &**node {
			Node::Map(map) if map.contains_key(&self.config.target_key) => self.check_target(map, path, visited, errors),
			Node::Map(map) => {
				for (key, child) in map {
					self.check_node(child, &join_path(path, key), visited, errors);
				}
			}
			Node::Seq(items) => {
				for (index, child) in items.iter().enumerate() {
					self.check_node(child, &join_path(path, &index.to_string()), visited, errors);
				}
			}
			_ => {}
		}
	}

	fn check_target(&self, map: &Mapping, path: &str, visited: &mut HashSet<usize>, errors: &mut Vec<BuildError>) {
		let spec = match self.target_spec(map, path) {
			Ok(spec) => spec,
			Err(err) => {
				errors.push(err);
				return;
			}
		};

		let keyword: Vec<(&String, &NodeRef)> = map.iter().filter(|(key, _)| !self.config.is_reserved(key)).collect();
		if spec.recursive {
			let args_path = join_path(path, &self.config.args_key);
			for (index, item) in spec.positional.iter().enumerate() {
				self.check_node(item, &join_path(&args_path, &index.to_string()), visited, errors);
			}
			for (key, child) in &keyword {
				self.check_node(child, &join_path(path, key), visited, errors);
			}
		}

		let constructor = match self.registry.get(spec.name) {
			Some(constructor) => constructor,
			None => {
				errors.push(BuildError::UnknownTarget {
					target: spec.name.to_string(),
					path: display_path(path),
				});
				return;
			}
		};
		let placeholders = Arguments {
			positional: vec![Value::Null; spec.positional.len()],
			keyword: keyword.iter().map(|(key, _)| ((*key).clone(), Value::Null)).collect(),
		};
		if let Err(kind) = constructor.signature().bind(placeholders, spec.partial) {
			errors.push(BuildError::Argument {
				target: spec.name.to_string(),
				path: display_path(path),
				kind,
			});
		}
	}
}
